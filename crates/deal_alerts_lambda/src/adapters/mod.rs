pub mod deal_repository;
pub mod memory;
pub mod messenger;
pub mod postgres;
pub mod telegram;

pub mod deal_store;
pub mod http;
pub mod notifier;

//! Lambda handlers and adapters for the tour-deal alert functions.
//!
//! This crate owns runtime integration details (API Gateway event handling,
//! the Telegram client and the Postgres repository). Domain shapes, the
//! message template and configuration live in `deal_alerts_core`.

pub mod adapters;
pub mod handlers;
pub mod telemetry;

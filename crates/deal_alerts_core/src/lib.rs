//! Shared tour-deal domain primitives.
//!
//! This crate owns the deal data shapes, response envelopes, the alert message
//! template, the sample seed data and typed configuration. It intentionally
//! excludes the Lambda runtime, the HTTP client and the database driver.

pub mod config;
pub mod contract;
pub mod message;
pub mod samples;

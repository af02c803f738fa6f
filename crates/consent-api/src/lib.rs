//! HTTP boundary for the account access consent service.

pub mod config;
pub mod error;
pub mod server;

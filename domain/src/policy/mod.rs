//! Error policy configuration and the retry backoff schedule.

pub mod backoff;
pub mod config;

//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: invalid conversation setup
//! - [`string::preview`]: character-safe text shortening

pub mod error;
pub mod string;

//! Application services shared by use cases

pub mod error_policy;
pub mod provider_registry;

//! Prompt construction for conversation turns

pub mod builder;

pub use builder::PromptBuilder;

//! Conversation state: turns, the transcript and run settings.

pub mod settings;
pub mod status;
pub mod transcript;
pub mod turn;

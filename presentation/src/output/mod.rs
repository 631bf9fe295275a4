//! Transcript rendering

pub mod console;
pub mod document;
pub mod formatter;
pub mod json;

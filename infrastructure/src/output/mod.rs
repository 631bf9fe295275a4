//! Persisting rendered transcripts

mod transcript_store;

pub use transcript_store::TranscriptStore;

//! Speakers: who takes part in a conversation and how they sound.
//!
//! - [`entities::SpeakerDefinition`] binds an id to a provider kind, model and character
//! - [`character::CharacterDefinition`] is the persona and its generation parameters
//! - [`roster::SpeakerRoster`] is the validated, ordered speaker set that drives rotation

pub mod character;
pub mod entities;
pub mod roster;

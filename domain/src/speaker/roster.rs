//! The ordered speaker set and round-robin rotation

use super::entities::{SpeakerDefinition, SpeakerId};
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Validated set of speakers in configuration order (Entity)
///
/// Configuration order is the rotation order. Who speaks first only decides
/// where the cycle starts, never who follows whom.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerRoster {
    speakers: Vec<SpeakerDefinition>,
}

impl SpeakerRoster {
    /// Build a roster, rejecting fewer than two speakers, empty ids and duplicates.
    pub fn new(speakers: Vec<SpeakerDefinition>) -> Result<Self, DomainError> {
        if speakers.len() < 2 {
            return Err(DomainError::NotEnoughSpeakers(speakers.len()));
        }

        let mut seen = HashSet::new();
        for speaker in &speakers {
            if speaker.id.as_str().trim().is_empty() {
                return Err(DomainError::EmptySpeakerId);
            }
            if !seen.insert(speaker.id.as_str()) {
                return Err(DomainError::DuplicateSpeaker(speaker.id.to_string()));
            }
        }

        Ok(Self { speakers })
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    /// Always false for a constructed roster; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeakerDefinition> {
        self.speakers.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SpeakerId> {
        self.speakers.iter().map(|s| &s.id)
    }

    pub fn first(&self) -> &SpeakerDefinition {
        &self.speakers[0]
    }

    pub fn get(&self, id: &SpeakerId) -> Option<&SpeakerDefinition> {
        self.speakers.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SpeakerId) -> bool {
        self.position(id).is_some()
    }

    /// Index of a speaker in configuration order
    pub fn position(&self, id: &SpeakerId) -> Option<usize> {
        self.speakers.iter().position(|s| &s.id == id)
    }

    /// Display name for a speaker id, falling back to the raw id.
    pub fn display_name<'a>(&'a self, id: &'a SpeakerId) -> &'a str {
        self.get(id)
            .map(SpeakerDefinition::display_name)
            .unwrap_or(id.as_str())
    }

    /// Speaker for a 1-based turn number when `first` opens the conversation.
    ///
    /// Index is `(index(first) + turn - 1) mod len`.
    pub fn speaker_for_turn(
        &self,
        turn: u32,
        first: &SpeakerId,
    ) -> Result<&SpeakerDefinition, DomainError> {
        let start = self
            .position(first)
            .ok_or_else(|| DomainError::UnknownSpeaker(first.to_string()))?;
        let offset = (turn.max(1) - 1) as usize % self.speakers.len();
        Ok(&self.speakers[(start + offset) % self.speakers.len()])
    }

    /// Speaker that follows `current` in rotation order.
    pub fn next_after(&self, current: &SpeakerId) -> Result<&SpeakerDefinition, DomainError> {
        self.speaker_for_turn(2, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speaker::character::CharacterDefinition;

    fn speaker(id: &str) -> SpeakerDefinition {
        SpeakerDefinition::new(id, "openai", "gpt-4o", CharacterDefinition::new(""))
    }

    fn roster(ids: &[&str]) -> SpeakerRoster {
        SpeakerRoster::new(ids.iter().map(|id| speaker(id)).collect()).unwrap()
    }

    #[test]
    fn test_rejects_single_speaker() {
        let err = SpeakerRoster::new(vec![speaker("solo")]).unwrap_err();
        assert_eq!(err, DomainError::NotEnoughSpeakers(1));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = SpeakerRoster::new(vec![speaker("a"), speaker("a")]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateSpeaker("a".into()));
    }

    #[test]
    fn test_rejects_blank_id() {
        let err = SpeakerRoster::new(vec![speaker("a"), speaker(" ")]).unwrap_err();
        assert_eq!(err, DomainError::EmptySpeakerId);
    }

    #[test]
    fn test_two_speakers_alternate() {
        let roster = roster(&["alice", "bob"]);
        let first = SpeakerId::from("alice");
        let sequence: Vec<&str> = (1..=4)
            .map(|t| roster.speaker_for_turn(t, &first).unwrap().id.as_str())
            .collect();
        assert_eq!(sequence, vec!["alice", "bob", "alice", "bob"]);
    }

    #[test]
    fn test_rotation_formula_holds_for_every_start() {
        let ids = ["s0", "s1", "s2", "s3"];
        let roster = roster(&ids);
        for (k, first) in ids.iter().enumerate() {
            let first = SpeakerId::from(*first);
            for t in 1..=12u32 {
                let expected = ids[(k + t as usize - 1) % ids.len()];
                assert_eq!(roster.speaker_for_turn(t, &first).unwrap().id, expected);
            }
        }
    }

    #[test]
    fn test_rotation_follows_configuration_order_not_first_speaker() {
        let roster = roster(&["a", "b", "c"]);
        let first = SpeakerId::from("b");
        let sequence: Vec<&str> = (1..=5)
            .map(|t| roster.speaker_for_turn(t, &first).unwrap().id.as_str())
            .collect();
        assert_eq!(sequence, vec!["b", "c", "a", "b", "c"]);
    }

    #[test]
    fn test_unknown_first_speaker() {
        let roster = roster(&["a", "b"]);
        let err = roster
            .speaker_for_turn(1, &SpeakerId::from("zed"))
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownSpeaker("zed".into()));
    }

    #[test]
    fn test_next_after_wraps() {
        let roster = roster(&["a", "b", "c"]);
        assert_eq!(roster.next_after(&"c".into()).unwrap().id, "a");
        assert_eq!(roster.next_after(&"a".into()).unwrap().id, "b");
    }

    #[test]
    fn test_display_name_for_unknown_id_is_id() {
        let roster = roster(&["a", "b"]);
        let ghost = SpeakerId::from("ghost");
        assert_eq!(roster.display_name(&ghost), "ghost");
    }
}

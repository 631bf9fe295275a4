//! Append-only conversation history

use super::turn::Turn;
use crate::core::error::DomainError;
use serde::Serialize;

/// Ordered, append-only sequence of turns (Entity)
///
/// Numbering is contiguous from 1 and the length never exceeds the
/// capacity fixed at creation. Turns only enter through `push`, so there
/// is no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    capacity: u32,
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            turns: Vec::new(),
        }
    }

    /// Append the next turn.
    ///
    /// Fails when the turn number is not `len + 1` or the transcript is full.
    pub fn push(&mut self, turn: Turn) -> Result<(), DomainError> {
        if self.is_full() {
            return Err(DomainError::TranscriptFull(self.capacity));
        }
        let expected = self.next_turn_number();
        if turn.turn_number() != expected {
            return Err(DomainError::TurnOutOfOrder {
                expected_previous: expected - 1,
                got: turn.turn_number(),
            });
        }
        self.turns.push(turn);
        Ok(())
    }

    pub fn next_turn_number(&self) -> u32 {
        self.turns.len() as u32 + 1
    }

    pub fn is_full(&self) -> bool {
        self.turns.len() as u32 >= self.capacity
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(n: u32) -> Turn {
        Turn::new(n, "s".into(), "p", format!("r{}", n))
    }

    #[test]
    fn test_push_in_order() {
        let mut transcript = Transcript::with_capacity(3);
        transcript.push(turn(1)).unwrap();
        transcript.push(turn(2)).unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.next_turn_number(), 3);
        assert_eq!(transcript.last().unwrap().response(), "r2");
    }

    #[test]
    fn test_rejects_gap() {
        let mut transcript = Transcript::with_capacity(3);
        transcript.push(turn(1)).unwrap();
        let err = transcript.push(turn(3)).unwrap_err();
        assert_eq!(
            err,
            DomainError::TurnOutOfOrder {
                expected_previous: 1,
                got: 3
            }
        );
    }

    #[test]
    fn test_huge_capacity_does_not_allocate_up_front() {
        let mut transcript = Transcript::with_capacity(u32::MAX);
        assert_eq!(transcript.capacity(), u32::MAX);
        assert!(!transcript.is_full());
        transcript.push(turn(1)).unwrap();
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_rejects_overflow() {
        let mut transcript = Transcript::with_capacity(1);
        transcript.push(turn(1)).unwrap();
        assert!(transcript.is_full());
        assert_eq!(
            transcript.push(turn(2)).unwrap_err(),
            DomainError::TranscriptFull(1)
        );
    }
}

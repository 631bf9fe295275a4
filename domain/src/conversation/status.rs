//! Conversation lifecycle

use serde::{Deserialize, Serialize};

/// Lifecycle state of one conversation run
///
/// `NotStarted -> Running -> Completed`, or `Running -> Aborted` when the
/// error policy halts the run, or `Running -> Cancelled` on user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    NotStarted,
    Running,
    Completed,
    Aborted,
    Cancelled,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::NotStarted => "not_started",
            ConversationStatus::Running => "running",
            ConversationStatus::Completed => "completed",
            ConversationStatus::Aborted => "aborted",
            ConversationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversationStatus::Completed
                | ConversationStatus::Aborted
                | ConversationStatus::Cancelled
        )
    }

    /// Whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: ConversationStatus) -> bool {
        use ConversationStatus::*;
        matches!(
            (self, next),
            (NotStarted, Running) | (Running, Completed) | (Running, Aborted) | (Running, Cancelled)
        )
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

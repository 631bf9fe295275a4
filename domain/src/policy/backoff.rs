//! Exponential backoff schedule for the retry strategy

use std::time::Duration;

/// Delays of the form `initial * 2^index` (Value Object)
///
/// Index 0 is the wait before the second attempt, index 1 before the third,
/// and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    initial: Duration,
}

impl BackoffSchedule {
    pub fn new(initial: Duration) -> Self {
        Self { initial }
    }

    /// Delay for a 0-based retry index. Saturates instead of overflowing.
    pub fn delay(&self, retry_index: u32) -> Duration {
        let factor = 1u32.checked_shl(retry_index).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor)
    }

    /// The first `count` delays of the schedule.
    pub fn delays(&self, count: u32) -> Vec<Duration> {
        (0..count).map(|i| self.delay(i)).collect()
    }
}

//! Cancellable suspension port
//!
//! Every wait in a conversation (inter-turn delay, retry backoff) goes
//! through this port so tests can observe delays and a run can be
//! interrupted mid-wait.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The wait was interrupted because the conversation was cancelled
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Sleep interrupted by cancellation")]
pub struct SleepCancelled;

/// Suspend-for-duration primitive
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration` unless `cancellation` fires first.
    async fn sleep(
        &self,
        duration: Duration,
        cancellation: &CancellationToken,
    ) -> Result<(), SleepCancelled>;
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(
        &self,
        duration: Duration,
        cancellation: &CancellationToken,
    ) -> Result<(), SleepCancelled> {
        if cancellation.is_cancelled() {
            return Err(SleepCancelled);
        }
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(SleepCancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

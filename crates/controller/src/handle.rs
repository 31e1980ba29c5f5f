//! Ownership handle for a spawned polling task.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How long to wait for a cancelled task to exit before giving up on
/// joining it.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns one polling task: its cancellation token and join handle.
///
/// Dropping the handle cancels the token, so a discarded job can never
/// keep mutating state from a leaked timer.
pub struct JobHandle {
    cancel: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl JobHandle {
    pub(crate) fn new(cancel: CancellationToken, task: tokio::task::JoinHandle<()>) -> Self {
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Request cancellation. Idempotent and safe to call repeatedly.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the polling task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }

    /// Cancel the task and wait (bounded) for it to exit.
    ///
    /// Once this returns, the task can no longer mutate job state.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = tokio::time::timeout(STOP_TIMEOUT, task).await;
        }
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Cancellable status-polling loop.
//!
//! One task per job. Each tick performs a single bounded status
//! round-trip and applies the result to the shared [`JobState`]; the
//! loop exits on a terminal status, on too many consecutive failures,
//! or when the cancellation token fires. Transient failures (transport
//! errors, timeouts) are tolerated up to
//! [`PollConfig::max_consecutive_failures`] in a row.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use reelgen_client::{RemoteStatus, ShortsApi};
use reelgen_core::job::JobState;
use reelgen_core::types::JobId;

use crate::config::PollConfig;
use crate::error::JobError;

/// Poll job status until a terminal state or cancellation.
pub(crate) async fn run_poll_loop(
    api: Arc<ShortsApi>,
    job_id: JobId,
    config: PollConfig,
    state: Arc<watch::Sender<JobState>>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first interval tick completes immediately; skip it so the
    // backend gets one full interval before the first status query.
    ticker.tick().await;

    let mut consecutive_failures = 0u32;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, "Polling cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, "Polling cancelled mid-request");
                return;
            }
            result = tokio::time::timeout(config.request_timeout, api.job_status(&job_id)) => result,
        };

        // Cancellation may have raced the response; never mutate state
        // after the token fires.
        if cancel.is_cancelled() {
            return;
        }

        let failure = match result {
            Ok(Ok(status)) => {
                consecutive_failures = 0;
                match status.status {
                    RemoteStatus::Completed => {
                        state.send_modify(|s| s.complete());
                        tracing::info!(job_id = %job_id, "Generation completed");
                        return;
                    }
                    RemoteStatus::Failed => {
                        let message = status
                            .error
                            .unwrap_or_else(|| "Generation failed without an error message".into());
                        tracing::warn!(job_id = %job_id, error = %message, "Generation failed");
                        state.send_modify(|s| s.fail(message));
                        return;
                    }
                    RemoteStatus::Processing => {
                        state.send_modify(|s| s.record_progress(status.progress));
                        tracing::debug!(
                            job_id = %job_id,
                            reported = status.progress,
                            "Generation progress",
                        );
                        continue;
                    }
                }
            }
            Ok(Err(e)) => e.to_string(),
            Err(_elapsed) => format!(
                "status request exceeded {}s",
                config.request_timeout.as_secs()
            ),
        };

        consecutive_failures += 1;
        tracing::warn!(
            job_id = %job_id,
            consecutive_failures,
            error = %failure,
            "Status poll failed",
        );

        if consecutive_failures >= config.max_consecutive_failures {
            let message = JobError::Polling(format!(
                "{failure} ({consecutive_failures} consecutive failures)"
            ))
            .to_string();
            state.send_modify(|s| s.fail(message));
            return;
        }
    }
}

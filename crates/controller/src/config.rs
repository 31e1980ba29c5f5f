//! Tunable parameters for the status-polling loop.

use std::time::Duration;

/// Polling cadence and failure-tolerance settings.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status queries.
    pub interval: Duration,
    /// Upper bound on a single status round-trip. A poll that does not
    /// return within this window counts as one transient failure.
    pub request_timeout: Duration,
    /// Number of consecutive failed polls after which the job is
    /// marked failed. A single miss never fails the job.
    pub max_consecutive_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            max_consecutive_failures: 3,
        }
    }
}

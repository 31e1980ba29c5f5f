use std::time::Duration;

use reelgen_controller::PollConfig;

/// Backend connection and polling configuration loaded from
/// environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base HTTP URL of the generation backend.
    pub api_url: String,
    /// Status-polling parameters.
    pub poll: PollConfig,
}

impl BackendConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `BACKEND_API_URL`        | `http://localhost:3000/api` |
    /// | `POLL_INTERVAL_MS`       | `1000`                      |
    /// | `POLL_TIMEOUT_SECS`      | `10`                        |
    /// | `POLL_MAX_FAILURES`      | `3`                         |
    pub fn from_env() -> Self {
        let api_url = std::env::var("BACKEND_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".into());

        let interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("POLL_INTERVAL_MS must be a valid u64");

        let timeout_secs: u64 = std::env::var("POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("POLL_TIMEOUT_SECS must be a valid u64");

        let max_failures: u32 = std::env::var("POLL_MAX_FAILURES")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("POLL_MAX_FAILURES must be a valid u32");

        Self {
            api_url,
            poll: PollConfig {
                interval: Duration::from_millis(interval_ms),
                request_timeout: Duration::from_secs(timeout_secs),
                max_consecutive_failures: max_failures,
            },
        }
    }
}

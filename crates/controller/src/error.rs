use reelgen_core::error::CoreError;

/// Errors surfaced to the presentation layer.
///
/// Every variant corresponds to one stage of the job lifecycle; none of
/// them is ever allowed to escape as a panic. `Validation` errors are
/// raised before any network call is made.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Client-side input failed a precondition; nothing reached the
    /// network.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The job-creation call failed.
    #[error("Failed to submit generation request: {0}")]
    Submission(String),

    /// Status polling failed repeatedly and the job was given up on.
    #[error("Status polling failed: {0}")]
    Polling(String),

    /// The upload-scheduling call failed or was declined.
    #[error("Failed to schedule upload: {0}")]
    Publish(String),
}

impl From<CoreError> for JobError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(message) => JobError::Validation(message),
        }
    }
}

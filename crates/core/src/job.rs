//! Consolidated job lifecycle state.
//!
//! One [`JobState`] record tracks the whole lifecycle of a generation
//! job. All mutation goes through its transition methods so the two
//! invariants hold in one place: progress never decreases within a job,
//! and the job id is recorded exactly once per job.

use serde::Serialize;

use crate::types::JobId;

/// Coarse lifecycle stage of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    /// No job submitted yet (or the last submission was reset).
    Idle,
    /// The creation call is in flight.
    Submitting,
    /// The job is running remotely; status is polled on a cadence.
    Polling,
    /// The job finished and the video is ready.
    Completed,
    /// The job failed; [`JobState::error`] carries the message.
    Failed,
}

impl JobPhase {
    /// Whether the job has reached a state it can never leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }
}

/// Snapshot of a job's lifecycle, progress, and error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobState {
    pub phase: JobPhase,
    /// Completion percentage, 0-100. Monotonically non-decreasing
    /// within one job.
    pub progress: u8,
    /// Backend-assigned id, set once the creation call succeeds.
    pub job_id: Option<JobId>,
    /// Failure message, set only in [`JobPhase::Failed`].
    pub error: Option<String>,
}

impl JobState {
    /// A fresh, idle state with no job attached.
    pub fn new() -> Self {
        Self {
            phase: JobPhase::Idle,
            progress: 0,
            job_id: None,
            error: None,
        }
    }

    /// Begin a new submission: clears any previous job's id, progress,
    /// and error, then enters [`JobPhase::Submitting`].
    pub fn begin_submitting(&mut self) {
        self.phase = JobPhase::Submitting;
        self.progress = 0;
        self.job_id = None;
        self.error = None;
    }

    /// Record the backend-assigned id and enter [`JobPhase::Polling`].
    pub fn begin_polling(&mut self, job_id: JobId) {
        debug_assert_eq!(self.phase, JobPhase::Submitting);
        debug_assert!(self.job_id.is_none());
        self.phase = JobPhase::Polling;
        self.job_id = Some(job_id);
    }

    /// Apply a reported progress value.
    ///
    /// Reports are clamped to 100 and to the current value, so a stale
    /// or out-of-order status response can never move progress
    /// backwards.
    pub fn record_progress(&mut self, reported: u8) {
        self.progress = reported.min(100).max(self.progress);
    }

    /// The job finished: progress is forced to 100.
    pub fn complete(&mut self) {
        self.phase = JobPhase::Completed;
        self.progress = 100;
    }

    /// The job failed with `message`.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = JobPhase::Failed;
        self.error = Some(message.into());
    }
}

impl Default for JobState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

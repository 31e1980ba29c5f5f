//! The job controller: one generation request at a time.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use reelgen_client::{ShortsApi, UploadRequest};
use reelgen_core::job::{JobPhase, JobState};
use reelgen_core::publish::PublishSettings;
use reelgen_core::request::GenerationRequest;
use reelgen_core::types::JobId;

use crate::config::PollConfig;
use crate::error::JobError;
use crate::handle::JobHandle;
use crate::poll::run_poll_loop;

/// Owns the lifecycle of one generation request.
///
/// Submits the request, spawns a cancellable polling task, exposes the
/// consolidated [`JobState`] through a watch channel, and schedules the
/// YouTube upload once the job completes. Starting a new submission
/// stops the previous job's poller before any new state is written, so
/// two pollers can never mutate the state concurrently.
pub struct JobController {
    api: Arc<ShortsApi>,
    config: PollConfig,
    state: Arc<watch::Sender<JobState>>,
    current: Option<JobHandle>,
    /// The request most recently submitted; kept for template
    /// rendering at publish time.
    submitted: Option<GenerationRequest>,
}

impl JobController {
    /// Create a controller with the default [`PollConfig`].
    pub fn new(api: ShortsApi) -> Self {
        Self::with_config(api, PollConfig::default())
    }

    /// Create a controller with an explicit polling configuration.
    pub fn with_config(api: ShortsApi, config: PollConfig) -> Self {
        let (state, _) = watch::channel(JobState::new());
        Self {
            api: Arc::new(api),
            config,
            state: Arc::new(state),
            current: None,
            submitted: None,
        }
    }

    /// Subscribe to job state updates.
    ///
    /// Every phase transition and progress change is published through
    /// the returned receiver.
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// Snapshot of the current job state.
    pub fn state(&self) -> JobState {
        self.state.borrow().clone()
    }

    /// Preview address of the finished video, once a job id is known.
    pub fn video_url(&self) -> Option<String> {
        self.state
            .borrow()
            .job_id
            .as_deref()
            .map(|id| self.api.video_url(id))
    }

    /// Submit a generation request and start polling for its status.
    ///
    /// Any previous job's polling task is stopped first. The request is
    /// validated before anything reaches the network; a validation
    /// failure leaves the state untouched at `Idle` (or wherever the
    /// previous job ended).
    pub async fn submit(&mut self, request: GenerationRequest) -> Result<JobId, JobError> {
        // Stop the previous poller before touching shared state.
        if let Some(handle) = self.current.take() {
            handle.stop().await;
        }

        request.validate()?;

        self.state.send_modify(|s| s.begin_submitting());
        tracing::info!(
            subject = %request.subject_name,
            video_type = request.video_type.id(),
            duration_secs = request.settings.duration_seconds,
            "Submitting generation request",
        );

        let created = match self.api.create_job(&request).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(error = %e, "Generation request rejected");
                self.state.send_modify(|s| s.fail(e.to_string()));
                return Err(JobError::Submission(e.to_string()));
            }
        };

        let job_id = created.id;
        self.state.send_modify(|s| s.begin_polling(job_id.clone()));
        self.submitted = Some(request);
        tracing::info!(job_id = %job_id, "Generation job accepted, polling for status");

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_poll_loop(
            Arc::clone(&self.api),
            job_id.clone(),
            self.config.clone(),
            Arc::clone(&self.state),
            cancel.clone(),
        ));
        self.current = Some(JobHandle::new(cancel, task));

        Ok(job_id)
    }

    /// Stop polling the current job, if any.
    ///
    /// The job keeps running remotely; only the local poller stops. No
    /// further state mutation is observable after this returns.
    pub async fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.stop().await;
            tracing::info!("Polling stopped");
        }
    }

    /// Schedule the completed video for YouTube upload.
    ///
    /// Preconditions are checked before any network call: the job must
    /// be `Completed` and the publish date must be in the future.
    /// Title and description are rendered from their templates with the
    /// submitted subject name.
    pub async fn schedule_upload(&self, publish: &PublishSettings) -> Result<(), JobError> {
        let snapshot = self.state();
        if snapshot.phase != JobPhase::Completed {
            return Err(JobError::Validation(format!(
                "Cannot schedule an upload while the job is {:?}",
                snapshot.phase
            )));
        }
        let job_id = snapshot
            .job_id
            .ok_or_else(|| JobError::Validation("No job id recorded".to_string()))?;
        let request = self
            .submitted
            .as_ref()
            .ok_or_else(|| JobError::Validation("No submitted request on record".to_string()))?;

        publish.validate(chrono::Utc::now())?;

        let upload = UploadRequest {
            title: publish.render_title(&request.subject_name),
            description: publish.render_description(&request.subject_name),
            tags: publish.tags.clone(),
            make_public: publish.make_public,
            publish_date: publish.publish_date,
        };

        let response = self
            .api
            .schedule_upload(&job_id, &upload)
            .await
            .map_err(|e| JobError::Publish(e.to_string()))?;

        if !response.success {
            return Err(JobError::Publish(
                "Backend declined the upload request".to_string(),
            ));
        }

        tracing::info!(
            job_id = %job_id,
            publish_date = %publish.publish_date,
            "Upload scheduled",
        );
        Ok(())
    }
}

//! Integration tests for the job controller.
//!
//! A [`wiremock::MockServer`] stands in for the generation backend so
//! the full submit -> poll -> publish lifecycle runs against real HTTP
//! round-trips.

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelgen_client::ShortsApi;
use reelgen_controller::{JobController, JobError, PollConfig};
use reelgen_core::job::{JobPhase, JobState};
use reelgen_core::publish::PublishSettings;
use reelgen_core::request::{GenerationRequest, VideoType};

/// Polling configuration fast enough for tests.
fn fast_config() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(20),
        request_timeout: Duration::from_secs(1),
        max_consecutive_failures: 3,
    }
}

fn controller_for(server: &MockServer) -> JobController {
    JobController::with_config(ShortsApi::new(server.uri()), fast_config())
}

fn request() -> GenerationRequest {
    GenerationRequest::new("Tom Hanks", VideoType::MostSuccessful)
}

/// Mount a `POST /generate` mock answering with the given job id.
async fn mount_create(server: &MockServer, job_id: &str) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": job_id })))
        .mount(server)
        .await;
}

fn processing(progress: u8) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "status": "processing", "progress": progress }))
}

fn completed() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "completed", "progress": 100 }))
}

/// Wait (bounded) until the watch channel reports a terminal phase.
async fn wait_for_terminal(
    rx: &mut tokio::sync::watch::Receiver<JobState>,
) -> JobState {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.phase.is_terminal() {
                return snapshot;
            }
            rx.changed().await.expect("state channel closed");
        }
    })
    .await
    .expect("job did not reach a terminal phase in time")
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_submission_reaches_polling_then_completes() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(completed())
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut rx = controller.subscribe();

    let job_id = controller.submit(request()).await.unwrap();
    assert_eq!(job_id, "job-1");

    // submit() resolves with the job accepted and polling underway.
    let after_submit = controller.state();
    assert_eq!(after_submit.phase, JobPhase::Polling);
    assert_eq!(after_submit.job_id.as_deref(), Some("job-1"));

    let terminal = wait_for_terminal(&mut rx).await;
    assert_eq!(terminal.phase, JobPhase::Completed);
    assert_eq!(terminal.progress, 100);
    assert_eq!(
        controller.video_url().unwrap(),
        format!("{}/videos/job-1", server.uri())
    );
}

#[tokio::test]
async fn failed_creation_call_fails_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("generator offline"))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let err = controller.submit(request()).await.unwrap_err();

    assert_matches!(err, JobError::Submission(_));
    let state = controller.state();
    assert_eq!(state.phase, JobPhase::Failed);
    assert!(state.error.unwrap().contains("500"));
}

#[tokio::test]
async fn invalid_duration_is_rejected_before_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut bad = request();
    bad.settings.duration_seconds = 5;

    let err = controller.submit(bad).await.unwrap_err();
    assert_matches!(err, JobError::Validation(_));
    // The state machine never even entered Submitting.
    assert_eq!(controller.state().phase, JobPhase::Idle);
}

#[tokio::test]
async fn blank_subject_is_rejected_before_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let err = controller
        .submit(GenerationRequest::new("  ", VideoType::BestRated))
        .await
        .unwrap_err();
    assert_matches!(err, JobError::Validation(_));
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn observed_progress_is_monotonic_despite_stale_reports() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    // processing(10) -> processing(5) -> completed; the 5 must be
    // suppressed by the monotonic clamp.
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(processing(10))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(processing(5))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(completed())
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut rx = controller.subscribe();
    let recorder = tokio::spawn(async move {
        let mut observed = Vec::new();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            observed.push(snapshot.progress);
            if snapshot.phase.is_terminal() {
                return observed;
            }
            if rx.changed().await.is_err() {
                return observed;
            }
        }
    });

    controller.submit(request()).await.unwrap();
    let observed = tokio::time::timeout(Duration::from_secs(5), recorder)
        .await
        .expect("recorder timed out")
        .unwrap();

    assert!(
        observed.windows(2).all(|w| w[0] <= w[1]),
        "progress went backwards: {observed:?}"
    );
    assert!(!observed.contains(&5), "stale report leaked: {observed:?}");
    assert_eq!(*observed.last().unwrap(), 100);
}

#[tokio::test]
async fn transient_poll_failures_below_threshold_are_tolerated() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    // Two misses, then recovery; max_consecutive_failures is 3.
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(completed())
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut rx = controller.subscribe();
    controller.submit(request()).await.unwrap();

    let terminal = wait_for_terminal(&mut rx).await;
    assert_eq!(terminal.phase, JobPhase::Completed);
}

#[tokio::test]
async fn repeated_poll_failures_fail_the_job() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut rx = controller.subscribe();
    controller.submit(request()).await.unwrap();

    let terminal = wait_for_terminal(&mut rx).await;
    assert_eq!(terminal.phase, JobPhase::Failed);
    assert!(terminal.error.unwrap().contains("consecutive failures"));
}

#[tokio::test]
async fn remote_failure_surfaces_the_backend_error() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "status": "failed", "progress": 0, "error": "render crashed" }),
        ))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut rx = controller.subscribe();
    controller.submit(request()).await.unwrap();

    let terminal = wait_for_terminal(&mut rx).await;
    assert_eq!(terminal.phase, JobPhase::Failed);
    assert_eq!(terminal.error.as_deref(), Some("render crashed"));
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_stops_polling_and_freezes_state() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(processing(10))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    let mut rx = controller.subscribe();
    controller.submit(request()).await.unwrap();

    // Wait until at least one poll landed.
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if rx.borrow_and_update().progress == 10 {
                return;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("first poll never landed");

    controller.cancel().await;
    let frozen = controller.state();

    let polls_at_cancel = status_request_count(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(controller.state(), frozen, "state mutated after cancel");
    assert_eq!(
        status_request_count(&server).await,
        polls_at_cancel,
        "poller kept running after cancel"
    );
}

#[tokio::test]
async fn new_submission_replaces_a_polling_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "job-1" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "job-2" })))
        .mount(&server)
        .await;
    // job-1 never finishes; job-2 completes immediately.
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(processing(10))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-2"))
        .respond_with(completed())
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.submit(request()).await.unwrap();

    let mut rx = controller.subscribe();
    let second = controller
        .submit(GenerationRequest::new("Meryl Streep", VideoType::AwardWinning))
        .await
        .unwrap();
    assert_eq!(second, "job-2");

    let terminal = wait_for_terminal(&mut rx).await;
    assert_eq!(terminal.phase, JobPhase::Completed);
    assert_eq!(terminal.job_id.as_deref(), Some("job-2"));
}

/// Count the `GET /status/...` requests the mock server has seen.
async fn status_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().starts_with("/status/"))
        .count()
}

// ---------------------------------------------------------------------------
// Upload scheduling
// ---------------------------------------------------------------------------

/// Drive a controller to `Completed` on `job-1`.
async fn completed_controller(server: &MockServer) -> JobController {
    mount_create(server, "job-1").await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(completed())
        .mount(server)
        .await;

    let mut controller = controller_for(server);
    let mut rx = controller.subscribe();
    controller.submit(request()).await.unwrap();
    let terminal = wait_for_terminal(&mut rx).await;
    assert_eq!(terminal.phase, JobPhase::Completed);
    controller
}

#[tokio::test]
async fn schedule_upload_renders_templates_and_posts() {
    let server = MockServer::start().await;
    let controller = completed_controller(&server).await;

    Mock::given(method("POST"))
        .and(path("/youtube/upload/job-1"))
        .and(body_partial_json(json!({
            "title": "Tom Hanks's Movies",
            "makePublic": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut publish = PublishSettings::new(Utc::now() + ChronoDuration::days(1));
    publish.title_template = "[Actor Name]'s Movies".to_string();

    controller.schedule_upload(&publish).await.unwrap();
}

#[tokio::test]
async fn schedule_upload_rejects_past_publish_date_without_network() {
    let server = MockServer::start().await;
    let controller = completed_controller(&server).await;

    Mock::given(method("POST"))
        .and(path("/youtube/upload/job-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let publish = PublishSettings::new(Utc::now() - ChronoDuration::days(1));
    let err = controller.schedule_upload(&publish).await.unwrap_err();
    assert_matches!(err, JobError::Validation(_));
}

#[tokio::test]
async fn schedule_upload_requires_a_completed_job() {
    let server = MockServer::start().await;
    mount_create(&server, "job-1").await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(processing(10))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.submit(request()).await.unwrap();

    let publish = PublishSettings::new(Utc::now() + ChronoDuration::days(1));
    let err = controller.schedule_upload(&publish).await.unwrap_err();
    assert_matches!(err, JobError::Validation(_));
}

#[tokio::test]
async fn declined_upload_surfaces_a_publish_error() {
    let server = MockServer::start().await;
    let controller = completed_controller(&server).await;

    Mock::given(method("POST"))
        .and(path("/youtube/upload/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let publish = PublishSettings::new(Utc::now() + ChronoDuration::days(1));
    let err = controller.schedule_upload(&publish).await.unwrap_err();
    assert_matches!(err, JobError::Publish(_));
}

#[tokio::test]
async fn failed_upload_call_surfaces_a_publish_error() {
    let server = MockServer::start().await;
    let controller = completed_controller(&server).await;

    Mock::given(method("POST"))
        .and(path("/youtube/upload/job-1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let publish = PublishSettings::new(Utc::now() + ChronoDuration::days(1));
    let err = controller.schedule_upload(&publish).await.unwrap_err();
    assert_matches!(err, JobError::Publish(_));
}

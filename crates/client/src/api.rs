//! REST API client for the backend HTTP endpoints.
//!
//! Wraps the backend HTTP API (job creation, status retrieval, upload
//! scheduling) using [`reqwest`]. JSON bodies are camelCase on the
//! wire; non-2xx responses are captured as raw text because error
//! bodies are not guaranteed to be JSON.

use serde::{Deserialize, Serialize};

use reelgen_core::request::GenerationRequest;
use reelgen_core::types::{JobId, Timestamp};

/// HTTP client for one backend instance.
pub struct ShortsApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by `POST /generate` after a job is accepted.
#[derive(Debug, Deserialize)]
pub struct CreateJobResponse {
    /// Server-assigned identifier for the queued job.
    pub id: JobId,
}

/// Remote lifecycle stage reported by `GET /status/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Processing,
    Completed,
    Failed,
}

/// Response returned by `GET /status/{id}`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: RemoteStatus,
    /// Completion percentage (0-100) as reported by the backend. The
    /// backend does not guarantee monotonicity; callers must clamp.
    #[serde(default)]
    pub progress: u8,
    /// Failure description, present when `status` is `failed`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /youtube/upload/{id}`.
///
/// Carries the publish settings plus the title/description already
/// rendered from their templates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    /// Comma-separated tags, passed through as authored.
    pub tags: String,
    pub make_public: bool,
    pub publish_date: Timestamp,
}

/// Response returned by `POST /youtube/upload/{id}` on success.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ShortsApi {
    /// Create a new API client for a backend instance.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:3000/api`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across clients).
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Base HTTP API URL this client targets.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Submit a generation request.
    ///
    /// Sends a `POST /generate` request with the request JSON. Returns
    /// the server-assigned job id.
    pub async fn create_job(
        &self,
        request: &GenerationRequest,
    ) -> Result<CreateJobResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/generate", self.api_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current status of a job.
    ///
    /// Sends a `GET /status/{id}` request.
    pub async fn job_status(&self, job_id: &str) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.api_url, job_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Schedule a finished video for YouTube upload.
    ///
    /// Sends a `POST /youtube/upload/{id}` request with the rendered
    /// publish metadata.
    pub async fn schedule_upload(
        &self,
        job_id: &str,
        upload: &UploadRequest,
    ) -> Result<UploadResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/youtube/upload/{}", self.api_url, job_id))
            .json(upload)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Address of the finished video for a job, served by the backend.
    pub fn video_url(&self, job_id: &str) -> String {
        format!("{}/videos/{}", self.api_url, job_id)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! HTTP client for the shorts-generation backend.
//!
//! Wraps the backend REST API (job creation, status polling, upload
//! scheduling, preview-URL derivation) with typed request and response
//! shapes. Lifecycle logic lives in `reelgen-controller`; this crate
//! only speaks the wire protocol.

pub mod api;

pub use api::{ApiError, RemoteStatus, ShortsApi, StatusResponse, UploadRequest};

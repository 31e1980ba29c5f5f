//! Job lifecycle controller for the shorts-generation backend.
//!
//! [`JobController`] owns one generation request at a time: it
//! validates and submits the request, spawns a cancellable polling task
//! that tracks remote progress, publishes every state transition
//! through a watch channel, and drives the upload-scheduling flow once
//! the video is ready.

pub mod config;
pub mod controller;
pub mod error;
pub mod handle;
mod poll;

pub use config::PollConfig;
pub use controller::JobController;
pub use error::JobError;
pub use handle::JobHandle;

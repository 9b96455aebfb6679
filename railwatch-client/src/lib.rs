//! railwatch-client library interface
//!
//! Submits a video to the train-detection service, tracks the upload session and
//! turns the response into the normalized detection view-model.

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use crate::config::{CliOverrides, ClientConfig};
pub use crate::error::{DecodingError, MetricsFetchError, SessionError, TransportError};
pub use crate::models::{NormalizedResult, Threshold, UploadSession, VideoFile};
pub use crate::services::{DetectionClient, MetricsSource, MetricsState};

//! Collaborator seams for the detection service
//!
//! `UploadSession` and `MetricsSource` talk to the service only through these
//! traits; `DetectionClient` is the HTTP implementation.

use crate::error::{MetricsFetchError, TransportError};
use crate::models::{ModelMetrics, Threshold, VideoFile};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One progress report from the transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub sent_bytes: u64,
    pub total_bytes: u64,
}

impl TransferProgress {
    /// Rounded percentage, clamped to 100; 0 when the total is unknown
    pub fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 0;
        }
        let pct = (self.sent_bytes as f64 * 100.0 / self.total_bytes as f64).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

pub type ProgressSender = mpsc::UnboundedSender<TransferProgress>;

/// What one submit sends
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub video: VideoFile,
    pub threshold: Threshold,
}

/// Carries a video to the detection service
#[async_trait]
pub trait DetectionTransport: Send + Sync {
    /// Transfer the video, reporting progress on `progress`.
    ///
    /// Returns the raw success body; decoding it is the caller's job.
    async fn upload(
        &self,
        request: UploadRequest,
        progress: ProgressSender,
    ) -> Result<String, TransportError>;
}

/// Fetches model metrics independently of any upload
#[async_trait]
pub trait MetricsFetcher: Send + Sync {
    async fn fetch_metrics(&self) -> Result<ModelMetrics, MetricsFetchError>;
}

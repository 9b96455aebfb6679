//! Services for railwatch-client
//!
//! Pure transformations (schedule matching, normalization), metrics resolution and
//! the HTTP transport to the detection service.

pub mod detection_client;
pub mod metrics_source;
pub mod result_normalizer;
pub mod schedule_matcher;
pub mod transport;

pub use detection_client::DetectionClient;
pub use metrics_source::{MetricsSource, MetricsState};
pub use result_normalizer::normalize;
pub use schedule_matcher::match_entry;
pub use transport::{
    DetectionTransport, MetricsFetcher, ProgressSender, TransferProgress,
    UploadRequest,
};

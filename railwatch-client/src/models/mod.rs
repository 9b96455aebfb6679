//! Data models for railwatch-client
//!
//! - Upload session state machine
//! - Wire types of the detection service
//! - Normalized view-model and model metrics

pub mod detection;
pub mod metrics;
pub mod normalized;
pub mod preview;
pub mod threshold;
pub mod upload_session;

pub use detection::{decode_detection_response, DetectionResponse, RawScheduleEntry, RawStatistics};
pub use metrics::ModelMetrics;
pub use normalized::{
    DetectionStatistics, NormalizedResult, ObjectCounts, ObjectShare, ScheduleComparison,
    DEFAULT_SUCCESS_MESSAGE,
};
pub use preview::{PreviewHandle, PreviewRegistry, VideoFile};
pub use threshold::Threshold;
pub use upload_session::{StateTransition, UploadSession};

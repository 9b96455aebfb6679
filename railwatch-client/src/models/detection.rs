//! Wire types for the detection service's `/upload` response
//!
//! Identity fields (`video_path`, `train_id`) and the schedule's expected time are
//! required and fail decoding when missing. Metrics are optional end-to-end; JSON
//! `null` and absence both decode to `None`, for single metrics and for the whole
//! statistics blob.

use crate::error::DecodingError;
use crate::models::normalized::ObjectCounts;
use serde::Deserialize;

/// Success body of `POST /upload`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub message: Option<String>,

    /// Opaque identifier of the stored upload, passed through unmodified
    pub video_path: String,

    #[serde(default)]
    pub statistics: Option<RawStatistics>,

    #[serde(default)]
    pub schedule: Option<Vec<RawScheduleEntry>>,
}

/// Statistics blob as produced upstream
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawStatistics {
    pub f1_score: Option<f64>,
    pub detection_accuracy: Option<f64>,
    pub trains_per_hour: Option<f64>,
    pub false_positives: Option<f64>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub avg_confidence: Option<f64>,
    pub detection_rate: Option<f64>,
    pub detection_time_seconds: Option<f64>,
    pub detection_fps: Option<f64>,
    pub frames_with_trains: Option<u64>,
    pub total_frames: Option<u64>,
    pub duration_seconds: Option<f64>,
    pub object_counts: Option<ObjectCounts>,
}

/// One expected train arrival and the detection times observed for it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawScheduleEntry {
    pub train_id: i64,

    /// Seconds-of-day the train is expected
    pub expected_time: f64,

    /// Upstream display form of `expected_time`, passed through unmodified
    pub expected_timestamp: String,

    #[serde(default)]
    pub tolerance: f64,

    #[serde(default)]
    pub detected: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub detection_times: Vec<f64>,
}

/// Decode a success body; any shape mismatch is a [`DecodingError`]
pub fn decode_detection_response(body: &str) -> Result<DetectionResponse, DecodingError> {
    Ok(serde_json::from_str(body)?)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Result normalizer
//!
//! Pure, total transformation from the decoded detection response to the
//! display view-model. Never fails; every optional field may be absent.

use crate::models::{
    DetectionResponse, DetectionStatistics, NormalizedResult, RawStatistics,
    DEFAULT_SUCCESS_MESSAGE,
};
use crate::services::schedule_matcher::match_entry;

/// Normalize a decoded detection response
pub fn normalize(raw: &DetectionResponse) -> NormalizedResult {
    let schedule = raw
        .schedule
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(match_entry)
        .collect();

    NormalizedResult {
        message: raw
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        video_path: raw.video_path.clone(),
        statistics: raw.statistics.as_ref().map(copy_statistics),
        object_counts: raw
            .statistics
            .as_ref()
            .and_then(|stats| stats.object_counts.clone())
            .unwrap_or_default(),
        schedule,
    }
}

fn copy_statistics(raw: &RawStatistics) -> DetectionStatistics {
    DetectionStatistics {
        f1_score: raw.f1_score,
        detection_accuracy: raw.detection_accuracy,
        trains_per_hour: raw.trains_per_hour,
        false_positives: raw.false_positives,
        precision: raw.precision,
        recall: raw.recall,
        avg_confidence: raw.avg_confidence,
        detection_rate: raw.detection_rate,
        detection_time_seconds: raw.detection_time_seconds,
        detection_fps: raw.detection_fps,
        frames_with_trains: raw.frames_with_trains,
        total_frames: raw.total_frames,
        duration_seconds: raw.duration_seconds,
    }
}

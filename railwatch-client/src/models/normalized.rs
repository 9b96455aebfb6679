//! Normalized, display-ready detection view-model
//!
//! Created fresh for every successful transfer and never merged with a previous
//! result. Optional metrics stay optional; rendering uses the `-` placeholder.

use railwatch_common::human_time::{format_decimal, PLACEHOLDER};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Falls back to this when the service sent no `message`
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Train detection complete.";

/// Output of the result normalizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub message: String,
    pub video_path: String,
    /// `None` when the service sent no statistics blob
    pub statistics: Option<DetectionStatistics>,
    pub object_counts: ObjectCounts,
    /// Same order as the upstream schedule
    pub schedule: Vec<ScheduleComparison>,
}

/// Named detection metrics, copied verbatim from upstream (no unit conversion)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionStatistics {
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
}

impl DetectionStatistics {
    /// `"{fps:.2} FPS ({seconds:.2}s)"`, or `"N/A"` unless both are known
    pub fn detection_speed_display(&self) -> String {
        match (self.detection_fps, self.detection_time_seconds) {
            (Some(fps), Some(seconds)) => format!("{:.2} FPS ({:.2}s)", fps, seconds),
            _ => "N/A".to_string(),
        }
    }

    pub fn frames_with_trains_display(&self) -> String {
        self.frames_with_trains
            .map(|n| n.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// Detection-vs-schedule comparison for one expected train
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleComparison {
    pub train_id: i64,
    pub expected_timestamp: String,
    pub expected_time_seconds: f64,
    pub tolerance_seconds: f64,
    /// Upstream flag; drives the status badge only
    pub detected: bool,
    /// Earliest detection time; drives the time columns only
    pub first_detection_time_seconds: Option<f64>,
    /// `HH:MM:SS` or `-`
    pub actual_detection_display: String,
    pub time_difference_seconds: Option<u64>,
}

impl ScheduleComparison {
    pub fn status_label(&self) -> &'static str {
        if self.detected {
            "Detected"
        } else {
            "Not Detected"
        }
    }

    /// `"{n}s"` or `-`
    pub fn time_difference_display(&self) -> String {
        match self.time_difference_seconds {
            Some(diff) => format!("{}s", diff),
            None => PLACEHOLDER.to_string(),
        }
    }
}

/// Detected object label → count, in upstream order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCounts(Vec<(String, u64)>);

/// One slice of the object breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectShare {
    pub label: String,
    pub count: u64,
    /// Share of the total in percent; 0.0 when the total is zero
    pub percent: f64,
}

impl fmt::Display for ObjectShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({:.1}%)", self.label, self.count, self.percent)
    }
}

impl ObjectCounts {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, c)| *c).sum()
    }

    pub fn breakdown(&self) -> Vec<ObjectShare> {
        let total = self.total();
        self.0
            .iter()
            .map(|(label, count)| ObjectShare {
                label: label.clone(),
                count: *count,
                percent: if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64 * 100.0
                },
            })
            .collect()
    }
}

impl Serialize for ObjectCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

// Entries are kept in document order
impl<'de> Deserialize<'de> for ObjectCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = ObjectCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of object label to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ObjectCounts, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, count)) = map.next_entry::<String, u64>()? {
                    entries.push((label, count));
                }
                Ok(ObjectCounts(entries))
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Two-decimal score display shared by the statistics and metrics views
pub fn format_score(value: Option<f64>) -> String {
    format_decimal(value, 2)
}

//! Model-quality metrics shown in the performance panel

use crate::models::normalized::{format_score, DetectionStatistics};
use railwatch_common::human_time::{format_plain, PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Metrics resolved by `MetricsSource`
///
/// `Default` (every field absent) is also the degraded value after a failed fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetrics {
    pub f1_score: Option<f64>,
    /// The metrics endpoint reports this as `accuracy`
    #[serde(alias = "accuracy")]
    pub detection_accuracy: Option<f64>,
    pub trains_per_hour: Option<f64>,
    pub false_positives: Option<f64>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub avg_confidence: Option<f64>,
}

impl ModelMetrics {
    /// Derive from a local detection result.
    ///
    /// `detection_rate` is shown as detection accuracy; this is the only field
    /// rename between the statistics blob and the metrics panel.
    pub fn from_statistics(stats: &DetectionStatistics) -> Self {
        Self {
            f1_score: stats.f1_score,
            detection_accuracy: stats.detection_rate,
            trains_per_hour: stats.trains_per_hour,
            false_positives: stats.false_positives,
            precision: stats.precision,
            recall: stats.recall,
            avg_confidence: stats.avg_confidence,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ModelMetrics::default()
    }

    pub fn f1_display(&self) -> String {
        format_score(self.f1_score)
    }

    pub fn detection_rate_display(&self) -> String {
        match self.detection_accuracy {
            Some(v) => format!("{}%", v),
            None => PLACEHOLDER.to_string(),
        }
    }

    pub fn false_positives_display(&self) -> String {
        format_plain(self.false_positives)
    }

    pub fn precision_display(&self) -> String {
        format_score(self.precision)
    }

    pub fn recall_display(&self) -> String {
        format_score(self.recall)
    }

    pub fn avg_confidence_display(&self) -> String {
        format_plain(self.avg_confidence)
    }
}

//! Plain-text rendering of the detection view-model for the terminal

use crate::models::{ModelMetrics, NormalizedResult};
use crate::services::MetricsState;
use std::fmt::Write;

/// Detection summary, schedule table and object breakdown
pub fn render_result(result: &NormalizedResult) -> String {
    let mut out = String::new();
    // Absent statistics render the same placeholders as absent fields
    let stats = result.statistics.clone().unwrap_or_default();

    let _ = writeln!(out, "{}", result.message);
    let _ = writeln!(out, "Video: {}", result.video_path);
    let _ = writeln!(out);
    let _ = writeln!(out, "Trains Detected");
    let _ = writeln!(out, "  Total Detected:  {}", stats.frames_with_trains_display());
    let _ = writeln!(out, "  Detection Speed: {}", stats.detection_speed_display());
    let _ = writeln!(out);

    let _ = writeln!(out, "Train Schedule & Detection Results");
    if result.schedule.is_empty() {
        let _ = writeln!(out, "  No schedule data available");
    } else {
        let _ = writeln!(
            out,
            "  {:<10} {:<14} {:<14} {:<16} {:<8}",
            "Train", "Scheduled", "Status", "Actual", "Diff"
        );
        for row in &result.schedule {
            let _ = writeln!(
                out,
                "  {:<10} {:<14} {:<14} {:<16} {:<8}",
                format!("Train {}", row.train_id),
                row.expected_timestamp,
                row.status_label(),
                row.actual_detection_display,
                row.time_difference_display(),
            );
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Detection Breakdown");
    if result.object_counts.is_empty() {
        let _ = writeln!(out, "  No detection data available");
    } else {
        for share in result.object_counts.breakdown() {
            let _ = writeln!(out, "  {}", share);
        }
    }

    out
}

/// Model performance panel
pub fn render_metrics(state: &MetricsState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model Performance");
    match state {
        MetricsState::Loading => {
            let _ = writeln!(out, "  Loading metrics...");
        }
        MetricsState::Ready(metrics) => write_metrics(&mut out, metrics),
    }
    out
}

fn write_metrics(out: &mut String, metrics: &ModelMetrics) {
    let rows = [
        ("F1 Score", metrics.f1_display()),
        ("Detection Rate", metrics.detection_rate_display()),
        ("False Positives", metrics.false_positives_display()),
        ("Precision", metrics.precision_display()),
        ("Avg Confidence", metrics.avg_confidence_display()),
        ("Recall", metrics.recall_display()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<16} {}", label, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decode_detection_response;
    use crate::services::normalize;

    #[test]
    fn test_render_result_rows() {
        let raw = decode_detection_response(
            r#"{"video_path": "uploads/a.mp4",
                "statistics": {"object_counts": {"train": 8, "car": 2}},
                "schedule": [
                  {"train_id": 1, "expected_time": 300, "expected_timestamp": "0:05:00",
                   "detected": true, "detection_times": [120, 305]},
                  {"train_id": 2, "expected_time": 600, "expected_timestamp": "0:10:00",
                   "detected": true, "detection_times": []}
                ]}"#,
        )
        .unwrap();
        let text = render_result(&normalize(&raw));

        assert!(text.contains("Train 1"));
        assert!(text.contains("00:02:00"));
        assert!(text.contains("180s"));
        assert!(text.contains("train: 8 (80.0%)"));
        assert!(text.contains("car: 2 (20.0%)"));
        assert!(text.contains("Total Detected:  -"));
        assert!(text.contains("Detection Speed: N/A"));
    }

    #[test]
    fn test_render_empty_sections() {
        let raw = decode_detection_response(r#"{"video_path": "v"}"#).unwrap();
        let text = render_result(&normalize(&raw));
        assert!(text.contains("No schedule data available"));
        assert!(text.contains("No detection data available"));
    }

    #[test]
    fn test_render_metrics_placeholders() {
        let text = render_metrics(&MetricsState::Ready(ModelMetrics::default()));
        assert!(text.contains("F1 Score         -"));
        assert!(text.contains("Detection Rate   -"));

        let text = render_metrics(&MetricsState::Loading);
        assert!(text.contains("Loading metrics..."));
    }
}

//! Schedule matcher
//!
//! Derives the detection-vs-expectation columns for one schedule entry.
//!
//! The upstream `detected` flag and the detection-time sequence are independent
//! signals and may disagree. Both are kept: `detected` drives the status badge,
//! the earliest detection time drives the time columns. An entry flagged detected
//! with no detection times renders `-` in both time columns.

use crate::models::{RawScheduleEntry, ScheduleComparison};
use railwatch_common::human_time::{format_time_of_day, PLACEHOLDER};

/// Build the comparison row for `entry`
pub fn match_entry(entry: &RawScheduleEntry) -> ScheduleComparison {
    let first_detection = earliest(&entry.detection_times);

    let actual_detection_display = match first_detection {
        Some(seconds) => format_time_of_day(seconds),
        None => PLACEHOLDER.to_string(),
    };

    let time_difference_seconds =
        first_detection.map(|seconds| time_difference(seconds, entry.expected_time));

    if entry.detected && first_detection.is_none() {
        tracing::debug!(
            train_id = entry.train_id,
            "Entry flagged detected without detection times"
        );
    }

    ScheduleComparison {
        train_id: entry.train_id,
        expected_timestamp: entry.expected_timestamp.clone(),
        expected_time_seconds: entry.expected_time,
        tolerance_seconds: entry.tolerance,
        detected: entry.detected,
        first_detection_time_seconds: first_detection,
        actual_detection_display,
        time_difference_seconds,
    }
}

fn earliest(times: &[f64]) -> Option<f64> {
    times.iter().copied().reduce(f64::min)
}

/// Rounded absolute difference in whole seconds
fn time_difference(detected_at: f64, expected_at: f64) -> u64 {
    (detected_at - expected_at).abs().round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(expected_time: f64, detected: bool, detection_times: Vec<f64>) -> RawScheduleEntry {
        RawScheduleEntry {
            train_id: 7,
            expected_time,
            expected_timestamp: "0:05:00".to_string(),
            tolerance: 15.0,
            detected,
            detection_times,
        }
    }

    #[test]
    fn test_earliest_time_used() {
        let row = match_entry(&entry(300.0, true, vec![120.0, 305.0]));
        assert_eq!(row.first_detection_time_seconds, Some(120.0));
        assert_eq!(row.time_difference_seconds, Some(180));
        assert_eq!(row.actual_detection_display, "00:02:00");
    }

    #[test]
    fn test_unsorted_times() {
        let row = match_entry(&entry(300.0, true, vec![310.0, 299.0, 305.0]));
        assert_eq!(row.first_detection_time_seconds, Some(299.0));
        assert_eq!(row.time_difference_seconds, Some(1));
    }

    #[test]
    fn test_detected_without_times_keeps_flag() {
        let row = match_entry(&entry(300.0, true, vec![]));
        assert!(row.detected);
        assert_eq!(row.status_label(), "Detected");
        assert_eq!(row.first_detection_time_seconds, None);
        assert_eq!(row.actual_detection_display, "-");
        assert_eq!(row.time_difference_seconds, None);
    }

    #[test]
    fn test_not_detected_without_times() {
        let row = match_entry(&entry(300.0, false, vec![]));
        assert_eq!(row.actual_detection_display, "-");
        assert_eq!(row.time_difference_seconds, None);
        assert_eq!(row.status_label(), "Not Detected");
    }

    #[test]
    fn test_times_present_but_not_flagged() {
        let row = match_entry(&entry(60.0, false, vec![75.0]));
        assert!(!row.detected);
        assert_eq!(row.time_difference_seconds, Some(15));
        assert_eq!(row.actual_detection_display, "00:01:15");
    }

    #[test]
    fn test_difference_rounded_and_non_negative() {
        let row = match_entry(&entry(300.0, true, vec![290.4]));
        assert_eq!(row.time_difference_seconds, Some(10));
        let row = match_entry(&entry(300.0, true, vec![310.5]));
        assert_eq!(row.time_difference_seconds, Some(11));
        let row = match_entry(&entry(300.0, true, vec![300.0]));
        assert_eq!(row.time_difference_seconds, Some(0));
    }

    #[test]
    fn test_display_wraps_past_midnight() {
        let row = match_entry(&entry(86_000.0, true, vec![86_400.0 + 65.0]));
        assert_eq!(row.actual_detection_display, "00:01:05");
        // Difference uses raw seconds, not the wrapped display value
        assert_eq!(row.time_difference_seconds, Some(465));
    }

    #[test]
    fn test_passthrough_fields() {
        let row = match_entry(&entry(300.0, false, vec![]));
        assert_eq!(row.train_id, 7);
        assert_eq!(row.expected_timestamp, "0:05:00");
        assert_eq!(row.expected_time_seconds, 300.0);
        assert_eq!(row.tolerance_seconds, 15.0);
    }
}

//! Human-readable time and metric formatting
//!
//! Provides consistent display strings for the detection view-model. Every helper
//! that accepts an optional value renders [`PLACEHOLDER`] for absence; absent values
//! are never shown as zero.

/// Rendered in place of any absent value
pub const PLACEHOLDER: &str = "-";

const SECONDS_PER_DAY: i64 = 86_400;

/// Format seconds-of-day as zero-padded `HH:MM:SS`.
///
/// Only whole seconds are shown (fractional part truncated). The input is a position
/// within a day, not an epoch timestamp, so values at or past 86400 wrap around
/// (and negative values wrap backwards from midnight).
///
/// # Examples
///
/// ```
/// use railwatch_common::human_time::format_time_of_day;
///
/// assert_eq!(format_time_of_day(120.0), "00:02:00");
/// assert_eq!(format_time_of_day(3661.9), "01:01:01");
/// assert_eq!(format_time_of_day(86_400.0 + 5.0), "00:00:05");
/// ```
pub fn format_time_of_day(seconds: f64) -> String {
    let whole = seconds.floor() as i64;
    let within_day = whole.rem_euclid(SECONDS_PER_DAY);

    let hours = within_day / 3600;
    let mins = (within_day % 3600) / 60;
    let secs = within_day % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

/// Format an optional value with a fixed number of decimals, or the placeholder.
///
/// # Examples
///
/// ```
/// use railwatch_common::human_time::format_decimal;
///
/// assert_eq!(format_decimal(Some(0.912), 2), "0.91");
/// assert_eq!(format_decimal(Some(0.0), 2), "0.00");
/// assert_eq!(format_decimal(None, 2), "-");
/// ```
pub fn format_decimal(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", places, v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format an optional value verbatim (shortest representation), or the placeholder.
pub fn format_plain(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => PLACEHOLDER.to_string(),
    }
}

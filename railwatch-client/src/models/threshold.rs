//! Confidence threshold restricted to the discrete set 0.1, 0.2, ..., 1.0

use serde::{Deserialize, Serialize};

/// Confidence cutoff applied by the detection service
///
/// Stored as tenths so equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(u8);

impl Threshold {
    /// Every selectable value, ascending
    pub const ALL: [Threshold; 10] = [
        Threshold(1),
        Threshold(2),
        Threshold(3),
        Threshold(4),
        Threshold(5),
        Threshold(6),
        Threshold(7),
        Threshold(8),
        Threshold(9),
        Threshold(10),
    ];

    /// Accepts only members of the discrete set (float noise tolerated)
    pub fn new(value: f64) -> Option<Threshold> {
        if !value.is_finite() {
            return None;
        }
        let scaled = value * 10.0;
        let tenths = scaled.round();
        if (scaled - tenths).abs() > 1e-6 || !(1.0..=10.0).contains(&tenths) {
            return None;
        }
        Some(Threshold(tenths as u8))
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(8)
    }
}

/// One-decimal form, which is also the multipart field encoding
impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

impl TryFrom<f64> for Threshold {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Threshold::new(value)
            .ok_or_else(|| format!("threshold {} is not one of 0.1, 0.2, ..., 1.0", value))
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> f64 {
        threshold.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_point_eight() {
        assert_eq!(Threshold::default().as_f64(), 0.8);
        assert_eq!(Threshold::default().to_string(), "0.8");
    }

    #[test]
    fn test_accepts_discrete_values() {
        for (i, expected) in Threshold::ALL.iter().enumerate() {
            let value = (i as f64 + 1.0) / 10.0;
            assert_eq!(Threshold::new(value), Some(*expected));
        }
        // 0.1 + 0.2 style noise
        assert_eq!(Threshold::new(0.1 + 0.2), Threshold::new(0.3));
    }

    #[test]
    fn test_rejects_off_grid_values() {
        assert_eq!(Threshold::new(0.0), None);
        assert_eq!(Threshold::new(0.85), None);
        assert_eq!(Threshold::new(1.1), None);
        assert_eq!(Threshold::new(-0.5), None);
        assert_eq!(Threshold::new(f64::NAN), None);
    }

    #[test]
    fn test_display_one_decimal() {
        assert_eq!(Threshold::new(1.0).unwrap().to_string(), "1.0");
        assert_eq!(Threshold::new(0.1).unwrap().to_string(), "0.1");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<Threshold>("0.5").is_ok());
        assert!(serde_json::from_str::<Threshold>("0.55").is_err());
    }
}

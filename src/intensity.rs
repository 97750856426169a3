//! Normalized organizational dynamics intensity.

use serde::{Deserialize, Serialize};

/// The single user-controlled scalar driving every transform parameter.
///
/// Always within `[0, 1]`. Values outside the range are clamped on
/// construction and non-finite input collapses to zero, so every consumer can
/// rely on the range without re-checking it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Intensity(f64);

impl Intensity {
    pub const ZERO: Intensity = Intensity(0.0);
    pub const FULL: Intensity = Intensity(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Intensity(value.clamp(0.0, 1.0))
        } else {
            Intensity::ZERO
        }
    }

    /// Build from a slider percentage (`0..=100`).
    pub fn from_percent(percent: u32) -> Self {
        Intensity::new(percent as f64 / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole-number percentage, as shown beside the slider.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl From<f64> for Intensity {
    fn from(v: f64) -> Self {
        Intensity::new(v)
    }
}

impl From<Intensity> for f64 {
    fn from(i: Intensity) -> Self {
        i.0
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_into_unit_range() {
        assert_eq!(Intensity::new(-0.5).value(), 0.0);
        assert_eq!(Intensity::new(1.7).value(), 1.0);
        assert_eq!(Intensity::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(Intensity::new(f64::NAN), Intensity::ZERO);
        assert_eq!(Intensity::new(f64::INFINITY), Intensity::ZERO);
    }

    #[test]
    fn test_percent_conversions() {
        let i = Intensity::from_percent(37);
        assert!((i.value() - 0.37).abs() < 1e-12);
        assert_eq!(i.percent(), 37);
        assert_eq!(Intensity::from_percent(250), Intensity::FULL);
        assert_eq!(format!("{}", Intensity::new(0.5)), "50%");
    }

    #[test]
    fn test_serde_as_plain_number() {
        let json = serde_json::to_string(&Intensity::new(0.75)).unwrap();
        assert_eq!(json, "0.75");
        let back: Intensity = serde_json::from_str("3.0").unwrap();
        assert_eq!(back, Intensity::FULL);
    }
}

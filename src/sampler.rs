//! Sampling of a function set over the fixed input domain.

use serde::{Deserialize, Serialize};

use crate::intensity::Intensity;
use crate::transfer::{FunctionSet, Transform};

/// First sampled input.
pub const DOMAIN_START: f64 = 0.0;
/// Last sampled input (inclusive).
pub const DOMAIN_END: f64 = 10.0;
pub const DOMAIN_STEP: f64 = 0.25;
/// `(DOMAIN_END - DOMAIN_START) / DOMAIN_STEP + 1`.
pub const SAMPLE_COUNT: usize = 41;

/// Multiplier applied to intensity before it reaches `raw`.
pub const RAW_PARAM_SCALE: f64 = 2.0;
/// Multiplier applied to intensity before it reaches `organizational`.
pub const ORG_PARAM_SCALE: f64 = 5.0;

/// All four transforms evaluated at one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub input: f64,
    pub raw: f64,
    pub departmental: f64,
    pub organizational: f64,
    pub executive: f64,
}

impl SamplePoint {
    pub fn value(&self, transform: Transform) -> f64 {
        match transform {
            Transform::Raw => self.raw,
            Transform::Departmental => self.departmental,
            Transform::Organizational => self.organizational,
            Transform::Executive => self.executive,
        }
    }
}

/// Parameter each transform receives for a given intensity.
pub fn scaled_parameter(transform: Transform, intensity: Intensity) -> f64 {
    let i = intensity.value();
    match transform {
        Transform::Raw => i * RAW_PARAM_SCALE,
        Transform::Departmental => i,
        Transform::Organizational => i * ORG_PARAM_SCALE,
        Transform::Executive => i,
    }
}

/// Sample input at `index` (`0..SAMPLE_COUNT`).
#[inline]
pub fn sample_input(index: usize) -> f64 {
    DOMAIN_START + index as f64 * DOMAIN_STEP
}

/// Evaluate every transform of `functions` across `[0, 10]` in steps of 0.25.
///
/// Returns exactly [`SAMPLE_COUNT`] points in ascending input order. Nothing
/// is cached; each call recomputes the 41 x 4 values.
pub fn generate_samples(functions: &FunctionSet, intensity: Intensity) -> Vec<SamplePoint> {
    let raw_p = scaled_parameter(Transform::Raw, intensity);
    let dept_p = scaled_parameter(Transform::Departmental, intensity);
    let org_p = scaled_parameter(Transform::Organizational, intensity);
    let exec_p = scaled_parameter(Transform::Executive, intensity);

    (0..SAMPLE_COUNT)
        .map(|i| {
            let x = sample_input(i);
            SamplePoint {
                input: x,
                raw: functions.raw(x, raw_p),
                departmental: functions.departmental(x, dept_p),
                organizational: functions.organizational(x, org_p),
                executive: functions.executive(x, exec_p),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::{ADAPTIVE, HIGH_CONSTRAINT};

    #[test]
    fn test_domain_shape() {
        let samples = generate_samples(&HIGH_CONSTRAINT, Intensity::new(0.3));
        assert_eq!(samples.len(), SAMPLE_COUNT);
        for (i, p) in samples.iter().enumerate() {
            assert_eq!(p.input, i as f64 * 0.25);
        }
        assert_eq!(samples.first().map(|p| p.input), Some(0.0));
        assert_eq!(samples.last().map(|p| p.input), Some(10.0));
        assert!(samples.windows(2).all(|w| w[0].input < w[1].input));
    }

    #[test]
    fn test_golden_first_point_high_constraint() {
        let p = generate_samples(&HIGH_CONSTRAINT, Intensity::new(0.5))[0];
        assert_eq!(p.input, 0.0);
        assert_eq!(p.raw, 2.0);
        assert_eq!(p.departmental, 0.0);
        assert_eq!(p.organizational, 4.0);
        assert!((p.executive - 6.21341642929905).abs() < 1e-12);
        assert!((p.executive - (6.0 + 4.5 / (1.0 + 3.0_f64.exp()))).abs() < 1e-15);
    }

    #[test]
    fn test_parameter_scaling() {
        let i = Intensity::new(0.5);
        assert_eq!(scaled_parameter(Transform::Raw, i), 1.0);
        assert_eq!(scaled_parameter(Transform::Departmental, i), 0.5);
        assert_eq!(scaled_parameter(Transform::Organizational, i), 2.5);
        assert_eq!(scaled_parameter(Transform::Executive, i), 0.5);
    }

    #[test]
    fn test_samples_match_direct_evaluation() {
        let i = Intensity::new(0.8);
        for p in generate_samples(&ADAPTIVE, i) {
            for t in Transform::ALL {
                assert_eq!(p.value(t), ADAPTIVE.evaluate(t, p.input, scaled_parameter(t, i)));
            }
        }
    }

    #[test]
    fn test_full_intensity_endpoint() {
        let last = generate_samples(&ADAPTIVE, Intensity::FULL)[SAMPLE_COUNT - 1];
        assert!((last.raw - 12.997751832297666).abs() < 1e-12);
        assert!((last.departmental - 8.8).abs() < 1e-12);
        assert_eq!(last.organizational, 16.0);
    }
}

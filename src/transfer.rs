//! Transfer functions for the two organizational structures.
//!
//! Each structure is a [`FunctionSet`]: four pure scalar functions of an
//! input signal `x` and a caller-scaled parameter. The two sets share shapes
//! (logistic gate, hard threshold, smoothstep, compressed logistic) and differ
//! only in their constants, which are reproduced exactly so plotted curves
//! match the reference values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrgFlowError;

// ============================================================================
// Transform names
// ============================================================================

/// One of the four named transfer functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Raw,
    Departmental,
    Organizational,
    Executive,
}

impl Transform {
    pub const ALL: [Transform; 4] = [
        Transform::Raw,
        Transform::Departmental,
        Transform::Organizational,
        Transform::Executive,
    ];

    /// Data key used for lookups and serialization.
    pub fn key(self) -> &'static str {
        match self {
            Transform::Raw => "raw",
            Transform::Departmental => "departmental",
            Transform::Organizational => "organizational",
            Transform::Executive => "executive",
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            Transform::Raw => "Raw Data",
            Transform::Departmental => "Departmental",
            Transform::Organizational => "Organizational",
            Transform::Executive => "Executive",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Structures
// ============================================================================

/// The two named parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    /// Structure A.
    HighConstraint,
    /// Structure B.
    Adaptive,
}

impl Structure {
    pub const ALL: [Structure; 2] = [Structure::HighConstraint, Structure::Adaptive];

    pub fn functions(self) -> &'static FunctionSet {
        match self {
            Structure::HighConstraint => &HIGH_CONSTRAINT,
            Structure::Adaptive => &ADAPTIVE,
        }
    }

    pub fn name(self) -> &'static str {
        self.functions().name
    }
}

impl FromStr for Structure {
    type Err = OrgFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "A" | "structureA" | "high-constraint" | "high_constraint" => {
                Ok(Structure::HighConstraint)
            }
            "b" | "B" | "structureB" | "adaptive" => Ok(Structure::Adaptive),
            _ => Err(OrgFlowError::UnknownStructure(s.to_string())),
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Function sets
// ============================================================================

/// Constants of one structure's four transfer functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionSet {
    pub name: &'static str,
    /// Multiplier on the raw gate position.
    pub raw_gate: f64,
    pub raw_offset: f64,
    /// Departmental threshold per unit intensity.
    pub dept_threshold: f64,
    /// Fraction of the threshold subtracted above it.
    pub dept_discount: f64,
    /// Shrinks the organizational normalization window per unit parameter.
    pub org_scale: f64,
    /// Leading constant of the smoothstep polynomial `n^2 (lead - 2n)`.
    pub org_lead: f64,
    pub org_gain: f64,
    pub org_offset: f64,
    pub exec_compression: f64,
    pub exec_gain: f64,
    pub exec_shift: f64,
    pub exec_offset: f64,
}

/// Structure A: formal boundaries and strong hierarchical compression.
pub const HIGH_CONSTRAINT: FunctionSet = FunctionSet {
    name: "High-Constraint",
    raw_gate: 1.0,
    raw_offset: 2.0,
    dept_threshold: 2.0,
    dept_discount: 1.0,
    org_scale: 1.0,
    org_lead: 3.0,
    org_gain: 8.0,
    org_offset: 4.0,
    exec_compression: 0.5,
    exec_gain: 6.0,
    exec_shift: 3.0,
    exec_offset: 6.0,
};

/// Structure B: flexible boundaries and milder compression.
pub const ADAPTIVE: FunctionSet = FunctionSet {
    name: "Adaptive",
    raw_gate: 0.8,
    raw_offset: 3.0,
    dept_threshold: 1.5,
    dept_discount: 0.8,
    org_scale: 0.7,
    org_lead: 3.5,
    org_gain: 8.0,
    org_offset: 4.0,
    exec_compression: 0.3,
    exec_gain: 7.0,
    exec_shift: 2.0,
    exec_offset: 6.0,
};

/// Width of the organizational normalization window at parameter zero.
const ORG_WINDOW: f64 = 10.0;

#[inline]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl FunctionSet {
    /// Logistic-gated linear term: `x * sigmoid(x - gate * c) + offset`.
    pub fn raw(&self, x: f64, complexity: f64) -> f64 {
        x * sigmoid(x - complexity * self.raw_gate) + self.raw_offset
    }

    /// Hard threshold at `k * intensity`; zero at or below it.
    pub fn departmental(&self, x: f64, intensity: f64) -> f64 {
        let threshold = self.dept_threshold * intensity;
        if x > threshold {
            x - threshold * self.dept_discount
        } else {
            0.0
        }
    }

    /// Inner value of [`organizational`](Self::organizational), clamped to
    /// `[0, 1]`. A NaN quotient lands on 0.
    pub fn org_normalized(&self, x: f64, complexity: f64) -> f64 {
        let n = x / (ORG_WINDOW - complexity * self.org_scale);
        // f64::max/min drop NaN operands, which keeps n inside the range.
        n.max(0.0).min(1.0)
    }

    /// Smoothstep over the shrinking window, scaled into `[offset, offset + gain]`.
    pub fn organizational(&self, x: f64, complexity: f64) -> f64 {
        let n = self.org_normalized(x, complexity);
        n * n * (self.org_lead - 2.0 * n) * self.org_gain + self.org_offset
    }

    /// Logistic whose amplitude is compressed as intensity rises.
    pub fn executive(&self, x: f64, intensity: f64) -> f64 {
        let compression = 1.0 - intensity * self.exec_compression;
        (self.exec_gain * compression) / (1.0 + (-x + self.exec_shift).exp()) + self.exec_offset
    }

    /// Evaluate a transform by name with an already-scaled parameter.
    pub fn evaluate(&self, transform: Transform, x: f64, parameter: f64) -> f64 {
        match transform {
            Transform::Raw => self.raw(x, parameter),
            Transform::Departmental => self.departmental(x, parameter),
            Transform::Organizational => self.organizational(x, parameter),
            Transform::Executive => self.executive(x, parameter),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

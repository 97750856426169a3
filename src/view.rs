//! The three tab views and the charts each one mounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canvas::Rect;
use crate::chart::{LineChart, Series};
use crate::config::PageConfig;
use crate::error::OrgFlowError;
use crate::intensity::Intensity;
use crate::sampler::generate_samples;
use crate::transfer::{Structure, Transform};

pub const Y_AXIS_LABEL: &str = "Transform Output";

/// Tab states of the page. `Comparative` is active on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewTab {
    #[default]
    Comparative,
    StructureA,
    StructureB,
}

impl ViewTab {
    pub const ALL: [ViewTab; 3] = [ViewTab::Comparative, ViewTab::StructureA, ViewTab::StructureB];

    pub fn key(self) -> &'static str {
        match self {
            ViewTab::Comparative => "comparative",
            ViewTab::StructureA => "structureA",
            ViewTab::StructureB => "structureB",
        }
    }

    /// Trigger caption.
    pub fn label(self) -> &'static str {
        match self {
            ViewTab::Comparative => "Comparative View",
            ViewTab::StructureA => "High-Constraint",
            ViewTab::StructureB => "Adaptive",
        }
    }

    /// Structures whose samples this view needs.
    pub fn structures(self) -> &'static [Structure] {
        match self {
            ViewTab::Comparative => &Structure::ALL,
            ViewTab::StructureA => &[Structure::HighConstraint],
            ViewTab::StructureB => &[Structure::Adaptive],
        }
    }

    pub fn x_axis_label(self) -> &'static str {
        match self {
            ViewTab::Comparative => "Input Signal Magnitude",
            _ => "Input Signal",
        }
    }

    /// Sample the view's structures at `intensity` and build its chart in `frame`.
    pub fn build_chart(self, cfg: &PageConfig, intensity: Intensity, frame: Rect) -> LineChart {
        let chart = LineChart::new(&cfg.chart, frame, self.x_axis_label(), Y_AXIS_LABEL);
        let width = cfg.chart.line_width;
        match self {
            ViewTab::Comparative => self.structures().iter().fold(chart, |chart, &s| {
                let samples = generate_samples(s.functions(), intensity);
                chart.with_series(Series::from_samples(
                    &samples,
                    Transform::Executive,
                    s.name(),
                    cfg.palette.structure(s).rgba8(),
                    width,
                ))
            }),
            ViewTab::StructureA | ViewTab::StructureB => {
                let s = self.structures()[0];
                let samples = generate_samples(s.functions(), intensity);
                Transform::ALL.iter().fold(chart, |chart, &t| {
                    chart.with_series(Series::from_samples(
                        &samples,
                        t,
                        t.label(),
                        cfg.palette.transform(t).rgba8(),
                        width,
                    ))
                })
            }
        }
    }
}

impl FromStr for ViewTab {
    type Err = OrgFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewTab::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| OrgFlowError::UnknownView(s.to_string()))
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

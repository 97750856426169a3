//! Page configuration.
//!
//! Every field has a default matching the stock page, so a config file only
//! needs the values it overrides:
//!
//! ```json
//! { "initial_intensity": 40, "palette": { "raw": "#0ea5e9" } }
//! ```

use std::fmt;

use agg_rust::color::Rgba8;
use serde::{Deserialize, Serialize};

use crate::canvas::MIN_DASH;
use crate::error::{OrgFlowError, Result};
use crate::transfer::{Structure, Transform};
use crate::view::ViewTab;

// ============================================================================
// Colors
// ============================================================================

/// An RGBA color read from and written as a `#rrggbb[aa]` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Rgba8);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        HexColor(Rgba8 { r, g, b, a: 255 })
    }

    pub fn parse(s: &str) -> Result<Self> {
        let err = || OrgFlowError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(HexColor(Rgba8 {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        }))
    }

    pub fn rgba8(self) -> Rgba8 {
        self.0
    }

    /// Same color with alpha scaled by `opacity` (0..1).
    pub fn with_opacity(self, opacity: f64) -> Rgba8 {
        let mut c = self.0;
        c.a = (c.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        c
    }
}

impl TryFrom<String> for HexColor {
    type Error = OrgFlowError;

    fn try_from(s: String) -> Result<Self> {
        HexColor::parse(&s)
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgba8 { r, g, b, a } = self.0;
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Series colors per transform, plus the two comparative-view colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub raw: HexColor,
    pub departmental: HexColor,
    pub organizational: HexColor,
    pub executive: HexColor,
    pub high_constraint: HexColor,
    pub adaptive: HexColor,
    pub accent: HexColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            raw: HexColor::rgb(0x22, 0xc5, 0x5e),
            departmental: HexColor::rgb(0xef, 0x44, 0x44),
            organizational: HexColor::rgb(0x63, 0x66, 0xf1),
            executive: HexColor::rgb(0xf5, 0x9e, 0x0b),
            high_constraint: HexColor::rgb(0xef, 0x44, 0x44),
            adaptive: HexColor::rgb(0x22, 0xc5, 0x5e),
            accent: HexColor::rgb(0x3b, 0x82, 0xf6),
        }
    }
}

impl Palette {
    pub fn transform(&self, t: Transform) -> HexColor {
        match t {
            Transform::Raw => self.raw,
            Transform::Departmental => self.departmental,
            Transform::Organizational => self.organizational,
            Transform::Executive => self.executive,
        }
    }

    pub fn structure(&self, s: Structure) -> HexColor {
        match s {
            Structure::HighConstraint => self.high_constraint,
            Structure::Adaptive => self.adaptive,
        }
    }
}

// ============================================================================
// Chart & page
// ============================================================================

/// Outer spacing around a chart's plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 40.0,
            left: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub line_width: f64,
    /// Dash and gap length of grid lines.
    pub grid_dash: f64,
    pub grid_opacity: f64,
    /// Height reserved above the plot for the legend.
    pub legend_height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
            margin: Margin::default(),
            line_width: 3.0,
            grid_dash: 3.0,
            grid_opacity: 0.3,
            legend_height: 36.0,
        }
    }
}

/// Largest accepted page dimension, in pixels.
pub const MAX_PAGE_DIMENSION: u32 = 8192;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: u32,
    pub height: u32,
    /// Slider position on load, `0..=100`.
    pub initial_intensity: u32,
    pub initial_view: ViewTab,
    pub chart: ChartConfig,
    pub palette: Palette,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1120,
            initial_intensity: 0,
            initial_view: ViewTab::Comparative,
            chart: ChartConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: PageConfig = serde_json::from_str(json)?;
        cfg.validated()
    }

    /// Reject unusable surfaces and pull out-of-range values back into range.
    pub fn validated(mut self) -> Result<Self> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_PAGE_DIMENSION
            || self.height > MAX_PAGE_DIMENSION
        {
            return Err(OrgFlowError::InvalidSurface {
                width: self.width,
                height: self.height,
            });
        }
        if self.initial_intensity > 100 {
            tracing::warn!(value = self.initial_intensity, "initial_intensity clamped to 100");
            self.initial_intensity = 100;
        }
        if !(0.0..=1.0).contains(&self.chart.grid_opacity) {
            tracing::warn!(value = self.chart.grid_opacity, "grid_opacity clamped");
            self.chart.grid_opacity = self.chart.grid_opacity.clamp(0.0, 1.0);
        }
        if !self.chart.grid_dash.is_finite() || self.chart.grid_dash < MIN_DASH {
            let fixed = if self.chart.grid_dash.is_finite() {
                MIN_DASH
            } else {
                ChartConfig::default().grid_dash
            };
            tracing::warn!(value = self.chart.grid_dash, fixed, "grid_dash out of range");
            self.chart.grid_dash = fixed;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        let c = HexColor::parse("#22c55e").unwrap();
        assert_eq!(c.0, Rgba8 { r: 0x22, g: 0xc5, b: 0x5e, a: 255 });
        let c = HexColor::parse("#6366f180").unwrap();
        assert_eq!(c.0.a, 0x80);
        assert_eq!(c.to_string(), "#6366f180");
    }

    #[test]
    fn test_reject_bad_colors() {
        for s in ["22c55e", "#22c55", "#zzzzzz", "#22c55e0", ""] {
            assert!(matches!(HexColor::parse(s), Err(OrgFlowError::InvalidColor(_))), "{}", s);
        }
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let c = HexColor::rgb(0, 0, 0).with_opacity(0.3);
        assert_eq!(c.a, 77);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = PageConfig::from_json(
            r##"{ "initial_intensity": 40, "palette": { "raw": "#0ea5e9" } }"##,
        )
        .unwrap();
        assert_eq!(cfg.initial_intensity, 40);
        assert_eq!(cfg.palette.raw.to_string(), "#0ea5e9");
        assert_eq!(cfg.palette.executive, Palette::default().executive);
        assert_eq!(cfg.chart.width, 900.0);
        assert_eq!(cfg.chart.margin.left, 60.0);
    }

    #[test]
    fn test_initial_view_by_name() {
        let cfg = PageConfig::from_json(r#"{ "initial_view": "structureB" }"#).unwrap();
        assert_eq!(cfg.initial_view, ViewTab::StructureB);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            PageConfig::from_json(r#"{ "width": 0 }"#),
            Err(OrgFlowError::InvalidSurface { .. })
        ));
        assert!(matches!(
            PageConfig::from_json(r##"{ "palette": { "raw": "green" } }"##),
            Err(OrgFlowError::Config(_))
        ));
        let cfg = PageConfig::from_json(r#"{ "initial_intensity": 400 }"#).unwrap();
        assert_eq!(cfg.initial_intensity, 100);
    }

    #[test]
    fn test_zero_grid_dash_is_clamped_and_renders() {
        let cfg = PageConfig::from_json(r#"{ "width": 400, "height": 300, "chart": { "grid_dash": 0 } }"#)
            .unwrap();
        assert_eq!(cfg.chart.grid_dash, MIN_DASH);
        let surface = crate::OrgFlowPage::new(cfg).unwrap().render().unwrap();
        assert_eq!(surface.data().len(), 400 * 300 * 4);

        let cfg = PageConfig::from_json(r#"{ "chart": { "grid_dash": -2.5 } }"#).unwrap();
        assert_eq!(cfg.chart.grid_dash, MIN_DASH);
    }
}

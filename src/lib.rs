//! # orgflow
//!
//! Plots four organizational transfer functions ("raw", "departmental",
//! "organizational", "executive") for two structures, driven by a single
//! intensity slider, and renders the whole interactive page with AGG's
//! anti-aliased scanline pipeline into an RGBA buffer.
//!
//! ## Architecture
//!
//! 1. **Transfer functions** ([`transfer`]): the two constant sets and their
//!    four scalar functions
//! 2. **Sampling** ([`sampler`]): 41 points over `[0, 10]` with per-transform
//!    parameter scaling
//! 3. **Widgets** ([`slider`], [`tabs`], [`card`]): hand-built primitives
//!    drawn through [`canvas`]
//! 4. **Charting** ([`chart`]): axes, grid, legend, monotone curves, tooltip
//! 5. **Page** ([`view`] and [`page`]): which chart is mounted for the
//!    active tab, pointer routing and full-page rendering
//!
//! ```no_run
//! use orgflow::{OrgFlowPage, PageConfig, ViewTab};
//!
//! let mut page = OrgFlowPage::new(PageConfig::default())?;
//! page.slider_input(40.0);
//! page.select_tab(ViewTab::StructureA)?;
//! let rgba = page.render()?.into_data();
//! # Ok::<(), orgflow::OrgFlowError>(())
//! ```

pub mod canvas;
pub mod card;
pub mod chart;
pub mod config;
pub mod error;
pub mod intensity;
pub mod page;
pub mod sampler;
pub mod slider;
pub mod tabs;
pub mod transfer;
pub mod view;

pub use config::PageConfig;
pub use error::{OrgFlowError, Result};
pub use intensity::Intensity;
pub use page::OrgFlowPage;
pub use sampler::{generate_samples, SamplePoint};
pub use transfer::{FunctionSet, Structure, Transform, ADAPTIVE, HIGH_CONSTRAINT};
pub use view::ViewTab;

/// Render `view` at `intensity` into a standalone RGBA buffer sized by `config`.
///
/// The page is driven through its slider, so `intensity` is snapped to the
/// nearest whole percent first (`0.333` renders as 33%).
pub fn render_view(view: ViewTab, intensity: Intensity, config: &PageConfig) -> Result<canvas::Surface> {
    let snapped = Intensity::from_percent(intensity.percent());
    if snapped != intensity {
        tracing::debug!(requested = intensity.value(), %snapped, "intensity snapped to slider step");
    }
    let mut config = config.clone();
    config.initial_view = view;
    config.initial_intensity = snapped.percent();
    OrgFlowPage::new(config)?.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_view_snaps_to_slider_step() {
        let cfg = PageConfig {
            width: 400,
            height: 300,
            ..PageConfig::default()
        };
        let fine = render_view(ViewTab::StructureA, Intensity::new(0.333), &cfg).unwrap();
        let step = render_view(ViewTab::StructureA, Intensity::from_percent(33), &cfg).unwrap();
        assert_eq!(fine.data(), step.data());
    }
}

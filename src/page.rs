//! The interactive page: slider, tabs and the active view's chart inside a
//! card, followed by the two architecture summaries.
//!
//! All state lives in [`OrgFlowPage`] and every event handler runs
//! synchronously on `&mut self`. Only the active view's chart exists; it is
//! rebuilt whenever the intensity changes or a different tab is selected.

use agg_rust::color::Rgba8;

use crate::canvas::{Align, Painter, Rect, Surface, TextStyle};
use crate::card::Card;
use crate::chart::LineChart;
use crate::config::PageConfig;
use crate::error::Result;
use crate::intensity::Intensity;
use crate::slider::{Slider, SliderLayout};
use crate::tabs::{Tabs, TabsListStyle};
use crate::view::ViewTab;

pub const PAGE_TITLE: &str = "Neural Networks Through Organizational Flow";
pub const PAGE_SUBTITLE: &str =
    "Visualizing how information flows through organizational structures can help us understand neural network behavior";
pub const CARD_TITLE: &str = "Information Flow Architecture Analysis";
pub const CARD_SUBTITLE: &str = "Visualizing organizational dynamics and information processing patterns";
pub const SLIDER_HEADING: &str = "Organizational Dynamics Intensity";

/// Headings and bullet points of the two architecture summaries.
pub const ARCHITECTURE_NOTES: [(&str, [&str; 4]); 2] = [
    (
        "High-Constraint Architecture",
        [
            "Structured departmental filtering with formal boundaries",
            "Strong hierarchical decision compression",
            "Clear organizational constraints and protocols",
            "Sequential information processing pipeline",
        ],
    ),
    (
        "Adaptive Architecture",
        [
            "Flexible departmental boundaries with dynamic adjustments",
            "Multiple decision pathways with feedback loops",
            "Responsive organizational structure",
            "Parallel information processing capabilities",
        ],
    ),
];

const BACKGROUND: Rgba8 = Rgba8 { r: 249, g: 250, b: 251, a: 255 };
const HEADING: Rgba8 = Rgba8 { r: 17, g: 24, b: 39, a: 255 };
const MUTED: Rgba8 = Rgba8 { r: 75, g: 85, b: 99, a: 255 };

// ============================================================================
// Layout
// ============================================================================

/// Pixel positions of everything on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub title_y: f64,
    pub subtitle_y: f64,
    pub card: Rect,
    pub slider_heading_y: f64,
    pub slider: SliderLayout,
    pub tabs_row: Rect,
    /// Chart frame, fitted to the card's content width.
    pub chart: Rect,
    pub notes: [Rect; 2],
}

impl PageLayout {
    pub fn compute(cfg: &PageConfig, card: &Card) -> Self {
        let w = cfg.width as f64;
        let side = 24.0;
        let title_y = 40.0;
        let subtitle_y = 72.0;
        let card_y = 104.0;
        let card_w = (cfg.chart.width + 2.0 * card.padding).min(w - 2.0 * side).max(0.0);
        let card_x = ((w - card_w) / 2.0).max(0.0);

        // horizontal extent of the content area does not depend on card height
        let content = card.content_rect(Rect::new(card_x, card_y, card_w, 0.0));
        let heading_y = content.y + 8.0;
        let slider_row = Rect::new(content.x, heading_y + 16.0, content.w, 24.0);
        let tabs_row = Rect::new(content.x, slider_row.bottom() + 20.0, content.w, 40.0);
        let chart = Rect::new(
            content.x,
            tabs_row.bottom() + 24.0,
            cfg.chart.width.min(content.w),
            cfg.chart.height,
        );
        let notes_y = chart.bottom() + 24.0;
        let notes_h = 190.0;
        let note_w = ((content.w - 24.0) / 2.0).max(0.0);
        let card_h = notes_y + notes_h + card.padding - card_y;

        Self {
            title_y,
            subtitle_y,
            card: Rect::new(card_x, card_y, card_w, card_h),
            slider_heading_y: heading_y,
            slider: SliderLayout::new(slider_row, 64.0),
            tabs_row,
            chart,
            notes: [
                Rect::new(content.x, notes_y, note_w, notes_h),
                Rect::new(content.x + note_w + 24.0, notes_y, note_w, notes_h),
            ],
        }
    }

    /// Content area of the card at its final height.
    pub fn card_content(&self, card: &Card) -> Rect {
        card.content_rect(self.card)
    }
}

// ============================================================================
// Page
// ============================================================================

/// What a pointer event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerOutcome {
    pub intensity_changed: bool,
    pub tab_changed: bool,
    /// Hover state moved; a redraw is worthwhile even without other changes.
    pub hover_changed: bool,
}

impl PointerOutcome {
    pub fn needs_redraw(&self) -> bool {
        self.intensity_changed || self.tab_changed || self.hover_changed
    }
}

pub struct OrgFlowPage {
    config: PageConfig,
    card: Card,
    layout: PageLayout,
    slider: Slider,
    tabs: Tabs<ViewTab>,
    tab_style: TabsListStyle,
    chart: Option<LineChart>,
    /// Incremented each time the active view's chart is rebuilt.
    mounts: u64,
    hover: Option<(f64, f64)>,
    hovered_tab: Option<ViewTab>,
}

impl OrgFlowPage {
    pub fn new(config: PageConfig) -> Result<Self> {
        let config = config.validated()?;
        let card = Card::new(CARD_TITLE).with_subtitle(CARD_SUBTITLE);
        let layout = PageLayout::compute(&config, &card);
        let tabs = Tabs::new(config.initial_view, ViewTab::ALL.map(|v| (v, v.label())))?;
        let mut page = Self {
            slider: Slider::new(config.initial_intensity),
            config,
            card,
            layout,
            tabs,
            tab_style: TabsListStyle::default(),
            chart: None,
            mounts: 0,
            hover: None,
            hovered_tab: None,
        };
        page.tab_style.active_bg = page.config.palette.accent.rgba8();
        page.remount();
        Ok(page)
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn intensity(&self) -> Intensity {
        self.slider.intensity()
    }

    pub fn active_view(&self) -> ViewTab {
        self.tabs.active()
    }

    pub fn tabs(&self) -> &Tabs<ViewTab> {
        &self.tabs
    }

    /// The chart of the active view. Inactive views have none.
    pub fn chart(&self) -> Option<&LineChart> {
        self.chart.as_ref()
    }

    pub fn mount_count(&self) -> u64 {
        self.mounts
    }

    /// Rebuild the active view's chart. Inactive views are never sampled.
    fn remount(&mut self) {
        let intensity = self.intensity();
        let frame = self.layout.chart;
        let mut mounted = None;
        for view in ViewTab::ALL {
            let content = match self.tabs.content(view) {
                Ok(c) => c,
                Err(_) => continue,
            };
            if let Some(chart) = content.mount(|| view.build_chart(&self.config, intensity, frame)) {
                mounted = Some(chart);
            }
        }
        self.chart = mounted;
        self.mounts += 1;
        tracing::debug!(view = %self.tabs.active(), %intensity, mounts = self.mounts, "chart mounted");
    }

    /// Slider input event with a raw value in `0..=100`.
    pub fn slider_input(&mut self, raw: f64) -> Intensity {
        let before = self.slider.value();
        let intensity = self.slider.input(raw);
        if self.slider.value() != before {
            tracing::debug!(%intensity, "intensity changed");
        }
        // every input event re-samples, even when the value is unchanged
        self.remount();
        intensity
    }

    /// Select a view. Returns `false` when it was already active; nothing is
    /// remounted in that case.
    pub fn select_tab(&mut self, view: ViewTab) -> Result<bool> {
        let changed = self.tabs.select(view)?;
        if changed {
            self.remount();
        }
        Ok(changed)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> PointerOutcome {
        let mut out = PointerOutcome::default();
        if let Some(intensity) = self.slider.pointer_down(&self.layout.slider, x, y) {
            tracing::trace!(x, y, "slider press");
            tracing::debug!(%intensity, "intensity changed");
            self.remount();
            out.intensity_changed = true;
        } else if let Some(view) = self.tabs.trigger_at(self.layout.tabs_row, &self.tab_style, x, y) {
            tracing::trace!(x, y, view = %view, "tab press");
            // trigger_at only yields registered values
            out.tab_changed = self.select_tab(view).unwrap_or(false);
        }
        out
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> PointerOutcome {
        let mut out = PointerOutcome::default();
        if let Some(intensity) = self.slider.pointer_move(&self.layout.slider, x) {
            tracing::trace!(%intensity, "slider drag");
            self.remount();
            out.intensity_changed = true;
        }

        let hover = self
            .chart
            .as_ref()
            .filter(|c| c.plot_rect().contains(x, y))
            .map(|_| (x, y));
        let before = self
            .hover
            .and_then(|(hx, hy)| self.chart.as_ref().and_then(|c| c.tooltip_at(hx, hy)))
            .map(|t| t.index);
        let after = hover.and_then(|(hx, hy)| self.chart.as_ref().and_then(|c| c.tooltip_at(hx, hy)))
            .map(|t| t.index);
        self.hover = hover;

        let hovered_tab = self.tabs.trigger_at(self.layout.tabs_row, &self.tab_style, x, y);
        out.hover_changed = before != after || hovered_tab != self.hovered_tab;
        self.hovered_tab = hovered_tab;
        out
    }

    pub fn pointer_up(&mut self) {
        self.slider.pointer_up();
    }

    pub fn pointer_leave(&mut self) -> PointerOutcome {
        self.slider.pointer_up();
        let out = PointerOutcome {
            hover_changed: self.hover.is_some() || self.hovered_tab.is_some(),
            ..Default::default()
        };
        self.hover = None;
        self.hovered_tab = None;
        out
    }

    /// Render the whole page into a new surface.
    pub fn render(&self) -> Result<Surface> {
        let mut surface = Surface::new(self.config.width, self.config.height)?;
        surface.paint(|p| self.paint(p));
        Ok(surface)
    }

    pub fn paint(&self, p: &mut Painter<'_>) {
        let l = &self.layout;
        let cx = self.config.width as f64 / 2.0;
        p.clear(BACKGROUND);

        p.text(PAGE_TITLE, cx, l.title_y, &TextStyle::new(30.0, HEADING).bold(), Align::Center);
        p.text(PAGE_SUBTITLE, cx, l.subtitle_y, &TextStyle::new(13.0, MUTED), Align::Center);

        let content = self.card.render(p, l.card);

        let heading = TextStyle::new(15.0, HEADING).bold();
        p.text(SLIDER_HEADING, content.x, l.slider_heading_y, &heading, Align::Left);
        self.slider.render(p, &l.slider, self.config.palette.accent.rgba8());

        self.tabs.render_list(p, l.tabs_row, &self.tab_style, self.hovered_tab);

        if let Some(chart) = &self.chart {
            chart.render(p, self.hover);
        }

        for (rect, (heading, bullets)) in l.notes.iter().zip(ARCHITECTURE_NOTES.iter()) {
            render_note(p, *rect, heading, bullets);
        }
    }
}

fn render_note(p: &mut Painter<'_>, r: Rect, heading: &str, bullets: &[&str]) {
    p.fill_rect(r, 8.0, Rgba8::new(255, 255, 255, 255));
    p.stroke_rect(r, 8.0, 1.0, Rgba8::new(229, 231, 235, 255));
    let title = TextStyle::new(16.0, HEADING).bold();
    p.text(heading, r.x + 20.0, r.y + 30.0, &title, Align::Left);
    let body = TextStyle::new(12.0, MUTED);
    for (i, line) in bullets.iter().enumerate() {
        let y = r.y + 66.0 + i as f64 * 28.0;
        p.circle(r.x + 24.0, y, 2.5, MUTED);
        p.text(line, r.x + 36.0, y, &body, Align::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> OrgFlowPage {
        OrgFlowPage::new(PageConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let p = page();
        assert_eq!(p.active_view(), ViewTab::Comparative);
        assert_eq!(p.intensity(), Intensity::ZERO);
        assert_eq!(p.mount_count(), 1);
        assert_eq!(p.chart().map(|c| c.series.len()), Some(2));
    }

    #[test]
    fn test_layout_fits_page() {
        let p = page();
        let l = p.layout();
        assert!(l.card.bottom() <= p.config().height as f64);
        assert!(l.card.right() <= p.config().width as f64);
        assert!(l.tabs_row.y > l.slider.track.bottom());
        assert!(l.chart.y > l.tabs_row.bottom());
        assert!(l.notes[0].y > l.chart.bottom());
        assert_eq!(l.chart.w, p.config().chart.width);
    }

    #[test]
    fn test_narrow_page_keeps_chart_inside_card() {
        let cfg = PageConfig {
            width: 600,
            ..PageConfig::default()
        };
        let p = OrgFlowPage::new(cfg).unwrap();
        let l = p.layout();
        let content = l.card_content(&p.card);
        assert!(l.card.right() <= 600.0);
        assert_eq!(l.chart.x, content.x);
        assert!(l.chart.right() <= content.right());
        assert!(l.chart.bottom() <= content.bottom());
        assert!(l.notes[1].right() <= content.right());

        let chart = p.chart().unwrap();
        assert_eq!(chart.frame, l.chart);
        assert!(chart.plot_rect().right() <= content.right());
        let surface = p.render().unwrap();
        // right page margin stays background
        assert_eq!(surface.pixel(595, 600), [249, 250, 251, 255]);
    }

    #[test]
    fn test_click_on_tab_switches_view() {
        let mut p = page();
        let row = p.layout().tabs_row;
        let third = Rect::new(row.x + row.w * 5.0 / 6.0, row.center_y(), 0.0, 0.0);
        let out = p.pointer_down(third.x, third.y);
        assert!(out.tab_changed);
        assert_eq!(p.active_view(), ViewTab::StructureB);
        assert_eq!(p.chart().map(|c| c.series.len()), Some(4));
    }

    #[test]
    fn test_slider_drag_resamples() {
        let mut p = page();
        let track = p.layout().slider.track;
        let out = p.pointer_down(track.right(), track.center_y());
        assert!(out.intensity_changed);
        assert_eq!(p.intensity(), Intensity::FULL);
        let exec = p.chart().unwrap().series[0].points[40].1;
        assert_eq!(exec, crate::transfer::HIGH_CONSTRAINT.executive(10.0, 1.0));
        p.pointer_move(track.x, track.center_y());
        assert_eq!(p.intensity(), Intensity::ZERO);
        p.pointer_up();
        p.pointer_move(track.right(), track.center_y());
        assert_eq!(p.intensity(), Intensity::ZERO);
    }

    #[test]
    fn test_hover_over_plot() {
        let mut p = page();
        let plot = p.chart().unwrap().plot_rect();
        let out = p.pointer_move(plot.center_x(), plot.center_y());
        assert!(out.hover_changed);
        let same = p.pointer_move(plot.center_x() + 0.5, plot.center_y());
        assert!(!same.hover_changed);
        assert!(p.pointer_leave().hover_changed);
    }
}

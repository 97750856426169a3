//! Line chart: axes, dashed grid, legend, monotone curves and hover tooltip.
//!
//! Curves use monotone cubic interpolation in x (Steffen's method, as in
//! d3's `curveMonotoneX`): each segment between samples is a cubic Bézier
//! whose tangents are limited so the curve never overshoots the data.

use agg_rust::color::Rgba8;
use agg_rust::conv_curve::ConvCurve;
use agg_rust::math_stroke::LineCap;
use agg_rust::path_storage::PathStorage;

use crate::canvas::{text_width, Align, Painter, Rect, TextStyle};
use crate::config::{ChartConfig, Margin};
use crate::sampler::{SamplePoint, DOMAIN_END, DOMAIN_START};
use crate::transfer::Transform;

/// Fixed vertical domain of every chart.
pub const Y_DOMAIN: (f64, f64) = (0.0, 16.0);
pub const X_DOMAIN: (f64, f64) = (DOMAIN_START, DOMAIN_END);

/// Band below the plot for x tick labels.
const X_TICK_BAND: f64 = 24.0;
/// Band left of the plot for y tick labels.
const Y_TICK_BAND: f64 = 36.0;
const TICK_TEXT: f64 = 11.0;
const LABEL_TEXT: f64 = 13.0;

const AXIS_COLOR: Rgba8 = Rgba8 { r: 102, g: 102, b: 102, a: 255 };
const TEXT_COLOR: Rgba8 = Rgba8 { r: 55, g: 65, b: 81, a: 255 };

// ============================================================================
// Series & axes
// ============================================================================

/// One named polyline in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Rgba8,
    pub width: f64,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Extract the `transform` column of `samples` against their inputs.
    pub fn from_samples(
        samples: &[SamplePoint],
        transform: Transform,
        name: impl Into<String>,
        color: Rgba8,
        width: f64,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            width,
            points: samples.iter().map(|p| (p.input, p.value(transform))).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub domain: (f64, f64),
    pub ticks: Vec<f64>,
    pub label: String,
}

impl Axis {
    pub fn new(domain: (f64, f64), tick_step: f64, label: impl Into<String>) -> Self {
        Self {
            domain,
            ticks: linear_ticks(domain, tick_step),
            label: label.into(),
        }
    }
}

/// Ticks from `lo` to `hi` inclusive at `step`.
pub fn linear_ticks((lo, hi): (f64, f64), step: f64) -> Vec<f64> {
    if step <= 0.0 || hi < lo {
        return vec![lo];
    }
    let n = ((hi - lo) / step + 1e-9).floor() as usize;
    (0..=n).map(|i| lo + i as f64 * step).collect()
}

// ============================================================================
// Monotone interpolation
// ============================================================================

/// Cubic Bézier from the previous end point: two controls and an end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub c1: (f64, f64),
    pub c2: (f64, f64),
    pub to: (f64, f64),
}

fn sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Interior tangent at `p1`.
fn slope3(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    if h0 <= 0.0 || h1 <= 0.0 {
        return 0.0;
    }
    let s0 = (p1.1 - p0.1) / h0;
    let s1 = (p2.1 - p1.1) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() {
        t
    } else {
        0.0
    }
}

/// End tangent from the one-sided difference and the neighbouring tangent.
fn slope2(p0: (f64, f64), p1: (f64, f64), t: f64) -> f64 {
    let h = p1.0 - p0.0;
    if h != 0.0 {
        (3.0 * (p1.1 - p0.1) / h - t) / 2.0
    } else {
        t
    }
}

/// Bézier segments joining `points`, which must be sorted by x.
pub fn monotone_segments(points: &[(f64, f64)]) -> Vec<CubicSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    if n == 2 {
        let (a, b) = (points[0], points[1]);
        let dx = (b.0 - a.0) / 3.0;
        let dy = (b.1 - a.1) / 3.0;
        return vec![CubicSegment {
            c1: (a.0 + dx, a.1 + dy),
            c2: (b.0 - dx, b.1 - dy),
            to: b,
        }];
    }

    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = slope3(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = slope2(points[0], points[1], tangents[1]);
    tangents[n - 1] = slope2(points[n - 2], points[n - 1], tangents[n - 2]);

    points
        .windows(2)
        .zip(tangents.windows(2))
        .map(|(p, t)| {
            let (a, b) = (p[0], p[1]);
            let dx = (b.0 - a.0) / 3.0;
            CubicSegment {
                c1: (a.0 + dx, a.1 + dx * t[0]),
                c2: (b.0 - dx, b.1 - dx * t[1]),
                to: b,
            }
        })
        .collect()
}

// ============================================================================
// Chart
// ============================================================================

/// Hover readout for the sample nearest the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub index: usize,
    pub input: f64,
    /// `(series name, color, value)` in series order.
    pub entries: Vec<(String, Rgba8, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Outer box in page pixels, margins included.
    pub frame: Rect,
    pub margin: Margin,
    pub legend_height: f64,
    pub grid_dash: f64,
    pub grid_opacity: f64,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
}

impl LineChart {
    /// Empty chart with the fixed domains, drawn inside `frame`.
    pub fn new(cfg: &ChartConfig, frame: Rect, x_label: &str, y_label: &str) -> Self {
        Self {
            frame,
            margin: cfg.margin,
            legend_height: cfg.legend_height,
            grid_dash: cfg.grid_dash,
            grid_opacity: cfg.grid_opacity,
            x_axis: Axis::new(X_DOMAIN, 2.0, x_label),
            y_axis: Axis::new(Y_DOMAIN, 4.0, y_label),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Area inside axes and legend where data is drawn.
    pub fn plot_rect(&self) -> Rect {
        let f = self.frame;
        let x = f.x + self.margin.left + Y_TICK_BAND;
        let y = f.y + self.margin.top + self.legend_height;
        let right = f.right() - self.margin.right;
        let bottom = f.bottom() - self.margin.bottom - X_TICK_BAND;
        Rect::new(x, y, (right - x).max(1.0), (bottom - y).max(1.0))
    }

    /// Map data coordinates to page pixels.
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.plot_rect();
        let (x0, x1) = self.x_axis.domain;
        let (y0, y1) = self.y_axis.domain;
        (
            p.x + (x - x0) / (x1 - x0) * p.w,
            p.bottom() - (y - y0) / (y1 - y0) * p.h,
        )
    }

    /// Map a page pixel column back to a data x.
    pub fn x_at(&self, px: f64) -> f64 {
        let p = self.plot_rect();
        let (x0, x1) = self.x_axis.domain;
        x0 + (px - p.x) / p.w * (x1 - x0)
    }

    /// Readout for the sample nearest to `px` while the pointer is over the plot.
    pub fn tooltip_at(&self, px: f64, py: f64) -> Option<Tooltip> {
        if !self.plot_rect().contains(px, py) {
            return None;
        }
        let first = self.series.first()?;
        let x = self.x_at(px);
        let (index, &(input, _)) = first.points.iter().enumerate().min_by(|(_, a), (_, b)| {
            (a.0 - x).abs().total_cmp(&(b.0 - x).abs())
        })?;
        let entries = self
            .series
            .iter()
            .filter_map(|s| s.points.get(index).map(|&(_, v)| (s.name.clone(), s.color, v)))
            .collect();
        Some(Tooltip {
            index,
            input,
            entries,
        })
    }

    pub fn render(&self, painter: &mut Painter<'_>, hover: Option<(f64, f64)>) {
        let plot = self.plot_rect();
        painter.fill_rect(self.frame, 8.0, Rgba8::new(255, 255, 255, 255));

        self.render_grid(painter, plot);
        self.render_axes(painter, plot);
        self.render_legend(painter);

        painter.clip(plot.inset(-2.0));
        for s in &self.series {
            let mut path = PathStorage::new();
            if let Some(&(x, y)) = s.points.first() {
                let (sx, sy) = self.to_screen(x, y);
                path.move_to(sx, sy);
            }
            for seg in monotone_segments(&s.points) {
                let c1 = self.to_screen(seg.c1.0, seg.c1.1);
                let c2 = self.to_screen(seg.c2.0, seg.c2.1);
                let to = self.to_screen(seg.to.0, seg.to.1);
                path.curve4(c1.0, c1.1, c2.0, c2.1, to.0, to.1);
            }
            painter.stroke(ConvCurve::new(path), s.width, LineCap::Round, s.color);
        }
        painter.reset_clip();

        if let Some(tip) = hover.and_then(|(px, py)| self.tooltip_at(px, py)) {
            self.render_tooltip(painter, plot, &tip);
        }
    }

    fn render_grid(&self, painter: &mut Painter<'_>, plot: Rect) {
        let grid = Rgba8::new(128, 128, 128, (255.0 * self.grid_opacity).round() as u32);
        for &t in &self.x_axis.ticks {
            let (sx, _) = self.to_screen(t, 0.0);
            painter.dashed_line((sx, plot.y), (sx, plot.bottom()), self.grid_dash, 1.0, grid);
        }
        for &t in &self.y_axis.ticks {
            let (_, sy) = self.to_screen(0.0, t);
            painter.dashed_line((plot.x, sy), (plot.right(), sy), self.grid_dash, 1.0, grid);
        }
    }

    fn render_axes(&self, painter: &mut Painter<'_>, plot: Rect) {
        painter.line(plot.x, plot.bottom(), plot.right(), plot.bottom(), 1.0, AXIS_COLOR);
        painter.line(plot.x, plot.y, plot.x, plot.bottom(), 1.0, AXIS_COLOR);

        let tick = TextStyle::new(TICK_TEXT, AXIS_COLOR);
        for &t in &self.x_axis.ticks {
            let (sx, sy) = self.to_screen(t, self.y_axis.domain.0);
            painter.line(sx, sy, sx, sy + 6.0, 1.0, AXIS_COLOR);
            painter.text(&format_tick(t), sx, sy + 6.0 + X_TICK_BAND / 2.0, &tick, Align::Center);
        }
        for &t in &self.y_axis.ticks {
            let (sx, sy) = self.to_screen(self.x_axis.domain.0, t);
            painter.line(sx - 6.0, sy, sx, sy, 1.0, AXIS_COLOR);
            painter.text(&format_tick(t), sx - 10.0, sy, &tick, Align::Right);
        }

        let label = TextStyle::new(LABEL_TEXT, TEXT_COLOR);
        painter.text(
            &self.x_axis.label,
            plot.center_x(),
            plot.bottom() + X_TICK_BAND + self.margin.bottom / 2.0,
            &label,
            Align::Center,
        );
        painter.text_vertical(
            &self.y_axis.label,
            self.frame.x + self.margin.left / 2.0,
            plot.center_y(),
            &label,
        );
    }

    fn render_legend(&self, painter: &mut Painter<'_>) {
        const SWATCH: f64 = 14.0;
        const SPACING: f64 = 20.0;
        let style = TextStyle::new(LABEL_TEXT, TEXT_COLOR);
        let widths: Vec<f64> = self
            .series
            .iter()
            .map(|s| SWATCH + 4.0 + text_width(&s.name, style.size))
            .collect();
        let total: f64 = widths.iter().sum::<f64>() + SPACING * widths.len().saturating_sub(1) as f64;
        let plot = self.plot_rect();
        let mut x = plot.center_x() - total / 2.0;
        let y = self.frame.y + self.margin.top + self.legend_height / 2.0;
        for (s, w) in self.series.iter().zip(widths) {
            painter.line(x, y, x + SWATCH, y, s.width.min(4.0), s.color);
            painter.text(&s.name, x + SWATCH + 4.0, y, &TextStyle { color: s.color, ..style }, Align::Left);
            x += w + SPACING;
        }
    }

    fn render_tooltip(&self, painter: &mut Painter<'_>, plot: Rect, tip: &Tooltip) {
        let (cx, _) = self.to_screen(tip.input, 0.0);
        painter.line(cx, plot.y, cx, plot.bottom(), 1.0, Rgba8::new(204, 204, 204, 255));
        for (_, color, v) in &tip.entries {
            let (_, cy) = self.to_screen(tip.input, *v);
            painter.circle(cx, cy, 4.0, *color);
        }

        let style = TextStyle::new(12.0, TEXT_COLOR);
        let lines: Vec<(String, Rgba8)> = std::iter::once((format_tick(tip.input), TEXT_COLOR))
            .chain(tip.entries.iter().map(|(name, c, v)| (format!("{} : {:.2}", name, v), *c)))
            .collect();
        let w = lines
            .iter()
            .map(|(l, _)| text_width(l, style.size))
            .fold(0.0, f64::max)
            + 20.0;
        let line_h = 18.0;
        let h = line_h * lines.len() as f64 + 12.0;
        // keep the box inside the plot, flipping to the left near the right edge
        let bx = if cx + 12.0 + w > plot.right() { cx - 12.0 - w } else { cx + 12.0 };
        let by = plot.y + 8.0;
        let b = Rect::new(bx, by, w, h);
        painter.fill_rect(b, 2.0, Rgba8::new(255, 255, 255, 240));
        painter.stroke_rect(b, 2.0, 1.0, Rgba8::new(204, 204, 204, 255));
        for (i, (text, color)) in lines.iter().enumerate() {
            let y = by + 6.0 + line_h * (i as f64 + 0.5);
            painter.text(text, bx + 10.0, y, &TextStyle { color: *color, ..style }, Align::Left);
        }
    }
}

/// Tick label without a trailing `.0` on whole numbers.
fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

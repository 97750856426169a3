//! RGBA drawing surface and the painter used by every widget.
//!
//! A [`Surface`] owns a top-down RGBA8 buffer. [`Surface::paint`] attaches an
//! AGG rendering pipeline (row accessor → RGBA pixel format → renderer base,
//! plus a scanline rasterizer) to that buffer for the duration of a closure.
//! Coordinates are screen pixels with y pointing down.

use agg_rust::basics::{RectD, VertexSource, PATH_FLAGS_NONE};
use agg_rust::bounding_rect::bounding_rect_single;
use agg_rust::color::Rgba8;
use agg_rust::conv_dash::ConvDash;
use agg_rust::conv_stroke::ConvStroke;
use agg_rust::conv_transform::ConvTransform;
use agg_rust::ellipse::Ellipse;
use agg_rust::gsv_text::GsvText;
use agg_rust::math_stroke::{LineCap, LineJoin};
use agg_rust::path_storage::PathStorage;
use agg_rust::pixfmt_rgba::PixfmtRgba32;
use agg_rust::rasterizer_scanline_aa::RasterizerScanlineAa;
use agg_rust::renderer_base::RendererBase;
use agg_rust::renderer_scanline::render_scanlines_aa_solid;
use agg_rust::rendering_buffer::RowAccessor;
use agg_rust::rounded_rect::RoundedRect;
use agg_rust::scanline_u::ScanlineU8;
use agg_rust::trans_affine::TransAffine;

use crate::config::MAX_PAGE_DIMENSION;
use crate::error::{OrgFlowError, Result};

// ============================================================================
// Geometry
// ============================================================================

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Shrink every side by `d`.
    pub fn inset(&self, d: f64) -> Rect {
        Rect::new(self.x + d, self.y + d, (self.w - 2.0 * d).max(0.0), (self.h - 2.0 * d).max(0.0))
    }
}

// ============================================================================
// Surface
// ============================================================================

/// Owned RGBA8 pixel buffer, rows top to bottom.
#[derive(Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate an opaque white surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_PAGE_DIMENSION || height > MAX_PAGE_DIMENSION {
            return Err(OrgFlowError::InvalidSurface { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![255u8; (width * height * 4) as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Run `f` with a painter attached to this surface.
    pub fn paint<R>(&mut self, f: impl FnOnce(&mut Painter<'_>) -> R) -> R {
        let stride = (self.width * 4) as i32;
        let mut ra = RowAccessor::new();
        // SAFETY: `data` holds exactly width * height * 4 bytes and cannot be
        // reallocated while `self` is mutably borrowed by this call.
        unsafe { ra.attach(self.data.as_mut_ptr(), self.width, self.height, stride) };
        let pf = PixfmtRgba32::new(&mut ra);
        let mut painter = Painter {
            rb: RendererBase::new(pf),
            ras: RasterizerScanlineAa::new(),
            sl: ScanlineU8::new(),
        };
        f(&mut painter)
    }
}

// ============================================================================
// Text
// ============================================================================

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Stroked vector-font text style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Glyph height in pixels.
    pub size: f64,
    /// Stroke thickness; heavier reads as bold.
    pub weight: f64,
    pub color: Rgba8,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgba8) -> Self {
        Self {
            size,
            weight: (size / 9.0).max(1.0),
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight *= 1.6;
        self
    }
}

fn glyphs(s: &str, size: f64) -> GsvText {
    let mut txt = GsvText::new();
    txt.size(size, 0.0);
    txt.flip(true);
    txt.start_point(0.0, 0.0);
    txt.text(s);
    txt
}

fn glyph_bounds(s: &str, size: f64) -> Option<RectD> {
    let mut txt = glyphs(s, size);
    bounding_rect_single(&mut txt, 0)
}

/// Advance width of `s` at `size`, in pixels.
pub fn text_width(s: &str, size: f64) -> f64 {
    glyph_bounds(s, size).map(|r| r.x2.max(0.0)).unwrap_or(0.0)
}

/// Offset from the baseline to the middle of a capital letter.
fn cap_middle(size: f64) -> f64 {
    glyph_bounds("H", size)
        .map(|r| (r.y1 + r.y2) / 2.0)
        .unwrap_or(-size / 2.0)
}

// ============================================================================
// Painter
// ============================================================================

/// Shortest dash `dashed_line` will dash; anything shorter is drawn solid.
pub const MIN_DASH: f64 = 0.5;

/// Drawing operations over an attached surface.
pub struct Painter<'a> {
    rb: RendererBase<PixfmtRgba32<'a>>,
    ras: RasterizerScanlineAa,
    sl: ScanlineU8,
}

impl<'a> Painter<'a> {
    pub fn width(&self) -> u32 {
        self.rb.width()
    }

    pub fn height(&self) -> u32 {
        self.rb.height()
    }

    pub fn clear(&mut self, color: Rgba8) {
        self.rb.clear(&color);
    }

    /// Restrict drawing to `r` until [`reset_clip`](Self::reset_clip).
    pub fn clip(&mut self, r: Rect) {
        self.rb.clip_box_i(
            r.x.floor() as i32,
            r.y.floor() as i32,
            r.right().ceil() as i32 - 1,
            r.bottom().ceil() as i32 - 1,
        );
    }

    pub fn reset_clip(&mut self) {
        self.rb.reset_clipping(true);
    }

    /// Fill any vertex source with a solid color.
    pub fn fill<VS: VertexSource>(&mut self, mut vs: VS, color: Rgba8) {
        self.ras.reset();
        self.ras.add_path(&mut vs, 0);
        render_scanlines_aa_solid(&mut self.ras, &mut self.sl, &mut self.rb, &color);
    }

    /// Stroke a vertex source with round joins.
    pub fn stroke<VS: VertexSource>(&mut self, vs: VS, width: f64, cap: LineCap, color: Rgba8) {
        let mut stroke = ConvStroke::new(vs);
        stroke.set_width(width);
        stroke.set_line_join(LineJoin::Round);
        stroke.set_line_cap(cap);
        self.fill(stroke, color);
    }

    pub fn fill_rect(&mut self, r: Rect, radius: f64, color: Rgba8) {
        let mut rr = RoundedRect::new(r.x, r.y, r.right(), r.bottom(), radius);
        rr.normalize_radius();
        self.fill(rr, color);
    }

    pub fn stroke_rect(&mut self, r: Rect, radius: f64, width: f64, color: Rgba8) {
        let mut rr = RoundedRect::new(r.x, r.y, r.right(), r.bottom(), radius);
        rr.normalize_radius();
        self.stroke(rr, width, LineCap::Butt, color);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgba8) {
        let mut path = PathStorage::new();
        path.move_to(x1, y1);
        path.line_to(x2, y2);
        self.stroke(path, width, LineCap::Butt, color);
    }

    pub fn dashed_line(
        &mut self,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        dash: f64,
        width: f64,
        color: Rgba8,
    ) {
        // a dash this short never advances along the path
        if !dash.is_finite() || dash < MIN_DASH {
            self.line(x1, y1, x2, y2, width, color);
            return;
        }
        let mut path = PathStorage::new();
        path.move_to(x1, y1);
        path.line_to(x2, y2);
        let mut dashed = ConvDash::new(path);
        dashed.add_dash(dash, dash);
        self.stroke(dashed, width, LineCap::Butt, color);
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, color: Rgba8) {
        self.fill(Ellipse::new(cx, cy, r, r, 32, false), color);
    }

    /// Closed polygon from `(x, y)` pairs.
    pub fn polygon(&mut self, pts: &[(f64, f64)], color: Rgba8) {
        let mut path = PathStorage::new();
        for (i, &(x, y)) in pts.iter().enumerate() {
            if i == 0 {
                path.move_to(x, y);
            } else {
                path.line_to(x, y);
            }
        }
        path.close_polygon(PATH_FLAGS_NONE);
        self.fill(path, color);
    }

    /// Draw `s` so that capital letters are vertically centered on `y`.
    pub fn text(&mut self, s: &str, x: f64, y: f64, style: &TextStyle, align: Align) {
        if s.is_empty() {
            return;
        }
        let w = text_width(s, style.size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - w / 2.0,
            Align::Right => x - w,
        };
        let baseline = y - cap_middle(style.size);
        self.draw_glyphs(s, style, TransAffine::new_translation(left, baseline));
    }

    /// Draw `s` rotated a quarter turn counter-clockwise, centered on `(x, y)`.
    pub fn text_vertical(&mut self, s: &str, x: f64, y: f64, style: &TextStyle) {
        let w = text_width(s, style.size);
        let mut mtx = TransAffine::new_translation(-w / 2.0, -cap_middle(style.size));
        mtx.multiply(&TransAffine::new_rotation(-std::f64::consts::FRAC_PI_2));
        mtx.multiply(&TransAffine::new_translation(x, y));
        self.draw_glyphs(s, style, mtx);
    }

    fn draw_glyphs(&mut self, s: &str, style: &TextStyle, mtx: TransAffine) {
        let txt = glyphs(s, style.size);
        let mut stroke = ConvStroke::new(txt);
        stroke.set_width(style.weight);
        stroke.set_line_join(LineJoin::Round);
        stroke.set_line_cap(LineCap::Round);
        self.fill(ConvTransform::new(stroke, mtx), style.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8 { r: 255, g: 0, b: 0, a: 255 };

    #[test]
    fn test_surface_rejects_bad_sizes() {
        assert!(Surface::new(0, 10).is_err());
        assert!(Surface::new(10, MAX_PAGE_DIMENSION + 1).is_err());
        let s = Surface::new(4, 3).unwrap();
        assert_eq!(s.data().len(), 4 * 3 * 4);
        assert_eq!(s.pixel(3, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_fill_rect_covers_interior_only() {
        let mut s = Surface::new(40, 40).unwrap();
        s.paint(|p| p.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), 0.0, RED));
        assert_eq!(s.pixel(20, 20), [255, 0, 0, 255]);
        assert_eq!(s.pixel(2, 2), [255, 255, 255, 255]);
        assert_eq!(s.pixel(35, 35), [255, 255, 255, 255]);
    }

    #[test]
    fn test_clip_limits_drawing() {
        let mut s = Surface::new(40, 40).unwrap();
        s.paint(|p| {
            p.clip(Rect::new(0.0, 0.0, 20.0, 40.0));
            p.fill_rect(Rect::new(0.0, 0.0, 40.0, 40.0), 0.0, RED);
            p.reset_clip();
        });
        assert_eq!(s.pixel(5, 5), [255, 0, 0, 255]);
        assert_eq!(s.pixel(30, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_degenerate_dash_draws_solid_line() {
        for dash in [0.0, -3.0, f64::NAN, f64::INFINITY, 1e-9] {
            let mut s = Surface::new(40, 10).unwrap();
            s.paint(|p| p.dashed_line((0.0, 5.0), (40.0, 5.0), dash, 2.0, RED));
            let inked = (0..40).filter(|&x| s.pixel(x, 5) == [255, 0, 0, 255]).count();
            assert_eq!(inked, 40, "dash {}", dash);
        }
    }

    #[test]
    fn test_dashed_line_leaves_gaps() {
        let mut s = Surface::new(40, 10).unwrap();
        s.paint(|p| p.dashed_line((0.0, 5.0), (40.0, 5.0), 4.0, 2.0, RED));
        assert_eq!(s.pixel(1, 5), [255, 0, 0, 255]);
        assert_eq!(s.pixel(6, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_width_grows_with_length() {
        let short = text_width("Raw", 12.0);
        let long = text_width("Raw Data Departmental", 12.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert_eq!(text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_text_marks_pixels() {
        let mut s = Surface::new(120, 40).unwrap();
        let style = TextStyle::new(14.0, Rgba8 { r: 0, g: 0, b: 0, a: 255 });
        s.paint(|p| p.text("HELLO", 60.0, 20.0, &style, Align::Center));
        let inked = s.data().chunks(4).filter(|px| px[0] < 128).count();
        assert!(inked > 20);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(10.0, 14.9));
        assert!(!r.contains(15.0, 12.0));
        assert_eq!(r.inset(1.0), Rect::new(11.0, 11.0, 3.0, 3.0));
    }
}

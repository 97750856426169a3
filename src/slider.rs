//! Range slider mapping an integer position onto [`Intensity`].

use agg_rust::color::Rgba8;

use crate::canvas::{Align, Painter, Rect, TextStyle};
use crate::intensity::Intensity;

/// Horizontal range input, `0..=max` in whole steps.
///
/// Every input event produces an intensity synchronously; there is no
/// debouncing or deferred delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    value: u32,
    max: u32,
    step: u32,
    dragging: bool,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Slider {
    pub fn new(value: u32) -> Self {
        Self {
            value: value.min(100),
            max: 100,
            step: 1,
            dragging: false,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn intensity(&self) -> Intensity {
        Intensity::new(self.value as f64 / self.max as f64)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Apply a raw input value, snapping to the step and clamping to the
    /// range, and return the resulting intensity.
    pub fn input(&mut self, raw: f64) -> Intensity {
        let raw = if raw.is_finite() { raw } else { 0.0 };
        let steps = (raw / self.step as f64).round().max(0.0);
        self.value = ((steps as u32).saturating_mul(self.step)).min(self.max);
        self.intensity()
    }

    /// Value under horizontal pixel `px` for a track spanning `track`.
    pub fn value_at(&self, track: Rect, px: f64) -> f64 {
        if track.w <= 0.0 {
            return 0.0;
        }
        ((px - track.x) / track.w).clamp(0.0, 1.0) * self.max as f64
    }

    /// Pointer press. Starts a drag and emits when it lands on the hit area.
    pub fn pointer_down(&mut self, layout: &SliderLayout, px: f64, py: f64) -> Option<Intensity> {
        if !layout.hit.contains(px, py) {
            return None;
        }
        self.dragging = true;
        Some(self.input(self.value_at(layout.track, px)))
    }

    /// Pointer movement; emits only while a drag is in progress.
    pub fn pointer_move(&mut self, layout: &SliderLayout, px: f64) -> Option<Intensity> {
        if !self.dragging {
            return None;
        }
        Some(self.input(self.value_at(layout.track, px)))
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn render(&self, painter: &mut Painter<'_>, layout: &SliderLayout, accent: Rgba8) {
        let t = layout.track;
        let fraction = self.value as f64 / self.max as f64;
        painter.fill_rect(t, t.h / 2.0, Rgba8::new(229, 231, 235, 255));
        if self.value > 0 {
            painter.fill_rect(Rect::new(t.x, t.y, t.w * fraction, t.h), t.h / 2.0, accent);
        }
        let cx = t.x + t.w * fraction;
        let cy = t.center_y();
        painter.circle(cx, cy, t.h * 1.1 + 1.0, Rgba8::new(255, 255, 255, 255));
        painter.circle(cx, cy, t.h * 1.1, accent);

        let readout = TextStyle::new(14.0, Rgba8::new(17, 24, 39, 255));
        painter.text(
            &format!("{}%", self.value),
            layout.readout.right(),
            layout.readout.center_y(),
            &readout,
            Align::Right,
        );
    }
}

/// Screen geometry of a slider row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    /// The visible bar.
    pub track: Rect,
    /// Area that accepts presses: the track plus vertical slack for the thumb.
    pub hit: Rect,
    /// Right-aligned percentage label.
    pub readout: Rect,
}

impl SliderLayout {
    /// Lay out a slider in `row`, reserving `readout_w` pixels on the right.
    pub fn new(row: Rect, readout_w: f64) -> Self {
        let track_h = 8.0;
        let track_w = (row.w - readout_w - 16.0).max(0.0);
        let track = Rect::new(row.x, row.center_y() - track_h / 2.0, track_w, track_h);
        Self {
            track,
            hit: Rect::new(track.x - 8.0, row.y, track.w + 16.0, row.h),
            readout: Rect::new(row.right() - readout_w, row.y, readout_w, row.h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SliderLayout {
        SliderLayout::new(Rect::new(100.0, 0.0, 264.0, 20.0), 64.0)
    }

    #[test]
    fn test_input_divides_by_hundred() {
        let mut s = Slider::default();
        assert_eq!(s.input(50.0), Intensity::new(0.5));
        assert_eq!(s.value(), 50);
        assert_eq!(s.input(100.0), Intensity::FULL);
    }

    #[test]
    fn test_input_snaps_and_clamps() {
        let mut s = Slider::default();
        s.input(42.6);
        assert_eq!(s.value(), 43);
        s.input(-7.0);
        assert_eq!(s.value(), 0);
        s.input(1e9);
        assert_eq!(s.value(), 100);
        s.input(f64::NAN);
        assert_eq!(s.value(), 0);
    }

    #[test]
    fn test_every_event_emits() {
        let mut s = Slider::default();
        let emitted: Vec<u32> = [10.0, 20.0, 20.0, 30.0]
            .iter()
            .map(|&v| s.input(v).percent())
            .collect();
        assert_eq!(emitted, vec![10, 20, 20, 30]);
    }

    #[test]
    fn test_drag_maps_pixels_to_value() {
        let l = layout();
        // track spans x = 100..284
        assert_eq!(l.track.w, 184.0);
        let mut s = Slider::default();
        let i = s.pointer_down(&l, 100.0 + 92.0, 10.0).unwrap();
        assert_eq!(i.percent(), 50);
        assert!(s.is_dragging());
        assert_eq!(s.pointer_move(&l, 0.0).unwrap(), Intensity::ZERO);
        assert_eq!(s.pointer_move(&l, 1000.0).unwrap(), Intensity::FULL);
        s.pointer_up();
        assert_eq!(s.pointer_move(&l, 150.0), None);
        assert_eq!(s.value(), 100);
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut s = Slider::new(25);
        assert_eq!(s.pointer_down(&layout(), 10.0, 10.0), None);
        assert!(!s.is_dragging());
        assert_eq!(s.value(), 25);
    }
}

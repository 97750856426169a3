//! Tab selector with explicitly scoped triggers and content panels.
//!
//! A [`Tabs`] value owns the active selection and the registered trigger
//! list. Triggers and content panels borrow the `Tabs` they belong to, so one
//! can't exist outside its scope, and asking for a value that was never
//! registered fails when the handle is built rather than when it renders.

use std::fmt::Debug;

use agg_rust::color::Rgba8;

use crate::canvas::{Align, Painter, Rect, TextStyle};
use crate::error::{OrgFlowError, Result};

/// Active selection plus registered `(value, label)` triggers.
#[derive(Debug, Clone)]
pub struct Tabs<V> {
    items: Vec<(V, String)>,
    active: V,
}

impl<V: Copy + Eq + Debug> Tabs<V> {
    /// Build a tab set; `default` must be one of `items`.
    pub fn new<L: Into<String>>(
        default: V,
        items: impl IntoIterator<Item = (V, L)>,
    ) -> Result<Self> {
        let items: Vec<(V, String)> = items.into_iter().map(|(v, l)| (v, l.into())).collect();
        if !items.iter().any(|(v, _)| *v == default) {
            return Err(OrgFlowError::UnknownTab(format!("{:?}", default)));
        }
        Ok(Self {
            items,
            active: default,
        })
    }

    pub fn active(&self) -> V {
        self.active
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, value: V) -> Result<usize> {
        self.items
            .iter()
            .position(|(v, _)| *v == value)
            .ok_or_else(|| OrgFlowError::UnknownTab(format!("{:?}", value)))
    }

    /// Make `value` active. Returns `Ok(false)` when it already was, in which
    /// case nothing changes.
    pub fn select(&mut self, value: V) -> Result<bool> {
        self.index_of(value)?;
        if self.active == value {
            return Ok(false);
        }
        tracing::debug!(from = ?self.active, to = ?value, "tab selected");
        self.active = value;
        Ok(true)
    }

    pub fn trigger(&self, value: V) -> Result<TabTrigger<'_, V>> {
        let index = self.index_of(value)?;
        Ok(TabTrigger { tabs: self, index })
    }

    /// All triggers in registration order.
    pub fn triggers(&self) -> impl Iterator<Item = TabTrigger<'_, V>> + '_ {
        (0..self.items.len()).map(move |index| TabTrigger { tabs: self, index })
    }

    pub fn content(&self, value: V) -> Result<TabContent<'_, V>> {
        self.index_of(value)?;
        Ok(TabContent { tabs: self, value })
    }
}

/// A selectable button bound to its `Tabs`.
#[derive(Debug, Clone, Copy)]
pub struct TabTrigger<'t, V> {
    tabs: &'t Tabs<V>,
    index: usize,
}

impl<'t, V: Copy + Eq> TabTrigger<'t, V> {
    pub fn value(&self) -> V {
        self.tabs.items[self.index].0
    }

    pub fn label(&self) -> &'t str {
        &self.tabs.items[self.index].1
    }

    pub fn is_active(&self) -> bool {
        self.tabs.active == self.value()
    }
}

/// A panel that only mounts while its value is active.
#[derive(Debug, Clone, Copy)]
pub struct TabContent<'t, V> {
    tabs: &'t Tabs<V>,
    value: V,
}

impl<'t, V: Copy + Eq> TabContent<'t, V> {
    pub fn is_active(&self) -> bool {
        self.tabs.active == self.value
    }

    /// Run `build` only when active. Inactive panels produce nothing at all.
    pub fn mount<R>(self, build: impl FnOnce() -> R) -> Option<R> {
        if self.is_active() {
            Some(build())
        } else {
            None
        }
    }
}

// ============================================================================
// Trigger row
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TabsListStyle {
    pub gap: f64,
    pub radius: f64,
    pub text_size: f64,
    pub active_bg: Rgba8,
    pub active_text: Rgba8,
    pub idle_bg: Rgba8,
    pub hover_bg: Rgba8,
    pub idle_text: Rgba8,
}

impl Default for TabsListStyle {
    fn default() -> Self {
        Self {
            gap: 8.0,
            radius: 8.0,
            text_size: 13.0,
            active_bg: Rgba8::new(59, 130, 246, 255),
            active_text: Rgba8::new(255, 255, 255, 255),
            idle_bg: Rgba8::new(243, 244, 246, 255),
            hover_bg: Rgba8::new(229, 231, 235, 255),
            idle_text: Rgba8::new(17, 24, 39, 255),
        }
    }
}

/// Equal-width columns, one per trigger, across `row`.
pub fn trigger_rects(count: usize, row: Rect, gap: f64) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let w = (row.w - gap * (count - 1) as f64) / count as f64;
    (0..count)
        .map(|i| Rect::new(row.x + i as f64 * (w + gap), row.y, w, row.h))
        .collect()
}

impl<V: Copy + Eq + Debug> Tabs<V> {
    /// Trigger under the pointer, if any.
    pub fn trigger_at(&self, row: Rect, style: &TabsListStyle, px: f64, py: f64) -> Option<V> {
        trigger_rects(self.len(), row, style.gap)
            .iter()
            .zip(self.triggers())
            .find(|(r, _)| r.contains(px, py))
            .map(|(_, t)| t.value())
    }

    pub fn render_list(
        &self,
        painter: &mut Painter<'_>,
        row: Rect,
        style: &TabsListStyle,
        hovered: Option<V>,
    ) {
        for (r, trigger) in trigger_rects(self.len(), row, style.gap).into_iter().zip(self.triggers()) {
            let (bg, fg) = if trigger.is_active() {
                (style.active_bg, style.active_text)
            } else if hovered == Some(trigger.value()) {
                (style.hover_bg, style.idle_text)
            } else {
                (style.idle_bg, style.idle_text)
            };
            painter.fill_rect(r, style.radius, bg);
            let text = TextStyle::new(style.text_size, fg);
            painter.text(trigger.label(), r.center_x(), r.center_y(), &text, Align::Center);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum T {
        One,
        Two,
        Three,
    }

    fn tabs() -> Tabs<T> {
        Tabs::new(T::One, [(T::One, "One"), (T::Two, "Two")]).unwrap()
    }

    #[test]
    fn test_initial_and_select() {
        let mut t = tabs();
        assert_eq!(t.active(), T::One);
        assert!(t.select(T::Two).unwrap());
        assert_eq!(t.active(), T::Two);
    }

    #[test]
    fn test_reselect_is_noop() {
        let mut t = tabs();
        assert!(!t.select(T::One).unwrap());
        assert_eq!(t.active(), T::One);
    }

    #[test]
    fn test_unregistered_values_fail_at_construction() {
        let mut t = tabs();
        assert!(matches!(t.select(T::Three), Err(OrgFlowError::UnknownTab(_))));
        assert!(t.trigger(T::Three).is_err());
        assert!(t.content(T::Three).is_err());
        assert!(Tabs::new(T::Three, [(T::One, "One")]).is_err());
        assert_eq!(t.active(), T::One);
    }

    #[test]
    fn test_content_mounts_only_when_active() {
        let t = tabs();
        let mut built = Vec::new();
        let a = t.content(T::One).unwrap().mount(|| built.push(T::One));
        let b = t.content(T::Two).unwrap().mount(|| built.push(T::Two));
        assert!(a.is_some());
        assert!(b.is_none());
        assert_eq!(built, vec![T::One]);
    }

    #[test]
    fn test_exactly_one_trigger_active() {
        let mut t = tabs();
        t.select(T::Two).unwrap();
        let active: Vec<_> = t.triggers().filter(|tr| tr.is_active()).map(|tr| tr.value()).collect();
        assert_eq!(active, vec![T::Two]);
        assert_eq!(t.trigger(T::One).unwrap().label(), "One");
    }

    #[test]
    fn test_trigger_hit_testing() {
        let t = tabs();
        let style = TabsListStyle::default();
        let row = Rect::new(0.0, 0.0, 208.0, 40.0);
        // two columns of 100px with an 8px gap
        assert_eq!(t.trigger_at(row, &style, 50.0, 20.0), Some(T::One));
        assert_eq!(t.trigger_at(row, &style, 104.0, 20.0), None);
        assert_eq!(t.trigger_at(row, &style, 150.0, 20.0), Some(T::Two));
        assert_eq!(t.trigger_at(row, &style, 150.0, 45.0), None);
    }
}

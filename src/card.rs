//! Card container: bordered panel with a titled header and a content area.

use agg_rust::color::Rgba8;

use crate::canvas::{Align, Painter, Rect, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub subtitle: Option<String>,
    pub padding: f64,
    pub radius: f64,
}

const HEADER_TITLE_SIZE: f64 = 20.0;
const HEADER_SUBTITLE_SIZE: f64 = 13.0;

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            padding: 24.0,
            radius: 8.0,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn header_height(&self) -> f64 {
        let mut h = self.padding * 2.0 + HEADER_TITLE_SIZE;
        if self.subtitle.is_some() {
            h += 8.0 + HEADER_SUBTITLE_SIZE;
        }
        h
    }

    /// Region available to children once the header is drawn.
    pub fn content_rect(&self, bounds: Rect) -> Rect {
        let top = bounds.y + self.header_height() + self.padding;
        Rect::new(
            bounds.x + self.padding,
            top,
            (bounds.w - 2.0 * self.padding).max(0.0),
            (bounds.bottom() - top - self.padding).max(0.0),
        )
    }

    /// Draw the container and header; returns the content region.
    pub fn render(&self, painter: &mut Painter<'_>, bounds: Rect) -> Rect {
        // soft drop shadow
        painter.fill_rect(
            Rect::new(bounds.x, bounds.y + 1.0, bounds.w, bounds.h),
            self.radius,
            Rgba8::new(0, 0, 0, 18),
        );
        painter.fill_rect(bounds, self.radius, Rgba8::new(255, 255, 255, 255));
        painter.stroke_rect(bounds, self.radius, 1.0, Rgba8::new(229, 231, 235, 255));

        let x = bounds.x + self.padding;
        let title_y = bounds.y + self.padding + HEADER_TITLE_SIZE / 2.0;
        let title = TextStyle::new(HEADER_TITLE_SIZE, Rgba8::new(17, 24, 39, 255)).bold();
        painter.text(&self.title, x, title_y, &title, Align::Left);

        if let Some(sub) = &self.subtitle {
            let style = TextStyle::new(HEADER_SUBTITLE_SIZE, Rgba8::new(75, 85, 99, 255));
            let y = title_y + HEADER_TITLE_SIZE / 2.0 + 8.0 + HEADER_SUBTITLE_SIZE / 2.0;
            painter.text(sub, x, y, &style, Align::Left);
        }

        let rule_y = bounds.y + self.header_height();
        painter.line(bounds.x, rule_y, bounds.right(), rule_y, 1.0, Rgba8::new(229, 231, 235, 255));

        self.content_rect(bounds)
    }
}

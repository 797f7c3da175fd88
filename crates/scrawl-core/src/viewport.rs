//! Viewport state: scroll offset and zoom, with screen↔document mapping.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Screen-to-document mapping: `document = screen / zoom - scroll`.
/// Scroll is measured in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp persisted values back into range. The coordinate mapping
    /// assumes a positive, finite zoom and finite scroll.
    pub fn sanitize(&mut self) {
        if !self.scroll_x.is_finite() {
            self.scroll_x = 0.0;
        }
        if !self.scroll_y.is_finite() {
            self.scroll_y = 0.0;
        }
        self.zoom = if self.zoom.is_finite() {
            self.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    pub fn screen_to_document(&self, screen: Point) -> Point {
        Point::new(
            screen.x / self.zoom - self.scroll_x,
            screen.y / self.zoom - self.scroll_y,
        )
    }

    pub fn document_to_screen(&self, document: Point) -> Point {
        Point::new(
            (document.x + self.scroll_x) * self.zoom,
            (document.y + self.scroll_y) * self.zoom,
        )
    }

    /// Pan by a raw screen-space delta.
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.scroll_x += screen_delta.x / self.zoom;
        self.scroll_y += screen_delta.y / self.zoom;
    }

    /// Set the zoom, keeping the document point under `screen_anchor`
    /// stationary on screen.
    pub fn set_zoom(&mut self, zoom: f64, screen_anchor: Point) {
        let anchor_doc = self.screen_to_document(screen_anchor);
        let new_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.scroll_x = screen_anchor.x / new_zoom - anchor_doc.x;
        self.scroll_y = screen_anchor.y / new_zoom - anchor_doc.y;
        self.zoom = new_zoom;
    }

    /// Multiply the zoom by a factor about a screen anchor.
    pub fn zoom_by(&mut self, factor: f64, screen_anchor: Point) {
        self.set_zoom(self.zoom * factor, screen_anchor);
    }

    /// Fit document bounds into a viewport of the given screen size,
    /// centered, with a small margin.
    pub fn zoom_to_fit(&mut self, bounds: Rect, viewport_size: Size) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let fit = (viewport_size.width / bounds.width())
            .min(viewport_size.height / bounds.height())
            * 0.9;
        self.zoom = fit.clamp(MIN_ZOOM, MAX_ZOOM);
        let center = bounds.center();
        self.scroll_x = viewport_size.width / (2.0 * self.zoom) - center.x;
        self.scroll_y = viewport_size.height / (2.0 * self.zoom) - center.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_document_roundtrip() {
        let mut vp = Viewport::new();
        vp.scroll_x = 30.0;
        vp.scroll_y = -10.0;
        vp.zoom = 2.0;
        let doc = Point::new(123.0, -45.0);
        let back = vp.screen_to_document(vp.document_to_screen(doc));
        assert!((back.x - doc.x).abs() < 1e-9);
        assert!((back.y - doc.y).abs() < 1e-9);
    }

    #[test]
    fn pan_divides_by_zoom() {
        let mut vp = Viewport::new();
        vp.zoom = 2.0;
        vp.pan_by(Vec2::new(100.0, 50.0));
        assert!((vp.scroll_x - 50.0).abs() < 1e-9);
        assert!((vp.scroll_y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut vp = Viewport::new();
        vp.scroll_x = 12.0;
        vp.scroll_y = 34.0;
        let anchor = Point::new(400.0, 300.0);
        let before = vp.screen_to_document(anchor);
        vp.zoom_by(1.7, anchor);
        let after = vp.screen_to_document(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn zoom_clamps_to_range() {
        let mut vp = Viewport::new();
        vp.set_zoom(100.0, Point::ZERO);
        assert!((vp.zoom - MAX_ZOOM).abs() < 1e-9);
        vp.set_zoom(0.0001, Point::ZERO);
        assert!((vp.zoom - MIN_ZOOM).abs() < 1e-9);
    }

    #[test]
    fn sanitize_restores_usable_state() {
        let mut vp = Viewport {
            scroll_x: f64::NAN,
            scroll_y: f64::INFINITY,
            zoom: 0.0,
        };
        vp.sanitize();
        assert!((vp.scroll_x).abs() < f64::EPSILON);
        assert!((vp.scroll_y).abs() < f64::EPSILON);
        assert!((vp.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        let mapped = vp.screen_to_document(Point::new(100.0, 100.0));
        assert!(mapped.x.is_finite() && mapped.y.is_finite());

        vp.zoom = f64::NAN;
        vp.sanitize();
        assert!((vp.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fit_centers_content() {
        let mut vp = Viewport::new();
        let bounds = Rect::new(100.0, 100.0, 300.0, 200.0);
        vp.zoom_to_fit(bounds, Size::new(800.0, 600.0));
        let center_screen = vp.document_to_screen(bounds.center());
        assert!((center_screen.x - 400.0).abs() < 1e-6);
        assert!((center_screen.y - 300.0).abs() < 1e-6);
    }
}

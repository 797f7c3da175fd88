//! Resize-handle model and resize math.

use crate::shapes::{Shape, MIN_FONT_SIZE};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hotspot size in screen pixels. The document-space hit threshold
/// is this divided by the current zoom, so handles feel the same size at
/// every zoom level.
pub const HANDLE_SIZE: f64 = 12.0;

/// Smallest allowed shape extent in document units.
pub const MIN_SHAPE_SIZE: f64 = 2.0;

/// Identity of a resize/endpoint handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Nw,
    N,
    Ne,
    W,
    E,
    Sw,
    S,
    Se,
    /// First point of a line/arrow.
    Start,
    /// Last point of a line/arrow.
    End,
}

impl HandleKind {
    /// Handles that lock aspect ratio when the modifier is held.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            HandleKind::Nw | HandleKind::Ne | HandleKind::Sw | HandleKind::Se
        )
    }

    pub fn is_endpoint(&self) -> bool {
        matches!(self, HandleKind::Start | HandleKind::End)
    }
}

/// A handle with its document-space position, for hit-testing and for
/// hosts that draw the selection chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Hit-test against a document-space point. `threshold` is already
    /// zoom-adjusted.
    pub fn hit_test(&self, point: Point, threshold: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= threshold * threshold
    }
}

/// Document-space handle hit threshold for the given zoom.
pub fn handle_hit_threshold(zoom: f64) -> f64 {
    HANDLE_SIZE / zoom
}

/// The handles a shape exposes: eight box handles, or explicit
/// start/end handles for lines and arrows.
pub fn handles_for(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Line(line) => vec![
            Handle::new(line.start(), HandleKind::Start),
            Handle::new(line.end(), HandleKind::End),
        ],
        Shape::Arrow(arrow) => vec![
            Handle::new(arrow.start(), HandleKind::Start),
            Handle::new(arrow.end(), HandleKind::End),
        ],
        Shape::Rectangle(_)
        | Shape::Ellipse(_)
        | Shape::Freedraw(_)
        | Shape::Text(_)
        | Shape::Eraser(_) => box_handles(shape.bounds()),
    }
}

fn box_handles(bounds: Rect) -> Vec<Handle> {
    let cx = bounds.center().x;
    let cy = bounds.center().y;
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Nw),
        Handle::new(Point::new(cx, bounds.y0), HandleKind::N),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Ne),
        Handle::new(Point::new(bounds.x0, cy), HandleKind::W),
        Handle::new(Point::new(bounds.x1, cy), HandleKind::E),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Sw),
        Handle::new(Point::new(cx, bounds.y1), HandleKind::S),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Se),
    ]
}

/// The handle under a point, if any. Corners are listed before the edge
/// midpoints they neighbor, so at small sizes a corner wins.
pub fn handle_at(shape: &Shape, point: Point, zoom: f64) -> Option<HandleKind> {
    let threshold = handle_hit_threshold(zoom);
    handles_for(shape)
        .into_iter()
        .find(|h| h.hit_test(point, threshold))
        .map(|h| h.kind)
}

/// Resize a shape from its mode-start state. `original` is the shape as
/// it was when the gesture began; recomputing from it avoids incremental
/// drift. Returns the resized shape.
pub fn resize_shape(
    original: &Shape,
    handle: HandleKind,
    delta: Vec2,
    keep_aspect_ratio: bool,
) -> Shape {
    let mut shape = original.clone();

    if handle.is_endpoint() {
        match &mut shape {
            Shape::Line(line) => {
                if handle == HandleKind::Start {
                    let p = line.start();
                    line.set_start(Point::new(p.x + delta.x, p.y + delta.y));
                } else {
                    let p = line.end();
                    line.set_end(Point::new(p.x + delta.x, p.y + delta.y));
                }
            }
            Shape::Arrow(arrow) => {
                if handle == HandleKind::Start {
                    let p = arrow.start();
                    arrow.set_start(Point::new(p.x + delta.x, p.y + delta.y));
                } else {
                    let p = arrow.end();
                    arrow.set_end(Point::new(p.x + delta.x, p.y + delta.y));
                }
            }
            _ => {}
        }
        return shape;
    }

    let bounds = original.bounds();
    let new_bounds = resize_bounds(bounds, handle, delta, keep_aspect_ratio);
    apply_bounds(&mut shape, bounds, new_bounds);
    shape
}

/// Compute resized bounds: the side(s) opposite the handle stay fixed,
/// the dragged side(s) follow the delta, clamped to the minimum size.
/// With aspect lock on a corner handle, the dimension that changed less
/// is recomputed from the one that changed more.
pub fn resize_bounds(bounds: Rect, handle: HandleKind, delta: Vec2, keep_aspect_ratio: bool) -> Rect {
    let old_w = bounds.width();
    let old_h = bounds.height();

    // Raw extents measured from the anchored side.
    let mut new_w = match handle {
        HandleKind::Nw | HandleKind::W | HandleKind::Sw => old_w - delta.x,
        HandleKind::Ne | HandleKind::E | HandleKind::Se => old_w + delta.x,
        _ => old_w,
    };
    let mut new_h = match handle {
        HandleKind::Nw | HandleKind::N | HandleKind::Ne => old_h - delta.y,
        HandleKind::Sw | HandleKind::S | HandleKind::Se => old_h + delta.y,
        _ => old_h,
    };

    if keep_aspect_ratio && handle.is_corner() && old_w > f64::EPSILON && old_h > f64::EPSILON {
        let aspect = old_w / old_h;
        let rel_dw = (new_w - old_w).abs() / old_w;
        let rel_dh = (new_h - old_h).abs() / old_h;
        if rel_dw >= rel_dh {
            new_h = new_w / aspect;
        } else {
            new_w = new_h * aspect;
        }
    }

    new_w = new_w.max(MIN_SHAPE_SIZE);
    new_h = new_h.max(MIN_SHAPE_SIZE);

    // Grow away from the anchored side.
    let x0 = match handle {
        HandleKind::Nw | HandleKind::W | HandleKind::Sw => bounds.x1 - new_w,
        _ => bounds.x0,
    };
    let y0 = match handle {
        HandleKind::Nw | HandleKind::N | HandleKind::Ne => bounds.y1 - new_h,
        _ => bounds.y0,
    };
    Rect::new(x0, y0, x0 + new_w, y0 + new_h)
}

/// Fit a shape into new bounds computed by `resize_bounds`.
fn apply_bounds(shape: &mut Shape, old_bounds: Rect, new_bounds: Rect) {
    let origin = Point::new(new_bounds.x0, new_bounds.y0);
    match shape {
        Shape::Rectangle(rect) => {
            rect.position = origin;
            rect.width = new_bounds.width();
            rect.height = new_bounds.height();
        }
        Shape::Ellipse(ellipse) => {
            ellipse.position = origin;
            ellipse.width = new_bounds.width();
            ellipse.height = new_bounds.height();
        }
        Shape::Freedraw(stroke) => {
            let sx = scale_factor(old_bounds.width(), new_bounds.width());
            let sy = scale_factor(old_bounds.height(), new_bounds.height());
            stroke.rescale(sx, sy);
            stroke.position = origin;
            stroke.normalize();
        }
        Shape::Eraser(_) => {}
        Shape::Text(text) => {
            let sx = scale_factor(old_bounds.width(), new_bounds.width());
            let sy = scale_factor(old_bounds.height(), new_bounds.height());
            text.font_size = (text.font_size * sx.min(sy)).max(MIN_FONT_SIZE);
            text.position = origin;
            if text.auto_resize {
                text.refresh_size();
            } else {
                text.width = new_bounds.width();
                text.height = new_bounds.height();
            }
        }
        // Lines and arrows resize through their endpoint handles.
        Shape::Line(_) | Shape::Arrow(_) => {}
    }
}

fn scale_factor(old: f64, new: f64) -> f64 {
    if old > f64::EPSILON { new / old } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Freedraw, Line, Rectangle, Text};

    fn rect_shape(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h))
    }

    #[test]
    fn box_shapes_expose_eight_handles() {
        let shape = rect_shape(0.0, 0.0, 100.0, 50.0);
        let handles = handles_for(&shape);
        assert_eq!(handles.len(), 8);
        assert!(handles.iter().any(|h| h.kind == HandleKind::Se
            && (h.position.x - 100.0).abs() < f64::EPSILON
            && (h.position.y - 50.0).abs() < f64::EPSILON));
        assert!(handles.iter().any(|h| h.kind == HandleKind::N
            && (h.position.x - 50.0).abs() < f64::EPSILON
            && h.position.y.abs() < f64::EPSILON));
    }

    #[test]
    fn lines_expose_start_and_end() {
        let line = Shape::Line(Line::from_points(&[
            Point::new(10.0, 10.0),
            Point::new(60.0, 40.0),
        ]));
        let handles = handles_for(&line);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].kind, HandleKind::Start);
        assert_eq!(handles[1].kind, HandleKind::End);
    }

    #[test]
    fn handle_threshold_is_screen_constant() {
        let shape = rect_shape(0.0, 0.0, 100.0, 100.0);
        // At zoom 1 an 8px offset is inside the 12px hotspot.
        assert_eq!(
            handle_at(&shape, Point::new(108.0, 50.0), 1.0),
            Some(HandleKind::E)
        );
        // Zoomed in, the same document-space offset is out of reach.
        assert_eq!(handle_at(&shape, Point::new(108.0, 50.0), 4.0), None);
        // Zoomed out, a larger document-space offset still hits.
        assert_eq!(
            handle_at(&shape, Point::new(120.0, 100.0), 0.5),
            Some(HandleKind::Se)
        );
    }

    #[test]
    fn aspect_lock_recomputes_lesser_dimension() {
        let shape = rect_shape(0.0, 0.0, 100.0, 50.0);
        let resized = resize_shape(&shape, HandleKind::Se, Vec2::new(40.0, 5.0), true);
        let b = resized.bounds();
        assert!((b.width() / b.height() - 2.0).abs() < 1e-9);
        assert!((b.width() - 140.0).abs() < 1e-9);
        assert!((b.height() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn aspect_lock_follows_dominant_height() {
        let shape = rect_shape(0.0, 0.0, 100.0, 50.0);
        // Height changes relatively more, so width is recomputed.
        let resized = resize_shape(&shape, HandleKind::Se, Vec2::new(5.0, 25.0), true);
        let b = resized.bounds();
        assert!((b.height() - 75.0).abs() < 1e-9);
        assert!((b.width() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn nw_resize_keeps_opposite_corner() {
        let shape = rect_shape(10.0, 10.0, 100.0, 50.0);
        let resized = resize_shape(&shape, HandleKind::Nw, Vec2::new(20.0, 10.0), false);
        let b = resized.bounds();
        // The se corner stays anchored.
        assert!((b.x1 - 110.0).abs() < 1e-9);
        assert!((b.y1 - 60.0).abs() < 1e-9);
        assert!((b.width() - 80.0).abs() < 1e-9);
        assert!((b.height() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn edge_resize_touches_one_axis() {
        let shape = rect_shape(0.0, 0.0, 100.0, 50.0);
        let resized = resize_shape(&shape, HandleKind::E, Vec2::new(30.0, 99.0), false);
        let b = resized.bounds();
        assert!((b.width() - 130.0).abs() < 1e-9);
        assert!((b.height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let shape = rect_shape(0.0, 0.0, 100.0, 50.0);
        let resized = resize_shape(&shape, HandleKind::Se, Vec2::new(-200.0, -200.0), false);
        let b = resized.bounds();
        assert!((b.width() - MIN_SHAPE_SIZE).abs() < 1e-9);
        assert!((b.height() - MIN_SHAPE_SIZE).abs() < 1e-9);
        // Anchored corner unmoved.
        assert!(b.x0.abs() < 1e-9);
        assert!(b.y0.abs() < 1e-9);
    }

    #[test]
    fn freedraw_points_rescale_about_origin() {
        let stroke = Freedraw::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 20.0),
        ]);
        let shape = Shape::Freedraw(stroke);
        let resized = resize_shape(&shape, HandleKind::Se, Vec2::new(40.0, 20.0), false);
        let b = resized.bounds();
        assert!((b.width() - 80.0).abs() < 1e-9);
        assert!((b.height() - 40.0).abs() < 1e-9);
        if let Shape::Freedraw(s) = resized {
            // Mid point scaled with the box.
            assert!((s.points[1].x - 80.0).abs() < 1e-9);
            assert!((s.points[2].y - 40.0).abs() < 1e-9);
        } else {
            panic!("expected freedraw");
        }
    }

    #[test]
    fn endpoint_handle_moves_one_end() {
        let line = Shape::Line(Line::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        ]));
        let resized = resize_shape(&line, HandleKind::End, Vec2::new(10.0, 30.0), false);
        if let Shape::Line(l) = resized {
            assert!((l.start().x).abs() < 1e-9);
            assert!((l.end().x - 60.0).abs() < 1e-9);
            assert!((l.end().y - 30.0).abs() < 1e-9);
        } else {
            panic!("expected line");
        }
    }

    #[test]
    fn text_resize_scales_font_with_floor() {
        let mut text = Text::with_content(Point::new(0.0, 0.0), "scale me");
        text.font_size = 20.0;
        let shape = Shape::Text(text);
        let bounds = shape.bounds();
        // Double the width, keep height: font scales by the smaller factor.
        let resized = resize_shape(
            &shape,
            HandleKind::Se,
            Vec2::new(bounds.width(), 0.0),
            false,
        );
        if let Shape::Text(t) = &resized {
            assert!((t.font_size - 20.0).abs() < 1e-9);
        }
        // Shrinking far below legibility floors the font size.
        let shrunk = resize_shape(
            &shape,
            HandleKind::Se,
            Vec2::new(-bounds.width() * 0.99, -bounds.height() * 0.99),
            false,
        );
        if let Shape::Text(t) = &shrunk {
            assert!((t.font_size - MIN_FONT_SIZE).abs() < 1e-9);
        } else {
            panic!("expected text");
        }
    }
}

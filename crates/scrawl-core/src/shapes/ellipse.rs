//! Ellipse shape.

use super::rectangle::UNFILLED_INTERIOR_INSET;
use super::{generate_id, generate_seed, now_millis, rotate_about, ShapeId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse inscribed in its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians around the center.
    #[serde(default)]
    pub angle: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default = "generate_seed")]
    pub seed: u32,
    #[serde(default = "now_millis")]
    pub created_at: i64,
    #[serde(default = "now_millis")]
    pub updated_at: i64,
}

impl Ellipse {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(),
            position,
            width,
            height,
            angle: 0.0,
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build from two opposite bounding-box corners in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();
        Self::new(Point::new(min_x, min_y), width, height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn hit_test(&self, point: Point) -> bool {
        let center = self.center();
        let point = if self.angle != 0.0 {
            rotate_about(point, center, -self.angle)
        } else {
            point
        };

        let half_stroke = self.style.stroke_width / 2.0;
        let outer_rx = self.width / 2.0 + half_stroke;
        let outer_ry = self.height / 2.0 + half_stroke;
        if !inside_ellipse(point, center, outer_rx, outer_ry) {
            return false;
        }
        if self.style.has_fill() {
            return true;
        }
        let inset = self.style.stroke_width.max(UNFILLED_INTERIOR_INSET);
        let inner_rx = self.width / 2.0 - inset;
        let inner_ry = self.height / 2.0 - inset;
        if inner_rx <= 0.0 || inner_ry <= 0.0 {
            return true;
        }
        !inside_ellipse(point, center, inner_rx, inner_ry)
    }
}

fn inside_ellipse(point: Point, center: Point, rx: f64, ry: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (point.x - center.x) / rx;
    let ny = (point.y - center.y) / ry;
    nx * nx + ny * ny <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{FillStyle, SerializableColor};

    #[test]
    fn bounds_match_box() {
        let e = Ellipse::new(Point::new(10.0, 10.0), 80.0, 40.0);
        let b = e.bounds();
        assert!((b.width() - 80.0).abs() < f64::EPSILON);
        assert!((b.height() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unfilled_ring_hit() {
        let mut e = Ellipse::new(Point::new(0.0, 0.0), 100.0, 100.0);
        e.style.stroke_width = 2.0;
        // Center misses, rim hits.
        assert!(!e.hit_test(Point::new(50.0, 50.0)));
        assert!(e.hit_test(Point::new(99.0, 50.0)));
        // Bounding-box corner lies outside the ellipse.
        assert!(!e.hit_test(Point::new(2.0, 2.0)));
    }

    #[test]
    fn filled_center_hit() {
        let mut e = Ellipse::new(Point::new(0.0, 0.0), 100.0, 100.0);
        e.style.fill_color = Some(SerializableColor::white());
        e.style.fill_style = FillStyle::Solid;
        assert!(e.hit_test(Point::new(50.0, 50.0)));
    }

    #[test]
    fn small_unfilled_ellipse_has_no_dead_zone() {
        let e = Ellipse::new(Point::new(0.0, 0.0), 12.0, 12.0);
        assert!(e.hit_test(Point::new(6.0, 6.0)));
    }
}

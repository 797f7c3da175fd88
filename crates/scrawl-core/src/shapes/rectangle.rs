//! Rectangle shape.

use super::{generate_id, generate_seed, now_millis, rotate_about, ShapeId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Interior inset that keeps unfilled shapes hittable only near their
/// border.
pub(crate) const UNFILLED_INTERIOR_INSET: f64 = 8.0;

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub id: ShapeId,
    /// Top-left corner in document space.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians around the center.
    #[serde(default)]
    pub angle: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_locked: bool,
    /// Render seed for the sketch renderer.
    #[serde(default = "generate_seed")]
    pub seed: u32,
    #[serde(default = "now_millis")]
    pub created_at: i64,
    #[serde(default = "now_millis")]
    pub updated_at: i64,
}

impl Rectangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(),
            position,
            width,
            height,
            angle: 0.0,
            corner_radius: 0.0,
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build from two opposite corners in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();
        Self::new(Point::new(min_x, min_y), width, height)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn bounds(&self) -> Rect {
        self.as_rect()
    }

    pub fn hit_test(&self, point: Point) -> bool {
        let rect = self.as_rect();
        // Rotated shapes test against the unrotated box.
        let point = if self.angle != 0.0 {
            rotate_about(point, rect.center(), -self.angle)
        } else {
            point
        };

        let half_stroke = self.style.stroke_width / 2.0;
        let outer = rect.inflate(half_stroke, half_stroke);
        if !outer.contains(point) {
            return false;
        }
        if self.style.has_fill() {
            return true;
        }
        // Outline only: exclude the interior beyond the stroke band.
        let inset = self.style.stroke_width.max(UNFILLED_INTERIOR_INSET);
        if self.width <= 2.0 * inset || self.height <= 2.0 * inset {
            return true;
        }
        let inner = rect.inflate(-inset, -inset);
        !inner.contains(point)
    }
}

//! Line shape: a polyline with optional arrowheads.

use super::{
    generate_id, generate_seed, linear_hit_threshold, now_millis, point_to_polyline_dist,
    points_bounds, ShapeId, ShapeStyle,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Arrowhead kinds for line/arrow endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    #[default]
    None,
    Arrow,
    Triangle,
    Circle,
    Diamond,
}

/// A straight or multi-segment line. Points are local offsets from
/// `position`; the first and last points are the visible endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: ShapeId,
    /// Anchor; all points are relative to it.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    pub points: Vec<Point>,
    #[serde(default)]
    pub start_arrowhead: Arrowhead,
    #[serde(default)]
    pub end_arrowhead: Arrowhead,
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

impl Line {
    /// Start a two-point line at a document-space point; both endpoints
    /// begin coincident.
    pub fn new(start: Point) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(),
            position: start,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            points: vec![Point::ZERO, Point::ZERO],
            start_arrowhead: Arrowhead::None,
            end_arrowhead: Arrowhead::None,
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build from document-space points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut line = Self::new(points.first().copied().unwrap_or(Point::ZERO));
        line.points = points
            .iter()
            .map(|p| Point::new(p.x - line.position.x, p.y - line.position.y))
            .collect();
        if line.points.len() < 2 {
            line.points = vec![Point::ZERO, Point::ZERO];
        }
        line.normalize();
        line
    }

    /// Points in document space.
    pub fn absolute_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| Point::new(self.position.x + p.x, self.position.y + p.y))
            .collect()
    }

    /// First visible endpoint in document space.
    pub fn start(&self) -> Point {
        let p = self.points.first().copied().unwrap_or(Point::ZERO);
        Point::new(self.position.x + p.x, self.position.y + p.y)
    }

    /// Last visible endpoint in document space.
    pub fn end(&self) -> Point {
        let p = self.points.last().copied().unwrap_or(Point::ZERO);
        Point::new(self.position.x + p.x, self.position.y + p.y)
    }

    /// Move the first endpoint to a document-space point.
    pub fn set_start(&mut self, point: Point) {
        if let Some(first) = self.points.first_mut() {
            *first = Point::new(point.x - self.position.x, point.y - self.position.y);
        }
        self.normalize();
    }

    /// Move the last endpoint to a document-space point.
    pub fn set_end(&mut self, point: Point) {
        if let Some(last) = self.points.last_mut() {
            *last = Point::new(point.x - self.position.x, point.y - self.position.y);
        }
        self.normalize();
    }

    /// Scale local points about the shape origin.
    pub fn rescale(&mut self, sx: f64, sy: f64) {
        for p in &mut self.points {
            p.x *= sx;
            p.y *= sy;
        }
        self.normalize();
    }

    /// Shift the anchor so local points start at (0,0) and refresh the
    /// tight width/height.
    pub fn normalize(&mut self) {
        let local = points_bounds(&self.points);
        if local.x0 != 0.0 || local.y0 != 0.0 {
            self.position = Point::new(self.position.x + local.x0, self.position.y + local.y0);
            let shift = Vec2::new(local.x0, local.y0);
            for p in &mut self.points {
                *p -= shift;
            }
        }
        self.width = local.width();
        self.height = local.height();
    }

    pub fn bounds(&self) -> Rect {
        let local = points_bounds(&self.points);
        Rect::new(
            self.position.x + local.x0,
            self.position.y + local.y0,
            self.position.x + local.x1,
            self.position.y + local.y1,
        )
    }

    pub fn hit_test(&self, point: Point) -> bool {
        let pts = self.absolute_points();
        if pts.len() < 2 {
            return false;
        }
        point_to_polyline_dist(point, &pts) <= linear_hit_threshold(self.style.stroke_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_endpoints_and_tightens_box() {
        let mut line = Line::new(Point::new(10.0, 10.0));
        line.set_end(Point::new(-20.0, 40.0));
        // Anchor moved to the min corner.
        assert!((line.position.x - -20.0).abs() < f64::EPSILON);
        assert!((line.position.y - 10.0).abs() < f64::EPSILON);
        assert!((line.width - 30.0).abs() < f64::EPSILON);
        assert!((line.height - 30.0).abs() < f64::EPSILON);
        // Endpoints survive in document space.
        assert!((line.start().x - 10.0).abs() < f64::EPSILON);
        assert!((line.start().y - 10.0).abs() < f64::EPSILON);
        assert!((line.end().x - -20.0).abs() < f64::EPSILON);
        assert!((line.end().y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hit_near_segment_only() {
        let line = Line::from_points(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert!(line.hit_test(Point::new(50.0, 8.0)));
        assert!(!line.hit_test(Point::new(50.0, 14.0)));
        // Threshold grows with stroke width.
        let mut thick = line.clone();
        thick.style.stroke_width = 16.0;
        assert!(thick.hit_test(Point::new(50.0, 14.0)));
    }

    #[test]
    fn rescale_scales_about_origin() {
        let mut line = Line::from_points(&[Point::new(0.0, 0.0), Point::new(10.0, 20.0)]);
        line.rescale(2.0, 0.5);
        assert!((line.width - 20.0).abs() < f64::EPSILON);
        assert!((line.height - 10.0).abs() < f64::EPSILON);
    }
}

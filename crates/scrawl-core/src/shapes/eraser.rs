//! Eraser stroke. Exists only while the gesture is in progress; the
//! engine never commits it to the document.

use super::{
    generate_id, generate_seed, linear_hit_threshold, now_millis, point_to_polyline_dist,
    points_bounds, ShapeId, ShapeStyle,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eraser {
    pub id: ShapeId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    pub points: Vec<Point>,
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

impl Eraser {
    pub fn new(start: Point) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(),
            position: start,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            points: vec![Point::ZERO],
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points
            .push(Point::new(point.x - self.position.x, point.y - self.position.y));
        self.normalize();
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points
            .last()
            .map(|p| Point::new(self.position.x + p.x, self.position.y + p.y))
    }

    pub fn absolute_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| Point::new(self.position.x + p.x, self.position.y + p.y))
            .collect()
    }

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
        match pts.len() {
            0 => false,
            1 => (point - pts[0]).hypot() <= linear_hit_threshold(self.style.stroke_width),
            _ => point_to_polyline_dist(point, &pts) <= linear_hit_threshold(self.style.stroke_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_accumulates_points() {
        let mut eraser = Eraser::new(Point::new(5.0, 5.0));
        eraser.add_point(Point::new(15.0, 5.0));
        eraser.add_point(Point::new(15.0, 25.0));
        assert_eq!(eraser.points.len(), 3);
        let b = eraser.bounds();
        assert!((b.width() - 10.0).abs() < f64::EPSILON);
        assert!((b.height() - 20.0).abs() < f64::EPSILON);
    }
}

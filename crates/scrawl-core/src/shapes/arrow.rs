//! Arrow shape: a line that defaults to an arrowhead at its end.

use super::{
    generate_id, generate_seed, linear_hit_threshold, now_millis, point_to_polyline_dist,
    points_bounds, Arrowhead, ShapeId, ShapeStyle,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Structurally a `Line`; kept as its own variant so tools and defaults
/// can treat arrows distinctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub id: ShapeId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    pub points: Vec<Point>,
    #[serde(default)]
    pub start_arrowhead: Arrowhead,
    #[serde(default = "default_end_arrowhead")]
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

fn default_end_arrowhead() -> Arrowhead {
    Arrowhead::Arrow
}

impl Arrow {
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
            end_arrowhead: Arrowhead::Arrow,
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_points(points: &[Point]) -> Self {
        let mut arrow = Self::new(points.first().copied().unwrap_or(Point::ZERO));
        arrow.points = points
            .iter()
            .map(|p| Point::new(p.x - arrow.position.x, p.y - arrow.position.y))
            .collect();
        if arrow.points.len() < 2 {
            arrow.points = vec![Point::ZERO, Point::ZERO];
        }
        arrow.normalize();
        arrow
    }

    pub fn absolute_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| Point::new(self.position.x + p.x, self.position.y + p.y))
            .collect()
    }

    pub fn start(&self) -> Point {
        let p = self.points.first().copied().unwrap_or(Point::ZERO);
        Point::new(self.position.x + p.x, self.position.y + p.y)
    }

    pub fn end(&self) -> Point {
        let p = self.points.last().copied().unwrap_or(Point::ZERO);
        Point::new(self.position.x + p.x, self.position.y + p.y)
    }

    pub fn set_start(&mut self, point: Point) {
        if let Some(first) = self.points.first_mut() {
            *first = Point::new(point.x - self.position.x, point.y - self.position.y);
        }
        self.normalize();
    }

    pub fn set_end(&mut self, point: Point) {
        if let Some(last) = self.points.last_mut() {
            *last = Point::new(point.x - self.position.x, point.y - self.position.y);
        }
        self.normalize();
    }

    pub fn rescale(&mut self, sx: f64, sy: f64) {
        for p in &mut self.points {
            p.x *= sx;
            p.y *= sy;
        }
        self.normalize();
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
    fn defaults_to_end_arrowhead() {
        let arrow = Arrow::new(Point::new(0.0, 0.0));
        assert_eq!(arrow.start_arrowhead, Arrowhead::None);
        assert_eq!(arrow.end_arrowhead, Arrowhead::Arrow);
    }

    #[test]
    fn diagonal_hit() {
        let arrow = Arrow::from_points(&[Point::new(0.0, 0.0), Point::new(100.0, 100.0)]);
        assert!(arrow.hit_test(Point::new(50.0, 50.0)));
        assert!(arrow.hit_test(Point::new(55.0, 45.0)));
        assert!(!arrow.hit_test(Point::new(80.0, 20.0)));
    }
}

//! Free-hand stroke shape.

use super::{
    generate_id, generate_seed, linear_hit_threshold, now_millis, point_to_polyline_dist,
    points_bounds, ShapeId, ShapeStyle,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Pressure recorded when the input device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// A free-hand stroke: local points plus one pressure sample per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freedraw {
    pub id: ShapeId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    pub points: Vec<Point>,
    #[serde(default)]
    pub pressures: Vec<f64>,
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

impl Freedraw {
    /// Start a stroke at a document-space point.
    pub fn new(start: Point) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(),
            position: start,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            points: vec![Point::ZERO],
            pressures: vec![DEFAULT_PRESSURE],
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build from document-space points with uniform pressure.
    pub fn from_points(points: &[Point]) -> Self {
        let mut stroke = Self::new(points.first().copied().unwrap_or(Point::ZERO));
        stroke.points = points
            .iter()
            .map(|p| Point::new(p.x - stroke.position.x, p.y - stroke.position.y))
            .collect();
        stroke.pressures = vec![DEFAULT_PRESSURE; stroke.points.len()];
        stroke.normalize();
        stroke
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a document-space point with its pressure sample.
    pub fn add_point(&mut self, point: Point, pressure: f64) {
        self.points
            .push(Point::new(point.x - self.position.x, point.y - self.position.y));
        self.pressures.push(pressure);
        self.normalize();
    }

    /// Last appended point in document space.
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

    /// Scale local points about the shape origin.
    pub fn rescale(&mut self, sx: f64, sy: f64) {
        for p in &mut self.points {
            p.x *= sx;
            p.y *= sy;
        }
        self.normalize();
    }

    /// Ramer–Douglas–Peucker simplification; drops pressure samples in
    /// step with their points.
    pub fn simplify(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }
        let keep = rdp_keep_mask(&self.points, tolerance);
        let mut kept_points = Vec::with_capacity(self.points.len());
        let mut kept_pressures = Vec::with_capacity(self.pressures.len());
        for (i, point) in self.points.iter().enumerate() {
            if keep[i] {
                kept_points.push(*point);
                kept_pressures.push(self.pressures.get(i).copied().unwrap_or(DEFAULT_PRESSURE));
            }
        }
        self.points = kept_points;
        self.pressures = kept_pressures;
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
        match pts.len() {
            0 => false,
            1 => (point - pts[0]).hypot() <= linear_hit_threshold(self.style.stroke_width),
            _ => point_to_polyline_dist(point, &pts) <= linear_hit_threshold(self.style.stroke_width),
        }
    }
}

/// Mark the points RDP keeps at the given tolerance. First and last are
/// always kept.
fn rdp_keep_mask(points: &[Point], tolerance: f64) -> Vec<bool> {
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    rdp_mark(points, 0, points.len() - 1, tolerance, &mut keep);
    keep
}

fn rdp_mark(points: &[Point], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let mut max_dist = 0.0;
    let mut max_index = first;
    for i in first + 1..last {
        let dist = perpendicular_distance(points[i], points[first], points[last]);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }
    if max_dist > tolerance {
        keep[max_index] = true;
        rdp_mark(points, first, max_index, tolerance, keep);
        rdp_mark(points, max_index, last, tolerance, keep);
    }
}

/// Perpendicular distance from a point to the infinite line through
/// `line_start`→`line_end`.
fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;
    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        return (point - line_start).hypot();
    }
    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}

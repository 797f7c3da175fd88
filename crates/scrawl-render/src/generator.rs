//! Rough path primitives.
//!
//! Every generator documents the order in which it consumes the jitter
//! stream; [`render_shape`] relies on that order for byte-identical
//! re-renders of the same shape and seed.
//!
//! [`render_shape`]: crate::render_shape

use crate::rng::SketchRng;
use kurbo::{BezPath, Point, Vec2};

/// Pen passes per logical edge at roughness > 0. Two overlapping traces
/// give the doubled-stroke sketch look.
pub(crate) const STROKE_ITERATIONS: usize = 2;

/// Bow multiplier for the perpendicular wobble of straight edges.
const BOWING: f64 = 1.0;

/// Cubic arc constant for quarter-circle approximation.
pub(crate) const KAPPA: f64 = 0.552_284_749_8;

/// Vertex count of the jittered ellipse polygon.
pub(crate) const ELLIPSE_SEGMENTS: usize = 32;

/// Per-vertex radius noise fraction at roughness 1.
const ELLIPSE_NOISE: f64 = 0.05;

/// Long edges get proportionally less jitter so big diagrams stay
/// legible: full amplitude under 200 units, 0.4 beyond 500, linear in
/// between.
fn roughness_gain(length: f64) -> f64 {
    if length < 200.0 {
        1.0
    } else if length > 500.0 {
        0.4
    } else {
        1.0 - 0.6 * (length - 200.0) / 300.0
    }
}

/// Append a hand-drawn segment.
///
/// Stream order per pass: start.x, start.y, first bow, second bow, end.x,
/// end.y. [`STROKE_ITERATIONS`] passes run back to back; roughness 0
/// appends an exact line and consumes nothing.
pub fn rough_line(path: &mut BezPath, from: Point, to: Point, roughness: f64, rng: &mut SketchRng) {
    if roughness <= 0.0 {
        path.move_to(from);
        path.line_to(to);
        return;
    }
    for _ in 0..STROKE_ITERATIONS {
        rough_pass(path, from, to, roughness, rng);
    }
}

fn rough_pass(path: &mut BezPath, from: Point, to: Point, roughness: f64, rng: &mut SketchRng) {
    let delta = to - from;
    let length = delta.hypot();
    let gain = roughness_gain(length);
    let amp = roughness * gain * (length / 200.0);
    let bow_amp = roughness * BOWING * gain * (length / 200.0);

    let start = Point::new(from.x + rng.offset(amp), from.y + rng.offset(amp));
    let perp = if length > f64::EPSILON {
        Vec2::new(-delta.y / length, delta.x / length)
    } else {
        Vec2::ZERO
    };
    let bow1 = rng.offset(bow_amp);
    let bow2 = rng.offset(bow_amp);
    let cp1 = Point::new(
        from.x + delta.x / 3.0 + perp.x * bow1,
        from.y + delta.y / 3.0 + perp.y * bow1,
    );
    let cp2 = Point::new(
        from.x + delta.x * 2.0 / 3.0 + perp.x * bow2,
        from.y + delta.y * 2.0 / 3.0 + perp.y * bow2,
    );
    let end = Point::new(to.x + rng.offset(amp), to.y + rng.offset(amp));

    path.move_to(start);
    path.curve_to(cp1, cp2, end);
}

/// Append hand-drawn segments along an open point run, in point order.
pub fn rough_polyline(
    path: &mut BezPath,
    points: &[Point],
    roughness: f64,
    rng: &mut SketchRng,
) {
    for pair in points.windows(2) {
        rough_line(path, pair[0], pair[1], roughness, rng);
    }
}

/// Append a closed polygon outline. Sketchy corners deliberately
/// overshoot instead of joining; the closing edge is traced last.
pub fn rough_polygon(path: &mut BezPath, points: &[Point], roughness: f64, rng: &mut SketchRng) {
    if points.len() < 2 {
        return;
    }
    if roughness <= 0.0 {
        path.move_to(points[0]);
        for p in &points[1..] {
            path.line_to(*p);
        }
        path.close_path();
        return;
    }
    rough_polyline(path, points, roughness, rng);
    rough_line(
        path,
        points[points.len() - 1],
        points[0],
        roughness,
        rng,
    );
}

/// Append an ellipse outline.
///
/// Roughness 0 emits four exact kappa arcs and consumes nothing.
/// Otherwise [`ELLIPSE_SEGMENTS`] vertices are jittered (stream order:
/// dx then dy per vertex, in angle order) and joined by a closed
/// Catmull-Rom loop.
pub fn rough_ellipse(
    path: &mut BezPath,
    center: Point,
    rx: f64,
    ry: f64,
    roughness: f64,
    rng: &mut SketchRng,
) {
    if roughness <= 0.0 {
        exact_ellipse(path, center, rx, ry);
        return;
    }
    let amp_x = roughness * ELLIPSE_NOISE * rx;
    let amp_y = roughness * ELLIPSE_NOISE * ry;
    let mut points = Vec::with_capacity(ELLIPSE_SEGMENTS);
    for i in 0..ELLIPSE_SEGMENTS {
        let angle = std::f64::consts::TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
        points.push(Point::new(
            center.x + rx * angle.cos() + rng.offset(amp_x),
            center.y + ry * angle.sin() + rng.offset(amp_y),
        ));
    }
    closed_catmull_rom(path, &points);
}

/// Append an exact ellipse built from four cubic arcs. Hand-rolled so
/// the element sequence is stable rather than tolerance-dependent.
pub fn exact_ellipse(path: &mut BezPath, center: Point, rx: f64, ry: f64) {
    let kx = KAPPA * rx;
    let ky = KAPPA * ry;
    path.move_to(Point::new(center.x + rx, center.y));
    path.curve_to(
        Point::new(center.x + rx, center.y + ky),
        Point::new(center.x + kx, center.y + ry),
        Point::new(center.x, center.y + ry),
    );
    path.curve_to(
        Point::new(center.x - kx, center.y + ry),
        Point::new(center.x - rx, center.y + ky),
        Point::new(center.x - rx, center.y),
    );
    path.curve_to(
        Point::new(center.x - rx, center.y - ky),
        Point::new(center.x - kx, center.y - ry),
        Point::new(center.x, center.y - ry),
    );
    path.curve_to(
        Point::new(center.x + kx, center.y - ry),
        Point::new(center.x + rx, center.y - ky),
        Point::new(center.x + rx, center.y),
    );
    path.close_path();
}

/// Append a Catmull-Rom spline through an open point run, endpoints
/// clamped.
pub fn catmull_rom(path: &mut BezPath, points: &[Point]) {
    if points.len() < 2 {
        return;
    }
    let tension = 0.5;
    path.move_to(points[0]);
    for i in 0..points.len() - 1 {
        let p0 = points[if i == 0 { 0 } else { i - 1 }];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[if i + 2 >= points.len() {
            points.len() - 1
        } else {
            i + 2
        }];

        let t1 = Vec2::new((p2.x - p0.x) * tension, (p2.y - p0.y) * tension);
        let t2 = Vec2::new((p3.x - p1.x) * tension, (p3.y - p1.y) * tension);

        let cp1 = Point::new(p1.x + t1.x / 3.0, p1.y + t1.y / 3.0);
        let cp2 = Point::new(p2.x - t2.x / 3.0, p2.y - t2.y / 3.0);

        path.curve_to(cp1, cp2, p2);
    }
}

/// Catmull-Rom loop through the points, wrapping around.
fn closed_catmull_rom(path: &mut BezPath, points: &[Point]) {
    let n = points.len();
    if n < 3 {
        return;
    }
    let tension = 0.5;
    path.move_to(points[0]);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];

        let t1 = Vec2::new((p2.x - p0.x) * tension, (p2.y - p0.y) * tension);
        let t2 = Vec2::new((p3.x - p1.x) * tension, (p3.y - p1.y) * tension);

        let cp1 = Point::new(p1.x + t1.x / 3.0, p1.y + t1.y / 3.0);
        let cp2 = Point::new(p2.x - t2.x / 3.0, p2.y - t2.y / 3.0);

        path.curve_to(cp1, cp2, p2);
    }
    path.close_path();
}

//! Grid and angle snapping.

use kurbo::Point;

/// Default grid cell size in document units.
pub const GRID_SIZE: f64 = 20.0;

/// Angle snap increment for line drawing (45° family).
pub const ANGLE_SNAP_INCREMENT: f64 = std::f64::consts::FRAC_PI_4;

/// Round each axis to the nearest grid multiple.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap an angle (radians) to the nearest 45° increment.
pub fn snap_angle(angle: f64) -> f64 {
    (angle / ANGLE_SNAP_INCREMENT).round() * ANGLE_SNAP_INCREMENT
}

/// Snap a segment's far endpoint so the segment angle lands on a 45°
/// increment while its length is preserved.
pub fn snap_line_endpoint(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < f64::EPSILON {
        return end;
    }
    let snapped = snap_angle(dy.atan2(dx));
    Point::new(
        start.x + dist * snapped.cos(),
        start.y + dist * snapped.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rounds_to_nearest_multiple() {
        let p = snap_to_grid(Point::new(23.0, 9.0), 20.0);
        assert!((p.x - 20.0).abs() < f64::EPSILON);
        assert!((p.y - 0.0).abs() < f64::EPSILON);
        let p = snap_to_grid(Point::new(-12.0, 31.0), 20.0);
        assert!((p.x - -20.0).abs() < f64::EPSILON);
        assert!((p.y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_grid_is_identity() {
        let p = snap_to_grid(Point::new(13.7, 5.2), 0.0);
        assert!((p.x - 13.7).abs() < f64::EPSILON);
        assert!((p.y - 5.2).abs() < f64::EPSILON);
    }

    #[test]
    fn endpoint_snap_preserves_length() {
        let start = Point::new(0.0, 0.0);
        let theta = 40.0_f64.to_radians();
        let raw = Point::new(100.0 * theta.cos(), 100.0 * theta.sin());
        let snapped = snap_line_endpoint(start, raw);
        let angle = snapped.y.atan2(snapped.x).to_degrees();
        assert!((angle - 45.0).abs() < 1e-9);
        let len = (snapped.x * snapped.x + snapped.y * snapped.y).sqrt();
        assert!((len - 100.0).abs() < 1e-9);
    }

    #[test]
    fn near_horizontal_snaps_flat() {
        let snapped = snap_line_endpoint(Point::new(0.0, 0.0), Point::new(100.0, 8.0));
        assert!(snapped.y.abs() < 1e-9);
    }
}

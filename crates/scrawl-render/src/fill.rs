//! Hatch fill generation.

use crate::generator::rough_line;
use crate::rng::SketchRng;
use kurbo::{BezPath, Point, Rect, Vec2};

/// Hatch line spacing floor in document units.
const MIN_HATCH_GAP: f64 = 4.0;

/// Hachure angle in radians (-45 degrees). Cross-hatch adds the mirrored
/// family.
const HACHURE_ANGLE: f64 = -std::f64::consts::FRAC_PI_4;

/// Spacing between hatch lines for the given stroke width.
pub(crate) fn hatch_gap(stroke_width: f64) -> f64 {
    (4.0 * stroke_width).max(MIN_HATCH_GAP)
}

/// Clip a segment to a rectangle, Liang-Barsky style. Returns the
/// clipped endpoints, or None when the segment misses the box entirely.
pub fn clip_segment(from: Point, to: Point, rect: Rect) -> Option<(Point, Point)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let checks = [
        (-dx, from.x - rect.x0),
        (dx, rect.x1 - from.x),
        (-dy, from.y - rect.y0),
        (dy, rect.y1 - from.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            // Parallel to this edge; outside means gone.
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }
    Some((
        Point::new(from.x + t0 * dx, from.y + t0 * dy),
        Point::new(from.x + t1 * dx, from.y + t1 * dy),
    ))
}

/// Parallel segments covering `rect` at `angle`, spaced by `gap` along
/// the perpendicular, each clipped to the rect.
fn hatch_segments(rect: Rect, angle: f64, gap: f64) -> Vec<(Point, Point)> {
    let dir = Vec2::new(angle.cos(), angle.sin());
    let normal = Vec2::new(-dir.y, dir.x);
    let center = rect.center();

    // Project the corners onto the normal to find the offset band.
    let mut min_off = f64::MAX;
    let mut max_off = f64::MIN;
    for corner in [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ] {
        let off = (corner - center).dot(normal);
        min_off = min_off.min(off);
        max_off = max_off.max(off);
    }

    let half = Vec2::new(rect.width(), rect.height()).hypot() / 2.0 + gap;
    let mut segments = Vec::new();
    let mut off = min_off + gap / 2.0;
    while off <= max_off {
        let anchor = center + normal * off;
        let from = anchor - dir * half;
        let to = anchor + dir * half;
        if let Some(clipped) = clip_segment(from, to, rect) {
            segments.push(clipped);
        }
        off += gap;
    }
    segments
}

/// Hachure fill: rough parallel lines at -45 degrees clipped to the
/// fill box. Stream order: one line at a time in generation order.
pub fn hachure_fill(
    path: &mut BezPath,
    bounds: Rect,
    gap: f64,
    roughness: f64,
    rng: &mut SketchRng,
) {
    for (from, to) in hatch_segments(bounds, HACHURE_ANGLE, gap) {
        rough_line(path, from, to, roughness, rng);
    }
}

/// Cross-hatch fill: the hachure family plus its +45 degree mirror,
/// drawn after it.
pub fn cross_hatch_fill(
    path: &mut BezPath,
    bounds: Rect,
    gap: f64,
    roughness: f64,
    rng: &mut SketchRng,
) {
    hachure_fill(path, bounds, gap, roughness, rng);
    for (from, to) in hatch_segments(bounds, -HACHURE_ANGLE, gap) {
        rough_line(path, from, to, roughness, rng);
    }
}

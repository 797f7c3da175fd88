//! Scrawl Render Library
//!
//! Deterministic hand-drawn path generation for Scrawl shapes. Every
//! shape flattens to a list of [`SketchPath`]s: plain Bezier geometry
//! plus paint metadata. The crate never touches a GPU or a glyph
//! rasterizer; the host paints the paths with whatever it has.

mod fill;
mod generator;
mod rng;

pub use fill::clip_segment;
pub use generator::{
    catmull_rom, exact_ellipse, rough_ellipse, rough_line, rough_polygon, rough_polyline,
};
pub use rng::SketchRng;

use fill::{cross_hatch_fill, hachure_fill, hatch_gap};
use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use peniko::Color;
use scrawl_core::shapes::{
    Arrowhead, Ellipse, Eraser, FillStyle, Freedraw, Rectangle, Shape, ShapeStyle, StrokeStyle,
};

/// How a [`SketchPath`] should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    /// Stroke the path with `width`.
    Stroke,
    /// Fill the path interior (non-zero winding); `width` is unused.
    Fill,
}

/// One paintable path produced for a shape. Entries come out in paint
/// order: earlier paths sit under later ones.
#[derive(Debug, Clone)]
pub struct SketchPath {
    pub path: BezPath,
    pub color: Color,
    pub width: f64,
    pub kind: PaintKind,
    /// Dash pattern for dashed/dotted strokes; `None` means solid.
    pub dash: Option<Vec<f64>>,
}

/// Trail width for the transient eraser stroke.
const ERASER_TRAIL_WIDTH: f64 = 6.0;

/// Trail color for the transient eraser stroke.
const ERASER_TRAIL_COLOR: Color = Color::from_rgba8(0x90, 0x90, 0x90, 0x60);

/// Flatten a shape to paintable paths.
///
/// Output is deterministic: all jitter comes from one [`SketchRng`]
/// seeded with the shape's persisted seed, consumed outline first and
/// fill second. At roughness 0 the stream is never drawn from, so the
/// geometry is seed-independent. Text yields no paths; glyph layout
/// belongs to the host.
pub fn render_shape(shape: &Shape) -> Vec<SketchPath> {
    let mut paths = match shape {
        Shape::Rectangle(rect) => render_rectangle(rect),
        Shape::Ellipse(ellipse) => render_ellipse(ellipse),
        Shape::Line(line) => render_linear(
            &line.absolute_points(),
            line.start_arrowhead,
            line.end_arrowhead,
            &line.style,
            line.seed,
        ),
        Shape::Arrow(arrow) => render_linear(
            &arrow.absolute_points(),
            arrow.start_arrowhead,
            arrow.end_arrowhead,
            &arrow.style,
            arrow.seed,
        ),
        Shape::Freedraw(stroke) => render_freedraw(stroke),
        Shape::Eraser(eraser) => render_eraser(eraser),
        Shape::Text(_) => Vec::new(),
    };

    let angle = shape.angle();
    if angle != 0.0 {
        let transform = Affine::rotate_about(angle, shape.bounds().center());
        for sketch in &mut paths {
            sketch.path.apply_affine(transform);
        }
    }
    paths
}

fn render_rectangle(rect: &Rectangle) -> Vec<SketchPath> {
    let style = &rect.style;
    let bounds = rect.bounds();
    let mut rng = SketchRng::new(rect.seed);

    let mut outline = BezPath::new();
    if style.roughness > 0.0 {
        rough_polygon(&mut outline, &box_corners(bounds), style.roughness, &mut rng);
    } else {
        outline = exact_rect_path(rect, bounds);
    }

    let mut paths = fill_paths(style, bounds, || exact_rect_path(rect, bounds), &mut rng);
    paths.push(outline_stroke(outline, style));
    paths
}

fn render_ellipse(ellipse: &Ellipse) -> Vec<SketchPath> {
    let style = &ellipse.style;
    let center = ellipse.center();
    let rx = ellipse.width / 2.0;
    let ry = ellipse.height / 2.0;
    let mut rng = SketchRng::new(ellipse.seed);

    let mut outline = BezPath::new();
    rough_ellipse(&mut outline, center, rx, ry, style.roughness, &mut rng);

    let solid = || {
        let mut path = BezPath::new();
        exact_ellipse(&mut path, center, rx, ry);
        path
    };
    let mut paths = fill_paths(style, ellipse.bounds(), solid, &mut rng);
    paths.push(outline_stroke(outline, style));
    paths
}

fn render_linear(
    points: &[Point],
    start_arrowhead: Arrowhead,
    end_arrowhead: Arrowhead,
    style: &ShapeStyle,
    seed: u32,
) -> Vec<SketchPath> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut rng = SketchRng::new(seed);

    let mut shaft = BezPath::new();
    rough_polyline(&mut shaft, points, style.roughness, &mut rng);
    let mut paths = vec![outline_stroke(shaft, style)];

    // Heads draw from the stream after the shaft, so attaching or
    // detaching a head never reshuffles the shaft jitter.
    let size = arrowhead_size(style.stroke_width);
    if start_arrowhead != Arrowhead::None {
        let dir = unit_direction(points[1], points[0]);
        paths.push(arrowhead_path(
            start_arrowhead,
            points[0],
            dir,
            size,
            style,
            &mut rng,
        ));
    }
    if end_arrowhead != Arrowhead::None {
        let n = points.len();
        let dir = unit_direction(points[n - 2], points[n - 1]);
        paths.push(arrowhead_path(
            end_arrowhead,
            points[n - 1],
            dir,
            size,
            style,
            &mut rng,
        ));
    }
    paths
}

fn render_freedraw(stroke: &Freedraw) -> Vec<SketchPath> {
    let points = stroke.absolute_points();
    vec![SketchPath {
        path: smooth_trail(&points),
        color: stroke.style.stroke_with_opacity(),
        width: stroke.style.stroke_width,
        kind: PaintKind::Stroke,
        dash: dash_pattern(&stroke.style),
    }]
}

fn render_eraser(eraser: &Eraser) -> Vec<SketchPath> {
    let points = eraser.absolute_points();
    vec![SketchPath {
        path: smooth_trail(&points),
        color: ERASER_TRAIL_COLOR,
        width: ERASER_TRAIL_WIDTH,
        kind: PaintKind::Stroke,
        dash: None,
    }]
}

/// Catmull-Rom smoothing without sketch noise. A lone sample becomes a
/// degenerate segment so round caps still show a dot.
fn smooth_trail(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    match points.len() {
        0 => {}
        1 => {
            path.move_to(points[0]);
            path.line_to(points[0]);
        }
        _ => catmull_rom(&mut path, points),
    }
    path
}

/// Fill paths for a closed shape. `solid_outline` supplies the exact
/// interior used by solid fills; hatch fills span the bounding box.
fn fill_paths(
    style: &ShapeStyle,
    bounds: Rect,
    solid_outline: impl FnOnce() -> BezPath,
    rng: &mut SketchRng,
) -> Vec<SketchPath> {
    if !style.has_fill() {
        return Vec::new();
    }
    let Some(color) = style.fill_with_opacity() else {
        return Vec::new();
    };
    match style.fill_style {
        FillStyle::None => Vec::new(),
        FillStyle::Solid => vec![SketchPath {
            path: solid_outline(),
            color,
            width: 0.0,
            kind: PaintKind::Fill,
            dash: None,
        }],
        FillStyle::Hachure => {
            let mut path = BezPath::new();
            hachure_fill(
                &mut path,
                bounds,
                hatch_gap(style.stroke_width),
                style.roughness,
                rng,
            );
            vec![hatch_stroke(path, color, style)]
        }
        FillStyle::CrossHatch => {
            let mut path = BezPath::new();
            cross_hatch_fill(
                &mut path,
                bounds,
                hatch_gap(style.stroke_width),
                style.roughness,
                rng,
            );
            vec![hatch_stroke(path, color, style)]
        }
    }
}

fn outline_stroke(path: BezPath, style: &ShapeStyle) -> SketchPath {
    SketchPath {
        path,
        color: style.stroke_with_opacity(),
        width: style.stroke_width,
        kind: PaintKind::Stroke,
        dash: dash_pattern(style),
    }
}

/// Hatch lines stroke thinner than the outline so fills read as
/// texture rather than bars.
fn hatch_stroke(path: BezPath, color: Color, style: &ShapeStyle) -> SketchPath {
    SketchPath {
        path,
        color,
        width: (style.stroke_width * 0.5).max(0.5),
        kind: PaintKind::Stroke,
        dash: None,
    }
}

fn dash_pattern(style: &ShapeStyle) -> Option<Vec<f64>> {
    let w = style.stroke_width.max(1.0);
    match style.stroke_style {
        StrokeStyle::Solid => None,
        StrokeStyle::Dashed => Some(vec![w * 4.0, w * 4.0]),
        StrokeStyle::Dotted => Some(vec![w, w * 2.0]),
    }
}

fn exact_rect_path(rect: &Rectangle, bounds: Rect) -> BezPath {
    if rect.corner_radius > 0.0 {
        RoundedRect::from_rect(bounds, rect.corner_radius).to_path(0.1)
    } else {
        bounds.to_path(0.1)
    }
}

fn box_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Head size from stroke width: five widths, floored so heads stay
/// visible on hairlines.
fn arrowhead_size(stroke_width: f64) -> f64 {
    (stroke_width * 5.0).max(12.0)
}

fn unit_direction(from: Point, to: Point) -> Vec2 {
    let d = to - from;
    let len = d.hypot();
    if len < f64::EPSILON {
        Vec2::new(1.0, 0.0)
    } else {
        d / len
    }
}

/// One arrowhead at `tip`, pointing along `dir`. The open `Arrow` kind
/// is two jittered barb strokes; the closed kinds are exact filled
/// markers in the stroke color.
fn arrowhead_path(
    kind: Arrowhead,
    tip: Point,
    dir: Vec2,
    size: f64,
    style: &ShapeStyle,
    rng: &mut SketchRng,
) -> SketchPath {
    let perp = Vec2::new(-dir.y, dir.x);
    let back = Point::new(tip.x - dir.x * size, tip.y - dir.y * size);
    let left = Point::new(back.x + perp.x * size * 0.5, back.y + perp.y * size * 0.5);
    let right = Point::new(back.x - perp.x * size * 0.5, back.y - perp.y * size * 0.5);
    let color = style.stroke_with_opacity();

    let mut path = BezPath::new();
    match kind {
        Arrowhead::None => filled_marker(path, color),
        Arrowhead::Arrow => {
            rough_line(&mut path, left, tip, style.roughness, rng);
            rough_line(&mut path, right, tip, style.roughness, rng);
            SketchPath {
                path,
                color,
                width: style.stroke_width,
                kind: PaintKind::Stroke,
                dash: None,
            }
        }
        Arrowhead::Triangle => {
            path.move_to(tip);
            path.line_to(left);
            path.line_to(right);
            path.close_path();
            filled_marker(path, color)
        }
        Arrowhead::Circle => {
            let center = Point::new(tip.x - dir.x * size * 0.5, tip.y - dir.y * size * 0.5);
            filled_marker(Circle::new(center, size * 0.5).to_path(0.1), color)
        }
        Arrowhead::Diamond => {
            let mid = Point::new(tip.x - dir.x * size * 0.5, tip.y - dir.y * size * 0.5);
            path.move_to(tip);
            path.line_to(Point::new(
                mid.x + perp.x * size * 0.5,
                mid.y + perp.y * size * 0.5,
            ));
            path.line_to(back);
            path.line_to(Point::new(
                mid.x - perp.x * size * 0.5,
                mid.y - perp.y * size * 0.5,
            ));
            path.close_path();
            filled_marker(path, color)
        }
    }
}

fn filled_marker(path: BezPath, color: Color) -> SketchPath {
    SketchPath {
        path,
        color,
        width: 0.0,
        kind: PaintKind::Fill,
        dash: None,
    }
}

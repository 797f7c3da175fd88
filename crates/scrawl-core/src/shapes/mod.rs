//! Shape definitions for the canvas engine.

mod arrow;
mod ellipse;
mod eraser;
mod freedraw;
mod line;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use ellipse::Ellipse;
pub use eraser::Eraser;
pub use freedraw::{DEFAULT_PRESSURE, Freedraw};
pub use line::{Arrowhead, Line};
pub use rectangle::Rectangle;
pub use text::{FontFamily, MIN_FONT_SIZE, Text, TextAlign, VerticalAlign};

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Fill pattern for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    Solid,
    Hachure,
    CrossHatch,
    #[default]
    None,
}

/// Style properties embedded in every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width in document units.
    pub stroke_width: f64,
    /// Stroke line style.
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Fill pattern.
    #[serde(default)]
    pub fill_style: FillStyle,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Sketch-noise amplitude; 0 renders geometrically exact.
    #[serde(default = "default_roughness")]
    pub roughness: f64,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_roughness() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        let rgba = self.stroke_color;
        let alpha = (rgba.a as f64 * self.opacity) as u8;
        Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|rgba| {
            let alpha = (rgba.a as f64 * self.opacity) as u8;
            Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
        })
    }

    /// Whether the shape has a visible fill. Unfilled shapes hit-test as
    /// outlines only.
    pub fn has_fill(&self) -> bool {
        self.fill_style != FillStyle::None
            && self.fill_color.is_some_and(|c| !c.is_transparent())
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }

    /// Set the fill color from a peniko Color.
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(|c| c.into());
    }

    /// Clamp opacity and roughness into their valid ranges.
    pub fn sanitize(&mut self) {
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self.roughness = self.roughness.max(0.0);
        self.stroke_width = self.stroke_width.max(0.0);
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            stroke_style: StrokeStyle::default(),
            fill_color: None,
            fill_style: FillStyle::default(),
            opacity: 1.0,
            roughness: 1.0,
        }
    }
}

/// Generate a render seed for new shapes.
/// Counter + hash keeps seeds unique within a process without needing a
/// time source.
pub fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32-style mix for distribution
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Generate a fresh shape id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Hit-test threshold for linear shapes.
pub(crate) fn linear_hit_threshold(stroke_width: f64) -> f64 {
    stroke_width.max(10.0)
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Rotate a point about a center by `angle` radians.
pub fn rotate_about(point: Point, center: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Tight bounding box of a point slice. Empty input yields a zero rect.
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    let mut bounds = Rect::new(first.x, first.y, first.x, first.y);
    for p in iter {
        bounds.x0 = bounds.x0.min(p.x);
        bounds.y0 = bounds.y0.min(p.y);
        bounds.x1 = bounds.x1.max(p.x);
        bounds.y1 = bounds.y1.max(p.y);
    }
    bounds
}

/// Unique identifier for shapes.
pub type ShapeId = String;

/// Closed union of every shape the engine knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Arrow(Arrow),
    Freedraw(Freedraw),
    Text(Text),
    Eraser(Eraser),
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        match self {
            Shape::Rectangle(s) => &s.id,
            Shape::Ellipse(s) => &s.id,
            Shape::Line(s) => &s.id,
            Shape::Arrow(s) => &s.id,
            Shape::Freedraw(s) => &s.id,
            Shape::Text(s) => &s.id,
            Shape::Eraser(s) => &s.id,
        }
    }

    /// Kind name used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Line(_) => "line",
            Shape::Arrow(_) => "arrow",
            Shape::Freedraw(_) => "freedraw",
            Shape::Text(_) => "text",
            Shape::Eraser(_) => "eraser",
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Freedraw(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Eraser(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point),
            Shape::Ellipse(s) => s.hit_test(point),
            Shape::Line(s) => s.hit_test(point),
            Shape::Arrow(s) => s.hit_test(point),
            Shape::Freedraw(s) => s.hit_test(point),
            Shape::Text(s) => s.hit_test(point),
            Shape::Eraser(s) => s.hit_test(point),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.position,
            Shape::Ellipse(s) => s.position,
            Shape::Line(s) => s.position,
            Shape::Arrow(s) => s.position,
            Shape::Freedraw(s) => s.position,
            Shape::Text(s) => s.position,
            Shape::Eraser(s) => s.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Shape::Rectangle(s) => s.position = position,
            Shape::Ellipse(s) => s.position = position,
            Shape::Line(s) => s.position = position,
            Shape::Arrow(s) => s.position = position,
            Shape::Freedraw(s) => s.position = position,
            Shape::Text(s) => s.position = position,
            Shape::Eraser(s) => s.position = position,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        let p = self.position();
        self.set_position(Point::new(p.x + delta.x, p.y + delta.y));
    }

    pub fn angle(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.angle,
            Shape::Ellipse(s) => s.angle,
            Shape::Line(s) => s.angle,
            Shape::Arrow(s) => s.angle,
            Shape::Freedraw(s) => s.angle,
            Shape::Text(s) => s.angle,
            Shape::Eraser(s) => s.angle,
        }
    }

    pub fn set_angle(&mut self, angle: f64) {
        match self {
            Shape::Rectangle(s) => s.angle = angle,
            Shape::Ellipse(s) => s.angle = angle,
            Shape::Line(s) => s.angle = angle,
            Shape::Arrow(s) => s.angle = angle,
            Shape::Freedraw(s) => s.angle = angle,
            Shape::Text(s) => s.angle = angle,
            Shape::Eraser(s) => s.angle = angle,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => &s.style,
            Shape::Ellipse(s) => &s.style,
            Shape::Line(s) => &s.style,
            Shape::Arrow(s) => &s.style,
            Shape::Freedraw(s) => &s.style,
            Shape::Text(s) => &s.style,
            Shape::Eraser(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => &mut s.style,
            Shape::Ellipse(s) => &mut s.style,
            Shape::Line(s) => &mut s.style,
            Shape::Arrow(s) => &mut s.style,
            Shape::Freedraw(s) => &mut s.style,
            Shape::Text(s) => &mut s.style,
            Shape::Eraser(s) => &mut s.style,
        }
    }

    pub fn is_locked(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.is_locked,
            Shape::Ellipse(s) => s.is_locked,
            Shape::Line(s) => s.is_locked,
            Shape::Arrow(s) => s.is_locked,
            Shape::Freedraw(s) => s.is_locked,
            Shape::Text(s) => s.is_locked,
            Shape::Eraser(s) => s.is_locked,
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        match self {
            Shape::Rectangle(s) => s.is_locked = locked,
            Shape::Ellipse(s) => s.is_locked = locked,
            Shape::Line(s) => s.is_locked = locked,
            Shape::Arrow(s) => s.is_locked = locked,
            Shape::Freedraw(s) => s.is_locked = locked,
            Shape::Text(s) => s.is_locked = locked,
            Shape::Eraser(s) => s.is_locked = locked,
        }
    }

    pub fn seed(&self) -> u32 {
        match self {
            Shape::Rectangle(s) => s.seed,
            Shape::Ellipse(s) => s.seed,
            Shape::Line(s) => s.seed,
            Shape::Arrow(s) => s.seed,
            Shape::Freedraw(s) => s.seed,
            Shape::Text(s) => s.seed,
            Shape::Eraser(s) => s.seed,
        }
    }

    /// Assign a fresh unique id. Used when duplicating or pasting.
    pub fn regenerate_id(&mut self) {
        let new_id = generate_id();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Line(s) => s.id = new_id,
            Shape::Arrow(s) => s.id = new_id,
            Shape::Freedraw(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Eraser(s) => s.id = new_id,
        }
    }

    /// Assign a fresh render seed so sketch jitter differs from the source.
    pub fn reseed(&mut self) {
        let seed = generate_seed();
        match self {
            Shape::Rectangle(s) => s.seed = seed,
            Shape::Ellipse(s) => s.seed = seed,
            Shape::Line(s) => s.seed = seed,
            Shape::Arrow(s) => s.seed = seed,
            Shape::Freedraw(s) => s.seed = seed,
            Shape::Text(s) => s.seed = seed,
            Shape::Eraser(s) => s.seed = seed,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            Shape::Rectangle(s) => s.created_at,
            Shape::Ellipse(s) => s.created_at,
            Shape::Line(s) => s.created_at,
            Shape::Arrow(s) => s.created_at,
            Shape::Freedraw(s) => s.created_at,
            Shape::Text(s) => s.created_at,
            Shape::Eraser(s) => s.created_at,
        }
    }

    pub fn updated_at(&self) -> i64 {
        match self {
            Shape::Rectangle(s) => s.updated_at,
            Shape::Ellipse(s) => s.updated_at,
            Shape::Line(s) => s.updated_at,
            Shape::Arrow(s) => s.updated_at,
            Shape::Freedraw(s) => s.updated_at,
            Shape::Text(s) => s.updated_at,
            Shape::Eraser(s) => s.updated_at,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self, now: i64) {
        match self {
            Shape::Rectangle(s) => s.updated_at = now,
            Shape::Ellipse(s) => s.updated_at = now,
            Shape::Line(s) => s.updated_at = now,
            Shape::Arrow(s) => s.updated_at = now,
            Shape::Freedraw(s) => s.updated_at = now,
            Shape::Text(s) => s.updated_at = now,
            Shape::Eraser(s) => s.updated_at = now,
        }
    }

    /// Recompute width/height (and shift the anchor) so point-array shapes
    /// keep a tight bounding box. A no-op for box shapes.
    pub fn normalize(&mut self) {
        match self {
            Shape::Line(s) => s.normalize(),
            Shape::Arrow(s) => s.normalize(),
            Shape::Freedraw(s) => s.normalize(),
            Shape::Eraser(s) => s.normalize(),
            Shape::Rectangle(_) | Shape::Ellipse(_) | Shape::Text(_) => {}
        }
    }

    /// Transient shapes exist only during interaction and are never
    /// persisted.
    pub fn is_transient(&self) -> bool {
        matches!(self, Shape::Eraser(_))
    }
}

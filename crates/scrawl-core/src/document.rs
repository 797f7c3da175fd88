//! Document persistence: the JSON envelope and tolerant loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::CanvasState;
use crate::shapes::{Shape, ShapeStyle, now_millis};
use crate::viewport::Viewport;

/// Format version written by this build. Loaded documents keep whatever
/// version they carried; it is echoed back on save, never interpreted.
pub const DOCUMENT_VERSION: u32 = 1;

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not a canvas document: {0}")]
    InvalidDocument(String),
}

/// The persisted form of a canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    pub version: u32,
    pub shapes: Vec<Shape>,
    pub viewport: Viewport,
    pub style: ShapeStyle,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// Envelope with shapes left unparsed so one bad entry cannot sink the
/// whole document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    shapes: Vec<serde_json::Value>,
    #[serde(default)]
    viewport: Viewport,
    #[serde(default)]
    style: ShapeStyle,
    #[serde(default = "now_millis")]
    created_at: i64,
    #[serde(default = "now_millis")]
    updated_at: i64,
}

impl CanvasDocument {
    /// Snapshot a canvas for saving. Transient shapes (eraser strokes)
    /// are never persisted.
    pub fn from_canvas(canvas: &CanvasState, version: u32, created_at: i64) -> Self {
        Self {
            version,
            shapes: canvas
                .shapes
                .iter()
                .filter(|s| !s.is_transient())
                .cloned()
                .collect(),
            viewport: canvas.viewport,
            style: canvas.current_style.clone(),
            created_at,
            updated_at: now_millis(),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document, skipping malformed shape entries instead of
    /// failing the whole load.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(DocumentError::InvalidDocument(
                "expected a top-level object".to_string(),
            ));
        }
        let raw: RawDocument = serde_json::from_value(value)?;

        let mut shapes = Vec::with_capacity(raw.shapes.len());
        for value in raw.shapes {
            match serde_json::from_value::<Shape>(value) {
                Ok(shape) => {
                    if let Some(shape) = repair_shape(shape) {
                        shapes.push(shape);
                    }
                }
                Err(err) => {
                    log::warn!("Skipping malformed shape: {}", err);
                }
            }
        }

        // The envelope gets the same treatment as each shape: persisted
        // values come back inside the runtime invariants.
        let mut viewport = raw.viewport;
        viewport.sanitize();
        let mut style = raw.style;
        style.sanitize();

        Ok(Self {
            version: raw.version,
            shapes,
            viewport,
            style,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

/// Bring a parsed shape up to the runtime invariants, or drop it.
fn repair_shape(mut shape: Shape) -> Option<Shape> {
    if shape.is_transient() {
        log::debug!("Dropping transient shape {} from document", shape.id());
        return None;
    }
    if let Shape::Freedraw(freedraw) = &shape {
        if freedraw.points.is_empty() {
            log::warn!("Skipping freedraw shape {} with no points", freedraw.id);
            return None;
        }
        // One pressure per point; a mismatched pair is malformed.
        if freedraw.pressures.len() != freedraw.points.len() {
            log::warn!(
                "Skipping freedraw shape {} with {} points but {} pressures",
                freedraw.id,
                freedraw.points.len(),
                freedraw.pressures.len()
            );
            return None;
        }
    }
    if let Shape::Line(line) = &shape {
        if line.points.len() < 2 {
            log::warn!("Skipping line shape {} with fewer than two points", line.id);
            return None;
        }
    }
    if let Shape::Arrow(arrow) = &shape {
        if arrow.points.len() < 2 {
            log::warn!(
                "Skipping arrow shape {} with fewer than two points",
                arrow.id
            );
            return None;
        }
    }
    shape.style_mut().sanitize();
    shape.normalize();
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{
        Arrow, Arrowhead, Ellipse, FillStyle, Freedraw, Line, Rectangle, SerializableColor,
        StrokeStyle, Text,
    };
    use crate::viewport::MIN_ZOOM;
    use kurbo::Point;

    fn sample_canvas() -> CanvasState {
        let mut canvas = CanvasState::new();

        let mut rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        rect.corner_radius = 8.0;
        rect.angle = 0.3;
        rect.style.stroke_style = StrokeStyle::Dashed;
        rect.style.fill_color = Some(SerializableColor::new(200, 30, 30, 255));
        rect.style.fill_style = FillStyle::Hachure;
        canvas.add_shape(Shape::Rectangle(rect));

        canvas.add_shape(Shape::Ellipse(Ellipse::new(Point::new(0.0, 0.0), 60.0, 40.0)));

        let mut line = Line::new(Point::new(0.0, 0.0));
        line.set_end(Point::new(120.0, 80.0));
        canvas.add_shape(Shape::Line(line));

        let mut arrow = Arrow::new(Point::new(5.0, 5.0));
        arrow.set_end(Point::new(50.0, 5.0));
        arrow.start_arrowhead = Arrowhead::Circle;
        canvas.add_shape(Shape::Arrow(arrow));

        let mut freedraw = Freedraw::new(Point::new(0.0, 0.0));
        freedraw.add_point(Point::new(10.0, 4.0), 0.7);
        freedraw.add_point(Point::new(20.0, 1.0), 0.9);
        canvas.add_shape(Shape::Freedraw(freedraw));

        let mut text = Text::new(Point::new(30.0, 30.0));
        text.set_text("hello\nworld");
        canvas.add_shape(Shape::Text(text));

        canvas
    }

    #[test]
    fn round_trip_preserves_all_shape_kinds() {
        let canvas = sample_canvas();
        let doc = CanvasDocument::from_canvas(&canvas, DOCUMENT_VERSION, now_millis());

        let json = doc.to_json().unwrap();
        let loaded = CanvasDocument::from_json(&json).unwrap();

        assert_eq!(loaded.shapes, doc.shapes);
        assert_eq!(loaded.version, doc.version);
    }

    #[test]
    fn malformed_shapes_are_skipped_not_fatal() {
        let json = r#"{
            "version": 3,
            "shapes": [
                {"type": "rectangle", "id": "a", "position": {"x": 0.0, "y": 0.0},
                 "width": 10.0, "height": 10.0,
                 "style": {"strokeColor": {"r": 0, "g": 0, "b": 0, "a": 255}, "strokeWidth": 2.0}},
                {"type": "wobble", "id": "b"},
                {"not even": "a shape"}
            ],
            "viewport": {"scrollX": 5.0, "scrollY": -2.0, "zoom": 1.5}
        }"#;

        let doc = CanvasDocument::from_json(json).unwrap();
        assert_eq!(doc.shapes.len(), 1);
        assert_eq!(doc.version, 3);
        assert!((doc.viewport.zoom - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn eraser_strokes_never_persist() {
        let mut canvas = sample_canvas();
        canvas.add_shape(Shape::Eraser(crate::shapes::Eraser::new(Point::ZERO)));

        let doc = CanvasDocument::from_canvas(&canvas, DOCUMENT_VERSION, now_millis());
        assert!(doc.shapes.iter().all(|s| !s.is_transient()));
        assert_eq!(doc.shapes.len(), 6);
    }

    #[test]
    fn version_is_echoed_not_interpreted() {
        let json = r#"{"version": 42, "shapes": []}"#;
        let doc = CanvasDocument::from_json(json).unwrap();
        assert_eq!(doc.version, 42);
    }

    #[test]
    fn mismatched_pressures_are_skipped() {
        let json = r#"{
            "shapes": [
                {"type": "freedraw", "id": "f", "position": {"x": 0.0, "y": 0.0},
                 "width": 20.0, "height": 10.0,
                 "points": [{"x": 0.0, "y": 0.0}, {"x": 10.0, "y": 5.0}, {"x": 20.0, "y": 10.0}],
                 "pressures": [0.8],
                 "style": {"strokeColor": {"r": 0, "g": 0, "b": 0, "a": 255}, "strokeWidth": 2.0}},
                {"type": "rectangle", "id": "r", "position": {"x": 0.0, "y": 0.0},
                 "width": 10.0, "height": 10.0,
                 "style": {"strokeColor": {"r": 0, "g": 0, "b": 0, "a": 255}, "strokeWidth": 2.0}}
            ]
        }"#;

        let doc = CanvasDocument::from_json(json).unwrap();
        assert_eq!(doc.shapes.len(), 1);
        assert!(matches!(&doc.shapes[0], Shape::Rectangle(_)));
    }

    #[test]
    fn out_of_range_style_values_are_clamped() {
        let json = r#"{
            "shapes": [
                {"type": "rectangle", "id": "a", "position": {"x": 0.0, "y": 0.0},
                 "width": 10.0, "height": 10.0,
                 "style": {"strokeColor": {"r": 0, "g": 0, "b": 0, "a": 255},
                           "strokeWidth": 2.0, "opacity": 7.5, "roughness": -3.0}}
            ]
        }"#;

        let doc = CanvasDocument::from_json(json).unwrap();
        let style = doc.shapes[0].style();
        assert!((style.opacity - 1.0).abs() < f64::EPSILON);
        assert!(style.roughness.abs() < f64::EPSILON);
    }

    #[test]
    fn hostile_viewport_and_style_are_sanitized_on_load() {
        let json = r#"{
            "shapes": [],
            "viewport": {"scrollX": 0.0, "scrollY": 0.0, "zoom": 0.0},
            "style": {"strokeColor": {"r": 0, "g": 0, "b": 0, "a": 255},
                      "strokeWidth": 2.0, "opacity": 7.5}
        }"#;

        let doc = CanvasDocument::from_json(json).unwrap();
        assert!((doc.viewport.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        let mapped = doc.viewport.screen_to_document(Point::new(100.0, 100.0));
        assert!(mapped.x.is_finite() && mapped.y.is_finite());
        assert!((doc.style.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_envelope_fields_take_defaults() {
        let doc = CanvasDocument::from_json(r#"{"shapes": []}"#).unwrap();
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert!((doc.viewport.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn not_json_at_all_is_an_error() {
        assert!(CanvasDocument::from_json("definitely not json").is_err());
        assert!(matches!(
            CanvasDocument::from_json("[1, 2, 3]"),
            Err(DocumentError::InvalidDocument(_))
        ));
    }
}

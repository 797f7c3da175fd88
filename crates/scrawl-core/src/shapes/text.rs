//! Text shape.

use super::{generate_id, generate_seed, now_millis, rotate_about, ShapeId, ShapeStyle};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Default font size for new text shapes.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Smallest legible font size; resize scaling floors here.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Hit-test padding around the text box.
pub(crate) const TEXT_HIT_PADDING: f64 = 4.0;

/// Font family for text shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    /// Hand-drawn look, matches the sketchy rendering.
    #[default]
    HandDrawn,
    /// Plain sans-serif.
    Normal,
    /// Monospace.
    Code,
}

impl FontFamily {
    /// Average glyph width as a fraction of the font size, for
    /// approximate layout without a font stack.
    fn width_factor(&self) -> f64 {
        match self {
            FontFamily::HandDrawn => 0.55,
            FontFamily::Normal => 0.5,
            FontFamily::Code => 0.6,
        }
    }

    pub fn all() -> &'static [FontFamily] {
        &[FontFamily::HandDrawn, FontFamily::Normal, FontFamily::Code]
    }
}

/// Horizontal alignment inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub id: ShapeId,
    /// Top-left corner of the text box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// When true the box tracks the measured content size.
    #[serde(default = "default_auto_resize")]
    pub auto_resize: bool,
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

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_line_height() -> f64 {
    1.25
}

fn default_auto_resize() -> bool {
    true
}

impl Text {
    /// Create an empty text shape at a document-space point.
    pub fn new(position: Point) -> Self {
        let now = now_millis();
        let mut text = Self {
            id: generate_id(),
            position,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            text_align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            line_height: 1.25,
            auto_resize: true,
            style: ShapeStyle::default(),
            is_locked: false,
            seed: generate_seed(),
            created_at: now,
            updated_at: now,
        };
        text.refresh_size();
        text
    }

    pub fn with_content(position: Point, content: &str) -> Self {
        let mut text = Self::new(position);
        text.text = content.to_string();
        text.refresh_size();
        text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Approximate content size without a font stack: longest line times
    /// a per-family width factor, line count times line height. Empty
    /// content measures as one glyph so the shape stays clickable.
    pub fn approximate_size(&self) -> Size {
        let factor = self.font_family.width_factor();
        let longest = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let line_count = self.text.lines().count().max(1);
        Size::new(
            longest as f64 * self.font_size * factor,
            line_count as f64 * self.font_size * self.line_height,
        )
    }

    /// Recompute the box from content when auto-resize is on.
    pub fn refresh_size(&mut self) {
        if self.auto_resize {
            let size = self.approximate_size();
            self.width = size.width;
            self.height = size.height;
        }
    }

    /// Replace content and refresh the box.
    pub fn set_text(&mut self, content: &str) {
        self.text = content.to_string();
        self.refresh_size();
    }

    pub fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.refresh_size();
    }

    pub fn pop_char(&mut self) {
        self.text.pop();
        self.refresh_size();
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn hit_test(&self, point: Point) -> bool {
        let bounds = self.bounds();
        let point = if self.angle != 0.0 {
            rotate_about(point, bounds.center(), -self.angle)
        } else {
            point
        };
        bounds
            .inflate(TEXT_HIT_PADDING, TEXT_HIT_PADDING)
            .contains(point)
    }
}

//! Available tools and keyboard shortcut mapping.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::shapes::{
    Arrow, Ellipse, Eraser, Freedraw, Line, Rectangle, Shape, ShapeStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Freedraw,
    Eraser,
    Text,
}

impl Tool {
    /// Tools that create a shape by dragging.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Tool::Rectangle
                | Tool::Ellipse
                | Tool::Line
                | Tool::Arrow
                | Tool::Freedraw
                | Tool::Eraser
        )
    }

    /// Map a single-key shortcut to a tool.
    pub fn from_shortcut(key: &str) -> Option<Tool> {
        match key {
            "v" | "1" => Some(Tool::Select),
            "r" | "2" => Some(Tool::Rectangle),
            "o" | "3" => Some(Tool::Ellipse),
            "l" | "4" => Some(Tool::Line),
            "a" | "5" => Some(Tool::Arrow),
            "p" | "6" => Some(Tool::Freedraw),
            "t" | "7" => Some(Tool::Text),
            "e" | "8" => Some(Tool::Eraser),
            "h" | "9" => Some(Tool::Pan),
            _ => None,
        }
    }

    /// Start a drag-drawn shape at `start` with the given style.
    ///
    /// Returns `None` for tools that do not draw by dragging; text entry
    /// goes through the editing flow instead.
    pub fn begin_shape(&self, start: Point, style: &ShapeStyle) -> Option<Shape> {
        let mut shape = match self {
            Tool::Rectangle => Some(Shape::Rectangle(Rectangle::new(start, 0.0, 0.0))),
            Tool::Ellipse => Some(Shape::Ellipse(Ellipse::new(start, 0.0, 0.0))),
            Tool::Line => Some(Shape::Line(Line::new(start))),
            Tool::Arrow => Some(Shape::Arrow(Arrow::new(start))),
            Tool::Freedraw => Some(Shape::Freedraw(Freedraw::new(start))),
            // The eraser stroke is transient feedback; it keeps its default
            // style rather than the user's drawing style.
            Tool::Eraser => return Some(Shape::Eraser(Eraser::new(start))),
            Tool::Select | Tool::Pan | Tool::Text => None,
        };
        if let Some(shape) = &mut shape {
            *shape.style_mut() = style.clone();
        }
        shape
    }
}

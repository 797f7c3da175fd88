//! Canvas state: the shape list, selection, viewport and tool defaults.

use kurbo::{Point, Rect};

use crate::shapes::{Shape, ShapeId, ShapeStyle};
use crate::snap::GRID_SIZE;
use crate::tools::Tool;
use crate::viewport::Viewport;

/// Runtime state of one canvas.
///
/// `shapes` is kept in paint order, back to front; insertion appends at
/// the front of the stack.
#[derive(Debug, Clone)]
pub struct CanvasState {
    pub shapes: Vec<Shape>,
    pub selected_ids: Vec<ShapeId>,
    pub viewport: Viewport,
    pub active_tool: Tool,
    pub current_style: ShapeStyle,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            selected_ids: Vec::new(),
            viewport: Viewport::default(),
            active_tool: Tool::default(),
            current_style: ShapeStyle::default(),
            show_grid: false,
            snap_to_grid: false,
            grid_size: GRID_SIZE,
        }
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Append a shape at the top of the paint order and return its id.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id().clone();
        self.shapes.push(shape);
        id
    }

    /// Remove a shape, pruning it from the selection.
    pub fn remove_shape(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        self.selected_ids.retain(|sid| sid != id);
        Some(self.shapes.remove(index))
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Top-most unlocked shape under `point`, front to back.
    pub fn shape_at(&self, point: Point) -> Option<&Shape> {
        self.shapes
            .iter()
            .rev()
            .find(|s| !s.is_locked() && s.hit_test(point))
    }

    pub fn shape_id_at(&self, point: Point) -> Option<ShapeId> {
        self.shape_at(point).map(|s| s.id().clone())
    }

    /// Unlocked shapes whose bounds lie entirely inside `rect`, in paint
    /// order. Intersection is not enough.
    pub fn shapes_contained_in(&self, rect: Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| {
                if s.is_locked() {
                    return false;
                }
                let b = s.bounds();
                rect.x0 <= b.x0 && rect.y0 <= b.y0 && b.x1 <= rect.x1 && b.y1 <= rect.y1
            })
            .map(|s| s.id().clone())
            .collect()
    }

    pub fn bring_to_front(&mut self, id: &ShapeId) {
        if let Some(index) = self.shapes.iter().position(|s| s.id() == id) {
            let shape = self.shapes.remove(index);
            self.shapes.push(shape);
        }
    }

    pub fn send_to_back(&mut self, id: &ShapeId) {
        if let Some(index) = self.shapes.iter().position(|s| s.id() == id) {
            let shape = self.shapes.remove(index);
            self.shapes.insert(0, shape);
        }
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected_ids.iter().any(|sid| sid == id)
    }

    /// Make `id` the sole selection unless it is already part of one.
    pub fn select_shape(&mut self, id: &ShapeId) {
        if !self.is_selected(id) {
            self.selected_ids = vec![id.clone()];
        }
    }

    pub fn set_selection(&mut self, ids: Vec<ShapeId>) {
        self.selected_ids.clear();
        for id in ids {
            if !self.selected_ids.contains(&id) {
                self.selected_ids.push(id);
            }
        }
    }

    pub fn select_all(&mut self) {
        self.selected_ids = self
            .shapes
            .iter()
            .filter(|s| !s.is_locked())
            .map(|s| s.id().clone())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// The selected shape when exactly one is selected.
    pub fn single_selected(&self) -> Option<&Shape> {
        match self.selected_ids.as_slice() {
            [id] => self.shape(id),
            _ => None,
        }
    }

    pub fn selected_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| self.is_selected(s.id()))
    }

    /// Remove every selected shape, returning the removed shapes in
    /// paint order.
    pub fn delete_selected(&mut self) -> Vec<Shape> {
        if self.selected_ids.is_empty() {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.shapes.len());
        for shape in self.shapes.drain(..) {
            if self.selected_ids.iter().any(|id| id == shape.id()) {
                removed.push(shape);
            } else {
                kept.push(shape);
            }
        }
        self.shapes = kept;
        self.selected_ids.clear();
        removed
    }

    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selected_shapes()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(b))
    }

    pub fn document_bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(b))
    }
}

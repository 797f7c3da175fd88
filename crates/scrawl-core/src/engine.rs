//! The canvas engine: pointer/keyboard interaction, history, clipboard
//! and document load/save behind one facade.

use kurbo::{Point, Rect, Vec2};

use crate::canvas::CanvasState;
use crate::clipboard::{Clipboard, duplicate_shapes};
use crate::document::{CanvasDocument, DOCUMENT_VERSION, DocumentError};
use crate::history::History;
use crate::input::{ClickTracker, Modifiers, MouseButton, MoveThrottle};
use crate::selection::{HandleKind, MIN_SHAPE_SIZE, handle_at, resize_shape};
use crate::shapes::{DEFAULT_PRESSURE, Shape, ShapeId, ShapeStyle, Text, now_millis};
use crate::snap::{snap_line_endpoint, snap_to_grid};
use crate::tools::Tool;

/// Movement below this many document units counts as no movement.
const DRAG_EPSILON: f64 = 0.1;

/// Minimum screen-space travel before a freedraw stroke gains another
/// point.
const FREEDRAW_MIN_STEP: f64 = 2.0;

/// Simplification tolerance applied to freedraw strokes on commit.
const FREEDRAW_SIMPLIFY_TOLERANCE: f64 = 0.5;

/// What the pointer is currently doing.
#[derive(Debug, Clone)]
enum Interaction {
    Idle,
    /// Growing a new shape; it joins the canvas only on commit.
    Drawing { shape: Shape, start: Point },
    /// Dragging out a marquee rectangle.
    Selecting { start: Point, current: Point },
    /// Moving the selection. `applied` is the offset already applied.
    Dragging {
        start: Point,
        applied: Vec2,
        duplicated: bool,
    },
    /// Resizing one shape from a handle, recomputed from `original`.
    Resizing {
        id: ShapeId,
        handle: HandleKind,
        start: Point,
        original: Shape,
    },
    Panning { last_screen: Point },
    /// Editing a text shape. `original` is `None` when the shape was
    /// created by this edit session.
    EditingText {
        id: ShapeId,
        original: Option<String>,
    },
}

/// One canvas with its interaction state machine, undo history and
/// clipboard.
///
/// Pointer positions come in as screen coordinates; the engine converts
/// through the viewport. Hosts forward raw events and call [`tick`]
/// periodically to release throttled pointer moves.
///
/// [`tick`]: CanvasEngine::tick
pub struct CanvasEngine {
    pub canvas: CanvasState,
    history: History,
    clipboard: Clipboard,
    interaction: Interaction,
    hovered_id: Option<ShapeId>,
    marked_for_erase: Vec<ShapeId>,
    throttle: MoveThrottle,
    clicks: ClickTracker,
    last_modifiers: Modifiers,
    space_down: bool,
    doc_version: u32,
    doc_created_at: i64,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasEngine {
    pub fn new() -> Self {
        Self {
            canvas: CanvasState::new(),
            history: History::new(),
            clipboard: Clipboard::new(),
            interaction: Interaction::Idle,
            hovered_id: None,
            marked_for_erase: Vec::new(),
            throttle: MoveThrottle::new(),
            clicks: ClickTracker::new(),
            last_modifiers: Modifiers::default(),
            space_down: false,
            doc_version: DOCUMENT_VERSION,
            doc_created_at: now_millis(),
        }
    }

    /// Build an engine seeded with `doc` as its history baseline.
    pub fn from_document(doc: CanvasDocument) -> Self {
        let mut engine = Self::new();
        engine.load_document(doc);
        engine
    }

    // ---- tool and style facade ----

    pub fn active_tool(&self) -> Tool {
        self.canvas.active_tool
    }

    /// Switch tools. An open text edit commits; an in-progress drawing is
    /// discarded.
    pub fn set_tool(&mut self, tool: Tool) {
        self.commit_text_edit();
        if matches!(self.interaction, Interaction::Drawing { .. }) {
            self.interaction = Interaction::Idle;
            self.marked_for_erase.clear();
        }
        self.canvas.active_tool = tool;
    }

    pub fn current_style(&self) -> &ShapeStyle {
        &self.canvas.current_style
    }

    /// Change the default style. With a selection the change applies to
    /// the selected shapes immediately and commits one history entry.
    pub fn update_style(&mut self, f: impl Fn(&mut ShapeStyle)) {
        f(&mut self.canvas.current_style);
        self.canvas.current_style.sanitize();

        if self.canvas.selected_ids.is_empty() {
            return;
        }
        let now = now_millis();
        let ids = self.canvas.selected_ids.clone();
        for id in &ids {
            if let Some(shape) = self.canvas.shape_mut(id) {
                f(shape.style_mut());
                shape.style_mut().sanitize();
                shape.touch(now);
            }
        }
        self.snapshot();
    }

    pub fn set_current_style(&mut self, style: ShapeStyle) {
        self.update_style(move |s| *s = style.clone());
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.canvas.show_grid = show;
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.canvas.snap_to_grid = snap;
    }

    pub fn set_grid_size(&mut self, size: f64) {
        self.canvas.grid_size = size.max(1.0);
    }

    // ---- interaction queries ----

    pub fn is_idle(&self) -> bool {
        matches!(self.interaction, Interaction::Idle)
    }

    /// The marquee rectangle while one is being dragged out.
    pub fn selection_rect(&self) -> Option<Rect> {
        match &self.interaction {
            Interaction::Selecting { start, current } => {
                Some(Rect::from_points(*start, *current))
            }
            _ => None,
        }
    }

    /// The shape being drawn, before it joins the canvas.
    pub fn drawing_preview(&self) -> Option<&Shape> {
        match &self.interaction {
            Interaction::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub fn editing_text_id(&self) -> Option<&ShapeId> {
        match &self.interaction {
            Interaction::EditingText { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Shapes the active eraser stroke has touched so far. They are
    /// deleted together on pointer-up.
    pub fn pending_erasures(&self) -> &[ShapeId] {
        &self.marked_for_erase
    }

    pub fn hovered(&self) -> Option<&ShapeId> {
        self.hovered_id.as_ref()
    }

    // ---- pointer events ----

    pub fn pointer_down(&mut self, screen: Point, button: MouseButton, modifiers: Modifiers) {
        self.last_modifiers = modifiers;
        self.throttle.reset();
        let point = self.canvas.viewport.screen_to_document(screen);

        // A click outside an open text edit commits it; inside keeps
        // editing.
        if let Interaction::EditingText { id, .. } = &self.interaction {
            let inside = self.canvas.shape(id).is_some_and(|s| s.hit_test(point));
            if inside {
                return;
            }
            self.commit_text_edit();
        }
        if !matches!(self.interaction, Interaction::Idle) {
            return;
        }

        // Middle button always pans; the primary button pans with the pan
        // tool or while space is held.
        let pans = button == MouseButton::Middle
            || (button == MouseButton::Left
                && (self.canvas.active_tool == Tool::Pan || self.space_down));
        if pans {
            self.interaction = Interaction::Panning {
                last_screen: screen,
            };
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        let double_click = self.clicks.register(screen);

        // Double-clicking a text shape opens its editor. Checked before the
        // handle test: a small label sits entirely inside its own handle
        // hotspots, which would otherwise make editing unreachable.
        if double_click && matches!(self.canvas.active_tool, Tool::Select | Tool::Text) {
            if let Some(id) = self.canvas.shape_id_at(point) {
                if matches!(self.canvas.shape(&id), Some(Shape::Text(_))) {
                    self.canvas.select_shape(&id);
                    self.begin_text_edit(id, false);
                    return;
                }
            }
        }

        // A resize handle on the single selected shape beats everything
        // below.
        if let Some(shape) = self.canvas.single_selected() {
            if !shape.is_locked() {
                if let Some(handle) = handle_at(shape, point, self.canvas.viewport.zoom) {
                    self.interaction = Interaction::Resizing {
                        id: shape.id().clone(),
                        handle,
                        start: point,
                        original: shape.clone(),
                    };
                    return;
                }
            }
        }

        match self.canvas.active_tool {
            Tool::Select => self.select_pointer_down(point, modifiers),
            Tool::Text => self.text_pointer_down(point),
            Tool::Pan => {}
            tool => self.drawing_pointer_down(tool, point),
        }
    }

    fn select_pointer_down(&mut self, point: Point, modifiers: Modifiers) {
        match self.canvas.shape_id_at(point) {
            Some(id) => {
                if modifiers.shift {
                    // Shift-click toggles membership without dragging.
                    if self.canvas.is_selected(&id) {
                        self.canvas.selected_ids.retain(|sid| sid != &id);
                    } else {
                        self.canvas.selected_ids.push(id);
                    }
                    return;
                }
                self.canvas.select_shape(&id);
                if modifiers.alt {
                    self.duplicate_selection_in_place();
                }
                self.interaction = Interaction::Dragging {
                    start: point,
                    applied: Vec2::ZERO,
                    duplicated: modifiers.alt,
                };
            }
            None => {
                self.canvas.clear_selection();
                self.interaction = Interaction::Selecting {
                    start: point,
                    current: point,
                };
            }
        }
    }

    fn drawing_pointer_down(&mut self, tool: Tool, point: Point) {
        // Clicking a selected shape with a drawing tool drags it instead.
        if let Some(id) = self.canvas.shape_id_at(point) {
            if self.canvas.is_selected(&id) {
                self.interaction = Interaction::Dragging {
                    start: point,
                    applied: Vec2::ZERO,
                    duplicated: false,
                };
                return;
            }
        }
        self.canvas.clear_selection();

        let start = if self.canvas.snap_to_grid
            && !matches!(tool, Tool::Freedraw | Tool::Eraser)
        {
            snap_to_grid(point, self.canvas.grid_size)
        } else {
            point
        };
        if let Some(shape) = tool.begin_shape(start, &self.canvas.current_style) {
            if shape.is_transient() {
                self.mark_for_erase(point);
            }
            self.interaction = Interaction::Drawing { shape, start };
        }
    }

    fn text_pointer_down(&mut self, point: Point) {
        // Clicking existing text selects and drags it; anywhere else
        // starts a fresh empty label.
        if let Some(id) = self.canvas.shape_id_at(point) {
            if matches!(self.canvas.shape(&id), Some(Shape::Text(_))) {
                self.canvas.select_shape(&id);
                self.interaction = Interaction::Dragging {
                    start: point,
                    applied: Vec2::ZERO,
                    duplicated: false,
                };
                return;
            }
        }

        let position = if self.canvas.snap_to_grid {
            snap_to_grid(point, self.canvas.grid_size)
        } else {
            point
        };
        let mut text = Text::new(position);
        text.style = self.canvas.current_style.clone();
        let id = self.canvas.add_shape(Shape::Text(text));
        self.canvas.set_selection(vec![id.clone()]);
        self.begin_text_edit(id, true);
    }

    /// Process a pointer move, throttled to roughly 60Hz. The trailing
    /// position is held and released by [`tick`] or the next pointer-up.
    ///
    /// [`tick`]: CanvasEngine::tick
    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        self.last_modifiers = modifiers;
        if let Some(position) = self.throttle.submit(screen) {
            self.apply_pointer_move(position, modifiers);
        }
    }

    /// Release a held-back pointer move, if any. Hosts call this once per
    /// frame.
    pub fn tick(&mut self) {
        if let Some(position) = self.throttle.flush() {
            self.apply_pointer_move(position, self.last_modifiers);
        }
    }

    fn apply_pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        let point = self.canvas.viewport.screen_to_document(screen);
        match &mut self.interaction {
            Interaction::Idle => {
                // Hover bookkeeping only; nothing mutates.
                self.hovered_id = self.canvas.shape_id_at(point);
            }
            Interaction::EditingText { .. } => {}
            Interaction::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.canvas.viewport.pan_by(delta);
            }
            Interaction::Selecting { current, .. } => {
                *current = point;
            }
            Interaction::Dragging { start, applied, .. } => {
                // Raw cumulative delta; grid snapping applies only at
                // shape creation.
                let total = point - *start;
                let step = total - *applied;
                if step.x != 0.0 || step.y != 0.0 {
                    *applied = total;
                    let ids = self.canvas.selected_ids.clone();
                    for id in &ids {
                        if let Some(shape) = self.canvas.shape_mut(id) {
                            shape.translate(step);
                        }
                    }
                }
            }
            Interaction::Resizing {
                id,
                handle,
                start,
                original,
            } => {
                let delta = point - *start;
                let resized = resize_shape(original, *handle, delta, modifiers.shift);
                let id = id.clone();
                if let Some(shape) = self.canvas.shape_mut(&id) {
                    *shape = resized;
                }
            }
            Interaction::Drawing { shape, start } => {
                let snap = self.canvas.snap_to_grid;
                let grid = self.canvas.grid_size;
                let zoom = self.canvas.viewport.zoom;
                match shape {
                    Shape::Rectangle(rect) => {
                        let p = if snap { snap_to_grid(point, grid) } else { point };
                        rect.position = Point::new(start.x.min(p.x), start.y.min(p.y));
                        rect.width = (p.x - start.x).abs();
                        rect.height = (p.y - start.y).abs();
                    }
                    Shape::Ellipse(ellipse) => {
                        let p = if snap { snap_to_grid(point, grid) } else { point };
                        ellipse.position = Point::new(start.x.min(p.x), start.y.min(p.y));
                        ellipse.width = (p.x - start.x).abs();
                        ellipse.height = (p.y - start.y).abs();
                    }
                    Shape::Line(line) => {
                        let end = if modifiers.shift {
                            snap_line_endpoint(line.start(), point)
                        } else if snap {
                            snap_to_grid(point, grid)
                        } else {
                            point
                        };
                        line.set_end(end);
                    }
                    Shape::Arrow(arrow) => {
                        let end = if modifiers.shift {
                            snap_line_endpoint(arrow.start(), point)
                        } else if snap {
                            snap_to_grid(point, grid)
                        } else {
                            point
                        };
                        arrow.set_end(end);
                    }
                    Shape::Freedraw(freedraw) => {
                        // Spacing is measured in screen pixels,
                        // independent of zoom.
                        let far_enough = freedraw
                            .last_point()
                            .is_none_or(|last| last.distance(point) * zoom > FREEDRAW_MIN_STEP);
                        if far_enough {
                            freedraw.add_point(point, DEFAULT_PRESSURE);
                        }
                    }
                    Shape::Eraser(eraser) => {
                        eraser.add_point(point);
                        // Mark everything under the stroke as it passes.
                        for candidate in &self.canvas.shapes {
                            if !candidate.is_locked()
                                && candidate.hit_test(point)
                                && !self.marked_for_erase.contains(candidate.id())
                            {
                                self.marked_for_erase.push(candidate.id().clone());
                            }
                        }
                    }
                    Shape::Text(_) => {}
                }
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point, modifiers: Modifiers) {
        if let Some(pending) = self.throttle.flush() {
            self.apply_pointer_move(pending, self.last_modifiers);
        }
        // The final position always lands, bypassing the throttle.
        self.apply_pointer_move(screen, modifiers);
        self.throttle.reset();

        let interaction = std::mem::replace(&mut self.interaction, Interaction::Idle);
        match interaction {
            Interaction::Idle => {}
            editing @ Interaction::EditingText { .. } => {
                // Text editing outlives the click that started it.
                self.interaction = editing;
            }
            Interaction::Panning { .. } => {}
            Interaction::Selecting { start, current } => {
                let rect = Rect::from_points(start, current);
                let ids = self.canvas.shapes_contained_in(rect);
                self.canvas.set_selection(ids);
            }
            Interaction::Dragging {
                applied,
                duplicated,
                ..
            } => {
                if applied.hypot() > DRAG_EPSILON || duplicated {
                    let now = now_millis();
                    let ids = self.canvas.selected_ids.clone();
                    for id in &ids {
                        if let Some(shape) = self.canvas.shape_mut(id) {
                            shape.touch(now);
                        }
                    }
                    self.snapshot();
                }
            }
            Interaction::Resizing { id, original, .. } => {
                let changed = self
                    .canvas
                    .shape(&id)
                    .map(|s| s != &original)
                    .unwrap_or(false);
                if changed {
                    if let Some(shape) = self.canvas.shape_mut(&id) {
                        shape.touch(now_millis());
                    }
                    self.snapshot();
                }
            }
            Interaction::Drawing { shape, .. } => self.finish_drawing(shape),
        }
    }

    fn finish_drawing(&mut self, mut shape: Shape) {
        if shape.is_transient() {
            // Eraser: delete everything the stroke touched, one entry.
            let marked = std::mem::take(&mut self.marked_for_erase);
            if !marked.is_empty() {
                for id in &marked {
                    self.canvas.remove_shape(id);
                }
                log::debug!("Erased {} shapes", marked.len());
                self.snapshot();
            }
            return;
        }

        let commit = match &shape {
            Shape::Freedraw(freedraw) => freedraw.points.len() > 2,
            _ => {
                let bounds = shape.bounds();
                bounds.width() >= MIN_SHAPE_SIZE || bounds.height() >= MIN_SHAPE_SIZE
            }
        };
        if !commit {
            // Too small to keep: no shape, no history entry.
            return;
        }

        if let Shape::Freedraw(freedraw) = &mut shape {
            freedraw.simplify(FREEDRAW_SIMPLIFY_TOLERANCE);
        }
        shape.touch(now_millis());
        let id = self.canvas.add_shape(shape);
        log::debug!("Added shape {id}");
        self.canvas.set_selection(vec![id]);
        self.snapshot();
    }

    fn mark_for_erase(&mut self, point: Point) {
        for candidate in &self.canvas.shapes {
            if !candidate.is_locked()
                && candidate.hit_test(point)
                && !self.marked_for_erase.contains(candidate.id())
            {
                self.marked_for_erase.push(candidate.id().clone());
            }
        }
    }

    // ---- keyboard ----

    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) {
        self.last_modifiers = modifiers;

        if matches!(self.interaction, Interaction::EditingText { .. }) {
            self.editing_key(key);
            return;
        }

        match key {
            " " | "Space" => {
                self.space_down = true;
                return;
            }
            "Escape" => {
                self.cancel_gesture();
                return;
            }
            _ => {}
        }

        if modifiers.command() {
            // Shifted shortcuts arrive with the uppercase key.
            match key.to_ascii_lowercase().as_str() {
                "z" if modifiers.shift => self.redo(),
                "z" => self.undo(),
                "a" => self.select_all(),
                "c" => self.copy(),
                "x" => self.cut(),
                "v" => self.paste(None),
                "d" => self.duplicate_selection(),
                _ => {}
            }
            return;
        }

        match key {
            "Delete" | "Backspace" => self.delete_selection(),
            _ => {
                if let Some(tool) = Tool::from_shortcut(key) {
                    self.set_tool(tool);
                }
            }
        }
    }

    pub fn key_up(&mut self, key: &str, modifiers: Modifiers) {
        self.last_modifiers = modifiers;
        if matches!(key, " " | "Space") {
            self.space_down = false;
        }
    }

    fn editing_key(&mut self, key: &str) {
        match key {
            "Escape" => self.cancel_text_edit(),
            "Enter" => self.editing_insert('\n'),
            "Backspace" => {
                if let Interaction::EditingText { id, .. } = &self.interaction {
                    let id = id.clone();
                    if let Some(Shape::Text(text)) = self.canvas.shape_mut(&id) {
                        text.pop_char();
                    }
                }
            }
            _ => {
                let mut chars = key.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    self.editing_insert(ch);
                }
                // Multi-character named keys are ignored.
            }
        }
    }

    fn editing_insert(&mut self, ch: char) {
        if let Interaction::EditingText { id, .. } = &self.interaction {
            let id = id.clone();
            if let Some(Shape::Text(text)) = self.canvas.shape_mut(&id) {
                text.push_char(ch);
            }
        }
    }

    /// Escape: abandon an in-progress drawing or text edit, or drop the
    /// selection when idle. Drags and resizes run to pointer-up and
    /// cannot be cancelled mid-gesture.
    fn cancel_gesture(&mut self) {
        match &self.interaction {
            Interaction::Drawing { .. } => {
                self.interaction = Interaction::Idle;
                self.marked_for_erase.clear();
            }
            Interaction::Selecting { .. } => {
                self.interaction = Interaction::Idle;
            }
            Interaction::EditingText { .. } => self.cancel_text_edit(),
            Interaction::Idle => self.canvas.clear_selection(),
            _ => {}
        }
    }

    // ---- text editing ----

    fn begin_text_edit(&mut self, id: ShapeId, created: bool) {
        let original = if created {
            None
        } else {
            match self.canvas.shape(&id) {
                Some(Shape::Text(text)) => Some(text.text.clone()),
                _ => return,
            }
        };
        self.interaction = Interaction::EditingText { id, original };
    }

    /// Close the editor, keeping its result. Empty text deletes the
    /// shape; a deleted pre-existing label and any content change each
    /// commit one history entry.
    fn commit_text_edit(&mut self) {
        let interaction = std::mem::replace(&mut self.interaction, Interaction::Idle);
        let (id, original) = match interaction {
            Interaction::EditingText { id, original } => (id, original),
            other => {
                self.interaction = other;
                return;
            }
        };

        let is_empty = match self.canvas.shape(&id) {
            Some(Shape::Text(text)) => text.is_empty(),
            _ => return,
        };
        if is_empty {
            self.canvas.remove_shape(&id);
            // A never-filled new label vanishes without a trace; emptying
            // an existing one is a real deletion.
            if original.is_some_and(|o| !o.trim().is_empty()) {
                self.snapshot();
            }
            return;
        }

        let changed = match (&original, self.canvas.shape(&id)) {
            (None, _) => true,
            (Some(prev), Some(Shape::Text(text))) => prev != &text.text,
            _ => false,
        };
        if changed {
            if let Some(shape) = self.canvas.shape_mut(&id) {
                shape.touch(now_millis());
            }
            self.snapshot();
        }
    }

    /// Close the editor discarding its result; no history entry either
    /// way.
    fn cancel_text_edit(&mut self) {
        let interaction = std::mem::replace(&mut self.interaction, Interaction::Idle);
        let (id, original) = match interaction {
            Interaction::EditingText { id, original } => (id, original),
            other => {
                self.interaction = other;
                return;
            }
        };
        match original {
            None => {
                self.canvas.remove_shape(&id);
            }
            Some(previous) => {
                if let Some(Shape::Text(text)) = self.canvas.shape_mut(&id) {
                    text.set_text(&previous);
                }
            }
        }
    }

    // ---- history ----

    fn snapshot(&mut self) {
        self.history.record(&self.canvas.shapes);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if !self.is_idle() {
            return;
        }
        if let Some(shapes) = self.history.undo() {
            self.canvas.shapes = shapes;
            self.canvas.clear_selection();
            self.hovered_id = None;
        }
    }

    pub fn redo(&mut self) {
        if !self.is_idle() {
            return;
        }
        if let Some(shapes) = self.history.redo() {
            self.canvas.shapes = shapes;
            self.canvas.clear_selection();
            self.hovered_id = None;
        }
    }

    // ---- clipboard and selection operations ----

    pub fn copy(&mut self) {
        let shapes: Vec<Shape> = self.canvas.selected_shapes().cloned().collect();
        self.clipboard.copy(&shapes);
    }

    pub fn cut(&mut self) {
        self.copy();
        let removed = self.canvas.delete_selected();
        if !removed.is_empty() {
            self.snapshot();
        }
    }

    /// Paste the clipboard. With a document-space position the pasted
    /// group is centered on it; without one each paste stair-steps
    /// down-right.
    pub fn paste(&mut self, position: Option<Point>) {
        let pasted = self.clipboard.paste(position);
        if pasted.is_empty() {
            return;
        }
        let mut ids = Vec::with_capacity(pasted.len());
        for shape in pasted {
            ids.push(self.canvas.add_shape(shape));
        }
        self.canvas.set_selection(ids);
        self.snapshot();
    }

    pub fn duplicate_selection(&mut self) {
        let selected: Vec<Shape> = self.canvas.selected_shapes().cloned().collect();
        if selected.is_empty() {
            return;
        }
        let dupes = duplicate_shapes(&selected);
        let mut ids = Vec::with_capacity(dupes.len());
        for shape in dupes {
            ids.push(self.canvas.add_shape(shape));
        }
        self.canvas.set_selection(ids);
        self.snapshot();
    }

    /// Clone the selection in place for alt-drag; the clones become the
    /// selection and are what the drag moves.
    fn duplicate_selection_in_place(&mut self) {
        let selected: Vec<Shape> = self.canvas.selected_shapes().cloned().collect();
        if selected.is_empty() {
            return;
        }
        let now = now_millis();
        let mut ids = Vec::with_capacity(selected.len());
        for shape in &selected {
            let mut clone = shape.clone();
            clone.regenerate_id();
            clone.reseed();
            clone.touch(now);
            ids.push(self.canvas.add_shape(clone));
        }
        self.canvas.set_selection(ids);
    }

    pub fn delete_selection(&mut self) {
        let removed = self.canvas.delete_selected();
        if !removed.is_empty() {
            log::debug!("Deleted {} shapes", removed.len());
            self.snapshot();
        }
    }

    pub fn select_all(&mut self) {
        self.canvas.select_all();
    }

    pub fn bring_selection_to_front(&mut self) {
        let ids: Vec<ShapeId> = self
            .canvas
            .selected_shapes()
            .map(|s| s.id().clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        for id in &ids {
            self.canvas.bring_to_front(id);
        }
        self.snapshot();
    }

    pub fn send_selection_to_back(&mut self) {
        let ids: Vec<ShapeId> = self
            .canvas
            .selected_shapes()
            .map(|s| s.id().clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        // Reversed so the group keeps its relative order at the back.
        for id in ids.iter().rev() {
            self.canvas.send_to_back(id);
        }
        self.snapshot();
    }

    /// Lock the selected shapes and drop them from the selection. Locked
    /// shapes ignore clicks, marquee selection, and the eraser until
    /// unlocked.
    pub fn lock_selection(&mut self) {
        let ids: Vec<ShapeId> = self
            .canvas
            .selected_shapes()
            .map(|s| s.id().clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        let now = now_millis();
        for id in &ids {
            if let Some(shape) = self.canvas.shape_mut(id) {
                shape.set_locked(true);
                shape.touch(now);
            }
        }
        self.canvas.clear_selection();
        self.snapshot();
    }

    /// Unlock every locked shape in one committed step.
    pub fn unlock_all(&mut self) {
        let now = now_millis();
        let mut changed = false;
        for shape in &mut self.canvas.shapes {
            if shape.is_locked() {
                shape.set_locked(false);
                shape.touch(now);
                changed = true;
            }
        }
        if changed {
            self.snapshot();
        }
    }

    // ---- documents ----

    /// Replace the canvas with a loaded document. Selection clears and
    /// history restarts from this state as its single baseline.
    pub fn load_document(&mut self, doc: CanvasDocument) {
        self.interaction = Interaction::Idle;
        self.marked_for_erase.clear();
        self.hovered_id = None;
        self.canvas.shapes = doc.shapes;
        self.canvas.clear_selection();
        self.canvas.viewport = doc.viewport;
        self.canvas.current_style = doc.style;
        self.doc_version = doc.version;
        self.doc_created_at = doc.created_at;
        self.history.reset(&self.canvas.shapes);
        log::debug!("Loaded document with {} shapes", self.canvas.shapes.len());
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let doc = CanvasDocument::from_json(json)?;
        self.load_document(doc);
        Ok(())
    }

    pub fn to_document(&self) -> CanvasDocument {
        CanvasDocument::from_canvas(&self.canvas, self.doc_version, self.doc_created_at)
    }

    pub fn save_json(&self) -> Result<String, DocumentError> {
        self.to_document().to_json()
    }
}

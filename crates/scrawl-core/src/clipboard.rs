//! Internal clipboard: copied shapes plus stair-step paste placement.

use kurbo::{Point, Rect, Vec2};

use crate::shapes::{Shape, now_millis};

/// Offset applied per unpositioned paste, and by duplicate.
pub const PASTE_OFFSET_STEP: f64 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    buffer: Vec<Shape>,
    paste_offset: f64,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Store clones of `shapes` and reset the stair-step offset.
    pub fn copy(&mut self, shapes: &[Shape]) {
        if shapes.is_empty() {
            return;
        }
        self.buffer = shapes.to_vec();
        self.paste_offset = 0.0;
    }

    /// Materialize clones of the buffered shapes with fresh ids and seeds.
    ///
    /// With a position the combined bounding box is centered on it; without
    /// one each paste lands a further `PASTE_OFFSET_STEP` down-right from
    /// the copied originals.
    pub fn paste(&mut self, position: Option<Point>) -> Vec<Shape> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let delta = match position {
            Some(target) => {
                let center = combined_bounds(&self.buffer).center();
                target - center
            }
            None => {
                self.paste_offset += PASTE_OFFSET_STEP;
                Vec2::new(self.paste_offset, self.paste_offset)
            }
        };
        self.buffer
            .iter()
            .map(|shape| {
                let mut clone = freshen(shape);
                clone.translate(delta);
                clone
            })
            .collect()
    }
}

/// Clone `shapes` with fresh identity, offset by a fixed (+20, +20).
pub fn duplicate_shapes(shapes: &[Shape]) -> Vec<Shape> {
    shapes
        .iter()
        .map(|shape| {
            let mut clone = freshen(shape);
            clone.translate(Vec2::new(PASTE_OFFSET_STEP, PASTE_OFFSET_STEP));
            clone
        })
        .collect()
}

fn freshen(shape: &Shape) -> Shape {
    let mut clone = shape.clone();
    clone.regenerate_id();
    clone.reseed();
    clone.touch(now_millis());
    clone
}

fn combined_bounds(shapes: &[Shape]) -> Rect {
    let mut iter = shapes.iter();
    let mut rect = match iter.next() {
        Some(shape) => shape.bounds(),
        None => return Rect::ZERO,
    };
    for shape in iter {
        rect = rect.union(shape.bounds());
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};

    fn rect_at(x: f64, y: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), 40.0, 20.0))
    }

    #[test]
    fn paste_offsets_increase_evenly() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&[rect_at(0.0, 0.0)]);

        let mut xs = Vec::new();
        for _ in 0..3 {
            let pasted = clipboard.paste(None);
            xs.push(pasted[0].bounds().x0);
        }
        assert_eq!(xs, vec![20.0, 40.0, 60.0]);
    }

    #[test]
    fn copy_resets_stair_step() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&[rect_at(0.0, 0.0)]);
        clipboard.paste(None);
        clipboard.paste(None);

        clipboard.copy(&[rect_at(0.0, 0.0)]);
        let pasted = clipboard.paste(None);
        assert!((pasted[0].bounds().x0 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn paste_assigns_fresh_identity() {
        let source = rect_at(5.0, 5.0);
        let source_id = source.id().clone();
        let source_seed = source.seed();

        let mut clipboard = Clipboard::new();
        clipboard.copy(&[source]);
        let first = clipboard.paste(None);
        let second = clipboard.paste(None);

        assert_ne!(first[0].id(), &source_id);
        assert_ne!(first[0].id(), second[0].id());
        assert_ne!(first[0].seed(), source_seed);
        assert_ne!(first[0].seed(), second[0].seed());
    }

    #[test]
    fn positioned_paste_centers_combined_bounds() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&[rect_at(0.0, 0.0), rect_at(100.0, 60.0)]);

        let pasted = clipboard.paste(Some(Point::new(300.0, 200.0)));
        let bounds = pasted
            .iter()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(b))
            .unwrap();
        assert!((bounds.center().x - 300.0).abs() < 1e-9);
        assert!((bounds.center().y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn positioned_paste_does_not_advance_offset() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&[rect_at(0.0, 0.0)]);
        clipboard.paste(Some(Point::new(500.0, 500.0)));

        let pasted = clipboard.paste(None);
        assert!((pasted[0].bounds().x0 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_applies_fixed_offset() {
        let source = rect_at(10.0, 10.0);
        let source_id = source.id().clone();

        let dupes = duplicate_shapes(&[source]);
        assert_eq!(dupes.len(), 1);
        assert_ne!(dupes[0].id(), &source_id);
        assert!((dupes[0].bounds().x0 - 30.0).abs() < 1e-9);
        assert!((dupes[0].bounds().y0 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn empty_clipboard_pastes_nothing() {
        let mut clipboard = Clipboard::new();
        assert!(clipboard.paste(None).is_empty());
        assert!(clipboard.is_empty());
    }
}

//! Linear undo history over deep-cloned shape lists.

use crate::shapes::{Shape, now_millis};

/// Oldest entries are dropped past this many.
pub const MAX_HISTORY: usize = 100;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub shapes: Vec<Shape>,
    pub timestamp: i64,
}

/// Flat list of snapshots plus a cursor. The cursor points at the entry
/// matching the current document; recording from a rewound cursor discards
/// the abandoned branch.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: vec![HistoryEntry {
                shapes: Vec::new(),
                timestamp: now_millis(),
            }],
            cursor: 0,
        }
    }

    /// Drop everything and start over with `shapes` as the single baseline.
    pub fn reset(&mut self, shapes: &[Shape]) {
        self.entries.clear();
        self.entries.push(HistoryEntry {
            shapes: shapes.to_vec(),
            timestamp: now_millis(),
        });
        self.cursor = 0;
    }

    /// Snapshot the current shape list as a new entry after the cursor.
    pub fn record(&mut self, shapes: &[Shape]) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            shapes: shapes.to_vec(),
            timestamp: now_millis(),
        });
        self.cursor = self.entries.len() - 1;
        if self.entries.len() > MAX_HISTORY {
            let excess = self.entries.len() - MAX_HISTORY;
            self.entries.drain(0..excess);
            self.cursor -= excess;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back one entry and return a clone of its shapes, or `None`
    /// at the start of history.
    pub fn undo(&mut self) -> Option<Vec<Shape>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].shapes.clone())
    }

    /// Step forward one entry and return a clone of its shapes, or `None`
    /// at the end of history.
    pub fn redo(&mut self) -> Option<Vec<Shape>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].shapes.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use kurbo::Point;

    fn rect(x: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, 0.0), 10.0, 10.0))
    }

    #[test]
    fn undo_restores_previous_snapshot() {
        let mut history = History::new();
        history.record(&[rect(1.0)]);
        history.record(&[rect(1.0), rect(2.0)]);

        let shapes = history.undo().unwrap();
        assert_eq!(shapes.len(), 1);
        let shapes = history.undo().unwrap();
        assert!(shapes.is_empty());
        assert!(history.undo().is_none());
    }

    #[test]
    fn redo_walks_forward_again() {
        let mut history = History::new();
        history.record(&[rect(1.0)]);
        history.undo().unwrap();

        let shapes = history.redo().unwrap();
        assert_eq!(shapes.len(), 1);
        assert!(history.redo().is_none());
    }

    #[test]
    fn recording_after_undo_discards_branch() {
        let mut history = History::new();
        history.record(&[rect(1.0)]);
        history.record(&[rect(1.0), rect(2.0)]);
        history.undo().unwrap();
        history.undo().unwrap();

        history.record(&[rect(9.0)]);
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        // Baseline plus the new branch; the two old entries are gone.
        assert_eq!(history.len(), 2);

        let shapes = history.undo().unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn capped_at_max_entries() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY + 30) {
            history.record(&[rect(i as f64)]);
        }
        assert_eq!(history.len(), MAX_HISTORY);

        // Rewind all the way; the oldest surviving entry is not the baseline.
        let mut last = Vec::new();
        while let Some(shapes) = history.undo() {
            last = shapes;
        }
        assert_eq!(last.len(), 1);
        match &last[0] {
            Shape::Rectangle(r) => assert!(r.position.x > 0.0),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn reset_installs_single_baseline() {
        let mut history = History::new();
        history.record(&[rect(1.0)]);
        history.record(&[rect(2.0)]);

        history.reset(&[rect(7.0)]);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
    }
}

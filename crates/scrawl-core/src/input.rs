//! Pointer/keyboard input primitives: buttons, modifiers, double-click
//! detection and pointer-move throttling.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double-clicks from successive pointer-down positions.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_time: Option<Instant>,
    last_position: Option<Point>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pointer-down; returns true when it completes a
    /// double-click. A detected double-click resets the tracker so a
    /// triple-click does not count twice.
    pub fn register(&mut self, position: Point) -> bool {
        let now = Instant::now();
        if let (Some(last_time), Some(last_pos)) = (self.last_time, self.last_position) {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = position.distance(last_pos);
            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                self.last_time = None;
                self.last_position = None;
                return true;
            }
        }
        self.last_time = Some(now);
        self.last_position = Some(position);
        false
    }
}

/// Target interval between processed pointer-move events (~60Hz).
const MOVE_INTERVAL: Duration = Duration::from_millis(16);

/// Leading-plus-trailing throttle for pointer-move floods.
///
/// The first move in a quiet period passes through immediately; moves
/// arriving faster than [`MOVE_INTERVAL`] replace a pending position that
/// [`MoveThrottle::flush`] releases later, so the final pointer position
/// is never lost.
#[derive(Debug, Clone, Default)]
pub struct MoveThrottle {
    last_emit: Option<Instant>,
    pending: Option<Point>,
}

impl MoveThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a move; returns the position to process now, if any.
    pub fn submit(&mut self, position: Point) -> Option<Point> {
        let now = Instant::now();
        let due = match self.last_emit {
            Some(last) => now.duration_since(last) >= MOVE_INTERVAL,
            None => true,
        };
        if due {
            self.last_emit = Some(now);
            self.pending = None;
            Some(position)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// Release the trailing position, if one was held back.
    pub fn flush(&mut self) -> Option<Point> {
        let pending = self.pending.take();
        if pending.is_some() {
            self.last_emit = Some(Instant::now());
        }
        pending
    }

    pub fn reset(&mut self) {
        self.last_emit = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn double_click_within_window() {
        let mut tracker = ClickTracker::new();
        let pos = Point::new(100.0, 100.0);

        assert!(!tracker.register(pos));
        assert!(tracker.register(pos));
    }

    #[test]
    fn far_apart_clicks_are_single() {
        let mut tracker = ClickTracker::new();

        assert!(!tracker.register(Point::new(100.0, 100.0)));
        assert!(!tracker.register(Point::new(200.0, 200.0)));
    }

    #[test]
    fn triple_click_counts_once() {
        let mut tracker = ClickTracker::new();
        let pos = Point::new(50.0, 50.0);

        assert!(!tracker.register(pos));
        assert!(tracker.register(pos));
        // Tracker was reset, so the third click starts a new pair.
        assert!(!tracker.register(pos));
    }

    #[test]
    fn throttle_passes_leading_edge() {
        let mut throttle = MoveThrottle::new();
        assert_eq!(
            throttle.submit(Point::new(1.0, 1.0)),
            Some(Point::new(1.0, 1.0))
        );
    }

    #[test]
    fn throttle_holds_burst_and_flushes_last() {
        let mut throttle = MoveThrottle::new();
        throttle.submit(Point::new(1.0, 1.0));

        assert_eq!(throttle.submit(Point::new(2.0, 2.0)), None);
        assert_eq!(throttle.submit(Point::new(3.0, 3.0)), None);
        assert_eq!(throttle.flush(), Some(Point::new(3.0, 3.0)));
        assert_eq!(throttle.flush(), None);
    }

    #[test]
    fn throttle_reopens_after_interval() {
        let mut throttle = MoveThrottle::new();
        throttle.submit(Point::new(1.0, 1.0));
        sleep(MOVE_INTERVAL + Duration::from_millis(5));

        assert_eq!(
            throttle.submit(Point::new(2.0, 2.0)),
            Some(Point::new(2.0, 2.0))
        );
    }
}

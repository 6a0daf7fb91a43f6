//! Keyboard and swipe input
//!
//! Both sources collapse into a single pending direction. Boundary checks are
//! left to the simulation.

use glam::Vec2;

use crate::consts::MIN_SWIPE_DISTANCE;
use crate::sim::Direction;

/// Map a `KeyboardEvent.key` value to a direction
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Classify a swipe by its dominant axis.
///
/// Screen coordinates, so positive `y` is down. Equal travel on both axes
/// counts as vertical. Travel at or below `min_distance` is ignored.
pub fn swipe_direction(delta: Vec2, min_distance: f32) -> Option<Direction> {
    if delta.x.abs() > delta.y.abs() {
        if delta.x.abs() <= min_distance {
            return None;
        }
        Some(if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        if delta.y.abs() <= min_distance {
            return None;
        }
        Some(if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Tracks one touch from start to end
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<Vec2>,
    min_distance: f32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(MIN_SWIPE_DISTANCE)
    }
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            start: None,
            min_distance,
        }
    }

    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
    }

    /// Finish the gesture. Without a matching `begin` nothing is emitted.
    pub fn end(&mut self, pos: Vec2) -> Option<Direction> {
        let start = self.start.take()?;
        swipe_direction(pos - start, self.min_distance)
    }
}

/// Anything holding a pending-direction slot
pub trait DirectionSink {
    /// Store `direction` unless it reverses the current heading
    fn set_pending_direction(&mut self, direction: Direction) -> bool;
}

impl DirectionSink for crate::sim::GridModel {
    fn set_pending_direction(&mut self, direction: Direction) -> bool {
        crate::sim::GridModel::set_pending_direction(self, direction)
    }
}

impl DirectionSink for crate::sim::Simulation {
    fn set_pending_direction(&mut self, direction: Direction) -> bool {
        crate::sim::Simulation::set_pending_direction(self, direction)
    }
}

/// Normalizes key presses and swipes into a direction sink
#[derive(Debug, Clone, Default)]
pub struct InputController {
    swipe: SwipeTracker,
}

impl InputController {
    pub fn new(min_swipe_distance: f32) -> Self {
        Self {
            swipe: SwipeTracker::new(min_swipe_distance),
        }
    }

    /// Handle a key press. Returns true when the key is one we consume,
    /// so the caller can suppress the browser default (page scrolling).
    pub fn key_down(&mut self, key: &str, sink: &mut impl DirectionSink) -> bool {
        match direction_for_key(key) {
            Some(direction) => {
                sink.set_pending_direction(direction);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.swipe.begin(pos);
    }

    pub fn touch_end(&mut self, pos: Vec2, sink: &mut impl DirectionSink) -> Option<Direction> {
        let direction = self.swipe.end(pos)?;
        sink.set_pending_direction(direction);
        Some(direction)
    }
}

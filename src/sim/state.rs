//! Grid model and core simulation types
//!
//! Pure data: board dimensions, the actor's body, the target cell, score and
//! the two direction slots. Only `Simulation::step` mutates a live model.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Grid cell, `x` is the column and `y` the row (0-indexed, y grows downward)
pub type Position = IVec2;

/// Movement direction of the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in grid coordinates
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.reverse() == other
    }
}

/// Board configuration, fixed once a session begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub cols: i32,
    pub rows: i32,
    /// Cell edge in pixels
    pub cell_size: u32,
}

impl BoardConfig {
    pub fn new(cols: i32, rows: i32, cell_size: u32) -> Self {
        Self {
            cols,
            rows,
            cell_size,
        }
    }

    /// Size a board to the available viewport width.
    ///
    /// `cell = floor(min(available, cols * base) / cols)`, never below one pixel.
    pub fn fit_width(cols: i32, rows: i32, base_cell_size: u32, available_width: Option<f64>) -> Self {
        let preferred = f64::from(cols) * f64::from(base_cell_size);
        let width = available_width.map_or(preferred, |w| w.min(preferred));
        let cell_size = (width / f64::from(cols)).floor().max(1.0) as u32;
        Self::new(cols, rows, cell_size)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.cols as u32 * self.cell_size,
            self.rows as u32 * self.cell_size,
        )
    }
}

/// The player-controlled body. The head is the back of the deque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    body: VecDeque<Position>,
}

impl Actor {
    /// Build an actor from tail to head. Returns `None` for an empty body.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self { body })
    }

    /// Two segments centred on the board, heading right
    pub fn centered(board: &BoardConfig) -> Self {
        let cx = board.cols / 2;
        let cy = board.rows / 2;
        Self {
            body: VecDeque::from([Position::new(cx - 1, cy), Position::new(cx, cy)]),
        }
    }

    pub fn head(&self) -> Position {
        // body is never empty: constructors reject it and step only pops after a push
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Segments from tail to head
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_back(pos);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_front();
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// No free cell left for the target; the player filled the board
    BoardFull,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    GameOver(EndReason),
}

/// Complete state of one session's board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridModel {
    pub board: BoardConfig,
    pub actor: Actor,
    pub target: Position,
    pub score: u32,
    /// Direction applied on the current tick
    pub direction: Direction,
    /// Direction requested by input, committed on the next tick
    pub pending_direction: Direction,
}

impl GridModel {
    /// Assemble a model, rejecting a target outside the board or on the actor.
    pub fn new(board: BoardConfig, actor: Actor, target: Position, direction: Direction) -> Option<Self> {
        if !board.contains(target) || actor.contains(target) {
            return None;
        }
        Some(Self {
            board,
            actor,
            target,
            score: 0,
            direction,
            pending_direction: direction,
        })
    }

    /// Store a requested direction unless it reverses the current one.
    ///
    /// Last write before a tick wins. Returns whether the request was stored.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_scales_down_on_narrow_viewport() {
        let board = BoardConfig::fit_width(16, 16, 24, Some(300.0));
        assert_eq!(board.cell_size, 18);
        assert_eq!(board.pixel_size(), (288, 288));

        let wide = BoardConfig::fit_width(16, 16, 24, Some(1920.0));
        assert_eq!(wide.cell_size, 24);

        let unknown = BoardConfig::fit_width(16, 16, 24, None);
        assert_eq!(unknown.cell_size, 24);
    }

    #[test]
    fn test_fit_width_never_zero() {
        let board = BoardConfig::fit_width(16, 16, 24, Some(-40.0));
        assert_eq!(board.cell_size, 1);
    }

    #[test]
    fn test_centered_actor() {
        let board = BoardConfig::new(16, 16, 24);
        let actor = Actor::centered(&board);
        let segments: Vec<_> = actor.segments().collect();
        assert_eq!(segments, vec![Position::new(7, 8), Position::new(8, 8)]);
        assert_eq!(actor.head(), Position::new(8, 8));
    }

    #[test]
    fn test_model_rejects_target_on_actor() {
        let board = BoardConfig::new(16, 16, 24);
        let actor = Actor::centered(&board);
        assert!(GridModel::new(board, actor.clone(), Position::new(8, 8), Direction::Right).is_none());
        assert!(GridModel::new(board, actor.clone(), Position::new(16, 0), Direction::Right).is_none());
        assert!(GridModel::new(board, actor, Position::new(0, 0), Direction::Right).is_some());
    }

    #[test]
    fn test_reverse_direction_rejected() {
        let board = BoardConfig::new(16, 16, 24);
        let mut model =
            GridModel::new(board, Actor::centered(&board), Position::new(0, 0), Direction::Down).unwrap();
        assert!(!model.set_pending_direction(Direction::Up));
        assert_eq!(model.pending_direction, Direction::Down);
        assert!(model.set_pending_direction(Direction::Left));
        assert!(model.set_pending_direction(Direction::Right));
        assert_eq!(model.pending_direction, Direction::Right);
    }

    #[test]
    fn test_empty_actor_rejected() {
        assert!(Actor::from_segments(Vec::new()).is_none());
    }
}

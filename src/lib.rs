//! Grid Snake - a catch-the-target grid game with a pluggable leaderboard
//!
//! Core modules:
//! - `sim`: Deterministic grid simulation (model, step, target placement)
//! - `input`: Keyboard and swipe normalization
//! - `renderer`: 2D surface painting with sprite fallbacks
//! - `game_loop`: Session lifecycle, tick scheduling, end-of-session flow
//! - `score_store`: Local and remote high score persistence
//! - `platform`: Browser/native platform abstraction

pub mod config;
pub mod game_loop;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod score_store;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{GameConfig, StorageBackend};
pub use game_loop::{GameLoop, LoopState, NameChoice, ScoreKeeper, TickResult};
pub use highscores::{HighScores, ScoreEntry};
pub use score_store::{LocalScoreStore, RemoteScoreStore, ScoreStore};

/// Game configuration constants
pub mod consts {
    /// Board dimensions in cells
    pub const BOARD_COLS: i32 = 16;
    pub const BOARD_ROWS: i32 = 16;
    /// Largest board side accepted from config
    pub const MAX_BOARD_DIM: i32 = 256;
    /// Preferred cell edge in pixels
    pub const BASE_CELL_SIZE: u32 = 24;
    pub const MAX_CELL_SIZE: u32 = 256;
    /// Horizontal space reserved around the canvas
    pub const VIEWPORT_MARGIN: f64 = 40.0;
    /// Maximum sprite size in cells
    pub const IMAGE_SCALE: f64 = 3.0;
    /// Simulation period
    pub const TICK_MS: u32 = 180;
    /// Shorter swipes are ignored
    pub const MIN_SWIPE_DISTANCE: f32 = 30.0;
    /// Default sprite images, relative to the host page
    pub const HEAD_SPRITE: &str = "images/snake/head.png";
    pub const TARGET_SPRITE: &str = "images/snake/target.png";

    /// Leaderboard length
    pub const MAX_HIGH_SCORES: usize = 5;
    /// Key of the local leaderboard
    pub const STORAGE_KEY: &str = "snakeHighScores";
    pub const DEFAULT_GUEST_NAME: &str = "Guest";
    /// Longest name accepted by the prompt
    pub const MAX_NAME_LEN: usize = 20;
}

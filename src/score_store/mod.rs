//! Pluggable high score persistence
//!
//! Two interchangeable backends behind one capability:
//! - `LocalScoreStore`: JSON list under a single key in a key-value store
//! - `RemoteScoreStore`: HTTP endpoint speaking `getScores` / `saveScore`
//!
//! The backend is chosen once, when the store is built. Neither operation
//! fails from the caller's point of view: problems are logged and the
//! result degrades to an empty or previously stored list.

pub mod local;
pub mod remote;

pub use local::LocalScoreStore;
pub use remote::RemoteScoreStore;

use crate::highscores::ScoreEntry;

/// Internal persistence failures. Logged, never surfaced to the player.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("server answered with status {status}")]
    Http { status: u16 },
    #[error("malformed score data: {0}")]
    Decode(String),
    #[error("could not encode scores: {0}")]
    Encode(String),
}

/// High score persistence capability
#[allow(async_fn_in_trait)]
pub trait ScoreStore {
    /// Up to five entries, best first. Empty on any failure.
    async fn get_high_scores(&self) -> Vec<ScoreEntry>;

    /// Record a result and return the resulting top five
    async fn save_score(&self, name: &str, score: u32) -> Vec<ScoreEntry>;
}

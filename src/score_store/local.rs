//! Key-value backed score store

use crate::consts::{DEFAULT_GUEST_NAME, STORAGE_KEY};
use crate::highscores::{HighScores, ScoreEntry};
use crate::platform::{KeyValueStore, now_ms};

use super::{ScoreStore, StoreError};

/// Leaderboard kept as a JSON array under one key
#[derive(Debug, Clone)]
pub struct LocalScoreStore<K> {
    storage: K,
    key: String,
    guest_name: String,
}

impl<K: KeyValueStore> LocalScoreStore<K> {
    pub fn new(storage: K) -> Self {
        Self::with_key(storage, STORAGE_KEY, DEFAULT_GUEST_NAME)
    }

    pub fn with_key(storage: K, key: &str, guest_name: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
            guest_name: guest_name.to_string(),
        }
    }

    fn read(&self) -> Result<HighScores, StoreError> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(HighScores::new());
        };
        let entries: Vec<ScoreEntry> =
            serde_json::from_str(&json).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(HighScores::from_stored(entries, &self.guest_name))
    }

    fn write(&self, scores: &HighScores) -> Result<(), StoreError> {
        let json = serde_json::to_string(scores).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.storage.set(&self.key, &json)
    }

    fn load(&self) -> HighScores {
        match self.read() {
            Ok(scores) => {
                log::debug!("Loaded {} high scores", scores.len());
                scores
            }
            Err(e) => {
                log::error!("Could not read high scores from '{}': {}", self.key, e);
                HighScores::new()
            }
        }
    }
}

impl<K: KeyValueStore> ScoreStore for LocalScoreStore<K> {
    async fn get_high_scores(&self) -> Vec<ScoreEntry> {
        self.load().into_entries()
    }

    async fn save_score(&self, name: &str, score: u32) -> Vec<ScoreEntry> {
        let mut scores = self.load();
        let entry = ScoreEntry::new(name, score, now_ms(), &self.guest_name);
        match scores.add(entry) {
            Some(rank) => log::info!("Score {} ranked #{}", score, rank),
            None => log::info!("Score {} did not make the leaderboard", score),
        }
        match self.write(&scores) {
            Ok(()) => log::info!("High scores saved ({} entries)", scores.len()),
            Err(e) => log::error!("Could not save high scores: {}", e),
        }
        scores.into_entries()
    }
}

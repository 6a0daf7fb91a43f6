//! High score leaderboard
//!
//! Keeps the top five entries, highest score first. Equal scores keep
//! their arrival order.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GUEST_NAME, MAX_HIGH_SCORES};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player's name, never empty once created through `ScoreEntry::new`
    /// or read back through `HighScores::from_stored`
    #[serde(default)]
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) when achieved. Remote backends may omit it.
    #[serde(default)]
    pub timestamp: f64,
}

impl ScoreEntry {
    /// New entry; a blank name becomes `guest_name`
    pub fn new(name: &str, score: u32, timestamp: f64, guest_name: &str) -> Self {
        Self {
            name: player_name_or(name, guest_name),
            score,
            timestamp,
        }
    }
}

/// Trimmed player name, or the guest label when nothing is left
pub fn player_name_or(name: &str, guest_name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        if guest_name.is_empty() {
            DEFAULT_GUEST_NAME.to_string()
        } else {
            guest_name.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rank an arbitrary list: stable sort by score, descending, then cut to size
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        // sort_by is stable, so ties stay in arrival order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Rank entries read back from a backend. Blank or missing names are
    /// shown under `guest_name` instead of dropping the entry.
    pub fn from_stored(entries: Vec<ScoreEntry>, guest_name: &str) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut entry| {
                entry.name = player_name_or(&entry.name, guest_name);
                entry
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Check if a score would make the list
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // A tie with the last entry loses to the earlier arrival
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry, re-rank and trim.
    /// Returns the rank achieved (1-indexed) or None if it fell off the list.
    pub fn add(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score);

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        match pos {
            Some(i) => self.entries.insert(i, entry),
            None => self.entries.push(entry),
        }
        self.entries.truncate(MAX_HIGH_SCORES);

        rank
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_entries(self) -> Vec<ScoreEntry> {
        self.entries
    }
}

/// Lines for a text leaderboard, or `None` when there is nothing to show
pub fn leaderboard_lines(entries: &[ScoreEntry]) -> Option<Vec<String>> {
    if entries.is_empty() {
        return None;
    }
    Some(
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}: {}", i + 1, e.name, e.score))
            .collect(),
    )
}

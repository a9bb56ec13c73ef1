//! High score leaderboard
//!
//! Persisted as a JSON array under one storage key, sorted by score
//! (highest first) and capped at a fixed number of entries. Storage and
//! serialization failures are logged and never reach the caller.

use serde::{Deserialize, Serialize};

use crate::consts::{LEADERBOARD_KEY, MAX_NAME_LEN, PLACEHOLDER_NAME};
use crate::persistence::{self, KeyValueStore};
use crate::platform;

/// Default number of entries kept
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: String,
    /// Upper-cased, at most 10 characters
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub created_at: f64,
}

/// Normalize a player name for display and storage
pub fn display_name(raw: &str) -> String {
    // Uppercase first: some characters expand (ß -> SS)
    let name: String = raw.trim().to_uppercase().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        name
    }
}

/// Leaderboard over a key-value store
pub struct Leaderboard<S: KeyValueStore> {
    store: S,
    key: String,
    max_entries: usize,
}

impl<S: KeyValueStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LEADERBOARD_KEY, MAX_HIGH_SCORES)
    }

    pub fn with_config(store: S, key: impl Into<String>, max_entries: usize) -> Self {
        Self {
            store,
            key: key.into(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All entries, highest score first. Empty on any read failure.
    pub fn get_all(&self) -> Vec<ScoreEntry> {
        match persistence::load_json::<Vec<ScoreEntry>, _>(&self.store, &self.key) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read leaderboard: {}", e);
                Vec::new()
            }
        }
    }

    /// Record a score stamped with the current time
    pub fn add_score(&mut self, name: &str, score: u32) -> Vec<ScoreEntry> {
        self.add_score_at(name, score, platform::now_ms())
    }

    /// Record a score with an explicit timestamp and return the stored list
    pub fn add_score_at(&mut self, name: &str, score: u32, created_at: f64) -> Vec<ScoreEntry> {
        let entry = ScoreEntry {
            id: format!("{:x}-{:08x}", created_at.max(0.0) as u64, rand::random::<u32>()),
            name: display_name(name),
            score,
            created_at,
        };

        let mut entries = self.get_all();
        entries.push(entry);
        // Stable: earlier entries win ties
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(self.max_entries);

        match persistence::save_json(&mut self.store, &self.key, &entries) {
            Ok(()) => log::info!("Leaderboard saved ({} entries)", entries.len()),
            Err(e) => log::warn!("Failed to save leaderboard: {}", e),
        }
        entries
    }

    /// Whether `score` would make it onto the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.get_all();
        if entries.len() < self.max_entries {
            return true;
        }
        entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank `score` would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let entries = self.get_all();
        let rank = entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(entries.len()) + 1)
    }
}

//! Persistent best-score store
//!
//! A single integer survives between runs. `submit` persists the floor of the
//! candidate only when it beats the stored best, and reports whether it did.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HighScoreRecord {
    best: u64,
}

/// File-backed high score. A missing or unreadable file starts from zero; a
/// store created without a path keeps the score in memory only (tests,
/// sandboxed runs).
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    record: HighScoreRecord,
    path: Option<PathBuf>,
}

impl HighScoreStore {
    /// Default on-disk location, next to the user's home directory
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".astro_strike_highscore.json")
    }

    /// Load from the given file, falling back to zero on any failure
    pub fn load(path: PathBuf) -> Self {
        let record: HighScoreRecord = std::fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        if record.best == 0 {
            log::info!("no high score found, starting fresh");
        } else {
            log::info!("loaded high score: {}", record.best);
        }
        Self {
            record,
            path: Some(path),
        }
    }

    /// In-memory store with no backing file
    pub fn ephemeral() -> Self {
        Self {
            record: HighScoreRecord::default(),
            path: None,
        }
    }

    pub fn best(&self) -> u64 {
        self.record.best
    }

    /// Record a finished run's score. Returns true (and persists the floored
    /// value) only if it beats the stored best.
    pub fn submit(&mut self, candidate: f64) -> bool {
        let floored = candidate.floor().max(0.0) as u64;
        if floored <= self.record.best {
            return false;
        }
        self.record.best = floored;
        self.persist();
        true
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        match serde_json::to_string(&self.record) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("failed to save high score: {e}");
                } else {
                    log::info!("high score saved: {}", self.record.best);
                }
            }
            Err(e) => log::warn!("failed to encode high score: {e}"),
        }
    }
}

//! Best-run leaderboard
//!
//! Tracks the top 10 runs by score. Stored as JSON wherever the host
//! points it; the simulation core itself never touches storage.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished-run entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Survival time in seconds
    pub survival_secs: f32,
    pub dodges: u32,
    pub near_misses: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Best-run leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key / default file stem
    pub const STORAGE_KEY: &'static str = "hyprglide_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed), or `None` if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) or
    /// `None` if it didn't qualify.
    pub fn add_run(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on record
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the board from a JSON file, starting fresh when missing or corrupt
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(err) => {
                    log::warn!("corrupt high scores ({err}), starting fresh");
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the board as JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("high scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            survival_secs: 30.0,
            dodges: 12,
            near_misses: 3,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(run(100)), Some(1));
        assert_eq!(scores.add_run(run(300)), Some(1));
        assert_eq!(scores.add_run(run(200)), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_board_truncates_at_max() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.add_run(run(i * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // Lowest retained entry is 60: 150..=60 fill the ten slots
        assert_eq!(scores.entries.last().unwrap().score, 60);
        assert!(!scores.qualifies(50));
        assert!(scores.qualifies(200));
    }

    #[test]
    fn test_load_missing_file_is_fresh() {
        let scores = HighScores::load(Path::new("/nonexistent/hyprglide_highscores.json"));
        assert!(scores.is_empty());
    }
}

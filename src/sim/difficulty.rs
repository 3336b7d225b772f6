//! Difficulty progression
//!
//! Pure curve from survival time to a normalized [0, 1] progress value.
//! Score difficulty and spawn difficulty ramp independently: the score
//! multiplier always tops out at 90 seconds, while the spawn ramp follows
//! the host's ramp choice (standard or marathon).

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Normalized difficulty for a given elapsed time and ramp window.
///
/// Monotonic non-decreasing, saturates at exactly 1.0. Defined for any
/// `elapsed >= 0`; a non-positive ramp saturates immediately.
#[inline]
pub fn difficulty(elapsed: f32, ramp_secs: f32) -> f32 {
    if ramp_secs <= 0.0 {
        return 1.0;
    }
    (elapsed / ramp_secs).clamp(0.0, 1.0)
}

/// Survival-time progression, advanced once per frame while the round runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Elapsed survival time in seconds (frozen while paused or after game over)
    pub elapsed: f32,
    /// Ramp window for the score multiplier
    pub score_ramp_secs: f32,
    /// Ramp window for spawn rate/speed/variant mix
    pub spawn_ramp_secs: f32,
}

impl Default for DifficultyState {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            score_ramp_secs: SCORE_RAMP_SECS,
            spawn_ramp_secs: SPAWN_RAMP_SECS,
        }
    }
}

impl DifficultyState {
    pub fn new(score_ramp_secs: f32, spawn_ramp_secs: f32) -> Self {
        Self {
            elapsed: 0.0,
            score_ramp_secs,
            spawn_ramp_secs,
        }
    }

    /// Advance elapsed survival time
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Difficulty driving the score multiplier
    pub fn score_difficulty(&self) -> f32 {
        difficulty(self.elapsed, self.score_ramp_secs)
    }

    /// Difficulty driving the spawn scheduler
    pub fn spawn_difficulty(&self) -> f32 {
        difficulty(self.elapsed, self.spawn_ramp_secs)
    }

    /// Integer level bucket in 1..=LEVEL_COUNT, derived from score difficulty
    pub fn level(&self) -> u32 {
        let d = self.score_difficulty();
        ((d * LEVEL_COUNT as f32).ceil() as u32).clamp(1, LEVEL_COUNT)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

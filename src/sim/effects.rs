//! Timed gameplay effects
//!
//! Slow-motion is a capped time budget: each pickup adds a fixed duration,
//! repeated pickups extend the window but never deepen the multiplier.
//! The multiplier applies to obstacle and power-up fall speed only, never
//! to player input.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stackable, capped slow-motion effect
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlowMotion {
    /// Seconds of slow-motion left; always in [0, cap]
    pub remaining: f32,
    /// Seconds added per trigger
    pub duration: f32,
    /// Maximum stacked duration
    pub cap: f32,
    /// Speed multiplier while active (0 < scale <= 1)
    pub scale: f32,
}

impl Default for SlowMotion {
    fn default() -> Self {
        Self {
            remaining: 0.0,
            duration: SLOW_MO_DURATION,
            cap: SLOW_MO_CAP,
            scale: SLOW_MO_SCALE,
        }
    }
}

impl SlowMotion {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Multiplier for entity fall speed this frame
    pub fn multiplier(&self) -> f32 {
        if self.is_active() { self.scale } else { 1.0 }
    }

    /// Add one trigger's worth of duration, capped
    pub fn trigger(&mut self) {
        self.remaining = (self.remaining + self.duration).min(self.cap);
    }

    /// Decay toward idle; uses the real (unscaled) frame dt
    pub fn update(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// Force idle immediately (collision / game over)
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

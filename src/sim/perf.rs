//! Performance governor
//!
//! Watches raw (unclamped) frame deltas over a rolling window. When the
//! average stays over budget long enough the throttle tier steps up, which
//! stretches the obstacle spawn interval and tells the rendering side to
//! dim particle intensity. Recovery steps back down one tier at a time.

use serde::{Deserialize, Serialize};

/// Rolling window length in frames
const SAMPLE_WINDOW: usize = 64;
/// Average frame time that starts counting as over budget (~45 fps)
const RAISE_BUDGET_SECS: f32 = 0.022;
/// Average frame time that counts as recovered (~55 fps)
const RECOVER_BUDGET_SECS: f32 = 0.018;
/// How long a condition must hold before the tier moves
const SUSTAIN_SECS: f32 = 1.5;

/// Discrete load-shedding state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ThrottleTier {
    #[default]
    Normal,
    Reduced,
    Minimal,
}

impl ThrottleTier {
    /// Multiplier applied to the computed obstacle spawn interval
    pub fn spawn_interval_multiplier(&self) -> f32 {
        match self {
            ThrottleTier::Normal => 1.0,
            ThrottleTier::Reduced => 1.35,
            ThrottleTier::Minimal => 1.8,
        }
    }

    /// Particle intensity requested from the rendering collaborator
    pub fn particle_intensity(&self) -> f32 {
        match self {
            ThrottleTier::Normal => 1.0,
            ThrottleTier::Reduced => 0.6,
            ThrottleTier::Minimal => 0.3,
        }
    }

    fn raise(&self) -> ThrottleTier {
        match self {
            ThrottleTier::Normal => ThrottleTier::Reduced,
            _ => ThrottleTier::Minimal,
        }
    }

    fn lower(&self) -> ThrottleTier {
        match self {
            ThrottleTier::Minimal => ThrottleTier::Reduced,
            _ => ThrottleTier::Normal,
        }
    }
}

/// Frame-time sampler with hysteresis between tiers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PerfGovernor {
    pub tier: ThrottleTier,
    #[serde(skip)]
    samples: Vec<f32>,
    #[serde(skip)]
    next_slot: usize,
    #[serde(skip)]
    over_budget_secs: f32,
    #[serde(skip)]
    under_budget_secs: f32,
}

impl PerfGovernor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw frame delta. Returns the new tier when it changed.
    pub fn sample(&mut self, raw_dt: f32) -> Option<ThrottleTier> {
        if !raw_dt.is_finite() || raw_dt <= 0.0 {
            return None;
        }

        if self.samples.len() < SAMPLE_WINDOW {
            self.samples.push(raw_dt);
        } else {
            self.samples[self.next_slot] = raw_dt;
        }
        self.next_slot = (self.next_slot + 1) % SAMPLE_WINDOW;

        let avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;

        if avg > RAISE_BUDGET_SECS {
            self.over_budget_secs += raw_dt;
            self.under_budget_secs = 0.0;
            if self.over_budget_secs >= SUSTAIN_SECS && self.tier != ThrottleTier::Minimal {
                self.tier = self.tier.raise();
                self.over_budget_secs = 0.0;
                log::warn!(
                    "frame budget exceeded (avg {:.1} ms), throttle tier -> {:?}",
                    avg * 1000.0,
                    self.tier
                );
                return Some(self.tier);
            }
        } else if avg < RECOVER_BUDGET_SECS {
            self.under_budget_secs += raw_dt;
            self.over_budget_secs = 0.0;
            if self.under_budget_secs >= SUSTAIN_SECS && self.tier != ThrottleTier::Normal {
                self.tier = self.tier.lower();
                self.under_budget_secs = 0.0;
                log::info!("frame time recovered, throttle tier -> {:?}", self.tier);
                return Some(self.tier);
            }
        } else {
            // In the hysteresis band: neither condition accumulates
            self.over_budget_secs = 0.0;
            self.under_budget_secs = 0.0;
        }

        None
    }

    /// Clear samples and return to baseline. Returns whether the tier
    /// changed so dependents can reapply their multipliers.
    pub fn reset(&mut self) -> bool {
        let changed = self.tier != ThrottleTier::Normal;
        *self = Self::default();
        changed
    }
}

//! Game settings and preferences
//!
//! Host-supplied toggles the simulation consumes through `configure` and
//! `apply_input`. Persisted as JSON; the storage location is the host's
//! choice, these helpers just read and write a path.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SPAWN_RAMP_MARATHON_SECS, SPAWN_RAMP_SECS};
use crate::sim::ThrottleTier;

/// Difficulty ramp presets for obstacle spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RampChoice {
    /// Full spawn difficulty after 90 seconds
    #[default]
    Standard,
    /// Gentler ramp, full spawn difficulty after 5 minutes
    Marathon,
}

impl RampChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            RampChoice::Standard => "Standard",
            RampChoice::Marathon => "Marathon",
        }
    }

    /// Spawn ramp window in seconds
    pub fn spawn_ramp_secs(&self) -> f32 {
        match self {
            RampChoice::Standard => SPAWN_RAMP_SECS,
            RampChoice::Marathon => SPAWN_RAMP_MARATHON_SECS,
        }
    }
}

/// Color theme token handed to the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorTheme {
    #[default]
    Neon,
    Sunset,
    Mono,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Input ===
    /// Steer by device tilt instead of pointer drag
    pub tilt_enabled: bool,
    /// Tilt sensitivity multiplier (0.5 - 2.0)
    pub tilt_sensitivity: f32,

    // === Gameplay ===
    /// Obstacle spawn ramp preset
    pub ramp: RampChoice,

    // === Visuals (owned by the renderer, stored with the rest) ===
    pub theme: ColorTheme,
    /// Particle intensity preference (0.0 - 1.0)
    pub particle_intensity: f32,

    // === Accessibility ===
    /// Minimize shake and flash feedback
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tilt_enabled: false,
            tilt_sensitivity: 1.0,
            ramp: RampChoice::Standard,
            theme: ColorTheme::Neon,
            particle_intensity: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key / default file stem
    pub const STORAGE_KEY: &'static str = "hyprglide_settings";

    /// Tilt sensitivity clamped to its supported range
    pub fn effective_tilt_sensitivity(&self) -> f32 {
        self.tilt_sensitivity.clamp(0.5, 2.0)
    }

    /// Particle intensity after composing the preference with the
    /// governor's current throttle tier
    pub fn effective_particle_intensity(&self, tier: ThrottleTier) -> f32 {
        self.particle_intensity.clamp(0.0, 1.0) * tier.particle_intensity()
    }

    /// Load settings from a JSON file, falling back to defaults on a
    /// missing or corrupt payload.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("corrupt settings ({err}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }
}

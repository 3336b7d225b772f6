//! HyprGlide - a single-lane obstacle-dodging arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, round state)
//! - `settings`: Host-supplied preferences (tilt, ramp choice, theme)
//! - `highscores`: Best-run leaderboard
//!
//! Rendering, UI overlay, audio, and haptics are external collaborators;
//! the simulation reports frame events and they react.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{RampChoice, Settings};

/// Game configuration constants
pub mod consts {
    /// Maximum delta-time fed to physics (a stalled frame must not teleport things)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Floor for dt in divisions (guards velocity math against a zero-length frame)
    pub const MIN_FRAME_DT: f32 = 1.0 / 1000.0;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 22.0;
    /// Fixed vertical position of the player band
    pub const PLAYER_Y: f32 = 140.0;
    /// Maximum horizontal player speed (drag mode)
    pub const PLAYER_MAX_SPEED: f32 = 1400.0;
    /// Maximum horizontal player speed (tilt mode, before sensitivity)
    pub const TILT_MAX_SPEED: f32 = 900.0;
    /// Tilt axis magnitudes below this are ignored
    pub const TILT_DEAD_ZONE: f32 = 0.05;
    /// Tilt low-pass responsiveness (scaled by dt and sensitivity)
    pub const TILT_RESPONSIVENESS: f32 = 9.0;
    /// Velocity magnitude that arms the direction-change (squash) event
    pub const SQUASH_SPEED_THRESHOLD: f32 = 220.0;
    /// Velocity magnitude below which the recorded direction sign resets
    pub const SQUASH_SPEED_RELEASE: f32 = 60.0;

    /// Score difficulty ramp (seconds to full difficulty)
    pub const SCORE_RAMP_SECS: f32 = 90.0;
    /// Spawn difficulty ramp, standard preset
    pub const SPAWN_RAMP_SECS: f32 = 90.0;
    /// Spawn difficulty ramp, marathon preset
    pub const SPAWN_RAMP_MARATHON_SECS: f32 = 300.0;
    /// Number of difficulty level buckets
    pub const LEVEL_COUNT: u32 = 10;

    /// Obstacle spawn interval at difficulty 0 / 1
    pub const OBSTACLE_INTERVAL_MAX: f32 = 1.0;
    pub const OBSTACLE_INTERVAL_MIN: f32 = 0.3;
    /// Obstacle base fall speed at difficulty 0 / 1
    pub const OBSTACLE_SPEED_MIN: f32 = 240.0;
    pub const OBSTACLE_SPEED_MAX: f32 = 700.0;
    /// Narrow variant width range
    pub const OBSTACLE_NARROW_WIDTH: (f32, f32) = (36.0, 56.0);
    /// Wide variant width range
    pub const OBSTACLE_WIDE_WIDTH: (f32, f32) = (64.0, 112.0);
    /// Obstacle height range (both variants)
    pub const OBSTACLE_HEIGHT: (f32, f32) = (18.0, 30.0);
    /// Horizontal margin keeping spawned obstacles fully visible
    pub const OBSTACLE_SPAWN_MARGIN: f32 = 8.0;
    /// Vertical position below which an obstacle is reaped
    pub const DESPAWN_Y: f32 = -80.0;

    /// Maximum parked obstacles retained by the pool
    pub const OBSTACLE_POOL_CAPACITY: usize = 32;

    /// Difficulty below which power-ups never spawn
    pub const POWER_UP_GATE: f32 = 0.25;
    /// Power-up spawn interval range (re-rolled after each spawn or pickup)
    pub const POWER_UP_INTERVAL: (f32, f32) = (7.0, 12.0);
    /// Power-up collision radius
    pub const POWER_UP_RADIUS: f32 = 16.0;
    /// Power-up fall speed range
    pub const POWER_UP_SPEED: (f32, f32) = (180.0, 260.0);

    /// Near-miss padding beyond the collision band, per axis
    pub const NEAR_MISS_PAD_X: f32 = 26.0;
    pub const NEAR_MISS_PAD_Y: f32 = 34.0;

    /// Slow-motion duration added per trigger / stack cap / speed scale
    pub const SLOW_MO_DURATION: f32 = 3.0;
    pub const SLOW_MO_CAP: f32 = 6.0;
    pub const SLOW_MO_SCALE: f32 = 0.4;

    /// Score accrual per second of survival (scaled by difficulty level)
    pub const SCORE_PER_SEC: f32 = 10.0;
    /// Bonus for dodging an obstacle / shaving a near-miss
    pub const DODGE_BONUS: u64 = 10;
    pub const NEAR_MISS_BONUS: u64 = 25;
}

/// Linear interpolation between `a` and `b` by `t` in [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

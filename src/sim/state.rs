//! Round state and core simulation types
//!
//! The round controller (`GameState`) owns everything mutable in the
//! simulation: player, active entities, difficulty, effects, governor.
//! External observers never hold back-pointers into it; they read the
//! `FrameEvents` produced by each update instead.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use super::effects::SlowMotion;
use super::kinematics::{ControlInput, MovementBounds};
use super::perf::{PerfGovernor, ThrottleTier};
use super::pool::ObstaclePool;
use super::spawn::SpawnScheduler;
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Simulation frozen, frame hook still delivered for housekeeping
    Paused,
    /// Round ended on first collision
    GameOver,
}

/// The controllable agent. Moves horizontally along a fixed vertical band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerState {
    /// Horizontal position
    pub x: f32,
    /// Current horizontal velocity
    pub velocity: f32,
    /// Low-pass filter state for tilt input
    pub tilt_smoothed: f32,
    /// Whether the last applied input was tilt-derived
    pub tilt_active: bool,
    /// Last recorded direction sign for squash feedback (-1, 0, 1)
    pub last_dir: i8,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            x: 0.0,
            velocity: 0.0,
            tilt_smoothed: 0.0,
            tilt_active: false,
            last_dir: 0,
        }
    }
}

impl PlayerState {
    /// Player center in scene coordinates
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, PLAYER_Y)
    }
}

/// Obstacle shape variant picked at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObstacleVariant {
    /// Small width, +20% fall speed
    Narrow,
    /// Large width, -10% fall speed
    #[default]
    Wide,
}

/// A falling obstacle. Pooled; every randomized field is resampled on
/// reconfiguration, so a recycled instance carries no stale state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Vertical fall speed (positive, applied downward)
    pub speed: f32,
    pub variant: ObstacleVariant,
    /// Write-once per lifetime: set when the near-miss bonus fired
    pub near_miss_done: bool,
    /// Write-once per lifetime: set when the dodge bonus fired
    pub dodged: bool,
}

impl Obstacle {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// Power-up effect tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PowerUpKind {
    #[default]
    SlowMotion,
}

/// A falling collectible
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Vertical fall speed (positive, applied downward)
    pub speed: f32,
}

/// Scene geometry supplied by the host on layout changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub width: f32,
    pub height: f32,
}

/// Safe-area insets applied to the player's movement band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MarginPolicy {
    pub left: f32,
    pub right: f32,
}

/// Everything external collaborators need from one frame, populated once
/// per update call and cleared at its start.
#[derive(Debug, Clone, Default)]
pub struct FrameEvents {
    /// Terminal collision, with the obstacle position for the impact burst
    pub collision: Option<Vec2>,
    /// Near-miss positions for visual bursts (one per newly flagged obstacle)
    pub near_misses: Vec<Vec2>,
    /// Power-ups collected this frame
    pub power_ups_collected: Vec<(PowerUpKind, Vec2)>,
    /// Whole score points awarded this frame (time accrual + bonuses)
    pub score_delta: u64,
    /// Obstacles that cleanly passed the player this frame
    pub dodges: u32,
    /// Throttle tier change, when the governor moved this frame
    pub throttle_changed: Option<ThrottleTier>,
    /// Direction-change squash feedback fired
    pub direction_changed: bool,
}

impl FrameEvents {
    pub fn clear(&mut self) {
        self.collision = None;
        self.near_misses.clear();
        self.power_ups_collected.clear();
        self.score_delta = 0;
        self.dodges = 0;
        self.throttle_changed = None;
        self.direction_changed = false;
    }
}

/// Complete round state (deterministic for a given seed and input script)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation RNG (all randomness flows through here)
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: PlayerState,
    pub scene: SceneBounds,
    pub margins: MarginPolicy,
    pub player_radius: f32,
    /// Tilt sensitivity multiplier supplied by the host
    pub tilt_sensitivity: f32,
    /// Movement bounds; `None` while scene geometry is not finite
    pub bounds: Option<MovementBounds>,
    pub difficulty: DifficultyState,
    pub slow_mo: SlowMotion,
    pub governor: PerfGovernor,
    pub spawner: SpawnScheduler,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    #[serde(skip)]
    pub pool: ObstaclePool,
    pub score: u64,
    /// Sub-point accumulator for the time-based score
    pub score_fraction: f32,
    pub near_miss_count: u32,
    pub dodge_count: u32,
    /// Events from the most recent update
    #[serde(skip)]
    pub events: FrameEvents,
    /// Control input staged for the next update
    #[serde(skip)]
    pub pending_input: Option<ControlInput>,
    next_id: u32,
}

impl GameState {
    /// Create a round with default scene geometry and the given seed
    pub fn new(seed: u64) -> Self {
        let scene = SceneBounds {
            width: 400.0,
            height: 800.0,
        };
        let margins = MarginPolicy::default();
        let bounds = MovementBounds::from_scene(scene.width, margins.left, margins.right, PLAYER_RADIUS);
        let player = PlayerState {
            x: scene.width / 2.0,
            ..Default::default()
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            player,
            scene,
            margins,
            player_radius: PLAYER_RADIUS,
            tilt_sensitivity: 1.0,
            bounds,
            difficulty: DifficultyState::default(),
            slow_mo: SlowMotion::default(),
            governor: PerfGovernor::new(),
            spawner: SpawnScheduler::default(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            pool: ObstaclePool::default(),
            score: 0,
            score_fraction: 0.0,
            near_miss_count: 0,
            dodge_count: 0,
            events: FrameEvents::default(),
            pending_input: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Stage control input for the next frame. Input sources are mutually
    /// exclusive per frame; the last one delivered wins.
    pub fn apply_input(&mut self, input: ControlInput) {
        self.pending_input = Some(input);
    }

    /// Freeze or resume gameplay. Difficulty and entity motion stop while
    /// paused; the host keeps delivering frames for housekeeping.
    pub fn set_paused(&mut self, paused: bool) {
        match (self.phase, paused) {
            (GamePhase::Playing, true) => {
                self.phase = GamePhase::Paused;
                log::info!("round paused at {:.1}s", self.difficulty.elapsed);
            }
            (GamePhase::Paused, false) => self.phase = GamePhase::Playing,
            _ => {}
        }
    }

    /// Apply new scene geometry. Movement bounds are recomputed and the
    /// player keeps its relative position in the band rather than
    /// teleporting.
    pub fn configure(
        &mut self,
        player_radius: f32,
        scene: SceneBounds,
        margins: MarginPolicy,
    ) {
        let new_bounds =
            MovementBounds::from_scene(scene.width, margins.left, margins.right, player_radius);

        match (self.bounds, new_bounds) {
            (Some(old), Some(new)) => {
                self.player.x = old.renormalize(self.player.x, &new);
            }
            (None, Some(new)) => {
                self.player.x = new.clamp(self.player.x);
            }
            // Non-finite geometry: leave the player where it is
            (_, None) => {
                log::warn!("scene bounds not finite, movement clamp disabled");
            }
        }

        self.player_radius = player_radius;
        self.scene = scene;
        self.margins = margins;
        self.bounds = new_bounds;
    }

    /// Host-supplied tilt sensitivity (1.0 = default)
    pub fn set_tilt_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() && sensitivity > 0.0 {
            self.tilt_sensitivity = sensitivity;
        }
    }

    /// Select the spawn difficulty ramp window
    pub fn set_spawn_ramp(&mut self, ramp_secs: f32) {
        self.difficulty.spawn_ramp_secs = ramp_secs;
    }

    /// Full round reinitialization. Idempotent: a second call on a fresh
    /// round changes nothing. Scene geometry and host preferences survive.
    pub fn reset(&mut self) {
        for obstacle in self.obstacles.drain(..) {
            self.pool.recycle(obstacle);
        }
        self.power_ups.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.phase = GamePhase::Playing;
        self.player = PlayerState {
            x: self
                .bounds
                .map(|b| b.min_x + b.span() / 2.0)
                .unwrap_or(self.scene.width / 2.0),
            ..Default::default()
        };
        self.difficulty.reset();
        self.slow_mo.reset();
        self.governor.reset();
        self.spawner.reset();
        self.score = 0;
        self.score_fraction = 0.0;
        self.near_miss_count = 0;
        self.dodge_count = 0;
        self.events.clear();
        self.pending_input = None;
        self.next_id = 1;
        log::info!("round reset (seed {})", self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_is_clean() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(!state.slow_mo.is_active());
        assert!(state.bounds.is_some());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pause_freezes_phase() {
        let mut state = GameState::new(7);
        state.set_paused(true);
        assert_eq!(state.phase, GamePhase::Paused);
        state.set_paused(false);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_has_no_effect_after_game_over() {
        let mut state = GameState::new(7);
        state.phase = GamePhase::GameOver;
        state.set_paused(true);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_configure_renormalizes_player() {
        let mut state = GameState::new(7);
        // Center of a 400-wide scene
        assert_eq!(state.player.x, 200.0);

        state.configure(
            PLAYER_RADIUS,
            SceneBounds {
                width: 800.0,
                height: 800.0,
            },
            MarginPolicy::default(),
        );
        // Still at the center of the (wider) band
        assert!((state.player.x - 400.0).abs() < 1.0);
    }

    #[test]
    fn test_configure_with_non_finite_scene_disables_clamp() {
        let mut state = GameState::new(7);
        let x_before = state.player.x;
        state.configure(
            PLAYER_RADIUS,
            SceneBounds {
                width: f32::NAN,
                height: 800.0,
            },
            MarginPolicy::default(),
        );
        assert!(state.bounds.is_none());
        assert_eq!(state.player.x, x_before);
        assert!(state.player.x.is_finite());
    }

    #[test]
    fn test_snapshot_round_trips() {
        let state = GameState::new(42);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 42);
        assert_eq!(back.phase, GamePhase::Playing);
        assert_eq!(back.player.x, state.player.x);
    }
}

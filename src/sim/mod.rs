//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - One update per rendered frame, no reentrancy
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies
//!
//! External collaborators consume the `FrameEvents` each update produces.

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod kinematics;
pub mod perf;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use difficulty::{DifficultyState, difficulty};
pub use effects::SlowMotion;
pub use kinematics::{ControlInput, MovementBounds, tilt_velocity};
pub use perf::{PerfGovernor, ThrottleTier};
pub use pool::{ObstacleParams, ObstaclePool};
pub use spawn::SpawnScheduler;
pub use state::{
    FrameEvents, GamePhase, GameState, MarginPolicy, Obstacle, ObstacleVariant, PlayerState,
    PowerUp, PowerUpKind, SceneBounds,
};
pub use tick::update;

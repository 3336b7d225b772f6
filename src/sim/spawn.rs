//! Procedural spawning
//!
//! Two independent accumulating timers, one per entity stream. Obstacle
//! cadence and variant mix follow the spawn difficulty curve; the governor
//! stretches the obstacle interval under load. Power-ups are gated behind a
//! difficulty threshold and limited to one on screen.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::ObstacleParams;
use super::state::{GamePhase, GameState, ObstacleVariant, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::lerp;

/// Timer state for both entity streams
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Seconds accumulated toward the next obstacle
    pub obstacle_timer: f32,
    /// Seconds accumulated toward the next power-up; held at zero while
    /// the difficulty gate is closed
    pub power_up_timer: f32,
    /// Current power-up interval, re-rolled after each spawn or pickup
    pub next_power_up_interval: f32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self {
            obstacle_timer: 0.0,
            power_up_timer: 0.0,
            next_power_up_interval: (POWER_UP_INTERVAL.0 + POWER_UP_INTERVAL.1) / 2.0,
        }
    }
}

impl SpawnScheduler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Advance both spawn timers by the (clamped, unscaled) frame dt and fire
/// any due spawns. A silent no-op while the round is over or while scene
/// geometry is not finite.
pub fn advance(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if !state.scene.width.is_finite() || !state.scene.height.is_finite() {
        return;
    }

    let d = state.difficulty.spawn_difficulty();

    state.spawner.obstacle_timer += dt;
    let interval = lerp(OBSTACLE_INTERVAL_MAX, OBSTACLE_INTERVAL_MIN, d)
        * state.governor.tier.spawn_interval_multiplier();
    if state.spawner.obstacle_timer >= interval {
        state.spawner.obstacle_timer = 0.0;
        spawn_obstacle(state, d);
    }

    if d < POWER_UP_GATE {
        // Held, not accumulated: crossing the gate never causes a flood
        state.spawner.power_up_timer = 0.0;
    } else if state.power_ups.is_empty() {
        state.spawner.power_up_timer += dt;
        if state.spawner.power_up_timer >= state.spawner.next_power_up_interval {
            state.spawner.power_up_timer = 0.0;
            spawn_power_up(state);
            reroll_power_up_interval(state);
        }
    }
}

/// Re-roll the next power-up interval (after a spawn or a pickup)
pub fn reroll_power_up_interval(state: &mut GameState) {
    state.spawner.next_power_up_interval =
        state.rng.random_range(POWER_UP_INTERVAL.0..POWER_UP_INTERVAL.1);
}

fn spawn_obstacle(state: &mut GameState, difficulty: f32) {
    let narrow_chance = (difficulty * 0.4 + 0.3) as f64;
    let narrow = state.rng.random_bool(narrow_chance);

    let (width, speed_mult, variant) = if narrow {
        let width = state
            .rng
            .random_range(OBSTACLE_NARROW_WIDTH.0..OBSTACLE_NARROW_WIDTH.1);
        (width, 1.2, ObstacleVariant::Narrow)
    } else {
        let width = state
            .rng
            .random_range(OBSTACLE_WIDE_WIDTH.0..OBSTACLE_WIDE_WIDTH.1);
        (width, 0.9, ObstacleVariant::Wide)
    };
    let height = state.rng.random_range(OBSTACLE_HEIGHT.0..OBSTACLE_HEIGHT.1);
    let speed = lerp(OBSTACLE_SPEED_MIN, OBSTACLE_SPEED_MAX, difficulty) * speed_mult;

    // Keep the whole shape inside the horizontal margins
    let min_x = OBSTACLE_SPAWN_MARGIN + width / 2.0;
    let max_x = state.scene.width - OBSTACLE_SPAWN_MARGIN - width / 2.0;
    if min_x >= max_x {
        return;
    }
    let x = state.rng.random_range(min_x..max_x);
    let y = state.scene.height + height / 2.0;

    let id = state.next_entity_id();
    let obstacle = state.pool.dequeue(
        id,
        ObstacleParams {
            pos: glam::Vec2::new(x, y),
            width,
            height,
            speed,
            variant,
        },
    );
    log::debug!(
        "spawn obstacle #{id} {:?} w={:.0} v={:.0} at x={:.0}",
        variant,
        width,
        speed,
        x
    );
    state.obstacles.push(obstacle);
}

fn spawn_power_up(state: &mut GameState) {
    let min_x = OBSTACLE_SPAWN_MARGIN + POWER_UP_RADIUS;
    let max_x = state.scene.width - OBSTACLE_SPAWN_MARGIN - POWER_UP_RADIUS;
    if min_x >= max_x {
        return;
    }
    let x = state.rng.random_range(min_x..max_x);
    let speed = state.rng.random_range(POWER_UP_SPEED.0..POWER_UP_SPEED.1);
    let id = state.next_entity_id();
    log::debug!("spawn power-up #{id} at x={x:.0}");
    state.power_ups.push(PowerUp {
        id,
        kind: PowerUpKind::SlowMotion,
        pos: glam::Vec2::new(x, state.scene.height + POWER_UP_RADIUS),
        radius: POWER_UP_RADIUS,
        speed,
    });
}

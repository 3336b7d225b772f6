//! Per-frame round orchestration
//!
//! One `update` call per rendered frame, single-threaded, no reentrancy.
//! Data flows one direction: input -> player motion; elapsed time ->
//! difficulty -> spawner; entities + player -> collision pass -> events.
//! The raw frame delta feeds the performance governor unclamped; physics
//! sees a clamped dt so a stalled frame cannot teleport the world.

use super::collision;
use super::kinematics;
use super::spawn;
use super::state::{FrameEvents, GamePhase, GameState};
use crate::consts::*;

/// Advance the round by one frame and report what happened.
///
/// Always safe to call: while paused or after game over the frame is
/// treated as housekeeping (governor sampling only) and no simulation
/// state moves.
pub fn update(state: &mut GameState, raw_dt: f32) -> &FrameEvents {
    state.events.clear();

    // The governor watches genuine frame pacing, so it gets the raw delta
    if let Some(tier) = state.governor.sample(raw_dt) {
        state.events.throttle_changed = Some(tier);
    }

    if !raw_dt.is_finite() || raw_dt <= 0.0 {
        return &state.events;
    }
    let dt = raw_dt.min(MAX_FRAME_DT);

    if state.phase != GamePhase::Playing {
        // Frame delivered but simulation frozen; drop stale input
        state.pending_input = None;
        return &state.events;
    }

    state.difficulty.advance(dt);

    let input = state.pending_input.take();
    state.events.direction_changed = kinematics::integrate(
        &mut state.player,
        input,
        state.bounds,
        state.tilt_sensitivity,
        dt,
    );

    spawn::advance(state, dt);

    // Slow-motion scales entity fall only, never player input
    let scaled_dt = dt * state.slow_mo.multiplier();
    for obstacle in &mut state.obstacles {
        obstacle.pos.y -= obstacle.speed * scaled_dt;
    }
    for power_up in &mut state.power_ups {
        power_up.pos.y -= power_up.speed * scaled_dt;
    }
    state.slow_mo.update(dt);

    award_dodges(state);
    reap_offscreen(state);
    collision_pass(state);

    if state.phase == GamePhase::Playing {
        collect_power_ups(state);
        accrue_time_score(state, dt);
    }

    &state.events
}

/// Award the dodge bonus once per obstacle that cleanly passed the player
fn award_dodges(state: &mut GameState) {
    let player_bottom = PLAYER_Y - state.player_radius;
    let mut bonus = 0u64;
    for obstacle in &mut state.obstacles {
        if !obstacle.dodged && obstacle.pos.y + obstacle.half_height() < player_bottom {
            obstacle.dodged = true;
            state.dodge_count += 1;
            state.events.dodges += 1;
            bonus += DODGE_BONUS;
        }
    }
    if bonus > 0 {
        state.score += bonus;
        state.events.score_delta += bonus;
    }
}

/// Return off-screen obstacles to the pool, drop off-screen power-ups
fn reap_offscreen(state: &mut GameState) {
    let mut i = 0;
    while i < state.obstacles.len() {
        if state.obstacles[i].pos.y < DESPAWN_Y {
            let obstacle = state.obstacles.swap_remove(i);
            state.pool.recycle(obstacle);
        } else {
            i += 1;
        }
    }
    state.power_ups.retain(|p| p.pos.y >= DESPAWN_Y);
}

/// Exact collision plus the padded near-miss band. The first collision of
/// the round is terminal: slow-motion is cancelled and exactly one
/// collision event is emitted.
fn collision_pass(state: &mut GameState) {
    let player_pos = state.player.pos();
    let radius = state.player_radius;

    let mut bonus = 0u64;
    for obstacle in &mut state.obstacles {
        if collision::obstacle_collision(player_pos, radius, obstacle) {
            state.events.collision = Some(obstacle.pos);
            state.phase = GamePhase::GameOver;
            state.slow_mo.reset();
            log::info!(
                "collision at {:.1}s, score {}, {} dodges, {} near-misses",
                state.difficulty.elapsed,
                state.score,
                state.dodge_count,
                state.near_miss_count
            );
            break;
        }
        if !obstacle.near_miss_done
            && collision::obstacle_near_miss(player_pos, radius, obstacle)
        {
            obstacle.near_miss_done = true;
            state.near_miss_count += 1;
            state.events.near_misses.push(obstacle.pos);
            bonus += NEAR_MISS_BONUS;
        }
    }
    if bonus > 0 {
        state.score += bonus;
        state.events.score_delta += bonus;
    }
}

/// Remove overlapped power-ups exactly once and apply their effects
fn collect_power_ups(state: &mut GameState) {
    let player_pos = state.player.pos();
    let radius = state.player_radius;

    let mut collected = Vec::new();
    state.power_ups.retain(|power_up| {
        if collision::power_up_collision(player_pos, radius, power_up) {
            collected.push((power_up.kind, power_up.pos));
            false
        } else {
            true
        }
    });

    for (kind, pos) in collected {
        state.slow_mo.trigger();
        spawn::reroll_power_up_interval(state);
        state.events.power_ups_collected.push((kind, pos));
        log::debug!("power-up {kind:?} collected, slow-mo {:.1}s", state.slow_mo.remaining);
    }
}

/// Survival score: points per second scaled by the current level bucket
fn accrue_time_score(state: &mut GameState, dt: f32) {
    state.score_fraction += dt * SCORE_PER_SEC * state.difficulty.level() as f32;
    let whole = state.score_fraction.floor();
    if whole >= 1.0 {
        state.score += whole as u64;
        state.events.score_delta += whole as u64;
        state.score_fraction -= whole;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinematics::ControlInput;
    use crate::sim::pool::ObstacleParams;
    use crate::sim::state::{MarginPolicy, ObstacleVariant, PowerUp, PowerUpKind, SceneBounds};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Scene so tall that spawned obstacles never reach the player within
    /// a test window, keeping spawning fully active but harmless
    fn tall_scene(state: &mut GameState) {
        state.configure(
            PLAYER_RADIUS,
            SceneBounds {
                width: 400.0,
                height: 1.0e6,
            },
            MarginPolicy::default(),
        );
    }

    fn push_obstacle(state: &mut GameState, x: f32, y: f32, width: f32, speed: f32) {
        let id = state.next_entity_id();
        let obstacle = state.pool.dequeue(
            id,
            ObstacleParams {
                pos: Vec2::new(x, y),
                width,
                height: 24.0,
                speed,
                variant: ObstacleVariant::Narrow,
            },
        );
        state.obstacles.push(obstacle);
    }

    #[test]
    fn test_full_ramp_reaches_max_difficulty_and_level() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);

        // 90 seconds of frames, no input, spawning active
        for _ in 0..(90 * 60 + 1) {
            update(&mut state, DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.difficulty.score_difficulty(), 1.0);
        assert_eq!(state.difficulty.level(), LEVEL_COUNT);
        assert!(state.score > 0);
    }

    #[test]
    fn test_single_collision_event_and_terminal_round() {
        let mut state = GameState::new(5);
        // Narrow obstacle directly above the player, falling at 300
        let x = state.player.x;
        push_obstacle(&mut state, x, PLAYER_Y + 200.0, 60.0, 300.0);

        let mut collisions = 0;
        for _ in 0..120 {
            let events = update(&mut state, DT);
            if events.collision.is_some() {
                collisions += 1;
            }
        }
        assert_eq!(collisions, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.slow_mo.is_active());
    }

    #[test]
    fn test_collision_cancels_slow_motion() {
        let mut state = GameState::new(5);
        state.slow_mo.trigger();
        assert!(state.slow_mo.is_active());

        let x = state.player.x;
        push_obstacle(&mut state, x, PLAYER_Y + 50.0, 60.0, 300.0);
        for _ in 0..60 {
            update(&mut state, DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.slow_mo.is_active());
    }

    #[test]
    fn test_near_miss_awarded_once_per_obstacle() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        // Passes beside the player: outside collision, inside the padded band
        let x = state.player.x + PLAYER_RADIUS + 30.0 + 10.0;
        push_obstacle(&mut state, x, PLAYER_Y + 300.0, 60.0, 300.0);

        let mut near_misses = 0;
        for _ in 0..240 {
            let events = update(&mut state, DT);
            near_misses += events.near_misses.len();
        }
        assert_eq!(near_misses, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.near_miss_count, 1);
    }

    #[test]
    fn test_dodge_bonus_fires_when_obstacle_passes() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        // Far to the side: no collision, no near-miss, clean dodge
        let x = state.player.x - 180.0;
        push_obstacle(&mut state, x, PLAYER_Y + 100.0, 60.0, 400.0);

        let mut dodges = 0;
        for _ in 0..240 {
            let events = update(&mut state, DT);
            dodges += events.dodges;
        }
        assert_eq!(dodges, 1);
        assert_eq!(state.dodge_count, 1);
    }

    #[test]
    fn test_power_up_collected_once_and_triggers_slow_mo() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            kind: PowerUpKind::SlowMotion,
            pos: state.player.pos(),
            radius: POWER_UP_RADIUS,
            speed: 200.0,
        });

        let events = update(&mut state, DT);
        assert_eq!(events.power_ups_collected.len(), 1);
        assert!(state.power_ups.is_empty());
        assert!(state.slow_mo.is_active());

        // Next frame: nothing left to collect
        let events = update(&mut state, DT);
        assert!(events.power_ups_collected.is_empty());
    }

    #[test]
    fn test_slow_motion_scales_obstacle_fall_only() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        push_obstacle(&mut state, 50.0, PLAYER_Y + 500.0, 60.0, 300.0);
        state.slow_mo.trigger();

        let y_before = state.obstacles[0].pos.y;
        state.apply_input(ControlInput::Drag {
            target_x: state.player.x + 10.0,
        });
        update(&mut state, DT);
        let fallen = y_before - state.obstacles[0].pos.y;
        // 300 px/s * dt * 0.4
        assert!((fallen - 300.0 * DT * SLOW_MO_SCALE).abs() < 0.1);
        // Player motion is unscaled: reached the nearby drag target exactly
        assert!((state.player.x - 210.0).abs() < 0.5);
    }

    #[test]
    fn test_paused_frames_freeze_simulation() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        push_obstacle(&mut state, 50.0, PLAYER_Y + 500.0, 60.0, 300.0);
        state.set_paused(true);

        let elapsed = state.difficulty.elapsed;
        let y = state.obstacles[0].pos.y;
        for _ in 0..120 {
            update(&mut state, DT);
        }
        assert_eq!(state.difficulty.elapsed, elapsed);
        assert_eq!(state.obstacles[0].pos.y, y);

        state.set_paused(false);
        update(&mut state, DT);
        assert!(state.difficulty.elapsed > elapsed);
    }

    #[test]
    fn test_dt_clamped_against_frame_stalls() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        push_obstacle(&mut state, 50.0, PLAYER_Y + 500.0, 60.0, 300.0);

        let y_before = state.obstacles[0].pos.y;
        // A two-second stall must not move the world more than 1/30s worth
        update(&mut state, 2.0);
        let fallen = y_before - state.obstacles[0].pos.y;
        assert!((fallen - 300.0 * MAX_FRAME_DT).abs() < 0.1);
    }

    #[test]
    fn test_degenerate_dt_is_housekeeping_only() {
        let mut state = GameState::new(5);
        let elapsed = state.difficulty.elapsed;
        update(&mut state, 0.0);
        update(&mut state, -1.0);
        update(&mut state, f32::NAN);
        assert_eq!(state.difficulty.elapsed, elapsed);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);
        for _ in 0..300 {
            update(&mut state, DT);
        }
        state.reset();
        let once = serde_json::to_string(&state).unwrap();
        state.reset();
        let twice = serde_json::to_string(&state).unwrap();
        assert_eq!(once, twice);

        assert_eq!(state.score, 0);
        assert_eq!(state.difficulty.elapsed, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(!state.slow_mo.is_active());
    }

    #[test]
    fn test_same_seed_and_script_is_deterministic() {
        let mut a = GameState::new(777);
        let mut b = GameState::new(777);
        tall_scene(&mut a);
        tall_scene(&mut b);

        for i in 0..600 {
            let axis = ((i as f32) * 0.01).sin();
            a.apply_input(ControlInput::Tilt { axis });
            b.apply_input(ControlInput::Tilt { axis });
            update(&mut a, DT);
            update(&mut b, DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.x, b.player.x);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_recycled_obstacle_is_near_miss_eligible_again() {
        let mut state = GameState::new(5);
        tall_scene(&mut state);

        // Flag a near-miss, then let the obstacle fall off-screen
        let x = state.player.x + PLAYER_RADIUS + 30.0 + 10.0;
        push_obstacle(&mut state, x, PLAYER_Y + 100.0, 60.0, 600.0);
        let mut first_pass = 0;
        for _ in 0..300 {
            first_pass += update(&mut state, DT).near_misses.len();
        }
        assert_eq!(first_pass, 1);
        assert!(state.obstacles.is_empty());
        assert!(state.pool.parked_count() > 0);

        // The recycled instance comes back clean and can near-miss again
        push_obstacle(&mut state, x, PLAYER_Y + 100.0, 60.0, 600.0);
        assert!(!state.obstacles[0].near_miss_done);
        let mut second_pass = 0;
        for _ in 0..300 {
            second_pass += update(&mut state, DT).near_misses.len();
        }
        assert_eq!(second_pass, 1);
    }
}

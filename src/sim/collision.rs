//! Collision and near-miss predicates
//!
//! Exact collision is an axis-aligned distance test between the player's
//! radius and an obstacle's half-extents. The near-miss band is the same
//! test widened by per-axis padding, and is mutually exclusive with a
//! collision in the same frame.

use glam::Vec2;

use super::state::{Obstacle, PowerUp};
use crate::consts::{NEAR_MISS_PAD_X, NEAR_MISS_PAD_Y};

/// Exact player-vs-obstacle overlap
#[inline]
pub fn obstacle_collision(player_pos: Vec2, player_radius: f32, obstacle: &Obstacle) -> bool {
    let dx = (player_pos.x - obstacle.pos.x).abs();
    let dy = (player_pos.y - obstacle.pos.y).abs();
    dx <= player_radius + obstacle.half_width() && dy <= player_radius + obstacle.half_height()
}

/// Non-colliding close pass. False whenever the exact overlap test is true.
#[inline]
pub fn obstacle_near_miss(player_pos: Vec2, player_radius: f32, obstacle: &Obstacle) -> bool {
    if obstacle_collision(player_pos, player_radius, obstacle) {
        return false;
    }
    let dx = (player_pos.x - obstacle.pos.x).abs();
    let dy = (player_pos.y - obstacle.pos.y).abs();
    dx <= player_radius + obstacle.half_width() + NEAR_MISS_PAD_X
        && dy <= player_radius + obstacle.half_height() + NEAR_MISS_PAD_Y
}

/// Exact player-vs-power-up overlap (circle vs circle)
#[inline]
pub fn power_up_collision(player_pos: Vec2, player_radius: f32, power_up: &PowerUp) -> bool {
    let reach = player_radius + power_up.radius;
    player_pos.distance_squared(power_up.pos) <= reach * reach
}

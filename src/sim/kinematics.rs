//! Player kinematics
//!
//! Converts raw control input (pointer drag target or device-tilt axis)
//! into bounded horizontal velocity and position. The vertical coordinate
//! is fixed; only x moves.

use serde::{Deserialize, Serialize};

use super::state::PlayerState;
use crate::consts::*;

/// Raw control input for a frame. The two sources are mutually exclusive
/// per frame; whichever the host delivered last wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlInput {
    /// Pointer drag toward a target x coordinate
    Drag { target_x: f32 },
    /// Tilt-derived axis value, clamped to [-1, 1] before mapping
    Tilt { axis: f32 },
}

/// Horizontal movement bounds derived from scene size and safe-area margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl MovementBounds {
    /// Compute bounds for a scene, or `None` when the scene size is not
    /// finite. Without finite bounds no clamping happens at all; NaN must
    /// not leak into position math.
    pub fn from_scene(
        scene_width: f32,
        margin_left: f32,
        margin_right: f32,
        player_radius: f32,
    ) -> Option<Self> {
        if !scene_width.is_finite() || scene_width <= 0.0 {
            return None;
        }
        let min_x = margin_left + player_radius;
        let max_x = scene_width - margin_right - player_radius;
        if min_x >= max_x {
            return None;
        }
        Some(Self { min_x, max_x })
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min_x, self.max_x)
    }

    /// Movable span width
    #[inline]
    pub fn span(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Map a position in these bounds to the same relative position in
    /// `new` bounds, so a layout change never teleports the player.
    pub fn renormalize(&self, x: f32, new: &MovementBounds) -> f32 {
        let t = ((x - self.min_x) / self.span()).clamp(0.0, 1.0);
        new.min_x + t * new.span()
    }
}

/// Map a tilt axis value to a target velocity.
///
/// The axis is clamped to [-1, 1], values inside the dead zone map to zero,
/// and the remainder is renormalized over the live range so the output is
/// continuous at the dead-zone edge and reaches exactly `max_speed *
/// sensitivity` at full deflection.
#[inline]
pub fn tilt_velocity(axis: f32, dead_zone: f32, max_speed: f32, sensitivity: f32) -> f32 {
    let axis = axis.clamp(-1.0, 1.0);
    if axis.abs() < dead_zone {
        return 0.0;
    }
    let live = (axis.abs() - dead_zone) / (1.0 - dead_zone);
    live * max_speed * sensitivity * axis.signum()
}

/// Integrate one frame of player motion.
///
/// Returns `true` when a direction-change (squash feedback) event fired.
pub fn integrate(
    player: &mut PlayerState,
    input: Option<ControlInput>,
    bounds: Option<MovementBounds>,
    tilt_sensitivity: f32,
    dt: f32,
) -> bool {
    let dt = dt.max(MIN_FRAME_DT);

    match input {
        Some(ControlInput::Drag { target_x }) if target_x.is_finite() => {
            let desired = (target_x - player.x) / dt;
            player.velocity = desired.clamp(-PLAYER_MAX_SPEED, PLAYER_MAX_SPEED);
            player.tilt_smoothed = player.velocity;
        }
        Some(ControlInput::Tilt { axis }) if axis.is_finite() => {
            let target = tilt_velocity(axis, TILT_DEAD_ZONE, TILT_MAX_SPEED, tilt_sensitivity);
            let alpha = (TILT_RESPONSIVENESS * tilt_sensitivity * dt).min(1.0);
            player.tilt_smoothed += (target - player.tilt_smoothed) * alpha;
            player.velocity = player.tilt_smoothed;
        }
        _ => {
            // No input this frame: drag stops dead, tilt keeps its filtered velocity
            if !player.tilt_active {
                player.velocity = 0.0;
            } else {
                let alpha = (TILT_RESPONSIVENESS * tilt_sensitivity * dt).min(1.0);
                player.tilt_smoothed += (0.0 - player.tilt_smoothed) * alpha;
                player.velocity = player.tilt_smoothed;
            }
        }
    }
    player.tilt_active = matches!(input, Some(ControlInput::Tilt { .. }));

    let next = player.x + player.velocity * dt;
    player.x = match bounds {
        Some(b) => b.clamp(next),
        None => next,
    };

    update_direction_sign(player)
}

/// Track the velocity sign for squash feedback.
///
/// The event fires when the velocity magnitude is above the arm threshold
/// and its sign flips from the recorded one. The sign resets to neutral
/// only once magnitude drops well below the threshold, so tiny oscillations
/// around zero never fire spurious events.
fn update_direction_sign(player: &mut PlayerState) -> bool {
    let speed = player.velocity.abs();
    if speed >= SQUASH_SPEED_THRESHOLD {
        let sign: i8 = if player.velocity > 0.0 { 1 } else { -1 };
        let flipped = player.last_dir != 0 && player.last_dir != sign;
        player.last_dir = sign;
        flipped
    } else {
        if speed < SQUASH_SPEED_RELEASE {
            player.last_dir = 0;
        }
        false
    }
}

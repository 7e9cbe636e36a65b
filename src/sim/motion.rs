//! Control flags to candidate pose.

use super::player::{PlayerState, Position};

/// Distance each active control flag contributes per tick, in world units.
pub const MOVE_SPEED: f32 = 0.5;

/// Maps a player's held controls to a candidate position and facing.
pub struct MotionIntegrator;

impl MotionIntegrator {
    /// Produce the candidate `(position, rotation)` for one tick.
    ///
    /// Left/right move along x, forward/backward along z (forward is -z).
    /// Each active flag contributes a full impulse, so orthogonal flags
    /// combine into diagonal movement at sqrt(2) times the single-axis
    /// speed. The candidate rotation faces the movement vector; with no
    /// flag held the previous facing is carried over so the player does
    /// not snap to a stale angle while standing still.
    pub fn integrate(player: &PlayerState) -> (Position, f32) {
        let controls = &player.controls;

        let mut dx = 0.0;
        let mut dz = 0.0;
        if controls.left {
            dx -= MOVE_SPEED;
        }
        if controls.right {
            dx += MOVE_SPEED;
        }
        if controls.forward {
            dz -= MOVE_SPEED;
        }
        if controls.backward {
            dz += MOVE_SPEED;
        }

        let candidate = Position {
            x: player.position.x + dx,
            y: player.position.y,
            z: player.position.z + dz,
        };

        let rotation = if controls.any() {
            // Yaw measured from +z toward +x, matching the rotation
            // convention used when building player quads.
            dx.atan2(dz)
        } else {
            player.rotation
        };

        (candidate, rotation)
    }
}

//! Candidate pose validation against the static world.

use crate::geom::{oriented_quad, quads_intersect, Vec2};
use crate::world::WorldModel;

use super::player::{PlayerState, Position};

/// Obstacles whose center is at or beyond this planar distance from the
/// candidate center are skipped without a precise test, bounding SAT work
/// to a small neighborhood regardless of total obstacle count.
pub const CULL_RADIUS: f32 = 4.0;

/// Validates candidate player poses against world bounds and obstacles.
pub struct CollisionDetector;

impl CollisionDetector {
    /// True if the candidate pose collides with the world.
    ///
    /// The check runs in three stages: the player's rotated bounding box
    /// against the world bounds (closed comparison, a corner exactly on
    /// the boundary collides), a proximity cull per obstacle, then SAT
    /// against each surviving obstacle, short-circuiting on the first hit.
    pub fn collides(world: &WorldModel, candidate: &Position, rotation: f32) -> bool {
        let center = Vec2::new(candidate.x, candidate.z);
        let player_quad = oriented_quad(center, rotation, &PlayerState::LOCAL_BOX);

        let half_w = world.half_width();
        let half_h = world.half_height();
        for corner in &player_quad {
            if corner.x.abs() >= half_w || corner.z.abs() >= half_h {
                return true;
            }
        }

        let cull_sq = CULL_RADIUS * CULL_RADIUS;
        for (obstacle, quad) in world.obstacles() {
            if center.distance_sq(&obstacle.center) >= cull_sq {
                continue;
            }
            if quads_intersect(&player_quad, quad) {
                return true;
            }
        }

        false
    }
}

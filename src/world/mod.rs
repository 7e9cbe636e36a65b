//! Static world geometry: bounds plus rotated rectangular obstacles.
//!
//! The world description is supplied once at startup by an external loader
//! (a JSON file in this deployment) and never mutated afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geom::{oriented_quad, segments_intersect, LocalBox, Quad, Vec2};

/// A rotated rectangular obstacle fixed in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticObstacle {
    /// Planar center of the obstacle.
    pub center: Vec2,
    /// Rotation about the center, in radians.
    pub rotation: f32,
    /// Corner offsets relative to the center, pre-rotation.
    pub local_box: LocalBox,
}

/// On-disk world description, mirrored by the world JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldFile {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub objects: Vec<StaticObstacle>,
}

/// Errors raised while loading or validating a world description.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("failed to read world file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse world file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("world bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("obstacle {index} has a self-intersecting corner box")]
    SelfIntersecting { index: usize },
}

/// Immutable world geometry.
///
/// The world covers `[-width/2, width/2] x [-height/2, height/2]`. Obstacle
/// rotation never changes, so each obstacle's world-space quadrilateral is
/// computed once here instead of on every tick.
#[derive(Debug, Clone)]
pub struct WorldModel {
    width: f32,
    height: f32,
    objects: Vec<StaticObstacle>,
    /// World-space quad per obstacle, parallel to `objects`.
    polys: Vec<Quad>,
}

impl WorldModel {
    /// Build and validate a world from bounds and obstacles.
    pub fn new(
        width: f32,
        height: f32,
        objects: Vec<StaticObstacle>,
    ) -> Result<Self, WorldError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(WorldError::InvalidBounds { width, height });
        }

        for (index, obstacle) in objects.iter().enumerate() {
            if !is_simple_quad(&obstacle.local_box) {
                return Err(WorldError::SelfIntersecting { index });
            }
        }

        let polys = objects
            .iter()
            .map(|o| oriented_quad(o.center, o.rotation, &o.local_box))
            .collect();

        Ok(Self {
            width,
            height,
            objects,
            polys,
        })
    }

    /// An obstacle-free world, used when no world file is configured.
    pub fn empty(width: f32, height: f32) -> Result<Self, WorldError> {
        Self::new(width, height, Vec::new())
    }

    /// Load a world description from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let file: WorldFile = serde_json::from_str(&text)?;
        let world = Self::new(file.width, file.height, file.objects)?;
        info!(
            path = %path.as_ref().display(),
            obstacles = world.objects.len(),
            "Loaded world description"
        );
        Ok(world)
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Obstacles paired with their precomputed world-space quads.
    pub fn obstacles(&self) -> impl Iterator<Item = (&StaticObstacle, &Quad)> {
        self.objects.iter().zip(self.polys.iter())
    }

    pub fn obstacle_count(&self) -> usize {
        self.objects.len()
    }
}

/// True if the corner traversal forms a simple (non-self-intersecting)
/// quadrilateral. Only opposite edges can cross; adjacent edges share an
/// endpoint, which the segment test excludes.
fn is_simple_quad(local: &LocalBox) -> bool {
    let c = local.corners();
    !segments_intersect(c[0], c[1], c[2], c[3]) && !segments_intersect(c[1], c[2], c[3], c[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_at(x: f32, z: f32, half: f32, rotation: f32) -> StaticObstacle {
        StaticObstacle {
            center: Vec2::new(x, z),
            rotation,
            local_box: LocalBox::square(half),
        }
    }

    #[test]
    fn rejects_non_positive_bounds() {
        assert!(matches!(
            WorldModel::empty(0.0, 50.0),
            Err(WorldError::InvalidBounds { .. })
        ));
        assert!(matches!(
            WorldModel::empty(50.0, -1.0),
            Err(WorldError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn rejects_self_intersecting_obstacle() {
        // Swapping the front corners makes the traversal cross itself.
        let twisted = StaticObstacle {
            center: Vec2::new(0.0, 0.0),
            rotation: 0.0,
            local_box: LocalBox {
                back_left: Vec2::new(-1.0, 1.0),
                back_right: Vec2::new(1.0, 1.0),
                front_left: Vec2::new(1.0, -1.0),
                front_right: Vec2::new(-1.0, -1.0),
            },
        };
        assert!(matches!(
            WorldModel::new(50.0, 50.0, vec![twisted]),
            Err(WorldError::SelfIntersecting { index: 0 })
        ));
    }

    #[test]
    fn precomputes_obstacle_quads() {
        let world = WorldModel::new(50.0, 50.0, vec![obstacle_at(3.0, 4.0, 1.0, 0.5)]).unwrap();
        let (obstacle, quad) = world.obstacles().next().unwrap();
        let expected = oriented_quad(obstacle.center, obstacle.rotation, &obstacle.local_box);
        for (a, b) in quad.iter().zip(expected.iter()) {
            assert!((a.x - b.x).abs() < 1e-6);
            assert!((a.z - b.z).abs() < 1e-6);
        }
    }

    #[test]
    fn parses_world_json() {
        let json = r#"{
            "width": 50.0,
            "height": 40.0,
            "objects": [{
                "center": {"x": 3.0, "z": -2.0},
                "rotation": 0.785,
                "localBox": {
                    "backLeft": {"x": -1.0, "z": 1.0},
                    "backRight": {"x": 1.0, "z": 1.0},
                    "frontLeft": {"x": -1.0, "z": -1.0},
                    "frontRight": {"x": 1.0, "z": -1.0}
                }
            }]
        }"#;
        let file: WorldFile = serde_json::from_str(json).unwrap();
        let world = WorldModel::new(file.width, file.height, file.objects).unwrap();
        assert_eq!(world.obstacle_count(), 1);
        assert!((world.half_height() - 20.0).abs() < f32::EPSILON);
    }
}

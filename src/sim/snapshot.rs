//! Snapshot wire types handed to the external broadcaster.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerRegistry, Position};

/// A single player's pose in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub position: Position,
    pub rotation: f32,
}

/// Complete registry state captured at the end of one tick.
///
/// Exactly one snapshot is published per tick, in tick order; the
/// broadcaster fans it out unmodified to every connected session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub players: HashMap<PlayerId, PlayerPose>,
}

impl StateSnapshot {
    /// Capture the full registry as of the given tick.
    pub fn capture(tick: u64, registry: &PlayerRegistry) -> Self {
        let players = registry
            .iter()
            .map(|p| {
                (
                    p.id.clone(),
                    PlayerPose {
                        position: p.position,
                        rotation: p.rotation,
                    },
                )
            })
            .collect();
        Self { tick, players }
    }
}

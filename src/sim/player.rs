//! Player state and the registry mapping connection ids to it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geom::LocalBox;

use super::ControlState;

/// Connection-lifetime player identifier, assigned by the transport layer.
pub type PlayerId = String;

/// Half extent of the square box players occupy on the ground plane.
pub const PLAYER_HALF_EXTENT: f32 = 0.5;

/// World-space position. `y` is carried through snapshots for clients but
/// is inert for movement and collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Authoritative per-player state.
///
/// `controls` is written only by event handling between ticks; `position`
/// and `rotation` are written only by the tick itself.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: Position,
    pub rotation: f32,
    pub controls: ControlState,
}

impl PlayerState {
    /// The rotated bounding box players carry, shared by all of them.
    pub const LOCAL_BOX: LocalBox = LocalBox::square(PLAYER_HALF_EXTENT);

    /// A freshly connected player: world origin, facing +z, no input held.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: Position::default(),
            rotation: 0.0,
            controls: ControlState::default(),
        }
    }
}

/// Mapping from player id to authoritative state.
///
/// At most one live entry per id; an entry exists exactly between a connect
/// and the matching disconnect.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, PlayerState>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default entry for a newly connected player.
    ///
    /// Returns false (and keeps the existing entry untouched) if the id is
    /// already live.
    pub fn connect(&mut self, id: PlayerId) -> bool {
        if self.players.contains_key(&id) {
            return false;
        }
        self.players.insert(id.clone(), PlayerState::new(id));
        true
    }

    /// Replace the controls of an existing entry.
    ///
    /// Unknown ids are a silent no-op: an input packet can race the
    /// disconnect that removed its player.
    pub fn input(&mut self, id: &str, controls: ControlState) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.controls = controls;
                true
            }
            None => false,
        }
    }

    /// Remove the entry for a disconnected player, if present.
    pub fn disconnect(&mut self, id: &str) -> bool {
        self.players.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerState> {
        self.players.values_mut()
    }
}

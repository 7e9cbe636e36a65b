//! Player simulation modules

pub mod clock;
pub mod collision;
pub mod motion;
pub mod player;
pub mod snapshot;

pub use clock::{Simulation, SimulationHandle};
pub use player::{PlayerId, PlayerRegistry, PlayerState, Position};

use serde::{Deserialize, Serialize};

/// Per-player control flags for one tick.
///
/// All four fields are required on the wire; a payload missing any of them
/// fails deserialization and is dropped as a whole, leaving the previous
/// controls in place. The flags are independent and deliberately not
/// normalized: forward+left moves diagonally at sqrt(2) times the
/// single-axis speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlState {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub backward: bool,
}

impl ControlState {
    /// True if any movement flag is held.
    pub fn any(&self) -> bool {
        self.left || self.right || self.forward || self.backward
    }
}

/// Commands delivered to the simulation task by the transport layer.
#[derive(Debug, Clone)]
pub enum SimCommand {
    /// A session was established for this player.
    Connect { player_id: PlayerId },
    /// A validated control payload arrived.
    Input {
        player_id: PlayerId,
        controls: ControlState,
    },
    /// The session ended, normally or abnormally.
    Disconnect { player_id: PlayerId },
}

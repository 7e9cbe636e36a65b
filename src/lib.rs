//! Authoritative fixed-tick player simulation core.
//!
//! Turns per-player control input into validated position/rotation updates
//! against a static world of rotated rectangular obstacles, at a constant
//! tick rate, and publishes one consistent state snapshot per tick for an
//! external broadcaster. Transport, auth, and HTTP surfaces live outside
//! this crate and talk to it through [`sim::SimulationHandle`].

pub mod config;
pub mod geom;
pub mod sim;
pub mod util;
pub mod world;

pub use sim::clock::{Simulation, SimulationHandle};
pub use sim::snapshot::StateSnapshot;
pub use sim::ControlState;
pub use world::{StaticObstacle, WorldModel};

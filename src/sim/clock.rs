//! The authoritative fixed-tick loop.
//!
//! A single task owns the player registry. Connect/input/disconnect
//! commands arrive on an mpsc channel and are drained at each tick
//! boundary, so the set of players a tick works on is stable for the
//! whole tick and a disconnect can never race a mid-tick write-back.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::util::time::{tick_period, Timer};
use crate::world::WorldModel;

use super::collision::CollisionDetector;
use super::motion::MotionIntegrator;
use super::player::{PlayerId, PlayerRegistry};
use super::snapshot::StateSnapshot;
use super::{ControlState, SimCommand};

const COMMAND_BUFFER: usize = 256;
const SNAPSHOT_BUFFER: usize = 64;

/// Handle held by transport-layer sessions to talk to the simulation.
#[derive(Clone)]
pub struct SimulationHandle {
    command_tx: mpsc::Sender<SimCommand>,
    snapshot_tx: broadcast::Sender<StateSnapshot>,
    player_count: Arc<AtomicUsize>,
}

impl SimulationHandle {
    /// Subscribe to the per-tick snapshot stream.
    pub fn subscribe(&self) -> broadcast::Receiver<StateSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Number of currently registered players, for health reporting.
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    pub async fn connect(&self, player_id: PlayerId) {
        self.send(SimCommand::Connect { player_id }).await;
    }

    pub async fn input(&self, player_id: PlayerId, controls: ControlState) {
        self.send(SimCommand::Input {
            player_id,
            controls,
        })
        .await;
    }

    pub async fn disconnect(&self, player_id: PlayerId) {
        self.send(SimCommand::Disconnect { player_id }).await;
    }

    async fn send(&self, command: SimCommand) {
        if self.command_tx.send(command).await.is_err() {
            debug!("Simulation stopped, dropping command");
        }
    }
}

/// The authoritative simulation task.
pub struct Simulation {
    world: Arc<WorldModel>,
    registry: PlayerRegistry,
    tick: u64,
    period: Duration,
    command_rx: mpsc::Receiver<SimCommand>,
    snapshot_tx: broadcast::Sender<StateSnapshot>,
    player_count: Arc<AtomicUsize>,
}

impl Simulation {
    pub fn new(world: Arc<WorldModel>, tick_rate: u32) -> (Self, SimulationHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_BUFFER);
        let player_count = Arc::new(AtomicUsize::new(0));

        let handle = SimulationHandle {
            command_tx,
            snapshot_tx: snapshot_tx.clone(),
            player_count: player_count.clone(),
        };

        let simulation = Self {
            world,
            registry: PlayerRegistry::new(),
            tick: 0,
            period: tick_period(tick_rate),
            command_rx,
            snapshot_tx,
            player_count,
        };

        (simulation, handle)
    }

    /// Run the tick loop until every handle is dropped.
    ///
    /// Overrunning ticks are skipped rather than bursting to catch up;
    /// an overrun is logged as a monitoring signal, not handled.
    pub async fn run(mut self) {
        info!(
            period_micros = self.period.as_micros() as u64,
            obstacles = self.world.obstacle_count(),
            "Simulation started"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if !self.drain_commands() {
                info!(tick = self.tick, "Command channel closed, simulation stopped");
                break;
            }

            let timer = Timer::new();
            self.step();

            let snapshot = StateSnapshot::capture(self.tick, &self.registry);
            // Fire-and-forget: no subscribers is not an error.
            let _ = self.snapshot_tx.send(snapshot);

            let elapsed = timer.elapsed_micros();
            if elapsed > self.period.as_micros() as u64 {
                warn!(
                    tick = self.tick,
                    elapsed_micros = elapsed,
                    "Tick work exceeded the tick period"
                );
            }
        }
    }

    /// Apply all pending commands. Returns false once the channel is
    /// closed and drained, which ends the loop.
    fn drain_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(command) => self.apply_command(command),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn apply_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::Connect { player_id } => {
                if self.registry.connect(player_id.clone()) {
                    self.player_count
                        .store(self.registry.len(), Ordering::Relaxed);
                    info!(
                        player_id = %player_id,
                        players = self.registry.len(),
                        "Player connected"
                    );
                } else {
                    warn!(player_id = %player_id, "Duplicate connect ignored");
                }
            }
            SimCommand::Input {
                player_id,
                controls,
            } => {
                if !self.registry.input(&player_id, controls) {
                    // Stale packet racing a disconnect; absorb it.
                    debug!(player_id = %player_id, "Input for unknown player dropped");
                }
            }
            SimCommand::Disconnect { player_id } => {
                if self.registry.disconnect(&player_id) {
                    self.player_count
                        .store(self.registry.len(), Ordering::Relaxed);
                    info!(
                        player_id = %player_id,
                        players = self.registry.len(),
                        "Player disconnected"
                    );
                } else {
                    debug!(player_id = %player_id, "Disconnect for unknown player");
                }
            }
        }
    }

    /// Advance every registered player by one tick.
    fn step(&mut self) {
        self.tick += 1;
        for player in self.registry.iter_mut() {
            let (candidate, rotation) = MotionIntegrator::integrate(player);
            // Facing is committed regardless of the collision outcome.
            player.rotation = rotation;
            if !CollisionDetector::collides(&self.world, &candidate, rotation) {
                player.position = candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{LocalBox, Vec2};
    use crate::world::StaticObstacle;
    use std::f32::consts::PI;

    fn simulation(objects: Vec<StaticObstacle>) -> Simulation {
        let world = Arc::new(WorldModel::new(50.0, 50.0, objects).unwrap());
        Simulation::new(world, 30).0
    }

    fn hold(sim: &mut Simulation, id: &str, controls: ControlState) {
        sim.registry.connect(id.to_string());
        sim.registry.input(id, controls);
    }

    #[test]
    fn forward_tick_commits_candidate_in_open_world() {
        let mut sim = simulation(vec![]);
        hold(
            &mut sim,
            "p1",
            ControlState {
                forward: true,
                ..Default::default()
            },
        );

        sim.step();

        let player = sim.registry.get("p1").unwrap();
        assert!((player.position.z + 0.5).abs() < 1e-6);
        assert_eq!(player.position.x, 0.0);
        assert!((player.rotation.abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn blocked_candidate_keeps_prior_position_but_commits_rotation() {
        // Obstacle 3 units away, inside the cull radius, large enough to
        // enclose both the current and candidate pose.
        let obstacle = StaticObstacle {
            center: Vec2::new(3.0, 0.0),
            rotation: 0.0,
            local_box: LocalBox::square(5.0),
        };
        let mut sim = simulation(vec![obstacle]);
        hold(
            &mut sim,
            "p1",
            ControlState {
                forward: true,
                ..Default::default()
            },
        );

        sim.step();

        let player = sim.registry.get("p1").unwrap();
        assert_eq!(player.position.x, 0.0);
        assert_eq!(player.position.z, 0.0);
        assert!((player.rotation.abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn idle_players_are_idempotent_across_ticks() {
        let mut sim = simulation(vec![]);
        sim.registry.connect("p1".into());

        sim.step();
        let first = sim.registry.get("p1").unwrap().clone();
        sim.step();
        let second = sim.registry.get("p1").unwrap();

        assert_eq!(first.position, second.position);
        assert_eq!(first.rotation, second.rotation);
    }

    #[test]
    fn commands_apply_before_the_next_step() {
        let (mut sim, handle) = {
            let world = Arc::new(WorldModel::empty(50.0, 50.0).unwrap());
            Simulation::new(world, 30)
        };

        handle
            .command_tx
            .try_send(SimCommand::Connect {
                player_id: "p1".into(),
            })
            .unwrap();
        assert!(sim.drain_commands());
        sim.step();

        let snapshot = StateSnapshot::capture(sim.tick, &sim.registry);
        assert_eq!(snapshot.tick, 1);
        assert!(snapshot.players.contains_key("p1"));
        assert_eq!(sim.player_count.load(Ordering::Relaxed), 1);
    }
}

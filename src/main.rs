//! Arena Sync Server - authoritative player simulation entry point
//!
//! Loads the world description, starts the fixed-tick simulation task,
//! and hands its command/snapshot channels to the embedding transport
//! layer. Run standalone it logs snapshot cadence until shut down.

use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_sync::config::Config;
use arena_sync::util::time::init_server_time;
use arena_sync::{Simulation, SimulationHandle, WorldModel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    // Initialize server time tracking
    init_server_time();

    info!("Starting Arena Sync Server");
    info!(tick_rate = config.tick_rate, "Simulation tick rate");

    // Build the static world once; it is never mutated afterwards.
    let world = match &config.world_file {
        Some(path) => WorldModel::from_file(path)?,
        None => {
            info!(
                size = config.default_world_size,
                "No world file configured, using empty world"
            );
            WorldModel::empty(config.default_world_size, config.default_world_size)?
        }
    };

    // Spawn the simulation task
    let (simulation, handle) = Simulation::new(Arc::new(world), config.tick_rate);
    let sim_task = tokio::spawn(simulation.run());

    // Trace snapshot cadence; the real broadcaster subscribes the same way.
    let monitor = tokio::spawn(monitor_snapshots(handle.clone(), config.tick_rate));

    shutdown_signal().await;

    monitor.abort();
    drop(handle);
    let _ = sim_task.await;

    info!("Server shutdown complete");
    Ok(())
}

/// Log one line per second of snapshots, as a stand-in broadcaster.
async fn monitor_snapshots(handle: SimulationHandle, tick_rate: u32) {
    use tokio::sync::broadcast::error::RecvError;

    let mut snapshot_rx = handle.subscribe();
    let mut seen: u64 = 0;

    loop {
        match snapshot_rx.recv().await {
            Ok(snapshot) => {
                seen += 1;
                if seen % tick_rate as u64 == 0 {
                    debug!(
                        tick = snapshot.tick,
                        players = snapshot.players.len(),
                        "Snapshot published"
                    );
                }
            }
            // A slow logger is not worth stopping over.
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}

//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

use crate::util::time::DEFAULT_TICK_RATE;

/// Process configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Path to the world description JSON; an empty default world is used
    /// when unset
    pub world_file: Option<PathBuf>,
    /// Side length of the default world when no world file is configured
    pub default_world_size: f32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick_rate = match env::var("TICK_RATE") {
            Ok(value) => value
                .parse::<u32>()
                .ok()
                .filter(|rate| *rate > 0)
                .ok_or(ConfigError::InvalidTickRate(value))?,
            Err(_) => DEFAULT_TICK_RATE,
        };

        let default_world_size = match env::var("WORLD_SIZE") {
            Ok(value) => value
                .parse::<f32>()
                .ok()
                .filter(|size| *size > 0.0)
                .ok_or(ConfigError::InvalidWorldSize(value))?,
            Err(_) => 50.0,
        };

        Ok(Self {
            tick_rate,
            world_file: env::var("WORLD_FILE").ok().map(PathBuf::from),
            default_world_size,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TICK_RATE must be a positive integer, got {0:?}")]
    InvalidTickRate(String),

    #[error("WORLD_SIZE must be a positive number, got {0:?}")]
    InvalidWorldSize(String),
}

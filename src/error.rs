//! Simulation error types
//!
//! The engine does no I/O of its own; the only runtime failures are an arena
//! with no room left to spawn into and configuration that cannot describe a
//! physical world.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Collision-free sampling gave up after the configured number of draws.
    #[error("no collision-free spawn point found after {attempts} attempts")]
    SpawnExhausted { attempts: u32 },

    #[error("invalid tuning `{field}`: {reason}")]
    InvalidTuning { field: &'static str, reason: String },

    #[error("invalid arena: {0}")]
    InvalidArena(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

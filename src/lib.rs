//! # grid-arbiter
//!
//! A move-arbitration simulator for concurrent agents on a shared grid,
//! over Tokio.
//!
//! ## Architecture
//!
//! N agents on one board, one lock, one broadcast wakeup:
//! ```text
//! Coordinator ──► Agent 1 ─┐
//!             ──► Agent 2 ─┼──► SharedBoard (occupancy + progress clock,
//!             ──► Agent N ─┘      one mutex, broadcast wake on commit)
//! ```
//!
//! Each agent loops: propose a random straight-line move, wait for the
//! whole corridor to clear (short local budget), commit atomically, jitter,
//! repeat. A blocked proposal is dropped for a fresh one; an agent only
//! gives up when *no* agent has moved for the global stall window. The
//! coordinator joins all agents and ANDs their outcomes.

// ── Lint policy (aerospace-grade) ─────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(missing_docs)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod agent;
pub mod board;
pub mod config;
pub mod coordinator;
pub mod position;

// Re-exports for convenience
pub use agent::AgentReport;
pub use board::{Board, MoveAttempt, SharedBoard};
pub use config::SimConfig;
pub use coordinator::{Coordinator, RunReport};
pub use position::Position;

/// Initialise the global tracing subscriber.
///
/// Reads the `LOG_FORMAT` environment variable to choose output format:
/// - `"json"` — structured JSON output for log aggregators
/// - anything else (including unset) — human-readable pretty output
///
/// Filter level is controlled by `RUST_LOG` (e.g. `RUST_LOG=info`).
///
/// # Errors
///
/// Returns [`SimError::Other`] if the global subscriber has already been
/// set (e.g. by a previous call or a test harness).
pub fn init_tracing() -> Result<(), SimError> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init(),
    };

    result.map_err(|e| SimError::Other(format!("tracing init failed: {e}")))
}

/// Top-level simulation errors.
///
/// Blocked paths are *not* errors — they are normal control flow handled
/// inside the agent loop. The only error class that exists before or
/// outside a run is configuration; a stalled agent is a `false` outcome
/// in its [`AgentReport`], not an `Err`.
#[derive(Error, Debug)]
pub enum SimError {
    /// A configuration value is out of bounds (1×1 board, agent count
    /// over board capacity, zero budgets). Detected before any agent
    /// task spawns.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        /// Path of the file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file was not valid TOML for the expected schema.
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        /// Path of the file that failed to parse.
        path: String,
        /// Underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// Catch-all for errors that do not fit a specific variant.
    #[error("{0}")]
    Other(String),
}

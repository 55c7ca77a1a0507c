//! # SimConfig — simulation configuration
//!
//! ## Responsibility
//! Define the simulation parameters: board size, agent count, the move
//! quota, the two timeout tiers, and the inter-move jitter range.
//!
//! ## Guarantees
//! - Validated: all fields are bounds-checked before any task spawns
//! - Defaulted: every field has a sensible default (the 8×8 / 6-agent /
//!   50-move demo scenario)
//! - Serializable: round-trips through serde (TOML ↔ Rust)
//!
//! ## NOT Responsible For
//! - Running the simulation (see: coordinator.rs)
//! - Per-move arbitration (see: board.rs)

use crate::SimError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for one simulation run.
///
/// # Example
///
/// ```rust
/// use grid_arbiter::SimConfig;
/// let config = SimConfig::default();
/// assert_eq!(config.board_size, 8);
/// assert_eq!(config.agent_count, 6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Side length of the square board.
    #[serde(default = "default_board_size")]
    pub board_size: usize,

    /// Number of concurrent agents to place and run.
    #[serde(default = "default_agent_count")]
    pub agent_count: usize,

    /// Moves each agent must complete to finish successfully.
    #[serde(default = "default_needed_moves")]
    pub needed_moves: u32,

    /// Local wait budget per proposed move (milliseconds). When it
    /// expires with the corridor still blocked, the agent resamples a
    /// fresh target instead of retrying the same one.
    #[serde(default = "default_path_wait_ms")]
    pub path_wait_ms: u64,

    /// Global stall window (milliseconds). An agent only gives up when
    /// *no* agent has moved for this long.
    #[serde(default = "default_stall_timeout_ms")]
    pub stall_timeout_ms: u64,

    /// Lower bound of the randomized sleep after each successful move.
    #[serde(default = "default_jitter_min_ms")]
    pub jitter_min_ms: u64,

    /// Upper bound of the randomized sleep after each successful move.
    #[serde(default = "default_jitter_max_ms")]
    pub jitter_max_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            agent_count: default_agent_count(),
            needed_moves: default_needed_moves(),
            path_wait_ms: default_path_wait_ms(),
            stall_timeout_ms: default_stall_timeout_ms(),
            jitter_min_ms: default_jitter_min_ms(),
            jitter_max_ms: default_jitter_max_ms(),
        }
    }
}

impl SimConfig {
    /// Validate the configuration, returning all violations at once.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] with concatenated messages if
    /// any field is out of bounds. Checked before any concurrent work
    /// starts, so a bad configuration can never hang a run.
    pub fn validate(&self) -> Result<(), SimError> {
        let mut errors = Vec::new();

        if self.board_size < 2 {
            // A 1x1 board admits no straight-line target distinct from
            // the current cell; target sampling would never terminate.
            errors.push("board_size must be >= 2".to_string());
        }
        if self.agent_count == 0 {
            errors.push("agent_count must be > 0".to_string());
        }
        if self.agent_count > self.board_size * self.board_size {
            errors.push(format!(
                "agent_count {} exceeds board capacity {}",
                self.agent_count,
                self.board_size * self.board_size
            ));
        }
        if self.needed_moves == 0 {
            errors.push("needed_moves must be > 0".to_string());
        }
        if self.path_wait_ms == 0 {
            errors.push("path_wait_ms must be > 0".to_string());
        }
        if self.stall_timeout_ms == 0 {
            errors.push("stall_timeout_ms must be > 0".to_string());
        }
        if self.jitter_min_ms > self.jitter_max_ms {
            errors.push("jitter_min_ms must be <= jitter_max_ms".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SimError::InvalidConfig(errors.join("; ")))
        }
    }

    /// Load a configuration from a TOML file. Missing fields take their
    /// defaults; validation is left to the caller (the coordinator
    /// validates on construction).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigIo`] if the file cannot be read, or
    /// [`SimError::ConfigParse`] if it is not valid TOML for this schema.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SimError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// The local per-move wait budget as a [`Duration`].
    pub fn path_wait(&self) -> Duration {
        Duration::from_millis(self.path_wait_ms)
    }

    /// The global stall window as a [`Duration`].
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_millis(self.stall_timeout_ms)
    }
}

fn default_board_size() -> usize {
    8
}

fn default_agent_count() -> usize {
    6
}

fn default_needed_moves() -> u32 {
    50
}

fn default_path_wait_ms() -> u64 {
    5_000
}

fn default_stall_timeout_ms() -> u64 {
    60_000
}

fn default_jitter_min_ms() -> u64 {
    200
}

fn default_jitter_max_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_one_by_one_board_rejected() {
        let config = SimConfig {
            board_size: 1,
            agent_count: 1,
            ..SimConfig::default()
        };
        let err = config.validate().expect_err("1x1 board must be rejected");
        assert!(err.to_string().contains("board_size"));
    }

    #[test]
    fn test_over_capacity_rejected() {
        let config = SimConfig {
            board_size: 2,
            agent_count: 5,
            ..SimConfig::default()
        };
        let err = config.validate().expect_err("5 agents on 4 cells");
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_full_board_is_allowed() {
        let config = SimConfig {
            board_size: 2,
            agent_count: 4,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_agents_rejected() {
        let config = SimConfig {
            agent_count: 0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_jitter_rejected() {
        let config = SimConfig {
            jitter_min_ms: 300,
            jitter_max_ms: 200,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = SimConfig {
            board_size: 0,
            agent_count: 0,
            needed_moves: 0,
            path_wait_ms: 0,
            stall_timeout_ms: 0,
            ..SimConfig::default()
        };
        let err = config.validate().expect_err("everything is wrong");
        let msg = err.to_string();
        assert!(msg.contains("board_size"));
        assert!(msg.contains("agent_count"));
        assert!(msg.contains("needed_moves"));
        assert!(msg.contains("path_wait_ms"));
        assert!(msg.contains("stall_timeout_ms"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimConfig = toml::from_str("board_size = 4\nagent_count = 2\n")
            .expect("partial config parses");
        assert_eq!(config.board_size, 4);
        assert_eq!(config.agent_count, 2);
        assert_eq!(config.needed_moves, 50);
        assert_eq!(config.stall_timeout_ms, 60_000);
    }

    #[test]
    fn test_duration_accessors() {
        let config = SimConfig::default();
        assert_eq!(config.path_wait(), Duration::from_secs(5));
        assert_eq!(config.stall_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_from_toml_path_missing_file() {
        let err = SimConfig::from_toml_path("/definitely/not/here.toml")
            .expect_err("missing file must error");
        assert!(matches!(err, SimError::ConfigIo { .. }));
    }
}

//! # Coordinator — fleet spawning and result aggregation
//!
//! ## Responsibility
//! Own the shared board and the agents. Validate the configuration,
//! place every agent on a distinct free cell, launch one task per agent,
//! join them all, and fold the individual outcomes into one verdict.
//!
//! ## Guarantees
//! - Fail-fast: configuration errors surface before any task spawns
//! - Concurrent: agents run in parallel tokio tasks
//! - Complete: the run never aborts early — every agent reaches its own
//!   natural completion or failure, then the outcomes are ANDed
//!
//! ## NOT Responsible For
//! - Move arbitration (see: board.rs)
//! - Retry and stall policy (see: agent.rs)

use crate::agent::{Agent, AgentReport};
use crate::board::SharedBoard;
use crate::config::SimConfig;
use crate::SimError;
use std::sync::Arc;
use std::time::Instant;

/// Aggregate outcome of a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// `true` iff every agent reached its move quota.
    pub completed: bool,
    /// Total successful moves across all agents.
    pub total_moves: u64,
    /// Per-agent reports, in agent-id order.
    pub agents: Vec<AgentReport>,
}

/// Builds the shared board, places the agents, and runs the fleet.
///
/// # Example
///
/// ```rust,no_run
/// use grid_arbiter::{Coordinator, SimConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), grid_arbiter::SimError> {
/// let coordinator = Coordinator::new(SimConfig::default())?;
/// let report = coordinator.run().await;
/// println!("completed: {}", report.completed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Coordinator {
    board: Arc<SharedBoard>,
    agents: Vec<Agent>,
}

impl Coordinator {
    /// Validate the configuration, build the shared board, and place one
    /// agent per slot on a distinct random free cell.
    ///
    /// This is the only place agents are constructed, so every agent in
    /// existence went through the capacity check here.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the configuration fails
    /// validation (1×1 board, over-capacity agent count, zero budgets).
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let board = Arc::new(SharedBoard::new(config.board_size));
        let config = Arc::new(config);
        let agents = (1..=config.agent_count)
            .map(|id| Agent::new(id, Arc::clone(&board), Arc::clone(&config)))
            .collect();

        Ok(Self { board, agents })
    }

    /// Handle to the shared board, for snapshot rendering around a run.
    pub fn board(&self) -> &Arc<SharedBoard> {
        &self.board
    }

    /// Run every agent's move loop to completion and aggregate.
    ///
    /// Stamps the global progress clock, spawns one task per agent, then
    /// joins them in id order. A panicked agent task is logged and
    /// counted as a failure; siblings keep running regardless. The
    /// aggregate is the AND of all individual outcomes.
    pub async fn run(self) -> RunReport {
        self.board.mark_run_start();
        let run_start = Instant::now();
        tracing::info!(agents = self.agents.len(), "launching agent fleet");

        let handles: Vec<_> = self
            .agents
            .into_iter()
            .map(|agent| (agent.id(), tokio::spawn(agent.run(run_start))))
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!(agent = id, error = %e, "agent task panicked");
                    reports.push(AgentReport {
                        id,
                        completed: false,
                        moves_done: 0,
                        blocked_attempts: 0,
                    });
                }
            }
        }

        let completed = reports.iter().all(|r| r.completed);
        let total_moves = self.board.total_moves();
        if completed {
            tracing::info!(total_moves, "run completed successfully");
        } else {
            tracing::warn!(total_moves, "run did not complete, move waiting timed out");
        }

        RunReport {
            completed,
            total_moves,
            agents: reports,
        }
    }
}

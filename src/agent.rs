//! # Agent — the move loop
//!
//! ## Responsibility
//! Run one agent's propose → wait → commit-or-retry loop against the
//! shared board until its move quota is met or the system stalls.
//!
//! ## Guarantees
//! - Straight-line moves only: every committed move changes exactly one
//!   coordinate (targets come from `Position::random_move_target`)
//! - Fresh targets on retry: a blocked proposal is dropped, never
//!   re-waited on, so one unlucky target cannot starve the agent behind
//!   a slow blocker
//! - Local failure: a stalled agent reports failure and stops; it never
//!   cancels or signals its siblings
//!
//! ## NOT Responsible For
//! - Occupancy mutation (see: board.rs — commits happen under its lock)
//! - Fleet lifecycle and result aggregation (see: coordinator.rs)

use crate::board::{MoveAttempt, SharedBoard};
use crate::config::SimConfig;
use crate::position::Position;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one agent's run.
#[derive(Debug, Clone)]
pub struct AgentReport {
    /// Agent identifier (1-based).
    pub id: usize,
    /// Whether the agent reached its move quota.
    pub completed: bool,
    /// Moves actually committed. Equals the quota iff `completed`.
    pub moves_done: u32,
    /// Proposals dropped after the local wait budget expired.
    pub blocked_attempts: u64,
}

/// One mobile agent: an id, a current position, and a handle to the
/// shared board it contends on.
///
/// Agents exist only as children of a [`Coordinator`](crate::Coordinator):
/// the constructor is module-private, so placement always goes through
/// the coordinator's capacity-validated setup.
#[derive(Debug)]
pub struct Agent {
    id: usize,
    position: Position,
    moves_done: u32,
    board: Arc<SharedBoard>,
    config: Arc<SimConfig>,
}

impl Agent {
    /// Place a new agent on a random free cell of the shared board.
    pub(crate) fn new(id: usize, board: Arc<SharedBoard>, config: Arc<SimConfig>) -> Self {
        let position = board.claim_start();
        Self {
            id,
            position,
            moves_done: 0,
            board,
            config,
        }
    }

    /// Agent identifier (1-based).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current position. Mirrors exactly one occupied cell on the board.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The move loop: `Proposing → AwaitingPath → {Moved | Retrying |
    /// Stalled}`, looping until the quota is met or the system stalls.
    ///
    /// Per iteration the agent samples a fresh straight-line target and
    /// asks the board to wait for the corridor and commit, bounded by the
    /// local wait budget. On commit it updates its own position, logs
    /// progress, and sleeps a randomized jitter to throttle contention.
    /// On budget expiry it checks the *global* progress clock: if no
    /// agent has moved for the whole stall window it terminates with
    /// failure, otherwise it drops the target and proposes again.
    pub(crate) async fn run(mut self, run_start: Instant) -> AgentReport {
        let mut blocked_attempts = 0_u64;

        while self.moves_done < self.config.needed_moves {
            let target = Position::random_move_target(self.position, self.board.size());

            match self
                .board
                .await_clear_and_commit(self.position, target, self.config.path_wait())
                .await
            {
                MoveAttempt::Committed { total_moves } => {
                    tracing::info!(
                        agent = self.id,
                        elapsed_ms = run_start.elapsed().as_millis() as u64,
                        from = %self.position,
                        to = %target,
                        total_moves,
                        "moved"
                    );
                    self.position = target;
                    self.moves_done += 1;
                    tokio::time::sleep(self.jitter()).await;
                }
                MoveAttempt::Blocked => {
                    if self.board.since_last_progress() > self.config.stall_timeout() {
                        tracing::warn!(
                            agent = self.id,
                            elapsed_ms = run_start.elapsed().as_millis() as u64,
                            moves_done = self.moves_done,
                            "no move by any agent within the stall window, giving up"
                        );
                        return AgentReport {
                            id: self.id,
                            completed: false,
                            moves_done: self.moves_done,
                            blocked_attempts,
                        };
                    }

                    blocked_attempts += 1;
                    tracing::debug!(
                        agent = self.id,
                        elapsed_ms = run_start.elapsed().as_millis() as u64,
                        from = %self.position,
                        to = %target,
                        "path blocked, resampling target"
                    );
                }
            }
        }

        tracing::info!(
            agent = self.id,
            elapsed_ms = run_start.elapsed().as_millis() as u64,
            moves_done = self.moves_done,
            "quota reached"
        );
        AgentReport {
            id: self.id,
            completed: true,
            moves_done: self.moves_done,
            blocked_attempts,
        }
    }

    /// Randomized inter-move sleep, sampled fresh per move.
    fn jitter(&self) -> Duration {
        let ms = rand::rng().random_range(self.config.jitter_min_ms..=self.config.jitter_max_ms);
        Duration::from_millis(ms)
    }
}

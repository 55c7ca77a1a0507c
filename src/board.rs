//! # Board — shared occupancy state and move arbitration
//!
//! ## Responsibility
//! Hold the one piece of state every agent contends on: the occupancy
//! matrix, the instant of the last successful move by *any* agent, and
//! the running total move counter. Expose it only through guarded
//! operations so that mutation can never bypass the lock.
//!
//! ## Guarantees
//! - Single lock: one mutex guards the matrix, the progress instant and
//!   the move counter together; commits are atomic with their final
//!   corridor check
//! - Broadcast wake: every committed move wakes *every* waiter, because
//!   any move can unblock any other agent's corridor
//! - Conservation: a commit swaps occupancy between two cells, never
//!   creates or destroys it
//!
//! ## NOT Responsible For
//! - Choosing move targets (see: position.rs)
//! - Retry and stall policy (see: agent.rs)

use crate::position::Position;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// Plain occupancy matrix: `true` means the cell is held by an agent.
///
/// `Board` is the pure, lock-free half of the model — corridor clearance
/// is a function of a `Board` and two positions, nothing else. The shared,
/// guarded half lives in [`SharedBoard`].
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Vec<bool>>,
}

impl Board {
    /// Create an empty `size` × `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![false; size]; size],
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `pos` is currently occupied.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cells[pos.row][pos.column]
    }

    /// Set the occupancy of a single cell.
    pub fn set_occupied(&mut self, pos: Position, occupied: bool) {
        self.cells[pos.row][pos.column] = occupied;
    }

    /// Count of occupied cells. Equals the agent count at all quiescent
    /// points of a run (occupancy conservation).
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&c| c).count())
            .sum()
    }

    /// Whether the corridor from `from` to `to` is blocked.
    ///
    /// The corridor is the axis-aligned bounding rectangle between the two
    /// positions, inclusive on both ends. Since a move holds one axis
    /// fixed, the rectangle degenerates to a 1-D segment. The move is
    /// blocked iff any cell in it other than `from` itself is occupied —
    /// the destination counts, the mover's own cell does not.
    pub fn corridor_blocked(&self, from: Position, to: Position) -> bool {
        let (row_lo, row_hi) = min_max(from.row, to.row);
        let (col_lo, col_hi) = min_max(from.column, to.column);
        for row in row_lo..=row_hi {
            for column in col_lo..=col_hi {
                if self.cells[row][column] && !(row == from.row && column == from.column) {
                    return true;
                }
            }
        }
        false
    }
}

impl std::fmt::Display for Board {
    /// Render occupied cells as `#` and free cells as `.`, one row per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", if *cell { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn min_max(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Outcome of a single arbitration attempt against the shared board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAttempt {
    /// The corridor cleared within the wait budget and the move was
    /// committed. Carries the system-wide running move total after the
    /// commit (used for progress logging).
    Committed {
        /// Total successful moves across all agents, this one included.
        total_moves: u64,
    },
    /// The wait budget expired with the corridor still blocked. The caller
    /// decides between resampling a fresh target and declaring a stall.
    Blocked,
}

/// Everything guarded by the board lock, mutated together or not at all.
#[derive(Debug)]
struct BoardState {
    board: Board,
    /// Instant of the last successful move by ANY agent. Stall detection
    /// is system-wide: an agent only gives up when nobody has moved for
    /// the whole stall window, not merely when it personally is stuck.
    last_progress: Instant,
    total_moves: u64,
}

/// The one shared state object of the simulation.
///
/// Agents hold an `Arc<SharedBoard>` and interact with the occupancy
/// matrix exclusively through the operations here; the internals are
/// private so a mutation can never skip the lock or forget the wakeup.
///
/// # Example
///
/// ```rust
/// use grid_arbiter::SharedBoard;
///
/// let board = SharedBoard::new(4);
/// let start = board.claim_start();
/// assert!(board.snapshot().is_occupied(start));
/// ```
#[derive(Debug)]
pub struct SharedBoard {
    state: Mutex<BoardState>,
    /// Broadcast wakeup: notified after every committed move.
    moved: Notify,
}

impl SharedBoard {
    /// Create an empty shared board with the progress clock set to now.
    pub fn new(size: usize) -> Self {
        Self {
            state: Mutex::new(BoardState {
                board: Board::new(size),
                last_progress: Instant::now(),
                total_moves: 0,
            }),
            moved: Notify::new(),
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.lock_state().board.size()
    }

    /// Reset the global progress clock. Called once when the run starts,
    /// so the stall window is measured from launch rather than from
    /// construction.
    pub fn mark_run_start(&self) {
        self.lock_state().last_progress = Instant::now();
    }

    /// Claim a uniformly random free cell as a starting position.
    ///
    /// Sampling and occupation happen under the lock, so two concurrent
    /// claims can never land on the same cell.
    ///
    /// # Panics
    ///
    /// Never returns on a fully occupied board; the coordinator's
    /// capacity validation (`agent_count <= size²`) rules that out.
    pub fn claim_start(&self) -> Position {
        let mut state = self.lock_state();
        let start = Position::random_start(&state.board);
        state.board.set_occupied(start, true);
        start
    }

    /// Wait for the corridor `from` → `to` to clear and commit the move,
    /// giving up after `budget`.
    ///
    /// This is the condition-variable loop of the protocol: register for
    /// the next broadcast wakeup *before* checking the predicate (so a
    /// commit between check and sleep cannot be missed), check and — if
    /// clear — commit under one lock acquisition, otherwise sleep until
    /// the next wakeup or the budget deadline.
    ///
    /// A commit atomically swaps occupancy from `from` to `to`, stamps
    /// the global progress clock and bumps the move total, then wakes
    /// every waiter.
    pub async fn await_clear_and_commit(
        &self,
        from: Position,
        to: Position,
        budget: Duration,
    ) -> MoveAttempt {
        let deadline = tokio::time::Instant::now() + budget;
        loop {
            let wakeup = self.moved.notified();
            tokio::pin!(wakeup);
            // Eligible for notify_waiters from this point on.
            wakeup.as_mut().enable();

            {
                let mut state = self.lock_state();
                if !state.board.corridor_blocked(from, to) {
                    state.board.set_occupied(from, false);
                    state.board.set_occupied(to, true);
                    state.last_progress = Instant::now();
                    state.total_moves += 1;
                    let total_moves = state.total_moves;
                    drop(state);
                    self.moved.notify_waiters();
                    return MoveAttempt::Committed { total_moves };
                }
            }

            if tokio::time::timeout_at(deadline, wakeup).await.is_err() {
                return MoveAttempt::Blocked;
            }
        }
    }

    /// Elapsed time since the last successful move by any agent.
    pub fn since_last_progress(&self) -> Duration {
        self.lock_state().last_progress.elapsed()
    }

    /// Total successful moves committed so far, across all agents.
    pub fn total_moves(&self) -> u64 {
        self.lock_state().total_moves
    }

    /// Clone of the occupancy matrix for rendering and assertions.
    ///
    /// Internally consistent (taken under the lock), but only guaranteed
    /// meaningful as a whole-run observation when no move is in flight.
    pub fn snapshot(&self) -> Board {
        self.lock_state().board.clone()
    }

    /// Lock the guarded state. A poisoned lock is recovered rather than
    /// propagated: the occupancy matrix stays structurally valid across
    /// any panic point, and the library itself never panics while
    /// holding the guard.
    fn lock_state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

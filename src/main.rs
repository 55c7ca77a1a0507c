//! Demo binary for grid-arbiter.
//!
//! Runs the default scenario (8×8 board, 6 agents, 50 moves each) or a
//! scenario loaded from a TOML file passed as the first argument.
//!
//! ## Environment Variables
//!
//! - `LOG_FORMAT=json` — structured JSON output (production)
//! - `RUST_LOG=info` — log level filter (default: info)

use grid_arbiter::{init_tracing, Coordinator, SimConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::from_toml_path(&path)?,
        None => SimConfig::default(),
    };

    info!(
        board_size = config.board_size,
        agent_count = config.agent_count,
        needed_moves = config.needed_moves,
        "starting grid-arbiter"
    );

    let coordinator = Coordinator::new(config)?;
    let board = Arc::clone(coordinator.board());

    println!("Starting board:\n{}", board.snapshot());

    let report = coordinator.run().await;

    println!("Final board:\n{}", board.snapshot());

    if report.completed {
        info!(total_moves = report.total_moves, "simulation completed successfully");
        Ok(())
    } else {
        info!(
            total_moves = report.total_moves,
            "simulation did not complete, move waiting timed out"
        );
        std::process::exit(1);
    }
}

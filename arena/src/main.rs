//! Arena - NoGo match runner
//!
//! Plays a configurable number of games between two agents:
//! 1. Builds a black and a white agent (random, greedy or MCTS)
//! 2. Plays each game until the side to move has no legal placement
//! 3. Logs every episode and a final win tally

use anyhow::Result;
use clap::Parser;
use engine_core::Player;
use games_nogo::Board;
use tracing::info;

mod arena;
mod config;
mod policy;

use crate::arena::Arena;
use crate::config::Config;
use crate::policy::build_agent;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let board = Board::new(config.board_size)?;
    let black = build_agent::<Board>(&config.agent_spec(Player::Black)?)?;
    let white = build_agent::<Board>(&config.agent_spec(Player::White)?)?;

    info!(
        board_size = config.board_size,
        games = config.games,
        black = black.name(),
        black_role = %black.role(),
        white = white.name(),
        white_role = %white.role(),
        iterations = config.iterations,
        time_budget_ms = config.time_budget_ms,
        threads = config.threads,
        "Starting match"
    );

    let mut arena = Arena::new(board, black, white);
    let stats = arena.run(config.games);

    info!(
        games = stats.games,
        black_wins = stats.black_wins,
        white_wins = stats.white_wins,
        forfeits = stats.forfeits,
        avg_moves = format!("{:.1}", stats.avg_moves()),
        avg_iterations = format!("{:.0}", stats.avg_iterations()),
        elapsed_s = format!("{:.2}", stats.elapsed.as_secs_f64()),
        "Match finished"
    );

    println!(
        "{} (black) {} - {} {} (white)",
        arena.black().name(),
        stats.wins(Player::Black),
        stats.wins(Player::White),
        arena.white().name()
    );

    Ok(())
}

//! Monte Carlo Tree Search with random rollouts and root parallelization.
//!
//! This crate provides a game-agnostic MCTS engine that works with any game
//! implementing the `engine-core` [`GameState`](engine_core::GameState) trait.
//!
//! # Overview
//!
//! Each iteration of a worker's loop consists of four phases:
//!
//! 1. **Selection**: Descend from the root by UCB1 while nodes are fully
//!    expanded
//! 2. **Expansion**: Materialise one new child from the node's shuffled move
//!    order
//! 3. **Simulation**: Play uniformly random legal moves until the side to
//!    move has none (that side loses)
//! 4. **Backpropagation**: Add a visit to every node on the path, and a win
//!    when the rollout winner is the searching player
//!
//! A [`Coordinator`] owns several [`Worker`]s, each with a private tree and
//! RNG stream. Per decision it runs them concurrently, sums root visits per
//! move, picks the most visited move and keeps the matching subtree in every
//! worker for the next turn.
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::Player;
//! use games_nogo::Board;
//! use mcts::{Coordinator, MctsConfig, SearchBudget};
//!
//! let config = MctsConfig::default().with_parallelism(4).with_seed(42);
//! let mut engine = Coordinator::new(config, Player::Black)?;
//!
//! let board = Board::standard();
//! let action = engine.decide(&board, SearchBudget::iterations(2000));
//! println!("Best action: {:?}", action);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `parallelism`: Number of independent workers (default: 1)
//! - `exploration_constant`: UCB1 constant c (default: sqrt(2))
//! - `seed`: Base seed; worker i uses `seed + i` (default: entropy)
//! - `budget`: Iteration cap and optional time limit per worker

pub mod config;
pub mod coordinator;
pub mod node;
pub mod rollout;
pub mod tree;
pub mod worker;

#[cfg(test)]
mod test_utils;

// Re-export main types
pub use config::{MctsConfig, SearchBudget, DEFAULT_EXPLORATION};
pub use coordinator::{
    pick_most_visited, seeded_rng, Coordinator, SearchError, SearchResult, SearchStats,
};
pub use node::{MctsNode, NodeId};
pub use rollout::{RandomRollout, RolloutOutcome};
pub use tree::{MctsTree, TreeStats};
pub use worker::{TreeReuse, Worker, WorkerStats};

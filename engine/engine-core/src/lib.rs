//! Core traits and types for the NoGo search engine
//!
//! This crate provides the abstractions every other crate is written against:
//! - `GameState`: the rules contract consumed by the search (legal moves,
//!   move application, whose turn it is, state equality)
//! - `Player`: the two sides of an alternating-move game
//! - `Placement`: the outcome of applying a move
//! - `game_utils`: helpers shared by rollouts and simple agents

pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use game_utils::{first_legal_move, mobility};
pub use typed::{GameState, Placement, Player, PlayerParseError};

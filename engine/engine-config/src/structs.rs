//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_board_size() -> usize {
    defaults::board_size()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_exploration() -> f64 {
    defaults::exploration_constant()
}
fn d_threads() -> usize {
    defaults::threads()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_black() -> String {
    defaults::black().into()
}
fn d_white() -> String {
    defaults::white().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Side length of the square board
    #[serde(default = "d_board_size")]
    pub board_size: usize,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            board_size: defaults::board_size(),
        }
    }
}

/// MCTS engine settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Iterations per worker per decision
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    /// Per-decision wall-clock budget; 0 disables the time limit
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    #[serde(default = "d_exploration")]
    pub exploration_constant: f64,
    /// Number of root-parallel workers
    #[serde(default = "d_threads")]
    pub threads: usize,
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            time_budget_ms: defaults::time_budget_ms(),
            exploration_constant: defaults::exploration_constant(),
            threads: defaults::threads(),
            seed: defaults::seed(),
        }
    }
}

/// Match runner settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    /// Agent kind playing black (random, greedy, mcts)
    #[serde(default = "d_black")]
    pub black: String,
    /// Agent kind playing white
    #[serde(default = "d_white")]
    pub white: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            black: defaults::black().into(),
            white: defaults::white().into(),
        }
    }
}

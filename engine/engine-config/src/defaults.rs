//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! checked-in sample config can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    board_size: usize,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    iterations: u32,
    time_budget_ms: u64,
    exploration_constant: f64,
    threads: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    games: u32,
    black: String,
    white: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn board_size() -> usize {
    DEFAULTS.common.board_size
}

// Search
pub fn iterations() -> u32 {
    DEFAULTS.search.iterations
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.search.time_budget_ms
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.search.exploration_constant
}
pub fn threads() -> usize {
    DEFAULTS.search.threads
}
pub fn seed() -> Option<u64> {
    DEFAULTS.search.seed
}

// Arena
pub fn games() -> u32 {
    DEFAULTS.arena.games
}
pub fn black() -> &'static str {
    &DEFAULTS.arena.black
}
pub fn white() -> &'static str {
    &DEFAULTS.arena.white
}

//! Configuration for the arena binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use engine_core::Player;
use mcts::{MctsConfig, SearchBudget};
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::policy::{AgentKind, AgentSpec};

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_board_size() -> usize {
    CENTRAL_CONFIG.common.board_size
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.arena.games
}

fn default_black() -> String {
    CENTRAL_CONFIG.arena.black.clone()
}

fn default_white() -> String {
    CENTRAL_CONFIG.arena.white.clone()
}

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.search.iterations
}

fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.search.time_budget_ms
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.search.exploration_constant
}

fn default_threads() -> usize {
    CENTRAL_CONFIG.search.threads
}

/// Seed offset for the white side so both agents draw different streams.
const WHITE_SEED_OFFSET: u64 = 0x1_0000;

#[derive(Parser, Debug, Clone)]
#[command(name = "arena")]
#[command(about = "NoGo arena - plays MCTS, greedy and random agents against each other")]
#[command(
    long_about = "Plays a number of NoGo games between a black and a white agent and
reports the win tally. The side to move with no legal placement loses.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Board side length
    #[arg(long, default_value_t = default_board_size())]
    pub board_size: usize,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Black agent kind (random, greedy, mcts)
    #[arg(long, default_value_t = default_black())]
    pub black: String,

    /// White agent kind (random, greedy, mcts)
    #[arg(long, default_value_t = default_white())]
    pub white: String,

    /// Display name for the black agent (defaults to its kind)
    #[arg(long)]
    pub black_name: Option<String>,

    /// Display name for the white agent (defaults to its kind)
    #[arg(long)]
    pub white_name: Option<String>,

    /// MCTS iterations per worker per move
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// MCTS wall-clock budget per move in milliseconds (0 = no limit)
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// UCB1 exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Root-parallel MCTS workers per agent
    #[arg(long, default_value_t = default_threads())]
    pub threads: usize,

    /// Base RNG seed (config.toml / NOGO_SEARCH_SEED when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 || self.board_size > games_nogo::MAX_SIZE {
            return Err(anyhow!(
                "board_size must be between 1 and {}, got {}",
                games_nogo::MAX_SIZE,
                self.board_size
            ));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.threads == 0 {
            return Err(anyhow!("threads must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be finite and non-negative, got {}",
                self.exploration
            ));
        }

        self.black.parse::<AgentKind>()?;
        self.white.parse::<AgentKind>()?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Seed from the CLI, falling back to the central config.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.search.seed)
    }

    pub fn budget(&self) -> SearchBudget {
        let budget = SearchBudget::iterations(self.iterations);
        if self.time_budget_ms > 0 {
            budget.with_duration(Duration::from_millis(self.time_budget_ms))
        } else {
            budget
        }
    }

    /// Search settings for one side.
    pub fn mcts_config(&self, seed: Option<u64>) -> MctsConfig {
        let mut config = MctsConfig::default()
            .with_parallelism(self.threads)
            .with_exploration(self.exploration);
        config.seed = seed;
        config.budget = self.budget();
        config
    }

    /// Agent description for `role`.
    pub fn agent_spec(&self, role: Player) -> Result<AgentSpec> {
        let (kind, name) = match role {
            Player::Black => (&self.black, &self.black_name),
            Player::White => (&self.white, &self.white_name),
        };
        let seed = match role {
            Player::Black => self.seed(),
            Player::White => self.seed().map(|s| s.wrapping_add(WHITE_SEED_OFFSET)),
        };

        let mut spec = AgentSpec::new(kind.parse()?, role);
        if let Some(name) = name {
            spec.name = name.clone();
        }
        spec.seed = seed;
        spec.search = self.mcts_config(seed);
        Ok(spec)
    }
}

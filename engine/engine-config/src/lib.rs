//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared by
//! the arena binary and anything else that needs search or board settings.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`NOGO_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! NOGO_<SECTION>_<KEY>=value
//!
//! Examples:
//!     NOGO_COMMON_BOARD_SIZE=7
//!     NOGO_SEARCH_THREADS=4
//!     NOGO_SEARCH_SEED=42
//!     NOGO_ARENA_WHITE=greedy
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

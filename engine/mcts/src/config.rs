//! MCTS configuration parameters.

use std::time::Duration;

use crate::coordinator::SearchError;

/// Default UCB1 exploration constant. `sqrt(2)` makes the exploration term
/// equal to the textbook `sqrt(2 ln N / n)`.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// How much search a single decision may spend.
///
/// Each worker stops at whichever limit it reaches first. The deadline is
/// measured from the start of that worker's loop and checked once per
/// iteration. A zero iteration cap or a zero duration means no search at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Iteration cap per worker.
    pub max_iterations: u32,

    /// Wall-clock limit per worker (None = iterations only).
    pub max_duration: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_duration: None,
        }
    }
}

impl SearchBudget {
    /// Iteration-only budget.
    pub fn iterations(n: u32) -> Self {
        Self {
            max_iterations: n,
            max_duration: None,
        }
    }

    /// Time-only budget.
    pub fn timed(limit: Duration) -> Self {
        Self {
            max_iterations: u32::MAX,
            max_duration: Some(limit),
        }
    }

    /// Builder pattern: add a wall-clock limit.
    pub fn with_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of independent workers (and pool threads) per decision.
    pub parallelism: usize,

    /// Exploration constant c in the UCB1 formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_constant: f64,

    /// Base seed. Worker i uses `seed + i`; None seeds every stream from entropy.
    pub seed: Option<u64>,

    /// Budget used by `Coordinator::decide_default`.
    pub budget: SearchBudget,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            exploration_constant: DEFAULT_EXPLORATION,
            seed: None,
            budget: SearchBudget::default(),
        }
    }
}

impl MctsConfig {
    /// Create a fast, reproducible config for testing.
    pub fn for_testing() -> Self {
        Self {
            parallelism: 1,
            exploration_constant: DEFAULT_EXPLORATION,
            seed: Some(42),
            budget: SearchBudget::iterations(50),
        }
    }

    /// Builder pattern: set number of workers.
    pub fn with_parallelism(mut self, n: usize) -> Self {
        self.parallelism = n;
        self
    }

    /// Builder pattern: set UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder pattern: set iteration cap of the default budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.budget.max_iterations = n;
        self
    }

    /// Builder pattern: set wall-clock limit of the default budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.budget.max_duration = Some(limit);
        self
    }

    /// Seed for worker `index`, if seeded.
    pub(crate) fn worker_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }

    /// Check the configuration once, before any worker is built.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.parallelism == 0 {
            return Err(SearchError::InvalidConfig(
                "parallelism must be at least 1".into(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.parallelism, 1);
        assert!((config.exploration_constant - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(config.budget.max_iterations, 1000);
        assert!(config.budget.max_duration.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_parallelism(4)
            .with_exploration(0.75)
            .with_seed(7)
            .with_iterations(200)
            .with_time_limit(Duration::from_millis(50));

        assert_eq!(config.parallelism, 4);
        assert!((config.exploration_constant - 0.75).abs() < 1e-12);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.budget.max_iterations, 200);
        assert_eq!(config.budget.max_duration, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_worker_seeds_are_distinct() {
        let config = MctsConfig::default().with_seed(100);
        assert_eq!(config.worker_seed(0), Some(100));
        assert_eq!(config.worker_seed(3), Some(103));
        assert_eq!(MctsConfig::default().worker_seed(0), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_workers = MctsConfig::default().with_parallelism(0);
        assert!(matches!(
            zero_workers.validate(),
            Err(SearchError::InvalidConfig(_))
        ));

        let negative = MctsConfig::default().with_exploration(-1.0);
        assert!(negative.validate().is_err());

        let nan = MctsConfig::default().with_exploration(f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_budget_constructors() {
        let timed = SearchBudget::timed(Duration::ZERO);
        assert_eq!(timed.max_iterations, u32::MAX);
        assert_eq!(timed.max_duration, Some(Duration::ZERO));

        let capped = SearchBudget::iterations(10).with_duration(Duration::from_millis(5));
        assert_eq!(capped.max_iterations, 10);
        assert_eq!(capped.max_duration, Some(Duration::from_millis(5)));
    }
}

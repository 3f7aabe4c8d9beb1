//! Root-parallel search coordinator.
//!
//! Each decision:
//! 1. Every worker re-roots its own tree at the current state (keep, promote
//!    a child, or rebuild)
//! 2. Workers search concurrently on a fixed rayon pool
//! 3. Root visit counts are summed per legal move across workers
//! 4. The most visited move wins, ties broken uniformly at random
//! 5. Every worker advances its root to the chosen move for the next turn

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use engine_core::{GameState, Player};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;
use tracing::debug;

use crate::config::{MctsConfig, SearchBudget};
use crate::worker::{TreeReuse, Worker, WorkerStats};

/// Errors raised while building a coordinator.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Statistics for one decision.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Iterations summed over workers.
    pub iterations: u64,
    pub elapsed: Duration,
    pub kept: usize,
    pub promoted: usize,
    pub rebuilt: usize,
    pub workers: Vec<WorkerStats>,
}

/// Result of a root-parallel search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Chosen move, or None when the side to move has no legal move.
    pub action: Option<M>,

    /// Aggregated root visits for every legal move (zero when no worker
    /// expanded it).
    pub visits: Vec<(M, u64)>,

    pub stats: SearchStats,
}

/// Root-parallel MCTS engine for one player.
pub struct Coordinator<G: GameState> {
    config: MctsConfig,
    perspective: Player,
    workers: Vec<Worker<G>>,
    pool: ThreadPool,
    /// Tie-break stream, independent of the worker streams.
    rng: ChaCha20Rng,
}

/// Seeded stream, or one drawn from OS entropy when no seed is set.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_entropy(),
    }
}

impl<G: GameState> Coordinator<G> {
    /// Build an engine that searches on behalf of `self_identity`.
    pub fn new(config: MctsConfig, self_identity: Player) -> Result<Self, SearchError> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .thread_name(|i| format!("mcts-worker-{i}"))
            .build()?;

        let workers = (0..config.parallelism)
            .map(|i| {
                Worker::new(
                    i,
                    seeded_rng(config.worker_seed(i)),
                    self_identity,
                    config.exploration_constant,
                )
            })
            .collect();

        let rng = seeded_rng(config.seed.map(|s| s ^ 0x9E37_79B9_7F4A_7C15));

        Ok(Self {
            config,
            perspective: self_identity,
            workers,
            pool,
            rng,
        })
    }

    /// Run one decision and return the aggregated statistics with the move.
    pub fn search(&mut self, state: &G, budget: SearchBudget) -> SearchResult<G::Move> {
        let legal = state.legal_moves();
        if legal.is_empty() {
            debug!(player = %self.perspective, "No legal move; no action");
            return SearchResult {
                action: None,
                visits: Vec::new(),
                stats: SearchStats::default(),
            };
        }

        let mut stats = SearchStats::default();
        for worker in &mut self.workers {
            match worker.prepare(state) {
                TreeReuse::Kept => stats.kept += 1,
                TreeReuse::Promoted => stats.promoted += 1,
                TreeReuse::Rebuilt => stats.rebuilt += 1,
            }
        }

        let start = Instant::now();
        let workers = &mut self.workers;
        stats.workers = self.pool.install(|| {
            workers
                .par_iter_mut()
                .map(|worker| worker.run(budget))
                .collect()
        });
        stats.elapsed = start.elapsed();
        stats.iterations = stats.workers.iter().map(|w| u64::from(w.iterations)).sum();

        let visits = self.aggregate(&legal);
        let action = pick_most_visited(&visits, &mut self.rng);

        if let Some(action) = action {
            for worker in &mut self.workers {
                worker.advance(action);
            }
        }

        debug!(
            player = %self.perspective,
            ?action,
            iterations = stats.iterations,
            kept = stats.kept,
            promoted = stats.promoted,
            rebuilt = stats.rebuilt,
            max_depth = stats.workers.iter().map(|w| w.tree.max_depth).max().unwrap_or(0),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Search complete"
        );

        SearchResult {
            action,
            visits,
            stats,
        }
    }

    /// Sum root visits per legal move over all workers.
    fn aggregate(&self, legal: &[G::Move]) -> Vec<(G::Move, u64)> {
        let mut totals: Vec<(G::Move, u64)> = legal.iter().map(|&mv| (mv, 0)).collect();
        let index: HashMap<G::Move, usize> =
            legal.iter().enumerate().map(|(i, &mv)| (mv, i)).collect();

        for worker in &self.workers {
            for (mv, visits) in worker.root_visits() {
                if let Some(&i) = index.get(&mv) {
                    totals[i].1 += visits;
                }
            }
        }
        totals
    }

    /// Choose a move for `state` within `budget`. None means no legal move.
    pub fn decide(&mut self, state: &G, budget: SearchBudget) -> Option<G::Move> {
        self.search(state, budget).action
    }

    /// `decide` with the configured budget.
    pub fn decide_default(&mut self, state: &G) -> Option<G::Move> {
        self.decide(state, self.config.budget)
    }

    /// Drop every worker's tree (new game).
    pub fn reset(&mut self) {
        for worker in &mut self.workers {
            worker.reset();
        }
    }

    pub fn workers(&self) -> &[Worker<G>] {
        &self.workers
    }

    pub fn perspective(&self) -> Player {
        self.perspective
    }

    pub fn parallelism(&self) -> usize {
        self.workers.len()
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<G: GameState> fmt::Debug for Coordinator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("perspective", &self.perspective)
            .field("config", &self.config)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

/// Move with the most visits. Candidates are scanned in a shuffled order and
/// only a strictly larger count replaces the current best, so ties resolve
/// uniformly.
pub fn pick_most_visited<M: Copy, R: Rng + ?Sized>(totals: &[(M, u64)], rng: &mut R) -> Option<M> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.shuffle(rng);

    let mut best: Option<(M, u64)> = None;
    for i in order {
        let (mv, visits) = totals[i];
        if best.map_or(true, |(_, b)| visits > b) {
            best = Some((mv, visits));
        }
    }
    best.map(|(mv, _)| mv)
}

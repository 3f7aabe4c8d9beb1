//! Single-tree search worker.
//!
//! A worker owns one tree, one RNG stream and one rollout scratch buffer.
//! It runs select -> expand -> simulate -> backpropagate until its budget
//! runs out. Nothing in the loop is shared with other workers.

use std::time::{Duration, Instant};

use engine_core::{GameState, Player};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::config::SearchBudget;
use crate::node::NodeId;
use crate::rollout::RandomRollout;
use crate::tree::{MctsTree, TreeStats};

/// What a worker did with its previous tree when handed a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeReuse {
    /// The root already held the state.
    Kept,
    /// A root child held the state and became the new root.
    Promoted,
    /// No match (or no tree yet); a fresh root was built.
    Rebuilt,
}

/// Per-decision statistics reported by one worker.
#[derive(Debug, Clone)]
pub struct WorkerStats {
    pub worker: usize,
    pub iterations: u32,
    pub rollout_plies: u64,
    /// Iterations whose leaf was already decided (no rollout needed).
    pub terminal_hits: u32,
    pub elapsed: Duration,
    pub reuse: TreeReuse,
    /// Shape of the tree once the run finished.
    pub tree: TreeStats,
}

/// Independent MCTS worker.
pub struct Worker<G: GameState> {
    id: usize,
    tree: Option<MctsTree<G>>,
    rng: ChaCha20Rng,
    /// Side whose wins are counted, fixed for the worker's lifetime.
    perspective: Player,
    exploration: f64,
    rollout: Option<RandomRollout<G::Move>>,
    reuse: TreeReuse,
}

impl<G: GameState> Worker<G> {
    pub fn new(id: usize, rng: ChaCha20Rng, perspective: Player, exploration: f64) -> Self {
        Self {
            id,
            tree: None,
            rng,
            perspective,
            exploration,
            rollout: None,
            reuse: TreeReuse::Rebuilt,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn tree(&self) -> Option<&MctsTree<G>> {
        self.tree.as_ref()
    }

    /// Root the worker's tree at `state`, reusing whatever matches.
    pub fn prepare(&mut self, state: &G) -> TreeReuse {
        let reuse = match self.tree.as_mut() {
            Some(tree) if tree.get(tree.root()).state == *state => TreeReuse::Kept,
            Some(tree) => match tree.find_root_child(state) {
                Some(child) => {
                    tree.promote(child);
                    TreeReuse::Promoted
                }
                None => TreeReuse::Rebuilt,
            },
            None => TreeReuse::Rebuilt,
        };

        // The rollout domain follows the rebuilt root's board
        if reuse == TreeReuse::Rebuilt {
            debug!(worker = self.id, "No reusable subtree; building fresh root");
            self.tree = Some(MctsTree::new(state.clone()));
            self.rollout = Some(RandomRollout::new(state.move_space()));
        }

        self.reuse = reuse;
        reuse
    }

    /// Search until the budget is spent. The deadline is measured from the
    /// start of this call and checked before every iteration.
    pub fn run(&mut self, budget: SearchBudget) -> WorkerStats {
        let start = Instant::now();
        let mut stats = WorkerStats {
            worker: self.id,
            iterations: 0,
            rollout_plies: 0,
            terminal_hits: 0,
            elapsed: Duration::ZERO,
            reuse: self.reuse,
            tree: TreeStats::default(),
        };

        let (Some(tree), Some(rollout)) = (self.tree.as_mut(), self.rollout.as_mut()) else {
            return stats;
        };

        while stats.iterations < budget.max_iterations {
            if budget.max_duration.is_some_and(|limit| start.elapsed() >= limit) {
                break;
            }

            let leaf = Self::select(tree, self.exploration);
            let leaf = tree.expand(leaf, &mut self.rng).unwrap_or(leaf);

            let node = tree.get(leaf);
            let winner = if node.is_terminal {
                stats.terminal_hits += 1;
                node.to_move.opponent()
            } else {
                let outcome = rollout.play(&node.state, &mut self.rng);
                stats.rollout_plies += u64::from(outcome.plies);
                outcome.winner
            };

            tree.backpropagate(leaf, winner, self.perspective);
            stats.iterations += 1;

            trace!(
                worker = self.id,
                iteration = stats.iterations,
                ?winner,
                "Iteration complete"
            );
        }

        stats.elapsed = start.elapsed();
        stats.tree = tree.stats();
        stats
    }

    /// Descend by UCB1 while the current node is fully expanded and not
    /// terminal. Returns the frontier node.
    fn select(tree: &MctsTree<G>, exploration: f64) -> NodeId {
        let mut current = tree.root();
        loop {
            let node = tree.get(current);
            if node.is_terminal || !node.is_fully_expanded() {
                return current;
            }
            match tree.select_child(current, exploration) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Visit count per expanded root move.
    pub fn root_visits(&self) -> Vec<(G::Move, u64)> {
        self.tree
            .as_ref()
            .map(MctsTree::root_visits)
            .unwrap_or_default()
    }

    /// Move the root to the child for `action`, expanding it if needed.
    /// The tree is dropped when `action` cannot be played from the root.
    pub fn advance(&mut self, action: G::Move) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        match tree.child_for_move(tree.root(), action, &mut self.rng) {
            Some(child) => tree.promote(child),
            None => {
                debug!(worker = self.id, ?action, "Chosen move not playable; dropping tree");
                self.tree = None;
            }
        }
    }

    /// Forget the tree (new game).
    pub fn reset(&mut self) {
        self.tree = None;
        self.rollout = None;
        self.reuse = TreeReuse::Rebuilt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FillGame;
    use rand::SeedableRng;

    fn worker(seed: u64) -> Worker<FillGame> {
        Worker::new(0, ChaCha20Rng::seed_from_u64(seed), Player::Black, 1.0)
    }

    /// Visits of every non-root, non-terminal node equal its children's
    /// visits plus the simulation that created it.
    fn assert_counters_consistent(tree: &MctsTree<FillGame>) {
        for (index, node) in tree.arena().iter().enumerate() {
            let child_sum: u64 = node
                .children
                .iter()
                .map(|(_, id)| tree.get(*id).visit_count)
                .sum();
            assert!(node.win_count <= node.visit_count);
            assert!(child_sum <= node.visit_count);
            let is_root = NodeId(index as u32) == tree.root();
            if !is_root && !node.is_terminal && node.visit_count > 0 {
                assert_eq!(node.visit_count, child_sum + 1, "node {index}");
            }
        }
    }

    #[test]
    fn test_run_respects_iteration_cap() {
        let mut w = worker(1);
        assert_eq!(w.prepare(&FillGame::empty(3)), TreeReuse::Rebuilt);

        let stats = w.run(SearchBudget::iterations(200));
        assert_eq!(stats.iterations, 200);
        assert_eq!(stats.reuse, TreeReuse::Rebuilt);

        let tree = w.tree().unwrap();
        assert_eq!(tree.get(tree.root()).visit_count, 200);
        assert_eq!(stats.tree.total_nodes, tree.len());
        assert_eq!(stats.tree.root_visits, 200);
        assert!(stats.tree.max_depth >= 1);
        assert_counters_consistent(tree);
    }

    #[test]
    fn test_every_root_child_visited_before_revisit() {
        let mut w = worker(2);
        w.prepare(&FillGame::empty(3));
        w.run(SearchBudget::iterations(9));

        let visits = w.root_visits();
        assert_eq!(visits.len(), 9);
        assert!(visits.iter().all(|&(_, v)| v == 1));
    }

    #[test]
    fn test_zero_budget_runs_nothing() {
        let mut w = worker(3);
        w.prepare(&FillGame::empty(2));

        assert_eq!(w.run(SearchBudget::iterations(0)).iterations, 0);
        assert_eq!(w.run(SearchBudget::timed(Duration::ZERO)).iterations, 0);
        assert!(w.root_visits().is_empty());
    }

    #[test]
    fn test_timed_budget_stops() {
        let mut w = worker(4);
        w.prepare(&FillGame::empty(4));

        let stats = w.run(SearchBudget::timed(Duration::from_millis(20)));
        assert!(stats.iterations > 0);
        assert!(stats.elapsed >= Duration::from_millis(20));
        assert_counters_consistent(w.tree().unwrap());
    }

    #[test]
    fn test_terminal_root_counts_losses() {
        let mut w = worker(5);
        w.prepare(&FillGame::with_free(2, &[]));

        let stats = w.run(SearchBudget::iterations(5));
        assert_eq!(stats.terminal_hits, 5);
        assert_eq!(stats.rollout_plies, 0);

        let tree = w.tree().unwrap();
        let root = tree.get(tree.root());
        assert!(root.is_terminal);
        assert!(root.children.is_empty());
        assert_eq!(root.visit_count, 5);
        // Black is to move with nothing to play: every sample is a loss
        assert_eq!(root.win_count, 0);
    }

    #[test]
    fn test_prepare_reuse_modes() {
        let mut w = worker(6);
        let start = FillGame::empty(2);
        w.prepare(&start);
        w.run(SearchBudget::iterations(30));

        assert_eq!(w.prepare(&start), TreeReuse::Kept);

        // Reply that the tree has explored
        let (mv, _) = w.root_visits()[0];
        let next = start.after_move(mv);
        let visits_before = w
            .tree()
            .and_then(|t| t.find_root_child(&next).map(|id| t.get(id).visit_count))
            .unwrap();
        assert_eq!(w.prepare(&next), TreeReuse::Promoted);
        let tree = w.tree().unwrap();
        assert_eq!(tree.get(tree.root()).visit_count, visits_before);
        assert_counters_consistent(tree);

        // Unrelated state
        assert_eq!(w.prepare(&FillGame::empty(3)), TreeReuse::Rebuilt);
        assert_eq!(w.tree().unwrap().len(), 1);
    }

    #[test]
    fn test_rollouts_follow_new_board_size() {
        let mut w = worker(9);
        w.prepare(&FillGame::empty(2));
        w.run(SearchBudget::iterations(5));

        // Each of the first nine iterations expands a fresh root child and
        // then fills the remaining eight cells.
        assert_eq!(w.prepare(&FillGame::empty(3)), TreeReuse::Rebuilt);
        assert_eq!(w.run(SearchBudget::iterations(9)).rollout_plies, 72);

        w.reset();
        w.prepare(&FillGame::empty(2));
        w.run(SearchBudget::iterations(5));
        w.reset();
        w.prepare(&FillGame::empty(3));
        assert_eq!(w.run(SearchBudget::iterations(9)).rollout_plies, 72);
    }

    #[test]
    fn test_advance_creates_missing_child() {
        let mut w = worker(7);
        let start = FillGame::empty(3);
        w.prepare(&start);
        // Only one child exists after a single iteration
        w.run(SearchBudget::iterations(1));
        let explored = w.root_visits()[0].0;
        let unexplored = (0..9u8).find(|&m| m != explored).unwrap();

        w.advance(unexplored);

        let tree = w.tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(tree.root()).state, start.after_move(unexplored));
    }

    #[test]
    fn test_advance_with_unplayable_move_drops_tree() {
        let mut w = worker(8);
        w.prepare(&FillGame::with_free(2, &[1]));
        w.advance(0);
        assert!(w.tree().is_none());
    }
}

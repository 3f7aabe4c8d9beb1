//! MCTS tree node representation.
//!
//! Each node represents a game state reached by taking an action from the parent.
//! Nodes store visit/win statistics used for UCB1 selection and the final
//! move choice, plus the cursor into their shuffled move order that drives
//! one-child-at-a-time expansion.

use engine_core::{GameState, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<G: GameState> {
    /// Parent node index (NONE for root). Never owns the parent.
    pub parent: NodeId,

    /// Action that led to this node from parent (None for a root)
    pub action: Option<G::Move>,

    /// Game state at this node
    pub state: G,

    /// Player to move from this state
    pub to_move: Player,

    /// Number of simulations that passed through this node
    pub visit_count: u64,

    /// Simulations through this node won by the searching player
    pub win_count: u64,

    /// Legal moves in the order they will be expanded.
    /// Generated and shuffled on the first expansion attempt.
    pub move_order: Option<Vec<G::Move>>,

    /// How many entries of `move_order` have been materialised
    pub expansion_cursor: usize,

    /// Whether the side to move has no legal move (and has therefore lost).
    /// Only known once `move_order` has been generated.
    pub is_terminal: bool,

    /// Children: Vec of (action, NodeId) pairs, in expansion order.
    pub children: Vec<(G::Move, NodeId)>,
}

impl<G: GameState> MctsNode<G> {
    /// Create a new root node.
    pub fn new_root(state: G) -> Self {
        Self::build(NodeId::NONE, None, state)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: G::Move, state: G) -> Self {
        Self::build(parent, Some(action), state)
    }

    fn build(parent: NodeId, action: Option<G::Move>, state: G) -> Self {
        let to_move = state.current_player();
        Self {
            parent,
            action,
            state,
            to_move,
            visit_count: 0,
            win_count: 0,
            move_order: None,
            expansion_cursor: 0,
            is_terminal: false,
            children: Vec::new(),
        }
    }

    /// Fraction of simulations through this node won by the searching player.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_count as f64 / self.visit_count as f64
        }
    }

    /// UCB1 score for child selection.
    /// UCB1 = w/n + c * sqrt(ln(N_parent) / n)
    ///
    /// Unvisited nodes score +infinity so every sibling is tried once before
    /// any is revisited. With `c = sqrt(2)` this is the classic
    /// `sqrt(2 ln N / n)` form.
    ///
    /// Takes pre-computed ln(parent_visits) to avoid redundant log calls
    /// when comparing multiple children.
    #[inline]
    pub fn ucb1_score(&self, ln_parent_visits: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = self.visit_count as f64;
        self.win_rate() + exploration * (ln_parent_visits / n).sqrt()
    }

    /// Number of legal moves from this state, once known.
    #[inline]
    pub fn legal_move_count(&self) -> Option<usize> {
        self.move_order.as_ref().map(Vec::len)
    }

    /// Every legal move has been materialised as a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        matches!(self.legal_move_count(), Some(n) if self.expansion_cursor >= n)
    }

    /// Child reached by `action`, if it has been expanded.
    pub fn child(&self, action: G::Move) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FillGame;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(FillGame::empty(3));

        assert!(node.parent.is_none());
        assert!(node.action.is_none());
        assert_eq!(node.to_move, Player::Black);
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.win_count, 0);
        assert!(node.move_order.is_none());
        assert!(!node.is_terminal);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_new_child_takes_mover_from_state() {
        let state = FillGame::empty(3).after_move(4);
        let node = MctsNode::new_child(NodeId(0), 4, state);

        assert_eq!(node.parent, NodeId(0));
        assert_eq!(node.action, Some(4));
        assert_eq!(node.to_move, Player::White);
    }

    #[test]
    fn test_win_rate() {
        let mut node = MctsNode::new_root(FillGame::empty(2));

        // Unvisited
        assert!(node.win_rate().abs() < 1e-9);

        node.visit_count = 4;
        node.win_count = 3;
        assert!((node.win_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_ucb1_score() {
        let mut node = MctsNode::new_root(FillGame::empty(2));
        assert_eq!(node.ucb1_score(1.0, 1.0), f64::INFINITY);

        node.visit_count = 10;
        node.win_count = 5;

        // UCB1 = 0.5 + sqrt(2) * sqrt(ln(100) / 10) = 0.5 + 0.9597 ≈ 1.4597
        let ln_parent = (100f64).ln();
        let score = node.ucb1_score(ln_parent, std::f64::consts::SQRT_2);
        assert!((score - 1.4597).abs() < 1e-3);

        // Same thing written as sqrt(2 ln N / n)
        let classic = 0.5 + (2.0 * ln_parent / 10.0).sqrt();
        assert!((score - classic).abs() < 1e-9);

        // No exploration: pure win rate
        assert!((node.ucb1_score(ln_parent, 0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fully_expanded() {
        let mut node = MctsNode::new_root(FillGame::empty(2));

        // Moves not generated yet
        assert!(!node.is_fully_expanded());

        node.move_order = Some(vec![0, 1, 2, 3]);
        assert!(!node.is_fully_expanded());

        node.expansion_cursor = 4;
        assert!(node.is_fully_expanded());

        // No legal moves: trivially fully expanded
        let mut stuck = MctsNode::new_root(FillGame::with_free(2, &[]));
        stuck.move_order = Some(Vec::new());
        assert!(stuck.is_fully_expanded());
    }

    #[test]
    fn test_child_lookup() {
        let mut node = MctsNode::new_root(FillGame::empty(2));
        node.children.push((3, NodeId(1)));
        node.children.push((0, NodeId(2)));

        assert_eq!(node.child(0), Some(NodeId(2)));
        assert_eq!(node.child(3), Some(NodeId(1)));
        assert_eq!(node.child(1), None);
    }
}

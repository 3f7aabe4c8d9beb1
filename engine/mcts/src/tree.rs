//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Parent links are plain indices,
//! so dropping a subtree never walks back through them.
//!
//! Promoting a child to root compacts the arena: the retained subtree is
//! moved into a fresh Vec (root at index 0) and every sibling subtree is
//! dropped with the old one.

use engine_core::{GameState, Player};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<G: GameState> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<G>>,

    /// Root node index (always 0 after initialization or promotion)
    root: NodeId,
}

impl<G: GameState> MctsTree<G> {
    /// Create a new single-node tree for the given state.
    pub fn new(root_state: G) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<G> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<G> {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<G>] {
        &self.nodes
    }

    /// Select the child of a node with the highest UCB1 score.
    /// Ties keep the earliest child, and children are stored in the node's
    /// shuffled move order.
    pub fn select_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let ln_parent_visits = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &(_, child_id) in &node.children {
            let score = self.get(child_id).ucb1_score(ln_parent_visits, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Generate and shuffle a node's legal moves if that has not happened yet.
    /// A node without legal moves becomes terminal.
    pub fn generate_moves<R: Rng + ?Sized>(&mut self, node_id: NodeId, rng: &mut R) {
        let node = self.get_mut(node_id);
        if node.move_order.is_some() {
            return;
        }
        let mut moves = node.state.legal_moves();
        moves.shuffle(rng);
        node.is_terminal = moves.is_empty();
        node.move_order = Some(moves);
    }

    /// Materialise the next unexpanded child of a node.
    ///
    /// Returns None when the node is terminal or already fully expanded; the
    /// caller then simulates from the node itself.
    pub fn expand<R: Rng + ?Sized>(&mut self, node_id: NodeId, rng: &mut R) -> Option<NodeId> {
        self.generate_moves(node_id, rng);

        let node = self.get_mut(node_id);
        if node.is_terminal || node.is_fully_expanded() {
            return None;
        }

        let cursor = node.expansion_cursor;
        let action = node.move_order.as_ref()?[cursor];
        node.expansion_cursor += 1;

        match node.state.after(action) {
            Some(child_state) => Some(self.add_child(node_id, action, child_state)),
            None => {
                warn!(?action, "Legal move failed to apply; skipping it");
                None
            }
        }
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, action: G::Move, state: G) -> NodeId {
        let child = MctsNode::new_child(parent_id, action, state);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push((action, child_id));

        child_id
    }

    /// Child of `node_id` reached by `action`, expanding it out of turn if
    /// this tree never got to it. Returns None if `action` is not legal there.
    pub fn child_for_move<R: Rng + ?Sized>(
        &mut self,
        node_id: NodeId,
        action: G::Move,
        rng: &mut R,
    ) -> Option<NodeId> {
        if let Some(child) = self.get(node_id).child(action) {
            return Some(child);
        }

        self.generate_moves(node_id, rng);
        let node = self.get_mut(node_id);
        let cursor = node.expansion_cursor;
        let order = node.move_order.as_mut()?;

        // Bring the move to the cursor so the cursor keeps counting
        // materialised moves.
        let pos = order.iter().skip(cursor).position(|&mv| mv == action)? + cursor;
        order.swap(cursor, pos);

        self.expand(node_id, rng)
    }

    /// Backpropagate a simulation result from a leaf to the root.
    /// Every node on the path gains a visit; it gains a win when the rollout
    /// winner is the searching player, whoever moves at that node.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Player, perspective: Player) {
        let won = u64::from(winner == perspective);
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.win_count += won;
            current_id = node.parent;
        }
    }

    /// Root child whose state equals `state`.
    pub fn find_root_child(&self, state: &G) -> Option<NodeId> {
        self.get(self.root)
            .children
            .iter()
            .map(|&(_, id)| id)
            .find(|&id| self.get(id).state == *state)
    }

    /// Make `new_root` the root, discarding everything outside its subtree.
    pub fn promote(&mut self, new_root: NodeId) {
        if new_root == self.root {
            return;
        }

        // Breadth-first order of the retained subtree; position = new index.
        let mut order = vec![new_root];
        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        remap[new_root.index()] = NodeId(0);
        let mut head = 0;
        while head < order.len() {
            let id = order[head];
            head += 1;
            for &(_, child) in &self.nodes[id.index()].children {
                remap[child.index()] = NodeId(order.len() as u32);
                order.push(child);
            }
        }

        let mut old: Vec<Option<MctsNode<G>>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();

        self.nodes = order
            .iter()
            .filter_map(|id| old[id.index()].take())
            .map(|mut node| {
                node.parent = if node.parent.is_some() {
                    remap[node.parent.index()]
                } else {
                    NodeId::NONE
                };
                for (_, child) in &mut node.children {
                    *child = remap[child.index()];
                }
                node
            })
            .collect();

        // The promoted node's old parent was outside the subtree.
        self.nodes[0].parent = NodeId::NONE;
        self.root = NodeId(0);
    }

    /// Visit count of every expanded root child.
    pub fn root_visits(&self) -> Vec<(G::Move, u64)> {
        self.get(self.root)
            .children
            .iter()
            .map(|&(action, id)| (action, self.get(id).visit_count))
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_win_rate: root.win_rate(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, Default)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u64,
    pub root_win_rate: f64,
    pub max_depth: u32,
}

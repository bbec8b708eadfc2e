//! Monte-Carlo tree search with UCT selection.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Rewards are
//! stored from one fixed perspective, the player to move at the search root,
//! and lie in `[0, 1]`; a node whose player is the opponent reads them as
//! `1 - q` when choosing among its children. Backpropagation never flips signs.

use rand::Rng;
use tracing::{debug, warn};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::constants::UCT_EXPLORATION;
use crate::disc::Disc;
use crate::oracle::Oracle;
use crate::rollout::random_playout;
use crate::rules::{RuleFlags, next_player};
use crate::search::time_control::Deadline;
use crate::square::Square;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A single node of the search tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    pub board: Board,
    /// Player to move on `board`.
    pub player: Disc,
    /// Move that produced this node from its parent.
    pub mv: Option<Square>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub visits: u32,
    /// Accumulated reward from the root player's point of view.
    pub reward: f64,
}

impl MctsNode {
    fn new(board: Board, player: Disc, mv: Option<Square>, parent: Option<NodeId>) -> Self {
        MctsNode {
            board,
            player,
            mv,
            parent,
            children: Vec::new(),
            visits: 0,
            reward: 0.0,
        }
    }

    /// A node is expanded once its legal children have been materialised.
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Mean reward from the root player's point of view.
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }

    /// UCT value of `child` as seen by this node's player.
    ///
    /// Unvisited children score `+inf` so each is tried once before any is
    /// revisited.
    pub fn uct_score(&self, child: &MctsNode, root_player: Disc) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let q = child.mean_reward();
        let exploit = if self.player == root_player { q } else { 1.0 - q };
        let explore = ((self.visits.max(1) as f64).ln() / child.visits as f64).sqrt();
        exploit + UCT_EXPLORATION * explore
    }
}

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    pub fn new(board: Board, player: Disc) -> Self {
        MctsTree {
            nodes: vec![MctsNode::new(board, player, None, None)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds `reward` and one visit to `id` and every ancestor.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.visits += 1;
            node.reward += reward;
            current = node.parent;
        }
    }

    /// Root child with the most visits; the first one wins ties.
    pub fn most_visited_root_move(&self) -> Option<Square> {
        let mut best: Option<&MctsNode> = None;
        for &child in &self.get(self.root()).children {
            let node = self.get(child);
            if best.is_none_or(|b| node.visits > b.visits) {
                best = Some(node);
            }
        }
        best.and_then(|n| n.mv)
    }

    /// `(move, visits)` of every root child.
    pub fn root_visits(&self) -> Vec<(Square, u32)> {
        self.get(self.root())
            .children
            .iter()
            .filter_map(|&c| {
                let node = self.get(c);
                node.mv.map(|mv| (mv, node.visits))
            })
            .collect()
    }
}

/// Tunable parameters of one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsParams {
    pub rollout_plies: usize,
    pub reward_scale: f64,
    pub max_iterations: Option<u32>,
}

impl From<&EngineConfig> for MctsParams {
    fn from(config: &EngineConfig) -> Self {
        MctsParams {
            rollout_plies: config.mcts_rollout_plies,
            reward_scale: config.mcts_reward_scale,
            max_iterations: config.mcts_max_iterations,
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsResult {
    pub best_move: Option<Square>,
    pub iterations: u32,
    pub n_nodes: usize,
    pub root_visits: Vec<(Square, u32)>,
}

/// Monte-Carlo tree search driven by an oracle.
pub struct Mcts<'a, O: Oracle + ?Sized, R: Rng + ?Sized> {
    oracle: &'a O,
    flags: RuleFlags,
    params: MctsParams,
    rng: &'a mut R,
}

impl<'a, O: Oracle + ?Sized, R: Rng + ?Sized> Mcts<'a, O, R> {
    pub fn new(oracle: &'a O, flags: RuleFlags, params: MctsParams, rng: &'a mut R) -> Self {
        Mcts {
            oracle,
            flags,
            params,
            rng,
        }
    }

    /// Runs selection, expansion, simulation and backpropagation until the
    /// deadline passes or the iteration cap is hit.
    ///
    /// # Arguments
    ///
    /// * `board` - Root position.
    /// * `player` - Player to move at the root; rewards are from their view.
    /// * `deadline` - Checked before every iteration and every rollout ply.
    ///
    /// # Returns
    ///
    /// The most visited root move, or the first legal move when no child was
    /// ever created. `None` only if the root has no legal move.
    pub fn search(&mut self, board: &Board, player: Disc, deadline: Deadline) -> MctsResult {
        let mut tree = MctsTree::new(board.clone(), player);
        let mut iterations = 0u32;

        while !deadline.is_reached()
            && self.params.max_iterations.is_none_or(|cap| iterations < cap)
        {
            let mut node = self.select(&tree, player);
            if !tree.get(node).is_expanded()
                && let Some(child) = self.expand(&mut tree, node)
            {
                node = child;
            }
            let reward = self.simulate(tree.get(node), player, deadline);
            tree.backpropagate(node, reward);
            iterations += 1;
        }

        let best_move = tree
            .most_visited_root_move()
            .or_else(|| self.oracle.valid_moves(board, player).first().copied());
        debug!(iterations, nodes = tree.len(), best = ?best_move, "mcts finished");

        MctsResult {
            best_move,
            iterations,
            n_nodes: tree.len(),
            root_visits: tree.root_visits(),
        }
    }

    /// Descends from the root by UCT until reaching a node without children.
    fn select(&self, tree: &MctsTree, root_player: Disc) -> NodeId {
        let mut id = tree.root();
        loop {
            let node = tree.get(id);
            if !node.is_expanded() {
                return id;
            }
            let mut best = node.children[0];
            let mut best_score = f64::NEG_INFINITY;
            for &child in &node.children {
                let score = node.uct_score(tree.get(child), root_player);
                if score > best_score {
                    best_score = score;
                    best = child;
                }
            }
            id = best;
        }
    }

    /// Materialises every legal child of `id`.
    ///
    /// # Returns
    ///
    /// The first new child, or `None` when the node has no legal move and
    /// stays a leaf.
    fn expand(&mut self, tree: &mut MctsTree, id: NodeId) -> Option<NodeId> {
        let (board, player) = {
            let node = tree.get(id);
            (node.board.clone(), node.player)
        };

        for mv in self.oracle.valid_moves(&board, player) {
            let Some(next) = self.oracle.simulate_move(&board, player, mv) else {
                warn!(%mv, %player, "oracle rejected a listed move during expansion");
                continue;
            };
            let next_side = next_player(&next, player, self.flags.fewer_pieces_continue);
            let child = tree.allocate(MctsNode::new(next, next_side, Some(mv), Some(id)));
            tree.get_mut(id).children.push(child);
        }

        tree.get(id).children.first().copied()
    }

    /// Random rollout from `node`, squashed into `[0, 1]` for `root_player`.
    fn simulate(&mut self, node: &MctsNode, root_player: Disc, deadline: Deadline) -> f64 {
        let end = random_playout(
            self.oracle,
            &node.board,
            node.player,
            self.flags,
            self.params.rollout_plies,
            deadline,
            &mut *self.rng,
        );
        let score = self.oracle.evaluate_board(&end, root_player).total;
        0.5 + 0.5 * (score / self.params.reward_scale).tanh()
    }
}

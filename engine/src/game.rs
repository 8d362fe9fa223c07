//! The validated game aggregate
//!
//! An `ExtensiveFormGame` is only ever produced from an arena that passed
//! tree validation and the completeness checks below. Its tree shape is
//! immutable from then on; only information-set membership can change.
//! Structural edits require building a new game.

use crate::arena::NodeArena;
use crate::error::{GameError, Result};
use crate::infoset::{InfosetId, InformationSetManager};
use crate::node::{Action, Attributes, GameNode, NodeId};
use crate::payoff::Payoffs;
use crate::player::{Player, PlayerRegistry};
use crate::validator::validate;
use log::debug;
use rayon::prelude::*;
use std::fmt;

/// Read access an external solver needs: a stable player ordering, a stable
/// leaf enumeration and payoffs by leaf and player.
pub trait PayoffLookup {
    fn players(&self) -> &[Player];
    fn leaves(&self) -> Vec<NodeId>;
    fn payoff(&self, leaf: NodeId, player: &Player) -> Option<f64>;
}

/// Dense leaf × player payoff table
///
/// `rows[i][j]` is the payoff of `players[j]` at `leaves[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffTable {
    pub players: Vec<Player>,
    pub leaves: Vec<NodeId>,
    pub rows: Vec<Vec<f64>>,
}

impl PayoffTable {
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Payoff vector of the leaf at position `index` in the enumeration
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

impl PayoffLookup for PayoffTable {
    fn players(&self) -> &[Player] {
        &self.players
    }

    fn leaves(&self) -> Vec<NodeId> {
        self.leaves.clone()
    }

    fn payoff(&self, leaf: NodeId, player: &Player) -> Option<f64> {
        let row = self.leaves.iter().position(|&l| l == leaf)?;
        let col = self.players.iter().position(|p| p == player)?;
        Some(self.rows[row][col])
    }
}

/// A validated extensive-form game
#[derive(Debug, Clone)]
pub struct ExtensiveFormGame {
    arena: NodeArena,
    root: NodeId,
    preorder: Vec<NodeId>,
    players: PlayerRegistry,
    infosets: InformationSetManager,
}

impl ExtensiveFormGame {
    /// Validate `arena` as a tree rooted at `root` and wrap it as a game.
    ///
    /// On top of the tree check this requires: `root` holds the root role
    /// and no other node does; no role-less node remains; every decision
    /// point has at least one action and a child under each; every leaf has
    /// a payoff for every player appearing anywhere in the tree.
    pub fn new(arena: NodeArena, root: NodeId) -> Result<Self> {
        let preorder = validate(&arena, root)?;
        check_roles(&arena, root, &preorder)?;
        let players = collect_players(&arena, &preorder);
        check_payoffs(&arena, &preorder, &players)?;

        let decision_points: Vec<NodeId> = preorder
            .iter()
            .copied()
            .filter(|&id| arena.nodes()[id as usize].is_decision_point())
            .collect();
        let infosets = InformationSetManager::singletons(&decision_points);

        debug!(
            "built game: {} nodes, {} decision points, {} players",
            preorder.len(),
            decision_points.len(),
            players.len()
        );
        Ok(ExtensiveFormGame {
            arena,
            root,
            preorder,
            players,
            infosets,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &GameNode {
        &self.arena.nodes()[self.root as usize]
    }

    pub fn node(&self, id: NodeId) -> Option<&GameNode> {
        self.arena.get(id)
    }

    /// All nodes, indexed by `NodeId`
    pub fn nodes(&self) -> &[GameNode] {
        self.arena.nodes()
    }

    /// Node ids in pre-order (root first, children in action order)
    pub fn preorder(&self) -> &[NodeId] {
        &self.preorder
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn attributes(&self, id: NodeId) -> Result<Attributes> {
        self.arena.attributes(id)
    }

    /// Players in the order fixed at construction
    pub fn players(&self) -> &[Player] {
        self.players.as_slice()
    }

    /// Leaves in pre-order; this enumeration is stable for the game's life
    pub fn leaves(&self) -> Vec<NodeId> {
        self.filter_preorder(GameNode::is_leaf)
    }

    /// Root and decision nodes in pre-order
    pub fn decision_nodes(&self) -> Vec<NodeId> {
        self.filter_preorder(GameNode::is_decision_point)
    }

    fn filter_preorder(&self, keep: fn(&GameNode) -> bool) -> Vec<NodeId> {
        self.preorder
            .iter()
            .copied()
            .filter(|&id| keep(&self.arena.nodes()[id as usize]))
            .collect()
    }

    pub fn leaf_payoffs(&self, leaf: NodeId) -> Option<&Payoffs> {
        self.arena.get(leaf).and_then(GameNode::payoffs)
    }

    pub fn payoff(&self, leaf: NodeId, player: &Player) -> Option<f64> {
        self.leaf_payoffs(leaf).and_then(|p| p.get(player))
    }

    /// Child reached from `node` by taking `action`
    pub fn child(&self, node: NodeId, action: &str) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.child(action))
    }

    /// Action labels leading from the root to `node`
    pub fn path_to(&self, node: NodeId) -> Option<Vec<Action>> {
        self.arena.get(node)?;
        let mut path = Vec::new();
        let mut current = node;
        for parent in self.arena.ancestors(node) {
            let branch = self.arena.nodes()[parent as usize]
                .branches()
                .iter()
                .find(|b| b.child == Some(current))?;
            path.push(branch.action.clone());
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Number of edges on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut depth = vec![0usize; self.arena.len()];
        let mut deepest = 0;
        for &id in &self.preorder {
            let d = depth[id as usize];
            deepest = deepest.max(d);
            for child in self.arena.nodes()[id as usize].children() {
                depth[child as usize] = d + 1;
            }
        }
        deepest
    }

    /// Dense payoff table over the stable leaf and player orderings
    pub fn payoff_table(&self) -> PayoffTable {
        let players = self.players.as_slice().to_vec();
        let leaves = self.leaves();
        let rows: Vec<Vec<f64>> = leaves
            .par_iter()
            .map(|&leaf| {
                let payoffs = self.leaf_payoffs(leaf);
                players
                    .iter()
                    .map(|p| payoffs.and_then(|pay| pay.get(p)).unwrap_or_default())
                    .collect::<Vec<f64>>()
            })
            .collect();
        PayoffTable {
            players,
            leaves,
            rows,
        }
    }

    pub fn information_sets(&self) -> &InformationSetManager {
        &self.infosets
    }

    /// Group decision nodes of this game into one information set
    pub fn assign_information_set(&self, nodes: &[NodeId]) -> Result<InfosetId> {
        self.infosets.assign(&self.arena, nodes)
    }

    /// Tree isomorphism under identical action labels, controlling players
    /// and leaf payoffs. Children are matched by action label; node ids,
    /// names and information sets do not take part.
    pub fn structurally_equal(&self, other: &ExtensiveFormGame) -> bool {
        let mut pending = vec![(self.root, other.root)];
        while let Some((a, b)) = pending.pop() {
            let (left, right) = match (self.arena.get(a), other.arena.get(b)) {
                (Some(left), Some(right)) => (left, right),
                _ => return false,
            };
            if left.role() != right.role()
                || left.player() != right.player()
                || left.payoffs() != right.payoffs()
                || left.branches().len() != right.branches().len()
            {
                return false;
            }
            for branch in left.branches() {
                match (branch.child, right.child(branch.action.as_str())) {
                    (Some(x), Some(y)) => pending.push((x, y)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl PartialEq for ExtensiveFormGame {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equal(other)
    }
}

impl PayoffLookup for ExtensiveFormGame {
    fn players(&self) -> &[Player] {
        ExtensiveFormGame::players(self)
    }

    fn leaves(&self) -> Vec<NodeId> {
        ExtensiveFormGame::leaves(self)
    }

    fn payoff(&self, leaf: NodeId, player: &Player) -> Option<f64> {
        ExtensiveFormGame::payoff(self, leaf, player)
    }
}

impl fmt::Display for ExtensiveFormGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.players.iter().map(Player::name).collect();
        write!(
            f,
            "Extensive form game: {} nodes, {} leaves, depth {}, players [{}]",
            self.len(),
            self.leaves().len(),
            self.depth(),
            names.join(", ")
        )
    }
}

fn check_roles(arena: &NodeArena, root: NodeId, preorder: &[NodeId]) -> Result<()> {
    if !arena.nodes()[root as usize].is_root() {
        return Err(GameError::incomplete(
            root,
            "designated root does not hold the root role",
        ));
    }
    for &id in preorder {
        match &arena.nodes()[id as usize] {
            GameNode::Root { .. } if id != root => {
                return Err(GameError::RootConflict { node: id, existing: root });
            }
            GameNode::Pending { .. } => {
                return Err(GameError::incomplete(id, "role-less node inside a game"));
            }
            GameNode::Root { branches, .. } | GameNode::Decision { branches, .. } => {
                if branches.is_empty() {
                    return Err(GameError::incomplete(id, "decision point has no actions"));
                }
                if let Some(open) = branches.iter().find(|b| b.child.is_none()) {
                    return Err(GameError::incomplete(
                        id,
                        format!("action '{}' has no child", open.action),
                    ));
                }
            }
            GameNode::Leaf { .. } => {}
        }
    }
    Ok(())
}

fn collect_players(arena: &NodeArena, preorder: &[NodeId]) -> PlayerRegistry {
    let mut registry = PlayerRegistry::new();
    for &id in preorder {
        let node = &arena.nodes()[id as usize];
        if let Some(player) = node.player() {
            registry.register(player);
        }
        if let Some(payoffs) = node.payoffs() {
            for player in payoffs.players() {
                registry.register(player);
            }
        }
    }
    registry
}

fn check_payoffs(arena: &NodeArena, preorder: &[NodeId], players: &PlayerRegistry) -> Result<()> {
    for &id in preorder {
        if let Some(payoffs) = arena.nodes()[id as usize].payoffs() {
            if let Some(missing) = players.iter().find(|p| payoffs.get(p).is_none()) {
                return Err(GameError::MissingPayoff {
                    leaf: id,
                    player: missing.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

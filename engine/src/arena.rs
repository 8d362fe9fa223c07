//! Flat node storage and the structural operations on it
//!
//! `NodeArena` is where nodes are created, wired together and converted
//! between roles. It enforces the local invariants eagerly (one parent per
//! node, distinct action labels, roots never get a parent). The global tree
//! property is left to `validator::validate`.

use crate::error::{GameError, NotATreeReason, Result};
use crate::node::{Action, Attributes, Branch, GameNode, NodeId};
use crate::payoff::Payoffs;
use crate::player::Player;
use log::{debug, trace};
use std::collections::VecDeque;

/// Flat array of nodes indexed by `NodeId`
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<GameNode>,
}

impl NodeArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&GameNode> {
        self.nodes.get(id as usize)
    }

    /// Like `get`, but reports a missing node as an error
    pub fn node(&self, id: NodeId) -> Result<&GameNode> {
        self.get(id).ok_or(GameError::UnknownNode { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut GameNode> {
        self.nodes
            .get_mut(id as usize)
            .ok_or(GameError::UnknownNode { node: id })
    }

    pub fn nodes(&self) -> &[GameNode] {
        &self.nodes
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn next_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    /// Add a role-less node carrying only action labels (possibly none)
    pub fn add_pending<I, A>(&mut self, actions: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        let id = self.next_id();
        let mut branches: Vec<Branch> = Vec::new();
        for action in actions {
            let action = action.into();
            if branches.iter().any(|b| b.action == action) {
                return Err(GameError::DuplicateAction {
                    node: id,
                    action: action.to_string(),
                });
            }
            branches.push(Branch::open(action));
        }
        self.nodes.push(GameNode::Pending {
            id,
            parent: None,
            name: None,
            player: None,
            branches,
        });
        Ok(id)
    }

    /// Add a blank node: no parent, no actions, no children
    pub fn add_blank(&mut self) -> NodeId {
        let id = self.next_id();
        self.nodes.push(GameNode::Pending {
            id,
            parent: None,
            name: None,
            player: None,
            branches: Vec::new(),
        });
        id
    }

    pub fn add_root(&mut self, name: Option<String>, player: Option<Player>) -> NodeId {
        let id = self.next_id();
        self.nodes.push(GameNode::Root {
            id,
            name,
            player,
            branches: Vec::new(),
        });
        id
    }

    pub fn add_decision(&mut self, name: Option<String>, player: Option<Player>) -> NodeId {
        let id = self.next_id();
        self.nodes.push(GameNode::Decision {
            id,
            parent: None,
            name,
            player,
            branches: Vec::new(),
        });
        id
    }

    pub fn add_leaf(&mut self, name: Option<String>, payoffs: Payoffs) -> NodeId {
        let id = self.next_id();
        self.nodes.push(GameNode::Leaf {
            id,
            parent: None,
            name,
            payoffs,
        });
        id
    }

    /// Assign (or clear) the controlling player of a decision point
    pub fn set_player(&mut self, id: NodeId, player: Option<Player>) -> Result<()> {
        if self.node_mut(id)?.set_player(player) {
            Ok(())
        } else {
            Err(GameError::incomplete(id, "a leaf has no controlling player"))
        }
    }

    pub fn set_name(&mut self, id: NodeId, name: Option<String>) -> Result<()> {
        self.node_mut(id)?.set_name(name);
        Ok(())
    }

    /// Install `child` under `parent` for `action`, setting the back-link in
    /// the same step.
    ///
    /// Rejects: leaf parents, root children, children that already have a
    /// parent, edges closing a cycle, and a label that already leads to a child.
    pub fn attach(&mut self, parent: NodeId, action: impl Into<Action>, child: NodeId) -> Result<()> {
        let action = action.into();
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if parent_node.is_leaf() {
            return Err(GameError::incomplete(parent, "a leaf cannot have children"));
        }
        if child_node.is_root() {
            return Err(match self.component_root(parent) {
                Some(existing) => GameError::RootConflict { node: child, existing },
                None => GameError::incomplete(child, "a root cannot have a parent"),
            });
        }
        if child_node.parent().is_some() || child == parent {
            return Err(GameError::not_a_tree(NotATreeReason::Revisited { node: child }));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(GameError::not_a_tree(NotATreeReason::Revisited { node: child }));
        }

        self.link(parent, action, child)
    }

    /// Record an edge without the structural checks `attach` performs.
    ///
    /// Used when wrapping arbitrary graphs: shared children and cycles are
    /// let through here and reported by the validator instead. Leaf parents
    /// and repeated labels are still rejected since they cannot be stored.
    pub fn link_unchecked(
        &mut self,
        parent: NodeId,
        action: impl Into<Action>,
        child: NodeId,
    ) -> Result<()> {
        self.node(child)?;
        if self.node(parent)?.is_leaf() {
            return Err(GameError::incomplete(parent, "a leaf cannot have children"));
        }
        self.link(parent, action.into(), child)
    }

    fn link(&mut self, parent: NodeId, action: Action, child: NodeId) -> Result<()> {
        let branches = self
            .node_mut(parent)?
            .branches_mut()
            .ok_or_else(|| GameError::incomplete(parent, "a leaf cannot have children"))?;

        match branches.iter_mut().find(|b| b.action == action) {
            Some(Branch { child: Some(_), .. }) => {
                return Err(GameError::DuplicateAction {
                    node: parent,
                    action: action.to_string(),
                });
            }
            Some(branch) => branch.child = Some(child),
            None => branches.push(Branch {
                action: action.clone(),
                child: Some(child),
            }),
        }

        self.node_mut(child)?.set_parent(parent);
        trace!("linked {} -[{}]-> {}", parent, action, child);
        Ok(())
    }

    /// Walk parent links upward from `id` (excluding `id` itself)
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let limit = self.nodes.len();
        std::iter::successors(self.get(id).and_then(GameNode::parent), move |&current| {
            self.get(current).and_then(GameNode::parent)
        })
        .take(limit)
    }

    /// The Root reached by following parent links from `id`, if any
    fn component_root(&self, id: NodeId) -> Option<NodeId> {
        let top = self.ancestors(id).last().unwrap_or(id);
        self.get(top).filter(|n| n.is_root()).map(GameNode::id)
    }

    /// Nodes connected to `id` through parent or child edges, `id` included
    pub fn component(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        if (id as usize) < self.nodes.len() {
            seen[id as usize] = true;
            queue.push_back(id);
        }
        while let Some(current) = queue.pop_front() {
            order.push(current);
            let node = &self.nodes[current as usize];
            let neighbours = node.children().into_iter().chain(node.parent());
            for next in neighbours {
                if let Some(flag) = seen.get_mut(next as usize) {
                    if !*flag {
                        *flag = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        order
    }

    /// Promote a parentless node to the root role.
    ///
    /// Fails if the node has a parent, is a leaf, or is connected to a
    /// component that already has a root. On failure the node is unchanged.
    pub fn to_root(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        match node {
            GameNode::Root { .. } => return Ok(()),
            GameNode::Leaf { .. } => {
                return Err(GameError::incomplete(id, "a leaf cannot become a root"));
            }
            _ => {}
        }
        if node.parent().is_some() {
            return Err(GameError::incomplete(id, "node with parents cannot be a root"));
        }
        if let Some(existing) = self
            .component(id)
            .into_iter()
            .find(|&other| other != id && self.nodes[other as usize].is_root())
        {
            return Err(GameError::RootConflict { node: id, existing });
        }

        let slot = self.node_mut(id)?;
        let promoted = match slot {
            GameNode::Pending { name, player, branches, .. }
            | GameNode::Decision { name, player, branches, .. } => GameNode::Root {
                id,
                name: name.take(),
                player: player.take(),
                branches: std::mem::take(branches),
            },
            GameNode::Root { .. } | GameNode::Leaf { .. } => return Ok(()),
        };
        *slot = promoted;
        debug!("node {} promoted to root", id);
        Ok(())
    }

    /// Convert a node with no actions and no children into a leaf.
    ///
    /// The parent link (if any) and name are kept. Roots and existing leaves
    /// cannot be converted. On failure the node is unchanged.
    pub fn to_leaf(&mut self, id: NodeId, payoffs: Payoffs) -> Result<()> {
        let slot = self.node_mut(id)?;
        let converted = match slot {
            GameNode::Root { .. } => {
                return Err(GameError::incomplete(id, "a root cannot become a leaf"));
            }
            GameNode::Leaf { .. } => {
                return Err(GameError::incomplete(id, "node is already a leaf"));
            }
            GameNode::Pending { branches, .. } | GameNode::Decision { branches, .. }
                if !branches.is_empty() =>
            {
                return Err(GameError::incomplete(
                    id,
                    "node has attributes other than parent, cannot be leaf",
                ));
            }
            GameNode::Pending { parent, name, .. } | GameNode::Decision { parent, name, .. } => {
                GameNode::Leaf {
                    id,
                    parent: *parent,
                    name: name.take(),
                    payoffs,
                }
            }
        };
        *slot = converted;
        debug!("node {} converted to leaf", id);
        Ok(())
    }

    pub fn attributes(&self, id: NodeId) -> Result<Attributes> {
        self.node(id).map(GameNode::attributes)
    }

    pub fn is_complete(&self, id: NodeId) -> Result<bool> {
        self.node(id).map(GameNode::is_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Role;

    fn two_players() -> (Player, Player) {
        (Player::new("Player 1"), Player::new("Player 2"))
    }

    #[test]
    fn test_attach_sets_parent_and_actions() {
        let (p1, p2) = two_players();
        let mut arena = NodeArena::new();
        let child_1 = arena.add_leaf(Some("Child 1".into()), Payoffs::new().with(&p1, 0.0).with(&p2, 1.0));
        let child_2 = arena.add_leaf(Some("Child 2".into()), Payoffs::new().with(&p1, 1.0).with(&p2, 0.0));
        let mother = arena.add_decision(Some("Mother".into()), None);
        arena.attach(mother, "Action1", child_1).unwrap();
        arena.attach(mother, "Action2", child_2).unwrap();

        let node = arena.get(mother).unwrap();
        assert_eq!(node.action_labels(), vec!["Action1", "Action2"]);
        assert_eq!(node.children(), vec![child_1, child_2]);
        assert_eq!(arena.get(child_1).unwrap().parent(), Some(mother));
        assert_eq!(node.parent(), None);
        assert!(!node.is_complete());

        let sister = arena.add_pending(["inputhere"]).unwrap();
        let grandmother = arena.add_decision(Some("Node A".into()), None);
        arena.attach(grandmother, "ActionA", mother).unwrap();
        arena.attach(grandmother, "ActionB", sister).unwrap();
        assert_eq!(arena.get(mother).unwrap().parent(), Some(grandmother));
        assert!(arena.is_complete(mother).unwrap());
        assert!(!arena.is_complete(sister).unwrap());
    }

    #[test]
    fn test_attach_fills_declared_branch() {
        let mut arena = NodeArena::new();
        let node = arena.add_pending(["A", "B"]).unwrap();
        let leaf = arena.add_blank();
        arena.attach(node, "B", leaf).unwrap();
        let n = arena.get(node).unwrap();
        assert_eq!(n.action_labels(), vec!["A", "B"]);
        assert_eq!(n.child("B"), Some(leaf));
        assert_eq!(n.child("A"), None);
    }

    #[test]
    fn test_attach_rejects_second_parent() {
        let mut arena = NodeArena::new();
        let a = arena.add_decision(None, None);
        let b = arena.add_decision(None, None);
        let shared = arena.add_blank();
        arena.attach(a, "x", shared).unwrap();
        let err = arena.attach(b, "y", shared).unwrap_err();
        assert!(matches!(err, GameError::NotATree { reason: NotATreeReason::Revisited { .. } }));
        assert!(arena.get(b).unwrap().branches().is_empty());
    }

    #[test]
    fn test_attach_rejects_cycle() {
        let mut arena = NodeArena::new();
        let a = arena.add_decision(None, None);
        let b = arena.add_decision(None, None);
        arena.attach(a, "down", b).unwrap();
        let err = arena.attach(b, "up", a).unwrap_err();
        assert!(matches!(err, GameError::NotATree { .. }));
    }

    #[test]
    fn test_attach_rejects_duplicate_label() {
        let mut arena = NodeArena::new();
        let a = arena.add_decision(None, None);
        let x = arena.add_blank();
        let y = arena.add_blank();
        arena.attach(a, "same", x).unwrap();
        let err = arena.attach(a, "same", y).unwrap_err();
        assert_eq!(err, GameError::DuplicateAction { node: a, action: "same".into() });
        assert_eq!(arena.get(y).unwrap().parent(), None);
    }

    #[test]
    fn test_add_pending_rejects_duplicate_labels() {
        let mut arena = NodeArena::new();
        assert!(matches!(
            arena.add_pending(["A", "A"]),
            Err(GameError::DuplicateAction { .. })
        ));
    }

    #[test]
    fn test_root_cannot_be_attached_under_rooted_tree() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        let node = arena.add_decision(None, None);
        arena.attach(root, "C", node).unwrap();
        let second = arena.add_root(None, None);
        let err = arena.attach(node, "A", second).unwrap_err();
        assert_eq!(err, GameError::RootConflict { node: second, existing: root });
    }

    #[test]
    fn test_to_root_on_blank_node() {
        let mut arena = NodeArena::new();
        let andy = arena.add_blank();
        assert_eq!(arena.get(andy).unwrap().role(), Role::Pending);
        arena.to_root(andy).unwrap();
        assert_eq!(arena.get(andy).unwrap().role(), Role::Root);
    }

    #[test]
    fn test_to_root_with_parent_fails_unchanged() {
        let mut arena = NodeArena::new();
        let andy_1 = arena.add_pending(["inputhere"]).unwrap();
        let andy_2 = arena.add_pending(["inputhere"]).unwrap();
        let dave = arena.add_decision(None, None);
        arena.attach(dave, "A", andy_1).unwrap();
        arena.attach(dave, "B", andy_2).unwrap();

        let before = arena.attributes(andy_1).unwrap();
        let err = arena.to_root(andy_1).unwrap_err();
        assert!(matches!(err, GameError::IncompleteNode { node, .. } if node == andy_1));
        assert_eq!(arena.attributes(andy_1).unwrap(), before);
    }

    #[test]
    fn test_to_root_conflicts_with_connected_root() {
        let mut arena = NodeArena::new();
        let helen_1 = arena.add_root(None, None);
        let helen_2 = arena.add_root(None, None);
        let jill = arena.add_decision(None, None);
        arena.link_unchecked(jill, "A", helen_1).unwrap();
        arena.link_unchecked(jill, "B", helen_2).unwrap();

        let err = arena.to_root(jill).unwrap_err();
        assert_eq!(err, GameError::RootConflict { node: jill, existing: helen_1 });
        assert_eq!(arena.get(jill).unwrap().role(), Role::Decision);
    }

    #[test]
    fn test_to_root_keeps_branches() {
        let mut arena = NodeArena::new();
        let top = arena.add_decision(Some("top".into()), None);
        let leaf = arena.add_blank();
        arena.attach(top, "go", leaf).unwrap();
        arena.to_root(top).unwrap();
        let node = arena.get(top).unwrap();
        assert!(node.is_root());
        assert_eq!(node.child("go"), Some(leaf));
        assert_eq!(node.name(), Some("top"));
    }

    #[test]
    fn test_to_leaf_on_blank_node() {
        let (p1, p2) = two_players();
        let mut arena = NodeArena::new();
        let jones = arena.add_blank();
        arena.to_leaf(jones, Payoffs::new().with(&p1, 0.0).with(&p2, 1.0)).unwrap();
        let node = arena.get(jones).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.payoffs().unwrap()[&p2], 1.0);
    }

    #[test]
    fn test_to_leaf_keeps_parent() {
        let (p1, _) = two_players();
        let mut arena = NodeArena::new();
        let parent = arena.add_decision(None, None);
        let node = arena.add_blank();
        arena.attach(parent, "A", node).unwrap();
        arena.to_leaf(node, Payoffs::new().with(&p1, 3.5)).unwrap();
        assert_eq!(arena.get(node).unwrap().parent(), Some(parent));
        assert!(arena.is_complete(node).unwrap());
    }

    #[test]
    fn test_to_leaf_with_actions_fails_unchanged() {
        let (p1, p2) = two_players();
        let mut arena = NodeArena::new();
        let williams = arena.add_pending(["A", "B"]).unwrap();
        let before = arena.attributes(williams).unwrap();
        let err = arena
            .to_leaf(williams, Payoffs::new().with(&p1, 0.0).with(&p2, 1.0))
            .unwrap_err();
        assert!(matches!(err, GameError::IncompleteNode { .. }));
        assert_eq!(arena.attributes(williams).unwrap(), before);
    }

    #[test]
    fn test_to_leaf_rejects_root() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        assert!(arena.to_leaf(root, Payoffs::new()).is_err());
        assert!(arena.get(root).unwrap().is_root());
    }

    #[test]
    fn test_set_player_on_leaf_fails() {
        let mut arena = NodeArena::new();
        let leaf = arena.add_leaf(None, Payoffs::new());
        assert!(arena.set_player(leaf, Some(Player::new("Jack"))).is_err());
        let node = arena.add_pending([0.to_string(), 1.to_string()]).unwrap();
        let jack = Player::new("Jack");
        arena.set_player(node, Some(jack.clone())).unwrap();
        assert_eq!(arena.get(node).unwrap().player(), Some(&jack));
    }

    #[test]
    fn test_set_name() {
        let mut arena = NodeArena::new();
        let node = arena.add_blank();
        arena.set_name(node, Some("Tom".into())).unwrap();
        assert_eq!(arena.get(node).unwrap().to_string(), "An extensive form game node - Tom");
        assert!(arena.set_name(9, None).is_err());
    }

    #[test]
    fn test_unknown_node() {
        let mut arena = NodeArena::new();
        assert_eq!(arena.to_root(7), Err(GameError::UnknownNode { node: 7 }));
    }
}

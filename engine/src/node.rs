//! Node definitions for the game tree
//!
//! Nodes live in a flat arena (`NodeArena`) and refer to each other by
//! `NodeId`. Parent links are back-references used for traversal only; the
//! arena owns every node, so the logical graph has no ownership cycles.

use crate::payoff::Payoffs;
use crate::player::Player;
use std::fmt;

/// Node ID type (index into flat array storage)
pub type NodeId = u32;

/// Label of an edge from a decision point to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action(String);

impl Action {
    pub fn new(label: impl Into<String>) -> Self {
        Action(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Action {
    fn from(label: &str) -> Self {
        Action(label.to_string())
    }
}

impl From<String> for Action {
    fn from(label: String) -> Self {
        Action(label)
    }
}

impl PartialEq<str> for Action {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Action {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An action label and the child it leads to, once one is installed
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub action: Action,
    pub child: Option<NodeId>,
}

impl Branch {
    pub fn open(action: Action) -> Self {
        Branch { action, child: None }
    }
}

/// Role discriminator, for diagnostics and matching without fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Role-less building block, not yet a structural member of a game
    Pending,
    /// The unique entry point
    Root,
    /// Internal decision point
    Decision,
    /// Terminal outcome
    Leaf,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Pending => "pending",
            Role::Root => "root",
            Role::Decision => "decision",
            Role::Leaf => "leaf",
        };
        f.write_str(s)
    }
}

/// Represents a node in the game tree
///
/// Each variant carries the fields meaningful for its role. Role changes
/// (`NodeArena::to_root`, `NodeArena::to_leaf`) replace the whole variant in
/// one assignment, so no half-converted node is ever observable.
#[derive(Debug, Clone)]
pub enum GameNode {
    /// Node under construction, e.g. built from a bare list of action labels
    Pending {
        id: NodeId,
        parent: Option<NodeId>,
        name: Option<String>,
        player: Option<Player>,
        branches: Vec<Branch>,
    },
    /// Entry point of the game; never has a parent
    Root {
        id: NodeId,
        name: Option<String>,
        player: Option<Player>,
        branches: Vec<Branch>,
    },
    /// Decision point below the root (parent is `None` until installed)
    Decision {
        id: NodeId,
        parent: Option<NodeId>,
        name: Option<String>,
        player: Option<Player>,
        branches: Vec<Branch>,
    },
    /// Terminal outcome carrying one payoff per player
    Leaf {
        id: NodeId,
        parent: Option<NodeId>,
        name: Option<String>,
        payoffs: Payoffs,
    },
}

impl GameNode {
    /// Get the node ID
    pub fn id(&self) -> NodeId {
        match self {
            GameNode::Pending { id, .. } => *id,
            GameNode::Root { id, .. } => *id,
            GameNode::Decision { id, .. } => *id,
            GameNode::Leaf { id, .. } => *id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            GameNode::Pending { .. } => Role::Pending,
            GameNode::Root { .. } => Role::Root,
            GameNode::Decision { .. } => Role::Decision,
            GameNode::Leaf { .. } => Role::Leaf,
        }
    }

    /// Get the parent node ID (always `None` for the root)
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            GameNode::Pending { parent, .. } => *parent,
            GameNode::Root { .. } => None,
            GameNode::Decision { parent, .. } => *parent,
            GameNode::Leaf { parent, .. } => *parent,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            GameNode::Pending { name, .. }
            | GameNode::Root { name, .. }
            | GameNode::Decision { name, .. }
            | GameNode::Leaf { name, .. } => name.as_deref(),
        }
    }

    /// Controlling player (leaves have none)
    pub fn player(&self) -> Option<&Player> {
        match self {
            GameNode::Pending { player, .. }
            | GameNode::Root { player, .. }
            | GameNode::Decision { player, .. } => player.as_ref(),
            GameNode::Leaf { .. } => None,
        }
    }

    pub fn branches(&self) -> &[Branch] {
        match self {
            GameNode::Pending { branches, .. }
            | GameNode::Root { branches, .. }
            | GameNode::Decision { branches, .. } => branches,
            GameNode::Leaf { .. } => &[],
        }
    }

    /// Action labels in declaration order
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.branches().iter().map(|b| &b.action)
    }

    /// Action labels as plain strings, handy for comparisons
    pub fn action_labels(&self) -> Vec<&str> {
        self.actions().map(Action::as_str).collect()
    }

    /// Installed child ids, in action order
    pub fn children(&self) -> Vec<NodeId> {
        self.branches().iter().filter_map(|b| b.child).collect()
    }

    /// Child reached by taking `action`, if installed
    pub fn child(&self, action: &str) -> Option<NodeId> {
        self.branches()
            .iter()
            .find(|b| b.action == action)
            .and_then(|b| b.child)
    }

    pub fn payoffs(&self) -> Option<&Payoffs> {
        match self {
            GameNode::Leaf { payoffs, .. } => Some(payoffs),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, GameNode::Root { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, GameNode::Leaf { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GameNode::Pending { .. })
    }

    /// Root or Decision: a node where a player chooses an action
    pub fn is_decision_point(&self) -> bool {
        matches!(self, GameNode::Root { .. } | GameNode::Decision { .. })
    }

    /// No parent, no actions and no children
    pub fn is_blank(&self) -> bool {
        match self {
            GameNode::Pending { parent, branches, .. }
            | GameNode::Decision { parent, branches, .. } => {
                parent.is_none() && branches.is_empty()
            }
            GameNode::Root { .. } | GameNode::Leaf { .. } => false,
        }
    }

    /// True once the node is fully wired: parent, actions and a child per
    /// action. The root is exempt from the parent requirement and a leaf from
    /// the actions/children requirement.
    pub fn is_complete(&self) -> bool {
        let wired = |branches: &[Branch]| {
            !branches.is_empty() && branches.iter().all(|b| b.child.is_some())
        };
        match self {
            GameNode::Root { branches, .. } => wired(branches),
            GameNode::Pending { parent, branches, .. }
            | GameNode::Decision { parent, branches, .. } => {
                parent.is_some() && wired(branches)
            }
            GameNode::Leaf { parent, .. } => parent.is_some(),
        }
    }

    /// Descriptive snapshot for diagnostics
    pub fn attributes(&self) -> Attributes {
        Attributes {
            id: self.id(),
            role: self.role(),
            name: self.name().map(str::to_string),
            actions: self.actions().cloned().collect(),
            children: self.children(),
            parent: self.parent(),
            player: self.player().cloned(),
            payoffs: self.payoffs().cloned(),
        }
    }

    pub(crate) fn set_parent(&mut self, new_parent: NodeId) {
        match self {
            GameNode::Pending { parent, .. }
            | GameNode::Decision { parent, .. }
            | GameNode::Leaf { parent, .. } => *parent = Some(new_parent),
            GameNode::Root { .. } => {}
        }
    }

    pub(crate) fn set_player(&mut self, new_player: Option<Player>) -> bool {
        match self {
            GameNode::Pending { player, .. }
            | GameNode::Root { player, .. }
            | GameNode::Decision { player, .. } => {
                *player = new_player;
                true
            }
            GameNode::Leaf { .. } => false,
        }
    }

    pub(crate) fn set_name(&mut self, new_name: Option<String>) {
        match self {
            GameNode::Pending { name, .. }
            | GameNode::Root { name, .. }
            | GameNode::Decision { name, .. }
            | GameNode::Leaf { name, .. } => *name = new_name,
        }
    }

    pub(crate) fn branches_mut(&mut self) -> Option<&mut Vec<Branch>> {
        match self {
            GameNode::Pending { branches, .. }
            | GameNode::Root { branches, .. }
            | GameNode::Decision { branches, .. } => Some(branches),
            GameNode::Leaf { .. } => None,
        }
    }
}

/// Snapshot of a node's attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    pub id: NodeId,
    pub role: Role,
    pub name: Option<String>,
    pub actions: Vec<Action>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub player: Option<Player>,
    pub payoffs: Option<Payoffs>,
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(items: &[T]) -> String {
            if items.is_empty() {
                return "False".to_string();
            }
            let inner: Vec<String> = items.iter().map(|i| i.to_string()).collect();
            format!("[{}]", inner.join(", "))
        }
        fn opt<T: fmt::Display>(item: &Option<T>) -> String {
            match item {
                Some(value) => value.to_string(),
                None => "False".to_string(),
            }
        }

        write!(
            f,
            "The node has the following attributes. Actions: {}. Children: {}. Parent: {}. Player: {}.",
            list(&self.actions),
            list(&self.children),
            opt(&self.parent),
            opt(&self.player),
        )?;
        if let Some(payoffs) = &self.payoffs {
            write!(f, " Payoffs: {}.", payoffs)?;
        }
        Ok(())
    }
}

impl fmt::Display for GameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_leaf() { "leaf" } else { "node" };
        write!(f, "An extensive form game {}", kind)?;
        if let Some(name) = self.name() {
            write!(f, " - {}", name)?;
        }
        Ok(())
    }
}

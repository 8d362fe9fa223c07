//! Error types for the game tree model
//!
//! Every failure is reported at construction or mutation time. Nothing here
//! is transient: retrying with the same input reproduces the same error.

use crate::node::NodeId;
use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the engine and tree crates
pub type Result<T> = std::result::Result<T, GameError>;

/// Main error type for building, validating and mutating games
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameError {
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    #[error("cannot build a game from an empty node set")]
    EmptyGame,

    #[error("graph is not a tree: {reason}")]
    NotATree { reason: NotATreeReason },

    #[error("extensive form game cannot have two roots (node {node} conflicts with root {existing})")]
    RootConflict { node: NodeId, existing: NodeId },

    #[error("node {node} is incomplete or cannot change role: {reason}")]
    IncompleteNode { node: NodeId, reason: String },

    #[error("all nodes in the same information set must have the same actions (node {first} has [{expected}], node {node} has [{found}])")]
    InfoSetMismatch {
        first: NodeId,
        node: NodeId,
        expected: String,
        found: String,
    },

    #[error("all nodes in the same information set must have the same player (node {first} and node {node} differ)")]
    InfoSetPlayerMismatch { first: NodeId, node: NodeId },

    #[error("information set needs at least two distinct nodes, got {count}")]
    InfoSetTooSmall { count: usize },

    #[error("node {node} is not a decision node")]
    NotADecisionNode { node: NodeId },

    #[error("node {node} already has a child under action '{action}'")]
    DuplicateAction { node: NodeId, action: String },

    #[error("leaf {leaf} has no payoff for player '{player}'")]
    MissingPayoff { leaf: NodeId, player: String },

    #[error("node {node} does not exist")]
    UnknownNode { node: NodeId },

    #[error("unknown player '{name}'")]
    UnknownPlayer { name: String },
}

/// Why a node graph failed the tree check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotATreeReason {
    /// Traversal reached the same node twice (a cycle or a shared child)
    Revisited { node: NodeId },
    /// Some nodes cannot be reached from the root
    Unreachable { count: usize },
    /// More than one node has no parent
    MultipleRoots { count: usize },
    /// The designated root has a parent
    RootHasParent { root: NodeId },
    /// A child's back-link points somewhere other than the node listing it
    ParentMismatch { node: NodeId, parent: NodeId },
}

impl fmt::Display for NotATreeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotATreeReason::Revisited { node } => {
                write!(f, "node {} is reachable along more than one path", node)
            }
            NotATreeReason::Unreachable { count } => {
                write!(f, "{} node(s) are not connected to the root", count)
            }
            NotATreeReason::MultipleRoots { count } => {
                write!(f, "{} nodes have no parent", count)
            }
            NotATreeReason::RootHasParent { root } => {
                write!(f, "root {} has a parent", root)
            }
            NotATreeReason::ParentMismatch { node, parent } => {
                write!(f, "node {} is listed as a child of {} but links elsewhere", node, parent)
            }
        }
    }
}

impl GameError {
    pub(crate) fn not_a_tree(reason: NotATreeReason) -> Self {
        GameError::NotATree { reason }
    }

    pub(crate) fn incomplete(node: NodeId, reason: impl Into<String>) -> Self {
        GameError::IncompleteNode {
            node,
            reason: reason.into(),
        }
    }

    /// Build a `MalformedInput` error from any message
    pub fn malformed(message: impl Into<String>) -> Self {
        GameError::MalformedInput {
            message: message.into(),
        }
    }
}

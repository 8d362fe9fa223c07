use crate::description::{Description, Roster};
use crate::graph::{wrap, GameGraph};
use extform_engine::error::{GameError, Result};
use extform_engine::{Action, ExtensiveFormGame, NodeArena, NodeId};
use log::debug;
use petgraph::graph::NodeIndex;
use serde_json::Value;

/// Builds games from nested descriptions, JSON values and graphs.
///
/// Every `ExtensiveFormGame` returned has passed validation; the arena level
/// helpers (`actions`, `build_into`) return unvalidated fragments.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Build a game from a nested description; its top node becomes the root.
    pub fn nested(description: &Description) -> Result<ExtensiveFormGame> {
        let mut arena = NodeArena::new();
        let root = Self::build_into(&mut arena, description)?;
        arena.to_root(root)?;
        debug!("built nested description into {} nodes", arena.len());
        ExtensiveFormGame::new(arena, root)
    }

    /// Build a game from a directed graph with a designated root candidate.
    pub fn graph(graph: &GameGraph, root: NodeIndex) -> Result<ExtensiveFormGame> {
        let (arena, root) = wrap(graph, root)?;
        ExtensiveFormGame::new(arena, root)
    }

    /// Classify a JSON value and build it as a nested description.
    ///
    /// An empty mapping or list at the top level describes no nodes at all
    /// and is reported as `EmptyGame`.
    pub fn value(value: &Value, roster: &Roster) -> Result<ExtensiveFormGame> {
        let empty = match value {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            return Err(GameError::EmptyGame);
        }
        Self::nested(&Description::classify(value, roster)?)
    }

    /// A fresh arena holding one role-less node with the given open actions
    pub fn actions<I, A>(labels: I) -> Result<(NodeArena, NodeId)>
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        let mut arena = NodeArena::new();
        let id = arena.add_pending(labels)?;
        Ok((arena, id))
    }

    /// Add the nodes of `description` to `arena` without validating and
    /// return the id of its top node, which is left parentless.
    ///
    /// Children are created before their parent. Internal nodes become
    /// decision nodes, leaves become leaves and bare action lists become
    /// role-less nodes with open branches.
    pub fn build_into(arena: &mut NodeArena, description: &Description) -> Result<NodeId> {
        match description {
            Description::Leaf { name, payoffs } => Ok(arena.add_leaf(name.clone(), payoffs.clone())),
            Description::Actions(labels) => arena.add_pending(labels.iter().cloned()),
            Description::Node {
                name,
                player,
                branches,
            } => {
                let children = branches
                    .iter()
                    .map(|(action, child)| Ok((action.clone(), Self::build_into(arena, child)?)))
                    .collect::<Result<Vec<_>>>()?;
                let id = arena.add_decision(name.clone(), player.clone());
                for (action, child) in children {
                    arena.attach(id, action, child)?;
                }
                Ok(id)
            }
        }
    }
}

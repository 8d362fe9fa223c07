//! Generic directed graphs as game input
//!
//! A `GameGraph` is a petgraph `DiGraph` whose edge weights are action
//! labels. Wrapping it assigns one arena node per vertex (same index) with
//! an inferred role and copies every edge, so shape errors such as cycles or
//! stray vertices are left for the validator to report.

use extform_engine::error::{GameError, Result};
use extform_engine::{ExtensiveFormGame, GameNode, NodeArena, NodeId, Payoffs, Player};
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::{Incoming, Outgoing};

pub type GameGraph = DiGraph<Vertex, String>;

/// Vertex weight: optional metadata for the node it becomes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    pub name: Option<String>,
    pub player: Option<Player>,
    pub payoffs: Option<Payoffs>,
}

impl Vertex {
    pub fn new() -> Self {
        Vertex::default()
    }

    pub fn leaf(payoffs: Payoffs) -> Self {
        Vertex {
            payoffs: Some(payoffs),
            ..Vertex::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn played_by(mut self, player: &Player) -> Self {
        self.player = Some(player.clone());
        self
    }
}

/// Outgoing edges of `vertex` in insertion order
fn outgoing(graph: &GameGraph, vertex: NodeIndex) -> Vec<(String, NodeIndex)> {
    let mut edges: Vec<_> = graph.edges_directed(vertex, Outgoing).collect();
    edges.sort_by_key(|e| e.id());
    edges
        .into_iter()
        .map(|e| (e.weight().clone(), e.target()))
        .collect()
}

/// Turn `graph` into an unvalidated arena.
///
/// Roles: the designated root becomes Root when nothing points at it; any
/// vertex without outgoing edges becomes a Leaf; everything else is a
/// Decision. Payoffs on a vertex with outgoing edges are rejected.
pub(crate) fn wrap(graph: &GameGraph, root: NodeIndex) -> Result<(NodeArena, NodeId)> {
    if graph.node_count() == 0 {
        return Err(GameError::EmptyGame);
    }
    if graph.node_weight(root).is_none() {
        return Err(GameError::malformed(format!(
            "root candidate {} is not a vertex of the graph",
            root.index()
        )));
    }

    let mut arena = NodeArena::new();
    for vertex in graph.node_indices() {
        let weight = &graph[vertex];
        let childless = graph.edges_directed(vertex, Outgoing).next().is_none();
        let orphan = graph.edges_directed(vertex, Incoming).next().is_none();
        let id = if vertex == root && orphan {
            arena.add_root(weight.name.clone(), weight.player.clone())
        } else if childless {
            let payoffs = weight.payoffs.clone().unwrap_or_default();
            arena.add_leaf(weight.name.clone(), payoffs)
        } else {
            arena.add_decision(weight.name.clone(), weight.player.clone())
        };
        if !childless && weight.payoffs.is_some() {
            return Err(GameError::malformed(format!(
                "vertex {} has outgoing edges and payoffs",
                id
            )));
        }
    }

    for vertex in graph.node_indices() {
        for (label, target) in outgoing(graph, vertex) {
            arena.link_unchecked(vertex.index() as NodeId, label, target.index() as NodeId)?;
        }
    }

    debug!(
        "wrapped graph of {} vertices and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok((arena, root.index() as NodeId))
}

/// Export a game back into a graph with the same vertex numbering.
pub fn to_graph(game: &ExtensiveFormGame) -> (GameGraph, NodeIndex) {
    let mut graph = GameGraph::with_capacity(game.len(), game.len().saturating_sub(1));
    for node in game.nodes() {
        graph.add_node(Vertex {
            name: node.name().map(str::to_string),
            player: node.player().cloned(),
            payoffs: node.payoffs().cloned(),
        });
    }
    for &id in game.preorder() {
        let node: &GameNode = &game.nodes()[id as usize];
        for branch in node.branches() {
            if let Some(child) = branch.child {
                graph.add_edge(
                    NodeIndex::new(id as usize),
                    NodeIndex::new(child as usize),
                    branch.action.to_string(),
                );
            }
        }
    }
    (graph, NodeIndex::new(game.root() as usize))
}

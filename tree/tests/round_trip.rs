//! Nested and graph encodings of the same game must build equal games.

use approx::assert_relative_eq;
use extform_engine::{GameError, NotATreeReason, Payoffs, Player, Role};
use extform_tree::{to_graph, Description, GameGraph, Roster, TreeBuilder, Vertex};
use petgraph::graph::NodeIndex;
use serde_json::json;

fn scenario_json() -> serde_json::Value {
    json!({
        "C": {
            "A": {"payoffs": {"P1": 0, "P2": 1}},
            "B": {"payoffs": {"P1": 1, "P2": 0}}
        },
        "D": {
            "A": {"payoffs": {"P1": 2, "P2": 4}},
            "B": {"payoffs": {"P1": 2, "P2": 1}}
        }
    })
}

/// Same tree as `scenario_json`, vertices added leaves first.
fn scenario_graph(p1: &Player, p2: &Player) -> (GameGraph, NodeIndex) {
    let mut graph = GameGraph::new();
    let pay = |a: f64, b: f64| Vertex::leaf(Payoffs::new().with(p1, a).with(p2, b));
    let l1 = graph.add_node(pay(0.0, 1.0));
    let l2 = graph.add_node(pay(1.0, 0.0));
    let l3 = graph.add_node(pay(2.0, 4.0));
    let l4 = graph.add_node(pay(2.0, 1.0));
    let n1 = graph.add_node(Vertex::new());
    let n2 = graph.add_node(Vertex::new());
    let root = graph.add_node(Vertex::new());
    graph.add_edge(root, n1, "C".into());
    graph.add_edge(root, n2, "D".into());
    graph.add_edge(n1, l1, "A".into());
    graph.add_edge(n1, l2, "B".into());
    graph.add_edge(n2, l3, "A".into());
    graph.add_edge(n2, l4, "B".into());
    (graph, root)
}

fn not_a_tree(err: GameError) -> NotATreeReason {
    match err {
        GameError::NotATree { reason } => reason,
        other => panic!("expected NotATree, got {:?}", other),
    }
}

#[test]
fn test_scenario_from_json() {
    let roster = Roster::from_names(["P1", "P2"]);
    let game = TreeBuilder::value(&scenario_json(), &roster).unwrap();
    let root = game.root_node();
    assert_eq!(root.role(), Role::Root);
    assert_eq!(root.action_labels(), vec!["C", "D"]);

    let n1 = game.child(game.root(), "C").unwrap();
    let n2 = game.child(game.root(), "D").unwrap();
    assert_eq!(game.node(n1).unwrap().parent(), Some(game.root()));
    assert_eq!(game.node(n1).unwrap().action_labels(), vec!["A", "B"]);

    let l1 = game.child(n1, "A").unwrap();
    let p1 = roster.resolve("P1").unwrap();
    assert_relative_eq!(game.leaf_payoffs(l1).unwrap()[&p1], 0.0);

    let set = game.assign_information_set(&[n1, n2]).unwrap();
    assert!(game.information_sets().same_infoset(n1, n2));
    assert_eq!(game.information_sets().infoset_of(n1), Some(set));
}

#[test]
fn test_nested_equals_graph() {
    let roster = Roster::from_names(["P1", "P2"]);
    let nested = TreeBuilder::value(&scenario_json(), &roster).unwrap();
    let p1 = roster.resolve("P1").unwrap();
    let p2 = roster.resolve("P2").unwrap();
    let (graph, root) = scenario_graph(&p1, &p2);
    let from_graph = TreeBuilder::graph(&graph, root).unwrap();
    assert_eq!(nested, from_graph);
    assert_eq!(nested.payoff_table().rows, from_graph.payoff_table().rows);
}

#[test]
fn test_graph_with_other_labels_differs() {
    let roster = Roster::from_names(["P1", "P2"]);
    let nested = TreeBuilder::value(&scenario_json(), &roster).unwrap();
    let p1 = roster.resolve("P1").unwrap();
    let p2 = roster.resolve("P2").unwrap();
    let (mut graph, root) = scenario_graph(&p1, &p2);
    let edge = graph.find_edge(root, NodeIndex::new(5)).unwrap();
    graph[edge] = "E".into();
    let from_graph = TreeBuilder::graph(&graph, root).unwrap();
    assert_ne!(nested, from_graph);
}

#[test]
fn test_exported_graph_rebuilds_equal_game() {
    let p1 = Player::new("P1");
    let p2 = Player::new("P2");
    let description = Description::node([
        (
            "C",
            Description::node([
                ("A", Description::leaf(Payoffs::new().with(&p1, 0.0).with(&p2, 1.0))),
                ("B", Description::leaf(Payoffs::new().with(&p1, 1.0).with(&p2, 0.0))),
            ])
            .played_by(&p2),
        ),
        ("D", Description::leaf(Payoffs::new().with(&p1, 3.0).with(&p2, 3.0))),
    ])
    .played_by(&p1);
    let game = TreeBuilder::nested(&description).unwrap();
    let (graph, root) = to_graph(&game);
    let rebuilt = TreeBuilder::graph(&graph, root).unwrap();
    assert_eq!(game, rebuilt);
    assert_eq!(rebuilt.players(), &[p1, p2]);
}

#[test]
fn test_empty_graph() {
    let graph = GameGraph::new();
    assert_eq!(
        TreeBuilder::graph(&graph, NodeIndex::new(0)).unwrap_err(),
        GameError::EmptyGame
    );
}

#[test]
fn test_graph_cycle() {
    let p = Player::new("P");
    let mut graph = GameGraph::new();
    let root = graph.add_node(Vertex::new());
    let a = graph.add_node(Vertex::new());
    let b = graph.add_node(Vertex::new());
    let leaf = graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 0.0)));
    graph.add_edge(root, a, "x".into());
    graph.add_edge(a, b, "y".into());
    graph.add_edge(b, a, "back".into());
    graph.add_edge(b, leaf, "stop".into());
    assert_eq!(
        not_a_tree(TreeBuilder::graph(&graph, root).unwrap_err()),
        NotATreeReason::Revisited { node: a.index() as u32 }
    );
}

#[test]
fn test_graph_disconnected_vertex() {
    let p = Player::new("P");
    let mut graph = GameGraph::new();
    let root = graph.add_node(Vertex::new());
    let leaf = graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 0.0)));
    graph.add_edge(root, leaf, "go".into());
    graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 0.0)));
    // A stray vertex is a second parentless node.
    assert!(matches!(
        not_a_tree(TreeBuilder::graph(&graph, root).unwrap_err()),
        NotATreeReason::MultipleRoots { count: 2 }
    ));
}

#[test]
fn test_graph_two_parentless_nodes() {
    let p = Player::new("P");
    let mut graph = GameGraph::new();
    let root = graph.add_node(Vertex::new());
    let other = graph.add_node(Vertex::new());
    let shared = graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 0.0)));
    let leaf = graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 1.0)));
    graph.add_edge(root, leaf, "go".into());
    graph.add_edge(other, shared, "go".into());
    assert!(matches!(
        TreeBuilder::graph(&graph, root).unwrap_err(),
        GameError::NotATree { .. }
    ));
}

#[test]
fn test_graph_shared_child() {
    let p = Player::new("P");
    let mut graph = GameGraph::new();
    let root = graph.add_node(Vertex::new());
    let a = graph.add_node(Vertex::new());
    let shared = graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 0.0)));
    graph.add_edge(root, a, "left".into());
    graph.add_edge(root, shared, "right".into());
    graph.add_edge(a, shared, "down".into());
    assert_eq!(
        not_a_tree(TreeBuilder::graph(&graph, root).unwrap_err()),
        NotATreeReason::Revisited { node: shared.index() as u32 }
    );
}

#[test]
fn test_root_candidate_with_incoming_edge() {
    let p = Player::new("P");
    let mut graph = GameGraph::new();
    let top = graph.add_node(Vertex::new());
    let candidate = graph.add_node(Vertex::new());
    let leaf = graph.add_node(Vertex::leaf(Payoffs::new().with(&p, 0.0)));
    graph.add_edge(top, candidate, "a".into());
    graph.add_edge(candidate, leaf, "b".into());
    assert_eq!(
        not_a_tree(TreeBuilder::graph(&graph, candidate).unwrap_err()),
        NotATreeReason::RootHasParent { root: candidate.index() as u32 }
    );
}

#[test]
fn test_malformed_top_level() {
    let roster = Roster::default();
    for value in [json!(5), json!("tree"), json!(null)] {
        assert!(matches!(
            TreeBuilder::value(&value, &roster),
            Err(GameError::MalformedInput { .. })
        ));
    }
}

#[test]
fn test_leaf_missing_a_player() {
    let roster = Roster::from_names(["P1", "P2"]);
    let value = json!({
        "x": {"payoffs": {"P1": 1, "P2": 2}},
        "y": {"payoffs": {"P1": 0}}
    });
    assert!(matches!(
        TreeBuilder::value(&value, &roster),
        Err(GameError::MissingPayoff { ref player, .. }) if player == "P2"
    ));
}

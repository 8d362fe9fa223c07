//! Hand-wired fixture trees for tests and benchmarks
//!
//! The scenario tree is a two-stage game between two players:
//!
//! ```text
//!   R:  Root      [C → N1, D → N2]
//!   N1: Decision  [A → L1, B → L2]
//!   N2: Decision  [A → L3, B → L4]
//!   L1: Leaf      {P1: 0, P2: 1}
//!   L2: Leaf      {P1: 1, P2: 0}
//!   L3: Leaf      {P1: 2, P2: 4}
//!   L4: Leaf      {P1: 2, P2: 1}
//! ```
//!
//! Nodes are created bottom-up (leaves first, root last), so ids are
//! L1=0, L2=1, L3=2, L4=3, N1=4, N2=5, R=6.

use crate::arena::NodeArena;
use crate::node::NodeId;
use crate::payoff::Payoffs;
use crate::player::Player;

/// Scenario arena plus handles to its nodes and players
#[derive(Debug, Clone)]
pub struct Scenario {
    pub arena: NodeArena,
    pub root: NodeId,
    pub n1: NodeId,
    pub n2: NodeId,
    pub leaves: [NodeId; 4],
    pub p1: Player,
    pub p2: Player,
}

/// Fixed leaf payoffs as (P1, P2), in leaf order L1..L4
pub const SCENARIO_PAYOFFS: [(f64, f64); 4] = [(0.0, 1.0), (1.0, 0.0), (2.0, 4.0), (2.0, 1.0)];

/// Build the 7-node scenario tree with fresh players.
pub fn build_scenario() -> Scenario {
    build_scenario_with(Player::new("Player 1"), Player::new("Player 2"))
}

/// Build the scenario tree for the given players.
pub fn build_scenario_with(p1: Player, p2: Player) -> Scenario {
    let mut arena = NodeArena::new();

    let mut leaves = [0; 4];
    for (i, (pay_1, pay_2)) in SCENARIO_PAYOFFS.iter().enumerate() {
        let payoffs = Payoffs::new().with(&p1, *pay_1).with(&p2, *pay_2);
        leaves[i] = arena.add_leaf(Some(format!("L{}", i + 1)), payoffs);
    }

    let n1 = arena.add_decision(Some("N1".into()), None);
    let n2 = arena.add_decision(Some("N2".into()), None);
    let root = arena.add_root(Some("R".into()), None);

    // The fixture is fixed and known to be well formed.
    let wiring = [
        (n1, "A", leaves[0]),
        (n1, "B", leaves[1]),
        (n2, "A", leaves[2]),
        (n2, "B", leaves[3]),
        (root, "C", n1),
        (root, "D", n2),
    ];
    for (parent, action, child) in wiring {
        arena
            .attach(parent, action, child)
            .expect("scenario wiring is a tree");
    }

    Scenario {
        arena,
        root,
        n1,
        n2,
        leaves,
        p1,
        p2,
    }
}

/// Build a complete tree of the given depth where every decision point has
/// `branching` actions labelled `a0, a1, ...`. Decision points alternate
/// between the players by depth; leaf payoffs are derived from the leaf
/// index so trees are reproducible.
pub fn build_uniform_tree(depth: usize, branching: usize, players: &[Player]) -> (NodeArena, NodeId) {
    assert!(branching > 0, "branching must be positive");
    assert!(!players.is_empty(), "at least one player is required");

    let mut arena = NodeArena::new();
    let root = arena.add_root(None, Some(players[0].clone()));
    let mut frontier = vec![root];
    let mut leaf_index = 0usize;

    for level in 1..=depth {
        let mut next = Vec::with_capacity(frontier.len() * branching);
        for &parent in &frontier {
            for b in 0..branching {
                let child = if level == depth {
                    let payoffs = players
                        .iter()
                        .enumerate()
                        .map(|(i, p)| (p, ((leaf_index * (i + 1)) % 7) as f64 - 3.0))
                        .collect::<Payoffs>();
                    leaf_index += 1;
                    arena.add_leaf(None, payoffs)
                } else {
                    let player = players[level % players.len()].clone();
                    arena.add_decision(None, Some(player))
                };
                arena
                    .attach(parent, format!("a{}", b), child)
                    .expect("uniform tree wiring is a tree");
                next.push(child);
            }
        }
        frontier = next;
    }

    (arena, root)
}

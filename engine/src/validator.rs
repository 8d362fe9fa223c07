//! Tree validation
//!
//! Decides whether the nodes of an arena form a single tree hanging from a
//! designated root. Runs in time and space linear in the node count. The
//! traversal is an explicit-stack pre-order walk following action order, so
//! diagnostics are reproducible.

use crate::arena::NodeArena;
use crate::error::{GameError, NotATreeReason, Result};
use crate::node::{GameNode, NodeId};
use log::debug;

/// Check the tree property and return the nodes in pre-order.
///
/// Rejects an empty arena with `EmptyGame`. Rejects with `NotATree` when the
/// root has a parent, a node is reachable along two paths (cycle or shared
/// child), a child's back-link disagrees with the edge, more than one node is
/// parentless, or some node is unreachable from the root.
pub fn validate(arena: &NodeArena, root: NodeId) -> Result<Vec<NodeId>> {
    if arena.is_empty() {
        return Err(GameError::EmptyGame);
    }
    let root_node = arena.node(root)?;
    if root_node.parent().is_some() {
        return Err(GameError::not_a_tree(NotATreeReason::RootHasParent { root }));
    }

    let order = preorder(arena, root)?;

    for &id in &order {
        for child in arena.nodes()[id as usize].children() {
            let back_link = arena.nodes()[child as usize].parent();
            if back_link != Some(id) {
                return Err(GameError::not_a_tree(NotATreeReason::ParentMismatch {
                    node: child,
                    parent: id,
                }));
            }
        }
    }

    let parentless = arena
        .nodes()
        .iter()
        .filter(|n| n.parent().is_none())
        .count();
    if parentless > 1 {
        return Err(GameError::not_a_tree(NotATreeReason::MultipleRoots {
            count: parentless,
        }));
    }

    if order.len() != arena.len() {
        return Err(GameError::not_a_tree(NotATreeReason::Unreachable {
            count: arena.len() - order.len(),
        }));
    }

    debug!("validated tree of {} nodes rooted at {}", order.len(), root);
    Ok(order)
}

/// Pre-order walk from `root`, failing on the first node reached twice
fn preorder(arena: &NodeArena, root: NodeId) -> Result<Vec<NodeId>> {
    let mut visited = vec![false; arena.len()];
    let mut order = Vec::with_capacity(arena.len());
    let mut stack = vec![root];
    visited[root as usize] = true;

    while let Some(id) = stack.pop() {
        order.push(id);
        let node: &GameNode = &arena.nodes()[id as usize];
        // Reverse so the first action is popped first.
        for child in node.children().into_iter().rev() {
            let seen = visited
                .get_mut(child as usize)
                .ok_or(GameError::UnknownNode { node: child })?;
            if *seen {
                return Err(GameError::not_a_tree(NotATreeReason::Revisited { node: child }));
            }
            *seen = true;
            stack.push(child);
        }
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::Payoffs;
    use crate::test_tree::build_scenario;

    fn reason(err: GameError) -> NotATreeReason {
        match err {
            GameError::NotATree { reason } => reason,
            other => panic!("expected NotATree, got {:?}", other),
        }
    }

    #[test]
    fn test_scenario_is_a_tree() {
        let scenario = build_scenario();
        let order = validate(&scenario.arena, scenario.root).unwrap();
        assert_eq!(order.len(), scenario.arena.len());
        assert_eq!(order[0], scenario.root);
        // Pre-order follows action order: R, N1, L1, L2, N2, L3, L4
        assert_eq!(
            order,
            vec![
                scenario.root,
                scenario.n1,
                scenario.leaves[0],
                scenario.leaves[1],
                scenario.n2,
                scenario.leaves[2],
                scenario.leaves[3],
            ]
        );
    }

    #[test]
    fn test_empty_arena() {
        let arena = NodeArena::new();
        assert_eq!(validate(&arena, 0), Err(GameError::EmptyGame));
    }

    #[test]
    fn test_single_leaf_is_a_tree() {
        let mut arena = NodeArena::new();
        let only = arena.add_leaf(None, Payoffs::new());
        assert_eq!(validate(&arena, only).unwrap(), vec![only]);
    }

    #[test]
    fn test_cycle_detected() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        let a = arena.add_decision(None, None);
        let b = arena.add_decision(None, None);
        arena.link_unchecked(root, "x", a).unwrap();
        arena.link_unchecked(a, "y", b).unwrap();
        arena.link_unchecked(b, "z", a).unwrap();
        assert_eq!(
            reason(validate(&arena, root).unwrap_err()),
            NotATreeReason::Revisited { node: a }
        );
    }

    #[test]
    fn test_shared_child_detected() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        let a = arena.add_decision(None, None);
        let b = arena.add_decision(None, None);
        let shared = arena.add_leaf(None, Payoffs::new());
        arena.link_unchecked(root, "A", a).unwrap();
        arena.link_unchecked(root, "B", b).unwrap();
        arena.link_unchecked(a, "x", shared).unwrap();
        arena.link_unchecked(b, "x", shared).unwrap();
        assert_eq!(
            reason(validate(&arena, root).unwrap_err()),
            NotATreeReason::Revisited { node: shared }
        );
    }

    #[test]
    fn test_disconnected_cycle_is_unreachable() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        let leaf = arena.add_leaf(None, Payoffs::new());
        arena.attach(root, "go", leaf).unwrap();
        let x = arena.add_decision(None, None);
        let y = arena.add_decision(None, None);
        arena.link_unchecked(x, "a", y).unwrap();
        arena.link_unchecked(y, "b", x).unwrap();
        assert_eq!(
            reason(validate(&arena, root).unwrap_err()),
            NotATreeReason::Unreachable { count: 2 }
        );
    }

    #[test]
    fn test_two_parentless_nodes() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        let leaf = arena.add_leaf(None, Payoffs::new());
        arena.attach(root, "go", leaf).unwrap();
        arena.add_blank();
        assert_eq!(
            reason(validate(&arena, root).unwrap_err()),
            NotATreeReason::MultipleRoots { count: 2 }
        );
    }

    #[test]
    fn test_root_with_parent() {
        let mut arena = NodeArena::new();
        let top = arena.add_decision(None, None);
        let below = arena.add_decision(None, None);
        arena.attach(top, "a", below).unwrap();
        assert_eq!(
            reason(validate(&arena, below).unwrap_err()),
            NotATreeReason::RootHasParent { root: below }
        );
    }

    #[test]
    fn test_root_listed_as_child() {
        let mut arena = NodeArena::new();
        let root = arena.add_root(None, None);
        let a = arena.add_decision(None, None);
        arena.attach(root, "a", a).unwrap();
        arena.link_unchecked(a, "back", root).unwrap();
        assert_eq!(
            reason(validate(&arena, root).unwrap_err()),
            NotATreeReason::Revisited { node: root }
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let scenario = build_scenario();
        let first = validate(&scenario.arena, scenario.root).unwrap();
        let second = validate(&scenario.arena, scenario.root).unwrap();
        assert_eq!(first, second);
    }
}

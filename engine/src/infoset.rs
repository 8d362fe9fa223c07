//! Information sets over the decision points of a validated game
//!
//! Every decision point starts in its own singleton set. `assign` groups
//! nodes that share the same ordered action labels and the same controlling
//! player; a node belongs to exactly one set at a time, so reassignment
//! supersedes earlier membership.
//!
//! The registry is the only state that changes after a game is built. It is
//! kept behind a `RwLock`: `assign` is the single writer, queries take the
//! read side, and tree data is never touched.

use crate::arena::NodeArena;
use crate::error::{GameError, Result};
use crate::node::{Action, GameNode, NodeId};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Information set ID type
pub type InfosetId = u32;

#[derive(Debug, Clone, Default)]
struct Registry {
    membership: HashMap<NodeId, InfosetId>,
    sets: BTreeMap<InfosetId, Vec<NodeId>>,
    next_id: InfosetId,
}

impl Registry {
    fn open(&mut self, members: Vec<NodeId>) -> InfosetId {
        let id = self.next_id;
        self.next_id += 1;
        for &node in &members {
            if let Some(previous) = self.membership.insert(node, id) {
                let emptied = match self.sets.get_mut(&previous) {
                    Some(old) => {
                        old.retain(|&n| n != node);
                        old.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    self.sets.remove(&previous);
                }
            }
        }
        self.sets.insert(id, members);
        id
    }
}

#[derive(Debug, Default)]
pub struct InformationSetManager {
    registry: RwLock<Registry>,
}

impl InformationSetManager {
    /// One singleton set per decision point, numbered in the given order
    pub fn singletons(decision_points: &[NodeId]) -> Self {
        let mut registry = Registry::default();
        for &node in decision_points {
            registry.open(vec![node]);
        }
        InformationSetManager {
            registry: RwLock::new(registry),
        }
    }

    // Mutations only happen after all checks pass, so a poisoned lock still
    // guards a consistent registry.
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Group `nodes` into one information set and return its id.
    ///
    /// Requires at least two distinct decision points registered with this
    /// manager, all exposing identical ordered action labels and the same
    /// controlling player (or all having none). Repeated ids are collapsed.
    /// On error the registry is unchanged.
    pub fn assign(&self, arena: &NodeArena, nodes: &[NodeId]) -> Result<InfosetId> {
        let mut members: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for &node in nodes {
            if !members.contains(&node) {
                members.push(node);
            }
        }
        if members.len() < 2 {
            return Err(GameError::InfoSetTooSmall {
                count: members.len(),
            });
        }

        let mut resolved: Vec<&GameNode> = Vec::with_capacity(members.len());
        {
            let registry = self.read();
            for &id in &members {
                let node = arena.node(id)?;
                if !node.is_decision_point() || !registry.membership.contains_key(&id) {
                    return Err(GameError::NotADecisionNode { node: id });
                }
                resolved.push(node);
            }
        }

        let first = resolved[0];
        let expected: Vec<&Action> = first.actions().collect();
        for node in &resolved[1..] {
            let found: Vec<&Action> = node.actions().collect();
            if found != expected {
                return Err(GameError::InfoSetMismatch {
                    first: first.id(),
                    node: node.id(),
                    expected: first.action_labels().join(", "),
                    found: node.action_labels().join(", "),
                });
            }
        }
        for node in &resolved[1..] {
            if node.player() != first.player() {
                return Err(GameError::InfoSetPlayerMismatch {
                    first: first.id(),
                    node: node.id(),
                });
            }
        }

        let id = self.write().open(members);
        debug!("information set {} now holds {:?}", id, self.members(id));
        Ok(id)
    }

    /// Current information set of a decision point
    pub fn infoset_of(&self, node: NodeId) -> Option<InfosetId> {
        self.read().membership.get(&node).copied()
    }

    /// Members of an information set, in the order they were assigned
    pub fn members(&self, id: InfosetId) -> Option<Vec<NodeId>> {
        self.read().sets.get(&id).cloned()
    }

    /// True when both nodes currently share an information set
    pub fn same_infoset(&self, a: NodeId, b: NodeId) -> bool {
        let registry = self.read();
        match (registry.membership.get(&a), registry.membership.get(&b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// All current information sets, ordered by id
    pub fn sets(&self) -> Vec<(InfosetId, Vec<NodeId>)> {
        self.read()
            .sets
            .iter()
            .map(|(id, members)| (*id, members.clone()))
            .collect()
    }

    /// Number of information sets
    pub fn len(&self) -> usize {
        self.read().sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().sets.is_empty()
    }
}

impl Clone for InformationSetManager {
    fn clone(&self) -> Self {
        InformationSetManager {
            registry: RwLock::new(self.read().clone()),
        }
    }
}

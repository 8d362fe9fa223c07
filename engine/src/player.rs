//! Players and the per-game player registry
//!
//! A `Player` is an identity token. Two players created with the same display
//! name are still different players.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// A named participant in a game
#[derive(Clone)]
pub struct Player {
    id: Uuid,
    name: Arc<str>,
}

impl Player {
    /// Create a fresh player identity with the given display name
    pub fn new(name: impl AsRef<str>) -> Self {
        Player {
            id: Uuid::now_v7(),
            name: Arc::from(name.as_ref()),
        }
    }

    /// Display name (not unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of this player
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.name)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Players known to a game, in the stable order fixed at construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        PlayerRegistry {
            players: Vec::new(),
        }
    }

    /// Register a player if unseen. Returns its stable index.
    pub fn register(&mut self, player: &Player) -> usize {
        match self.index_of(player) {
            Some(idx) => idx,
            None => {
                self.players.push(player.clone());
                self.players.len() - 1
            }
        }
    }

    /// Stable index of a player, if known
    pub fn index_of(&self, player: &Player) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.index_of(player).is_some()
    }

    pub fn as_slice(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

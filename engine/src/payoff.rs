//! Leaf payoffs
//!
//! A small insertion-ordered map from `Player` to a scalar payoff. Games have
//! few players, so lookups are linear scans.

use crate::player::Player;
use std::fmt;
use std::ops::Index;

#[derive(Debug, Clone, Default)]
pub struct Payoffs {
    entries: Vec<(Player, f64)>,
}

impl Payoffs {
    pub fn new() -> Self {
        Payoffs {
            entries: Vec::new(),
        }
    }

    /// Set the payoff for a player, replacing any previous value
    pub fn insert(&mut self, player: Player, payoff: f64) -> Option<f64> {
        match self.entries.iter_mut().find(|(p, _)| *p == player) {
            Some((_, value)) => Some(std::mem::replace(value, payoff)),
            None => {
                self.entries.push((player, payoff));
                None
            }
        }
    }

    /// Builder-style insert
    pub fn with(mut self, player: &Player, payoff: f64) -> Self {
        self.insert(player.clone(), payoff);
        self
    }

    pub fn get(&self, player: &Player) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| p == player)
            .map(|(_, value)| *value)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.entries.iter().map(|(p, _)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Player, f64)> {
        self.entries.iter().map(|(p, v)| (p, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a Player, f64)> for Payoffs {
    fn from_iter<I: IntoIterator<Item = (&'a Player, f64)>>(iter: I) -> Self {
        let mut payoffs = Payoffs::new();
        for (player, value) in iter {
            payoffs.insert(player.clone(), value);
        }
        payoffs
    }
}

impl FromIterator<(Player, f64)> for Payoffs {
    fn from_iter<I: IntoIterator<Item = (Player, f64)>>(iter: I) -> Self {
        let mut payoffs = Payoffs::new();
        for (player, value) in iter {
            payoffs.insert(player, value);
        }
        payoffs
    }
}

/// Panics when the player has no payoff, like `HashMap` indexing
impl Index<&Player> for Payoffs {
    type Output = f64;

    fn index(&self, player: &Player) -> &f64 {
        self.entries
            .iter()
            .find(|(p, _)| p == player)
            .map(|(_, value)| value)
            .unwrap_or_else(|| panic!("no payoff recorded for player {}", player))
    }
}

/// Order-insensitive comparison
impl PartialEq for Payoffs {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(player, value)| other.get(player) == Some(*value))
    }
}

impl fmt::Display for Payoffs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (player, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", player, value)?;
        }
        f.write_str("}")
    }
}

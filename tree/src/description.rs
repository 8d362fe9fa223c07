//! Nested game descriptions
//!
//! A `Description` is the typed form of the recursive "action label → child"
//! input. JSON values are classified into it once, up front; builders only
//! ever see the typed variants.

use extform_engine::error::{GameError, Result};
use extform_engine::{Action, Payoffs, Player};
use serde_json::{Map, Value};

/// Marker keys that turn an object into a wrapper rather than a label map.
const LEAF_KEYS: &[&str] = &["payoffs", "name"];
const NODE_KEYS: &[&str] = &["actions", "player", "name"];

/// Resolves player names found in textual input to `Player` identities.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Roster {
            players: players.into_iter().collect(),
        }
    }

    /// Fresh players, one per distinct name
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Roster::default();
        for name in names {
            if roster.get(name.as_ref()).is_none() {
                roster.players.push(Player::new(name));
            }
        }
        roster
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    pub fn resolve(&self, name: &str) -> Result<Player> {
        self.get(name).cloned().ok_or_else(|| GameError::UnknownPlayer {
            name: name.to_string(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }
}

/// Typed nested description of a game tree or a fragment of one
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
    /// Internal node; children in label order
    Node {
        name: Option<String>,
        player: Option<Player>,
        branches: Vec<(Action, Description)>,
    },
    Leaf {
        name: Option<String>,
        payoffs: Payoffs,
    },
    /// Bare action labels with no children yet
    Actions(Vec<Action>),
}

impl Description {
    pub fn node<I, A>(branches: I) -> Self
    where
        I: IntoIterator<Item = (A, Description)>,
        A: Into<Action>,
    {
        Description::Node {
            name: None,
            player: None,
            branches: branches.into_iter().map(|(a, d)| (a.into(), d)).collect(),
        }
    }

    pub fn leaf(payoffs: Payoffs) -> Self {
        Description::Leaf {
            name: None,
            payoffs,
        }
    }

    pub fn actions<I, A>(labels: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        Description::Actions(labels.into_iter().map(Into::into).collect())
    }

    /// Attach a name; bare action lists carry none and are returned as is.
    pub fn named(mut self, new_name: impl Into<String>) -> Self {
        match &mut self {
            Description::Node { name, .. } | Description::Leaf { name, .. } => {
                *name = Some(new_name.into());
            }
            Description::Actions(_) => {}
        }
        self
    }

    /// Set the controlling player of an internal node.
    pub fn played_by(mut self, new_player: &Player) -> Self {
        if let Description::Node { player, .. } = &mut self {
            *player = Some(new_player.clone());
        }
        self
    }

    /// Classify a JSON value.
    ///
    /// - `{"payoffs": {player: number, ...}, "name"?: string}` is a leaf
    /// - `{"actions": {...}, "player"?: string, "name"?: string}` is an
    ///   internal node with metadata
    /// - any other object maps action labels to child descriptions
    /// - an array of strings is a bare action list
    ///
    /// Anything else is `MalformedInput`. Player names go through `roster`.
    pub fn classify(value: &Value, roster: &Roster) -> Result<Self> {
        match value {
            Value::Object(map) if is_wrapper(map, "payoffs", LEAF_KEYS) => classify_leaf(map, roster),
            Value::Object(map) if is_wrapper(map, "actions", NODE_KEYS) => classify_node(map, roster),
            Value::Object(map) => Ok(Description::Node {
                name: None,
                player: None,
                branches: classify_branches(map, roster)?,
            }),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(label) => Ok(Action::new(label.as_str())),
                    other => Err(GameError::malformed(format!(
                        "action lists may only hold strings, found {}",
                        kind(other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Description::Actions),
            other => Err(GameError::malformed(format!(
                "expected a mapping or a list of actions, found {}",
                kind(other)
            ))),
        }
    }
}

fn is_wrapper(map: &Map<String, Value>, marker: &str, allowed: &[&str]) -> bool {
    map.contains_key(marker) && map.keys().all(|k| allowed.contains(&k.as_str()))
}

fn classify_leaf(map: &Map<String, Value>, roster: &Roster) -> Result<Description> {
    let entries = match &map["payoffs"] {
        Value::Object(entries) => entries,
        other => {
            return Err(GameError::malformed(format!(
                "payoffs must be a mapping, found {}",
                kind(other)
            )))
        }
    };
    let mut payoffs = Payoffs::new();
    for (name, amount) in entries {
        let amount = amount.as_f64().ok_or_else(|| {
            GameError::malformed(format!("payoff for {} is {}, not a number", name, kind(amount)))
        })?;
        payoffs.insert(roster.resolve(name)?, amount);
    }
    Ok(Description::Leaf {
        name: string_field(map, "name")?,
        payoffs,
    })
}

fn classify_node(map: &Map<String, Value>, roster: &Roster) -> Result<Description> {
    let branches = match &map["actions"] {
        Value::Object(children) => classify_branches(children, roster)?,
        other => {
            return Err(GameError::malformed(format!(
                "actions must map labels to children, found {}",
                kind(other)
            )))
        }
    };
    let player = match string_field(map, "player")? {
        Some(name) => Some(roster.resolve(&name)?),
        None => None,
    };
    Ok(Description::Node {
        name: string_field(map, "name")?,
        player,
        branches,
    })
}

fn classify_branches(map: &Map<String, Value>, roster: &Roster) -> Result<Vec<(Action, Description)>> {
    map.iter()
        .map(|(label, child)| Ok((Action::new(label.as_str()), Description::classify(child, roster)?)))
        .collect()
}

fn string_field(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(GameError::malformed(format!(
            "{} must be a string, found {}",
            key,
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

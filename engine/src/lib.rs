//! extform Engine - extensive-form game trees
//!
//! Nodes live in a `NodeArena` and refer to each other by `NodeId`. An arena
//! becomes an `ExtensiveFormGame` only after it passes tree validation and the
//! completeness checks, after which the tree is immutable and only
//! information-set membership may change.
//!
//! The engine has no I/O; the `extform-tree` crate builds games from
//! descriptions and the CLI drives both.

pub mod arena;
pub mod error;
pub mod game;
pub mod infoset;
pub mod node;
pub mod payoff;
pub mod player;
pub mod test_tree;
pub mod validator;

pub use arena::NodeArena;
pub use error::{GameError, NotATreeReason, Result};
pub use game::{ExtensiveFormGame, PayoffLookup, PayoffTable};
pub use infoset::{InfosetId, InformationSetManager};
pub use node::{Action, Attributes, Branch, GameNode, NodeId, Role};
pub use payoff::Payoffs;
pub use player::{Player, PlayerRegistry};
pub use validator::validate as validate_tree;

//! extform Tree Builder - game construction from external descriptions
//!
//! Two input shapes are supported: nested "action label → child" descriptions
//! (typed `Description` values or JSON classified into them) and petgraph
//! directed graphs with a designated root. Both end in the engine's
//! validation, so every game handed out is a well-formed tree.

pub mod builder;
pub mod description;
pub mod graph;

pub use builder::TreeBuilder;
pub use description::{Description, Roster};
pub use graph::{to_graph, GameGraph, Vertex};

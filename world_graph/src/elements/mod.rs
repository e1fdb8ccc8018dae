//! Element definitions for the world graph.

mod edge;
mod node;
mod patch;

pub use edge::*;
pub use node::*;
pub use patch::*;

use serde::{Deserialize, Serialize};

/// Identifier of a node or an edge, in `{prefix}_{n}` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Build the identifier for the `n`-th allocation of a kind.
    pub fn new(kind: IdKind, n: u64) -> Self {
        Self(format!("{}_{}", kind.prefix(), n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Which counter this identifier was drawn from.
    pub fn scope(&self) -> IdScope {
        if self.0.starts_with("edge_") {
            IdScope::Edge
        } else {
            IdScope::Node
        }
    }

    /// The numeric suffix, if the identifier follows the `{prefix}_{n}` form.
    pub fn ordinal(&self) -> Option<u64> {
        let (prefix, n) = self.0.rsplit_once('_')?;
        if prefix.is_empty() {
            return None;
        }
        n.parse().ok()
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity counters: edges count separately from all node kinds combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdScope {
    Node,
    Edge,
}

impl std::fmt::Display for IdScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdScope::Node => write!(f, "node"),
            IdScope::Edge => write!(f, "edge"),
        }
    }
}

/// Anything that can be allocated an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Node(NodeType),
    Edge,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Node(NodeType::Location) => "loc",
            IdKind::Node(NodeType::Character) => "char",
            IdKind::Node(NodeType::Event) => "event",
            IdKind::Node(NodeType::Sublocation) => "subloc",
            IdKind::Edge => "edge",
        }
    }

    pub fn scope(&self) -> IdScope {
        match self {
            IdKind::Node(_) => IdScope::Node,
            IdKind::Edge => IdScope::Edge,
        }
    }
}

/// Types of nodes in the world graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Location,
    Character,
    Event,
    Sublocation,
}

impl NodeType {
    /// Lowercase name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Location => "location",
            NodeType::Character => "character",
            NodeType::Event => "event",
            NodeType::Sublocation => "sublocation",
        }
    }

    /// Display name given to freshly created nodes.
    pub fn default_name(&self) -> &'static str {
        match self {
            NodeType::Location => "New Location",
            NodeType::Character => "New Character",
            NodeType::Event => "New Event",
            NodeType::Sublocation => "New Sublocation",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types of edges in the world graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// A character or event may appear at a location.
    Spawn,
    /// Two locations border each other.
    Adjacent,
    /// Two characters are acquainted.
    Knows,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Spawn => "spawn",
            EdgeType::Adjacent => "adjacent",
            EdgeType::Knows => "knows",
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This position shifted by the given amounts.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

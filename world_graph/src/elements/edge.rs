//! Edge definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{EdgeType, ElementId};

/// Type-specific edge payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edgeType", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EdgeKind {
    Spawn {
        probability: f64,
        /// Sublocation name -> override probability.
        ///
        /// An override of exactly 0 means "never spawn in this sublocation"
        /// and is never compiled out, while a parent-level `probability` of 0
        /// is an ordinary value.
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        sublocation_probabilities: IndexMap<String, f64>,
    },
    Adjacent,
    Knows {
        #[serde(default)]
        relationship: String,
        #[serde(default)]
        source_thinks: String,
        #[serde(default)]
        target_thinks: String,
    },
}

impl EdgeKind {
    /// A spawn payload without sublocation overrides.
    pub fn spawn(probability: f64) -> Self {
        EdgeKind::Spawn {
            probability,
            sublocation_probabilities: IndexMap::new(),
        }
    }

    /// A knows payload with empty opinions on both sides.
    pub fn knows(relationship: impl Into<String>) -> Self {
        EdgeKind::Knows {
            relationship: relationship.into(),
            source_thinks: String::new(),
            target_thinks: String::new(),
        }
    }

    pub fn edge_type(&self) -> EdgeType {
        match self {
            EdgeKind::Spawn { .. } => EdgeType::Spawn,
            EdgeKind::Adjacent => EdgeType::Adjacent,
            EdgeKind::Knows { .. } => EdgeType::Knows,
        }
    }
}

/// A directed edge of the world graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    #[serde(flatten)]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(id: ElementId, source: ElementId, target: ElementId, kind: EdgeKind) -> Self {
        Self {
            id,
            source,
            target,
            kind,
        }
    }

    pub fn edge_type(&self) -> EdgeType {
        self.kind.edge_type()
    }

    /// Whether the node is either endpoint.
    pub fn touches(&self, node: &ElementId) -> bool {
        &self.source == node || &self.target == node
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint.
    pub fn other_end(&self, node: &ElementId) -> Option<&ElementId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}

//! Immutable copies of a graph, exchanged with the compiler and the loader.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::{Edge, EdgeType, ElementId, GraphError, Node, NodeType};

/// A complete graph value: nodes and edges in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Find a node by id.
    pub fn node(&self, id: &ElementId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Nodes of one type, in insertion order.
    pub fn nodes_of(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.node_type() == node_type)
    }

    /// Edges of one type, in insertion order.
    pub fn edges_of(&self, edge_type: EdgeType) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.edge_type() == edge_type)
    }

    /// Every node and edge identifier.
    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.nodes
            .iter()
            .map(|node| &node.id)
            .chain(self.edges.iter().map(|edge| &edge.id))
    }

    /// Check the structural invariants a store relies on: unique ids, edges
    /// between existing nodes, sublocations under existing locations.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for id in self.ids() {
            if !seen.insert(id) {
                return Err(GraphError::DuplicateId(id.clone()));
            }
        }

        let types: HashMap<&ElementId, NodeType> = self
            .nodes
            .iter()
            .map(|node| (&node.id, node.node_type()))
            .collect();

        for node in &self.nodes {
            if let Some(parent) = node.parent() {
                if types.get(parent) != Some(&NodeType::Location) {
                    return Err(GraphError::OrphanedSublocation {
                        id: node.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !types.contains_key(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EdgeKind, NodeKind};

    fn sample() -> GraphSnapshot {
        GraphSnapshot {
            nodes: vec![
                Node::new("loc_1".into(), "Forest", NodeKind::Location),
                Node::new(
                    "subloc_2".into(),
                    "Clearing",
                    NodeKind::Sublocation {
                        parent: "loc_1".into(),
                    },
                ),
                Node::new("loc_3".into(), "Cave", NodeKind::Location),
            ],
            edges: vec![Edge::new(
                "edge_1".into(),
                "loc_1".into(),
                "loc_3".into(),
                EdgeKind::Adjacent,
            )],
        }
    }

    #[test]
    fn test_valid_snapshot() {
        let snapshot = sample();
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.nodes_of(NodeType::Location).count(), 2);
        assert_eq!(snapshot.edges_of(EdgeType::Adjacent).count(), 1);
        assert_eq!(snapshot.ids().count(), 4);
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let mut snapshot = sample();
        snapshot.edges[0].target = "loc_9".into();
        assert_eq!(
            snapshot.validate(),
            Err(GraphError::DanglingEdge {
                edge: "edge_1".into(),
                node: "loc_9".into(),
            })
        );
    }

    #[test]
    fn test_orphan_and_duplicate_are_rejected() {
        let mut orphan = sample();
        orphan.nodes.remove(0);
        assert!(matches!(
            orphan.validate(),
            Err(GraphError::OrphanedSublocation { .. })
        ));

        let mut duplicate = sample();
        duplicate.nodes[2].id = "loc_1".into();
        assert_eq!(duplicate.validate(), Err(GraphError::DuplicateId("loc_1".into())));
    }
}

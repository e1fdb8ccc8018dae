//! Which edges may join which nodes.
//!
//! The gesture boundary only reports "request edge from A to B"; the edge
//! type follows from the endpoint types through [`CONNECTION_TABLE`]. Every
//! path that builds edges with a type guarantee (interactive `connect`, the
//! lorebook loader) goes through [`validate_connection`].

use crate::{EdgeType, GraphError, Node, NodeType};

/// `(source type, target type) -> edge type`. Pairs not listed are invalid.
pub const CONNECTION_TABLE: [(NodeType, NodeType, EdgeType); 4] = [
    (NodeType::Character, NodeType::Location, EdgeType::Spawn),
    (NodeType::Event, NodeType::Location, EdgeType::Spawn),
    (NodeType::Location, NodeType::Location, EdgeType::Adjacent),
    (NodeType::Character, NodeType::Character, EdgeType::Knows),
];

/// Look up the edge type joining two node types, if any.
pub fn connection_type(source: NodeType, target: NodeType) -> Option<EdgeType> {
    CONNECTION_TABLE
        .iter()
        .find(|(s, t, _)| *s == source && *t == target)
        .map(|(_, _, edge)| *edge)
}

/// Check that `requested` may join `source` to `target`.
pub fn validate_connection(
    source: &Node,
    target: &Node,
    requested: EdgeType,
) -> Result<(), GraphError> {
    if source.id == target.id {
        return Err(GraphError::SelfConnection(source.id.clone()));
    }

    let source_type = source.node_type();
    let target_type = target.node_type();
    if connection_type(source_type, target_type) != Some(requested) {
        return Err(GraphError::InvalidConnection {
            source_type,
            target_type,
            requested,
        });
    }

    if requested == EdgeType::Spawn && source.is_global_event() {
        return Err(GraphError::GlobalEventSpawn(source.id.clone()));
    }

    Ok(())
}

//! Error types for graph operations.

use thiserror::Error;

use crate::{EdgeType, ElementId, IdScope, NodeType};

/// Errors that can occur while mutating or loading a world graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("no element with id {0}")]
    UnknownElement(ElementId),

    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: ElementId, node: ElementId },

    #[error("{0} is not a location")]
    NotALocation(ElementId),

    #[error("sublocation {id} has no location parent {parent}")]
    OrphanedSublocation { id: ElementId, parent: ElementId },

    #[error("sublocations must be created under a parent location")]
    SublocationRequiresParent,

    #[error("{0} identifiers are exhausted")]
    IdsExhausted(IdScope),

    #[error("duplicate element id {0}")]
    DuplicateId(ElementId),

    #[error("cannot apply a {expected} patch to {id}")]
    PatchMismatch { id: ElementId, expected: &'static str },

    #[error("field `{field}` does not apply to {node_type} {id}")]
    InapplicableField {
        id: ElementId,
        node_type: NodeType,
        field: &'static str,
    },

    #[error("field `{field}` does not apply to {edge_type} edge {id}")]
    InapplicableEdgeField {
        id: ElementId,
        edge_type: EdgeType,
        field: &'static str,
    },

    #[error("cannot connect {source_type} to {target_type} with a {requested} edge")]
    InvalidConnection {
        source_type: NodeType,
        target_type: NodeType,
        requested: EdgeType,
    },

    #[error("{source_type} cannot be connected to {target_type}")]
    Unconnectable {
        source_type: NodeType,
        target_type: NodeType,
    },

    #[error("cannot connect {0} to itself")]
    SelfConnection(ElementId),

    #[error("global event {0} spawns anywhere and takes no spawn edges")]
    GlobalEventSpawn(ElementId),
}

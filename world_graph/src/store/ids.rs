//! Identity allocation for graph elements.

use crate::{ElementId, GraphError, IdKind, IdScope};

/// Hands out `{prefix}_{n}` identifiers from two counters: one for edges,
/// one shared by every node kind.
///
/// Each store owns its allocator, so two graphs never influence each other's
/// numbering. A counter that has handed out `u64::MAX` is spent; it never
/// wraps or repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_node: Option<u64>,
    next_edge: Option<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_node: Some(1),
            next_edge: Some(1),
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh identifier for `kind`.
    pub fn allocate(&mut self, kind: IdKind) -> Result<ElementId, GraphError> {
        let scope = kind.scope();
        let counter = match scope {
            IdScope::Node => &mut self.next_node,
            IdScope::Edge => &mut self.next_edge,
        };
        let n = counter.ok_or(GraphError::IdsExhausted(scope))?;
        *counter = n.checked_add(1);
        Ok(ElementId::new(kind, n))
    }

    /// The number the next allocation in `scope` will use, or `None` once
    /// the counter is spent.
    pub fn peek(&self, scope: IdScope) -> Option<u64> {
        match scope {
            IdScope::Node => self.next_node,
            IdScope::Edge => self.next_edge,
        }
    }

    /// Continue numbering one past the given maxima.
    pub fn reseed(&mut self, max_node: u64, max_edge: u64) {
        self.next_node = max_node.checked_add(1);
        self.next_edge = max_edge.checked_add(1);
    }

    /// Reseed from the identifiers already present in a graph.
    ///
    /// Identifiers without a numeric suffix cannot collide with allocated
    /// ones and are ignored.
    pub fn reseed_from<'a>(&mut self, ids: impl IntoIterator<Item = &'a ElementId>) {
        let mut max_node = 0;
        let mut max_edge = 0;
        for id in ids {
            let Some(n) = id.ordinal() else { continue };
            match id.scope() {
                IdScope::Node => max_node = max_node.max(n),
                IdScope::Edge => max_edge = max_edge.max(n),
            }
        }
        self.reseed(max_node, max_edge);
    }

    /// Start numbering from 1 again.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//! Compiler - derives lorebook entries from a world graph.
//!
//! Entries come out grouped (locations, then characters, then events), each
//! group in node insertion order. Relations between entries are expressed
//! through first keywords:
//! 1. **Locations**: `triggers` from adjacent locations, `subLocations` from children
//! 2. **Characters**: `canSpawnAt` from spawn edges, `triggers` and `knows` from knows edges
//! 3. **Events**: `canSpawnAt` from spawn edges, or `{"any": chance}` when global

mod images;

pub use images::*;

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use tracing::debug;
use world_graph::{EdgeKind, EdgeType, ElementId, GraphSnapshot, Node, NodeKind, NodeType};

use crate::schema::{Acquaintance, Category, LoreEntry, SubLocationEntry};

/// Key of the spawn table entry used by global events.
pub const ANY_LOCATION: &str = "any";

/// Compile a snapshot into lorebook entries.
pub fn compile(snapshot: &GraphSnapshot) -> Vec<LoreEntry> {
    Compiler::new(snapshot).compile()
}

/// Compiles one snapshot. Holds the id lookup shared by every entry.
pub struct Compiler<'a> {
    snapshot: &'a GraphSnapshot,
    nodes: HashMap<&'a ElementId, &'a Node>,
}

impl<'a> Compiler<'a> {
    pub fn new(snapshot: &'a GraphSnapshot) -> Self {
        let nodes = snapshot.nodes.iter().map(|node| (&node.id, node)).collect();
        Self { snapshot, nodes }
    }

    /// Produce every entry.
    pub fn compile(&self) -> Vec<LoreEntry> {
        let mut entries = Vec::new();
        entries.extend(
            self.snapshot
                .nodes_of(NodeType::Location)
                .map(|node| self.location(node)),
        );
        entries.extend(
            self.snapshot
                .nodes_of(NodeType::Character)
                .map(|node| self.character(node)),
        );
        entries.extend(
            self.snapshot
                .nodes_of(NodeType::Event)
                .map(|node| self.event(node)),
        );

        debug!(
            entries = entries.len(),
            nodes = self.snapshot.nodes.len(),
            edges = self.snapshot.edges.len(),
            "compiled lorebook"
        );
        entries
    }

    /// Build a location entry.
    pub fn location(&self, node: &Node) -> LoreEntry {
        let as_source = self
            .snapshot
            .edges_of(EdgeType::Adjacent)
            .filter(|edge| edge.source == node.id)
            .map(|edge| &edge.target);
        let as_target = self
            .snapshot
            .edges_of(EdgeType::Adjacent)
            .filter(|edge| edge.target == node.id)
            .map(|edge| &edge.source);
        let triggers = self.first_keywords(as_source.chain(as_target));

        let sub_locations: IndexMap<String, SubLocationEntry> = self
            .snapshot
            .nodes
            .iter()
            .filter(|sub| sub.parent() == Some(&node.id))
            .map(|sub| {
                let entry = SubLocationEntry {
                    images: clean_images(&sub.images),
                };
                (sub.name.clone(), entry)
            })
            .collect();

        let mut entry = self.base(node, Category::Location);
        entry.content_short = node.content_short.clone().unwrap_or_default();
        entry.triggers = triggers;
        entry.sub_locations = (!sub_locations.is_empty()).then_some(sub_locations);
        entry
    }

    /// Build a character entry.
    pub fn character(&self, node: &Node) -> LoreEntry {
        let mut triggers = Vec::new();
        let mut knows = IndexMap::new();

        for edge in self.snapshot.edges_of(EdgeType::Knows) {
            let EdgeKind::Knows {
                relationship,
                source_thinks,
                target_thinks,
            } = &edge.kind
            else {
                continue;
            };

            if edge.source == node.id {
                if let Some(keyword) = self.first_keyword(&edge.target) {
                    triggers.push(keyword);
                    knows.insert(keyword.to_string(), acquaintance(relationship, source_thinks));
                }
            }
            if edge.target == node.id {
                if let Some(keyword) = self.first_keyword(&edge.source) {
                    triggers.push(keyword);
                    knows.insert(keyword.to_string(), acquaintance(relationship, target_thinks));
                }
            }
        }

        let disabled_for = match &node.kind {
            NodeKind::Character { disabled_for } => disabled_for.clone(),
            _ => Vec::new(),
        };

        let mut entry = self.base(node, Category::Character);
        entry.content_short = node.content_short.clone().unwrap_or_default();
        entry.triggers = dedup(triggers);
        entry.can_spawn_at = Some(self.spawn_table(node));
        entry.disabled_for = Some(disabled_for);
        entry.knows = (!knows.is_empty()).then_some(knows);
        entry
    }

    /// Build an event entry.
    pub fn event(&self, node: &Node) -> LoreEntry {
        let (can_spawn_at, time_filter) = match &node.kind {
            NodeKind::Event {
                time_filter,
                is_global: true,
                global_spawn_chance,
            } => {
                let mut any = IndexMap::new();
                any.insert(ANY_LOCATION.to_string(), *global_spawn_chance);
                (any, time_filter.clone())
            }
            NodeKind::Event { time_filter, .. } => (self.spawn_table(node), time_filter.clone()),
            _ => (self.spawn_table(node), Vec::new()),
        };

        let mut entry = self.base(node, Category::Event);
        entry.can_spawn_at = Some(can_spawn_at);
        entry.time_filter = Some(time_filter);
        entry.disabled_for = Some(Vec::new());
        entry
    }

    /// Fields every category shares.
    fn base(&self, node: &Node, category: Category) -> LoreEntry {
        let mut entry = LoreEntry::new(category, node.name.clone());
        entry.keywords = node.keywords.clone();
        entry.content = node.content.clone();
        entry.images = clean_images(&node.images);
        entry.filters = node.filters.clone();
        entry
    }

    /// Spawn probabilities from the node's outgoing spawn edges. Parent
    /// probabilities are kept even when 0; sublocation overrides only when
    /// positive.
    fn spawn_table(&self, node: &Node) -> IndexMap<String, f64> {
        let mut table = IndexMap::new();
        let outgoing = self
            .snapshot
            .edges_of(EdgeType::Spawn)
            .filter(|edge| edge.source == node.id);

        for edge in outgoing {
            let EdgeKind::Spawn {
                probability,
                sublocation_probabilities,
            } = &edge.kind
            else {
                continue;
            };

            if let Some(keyword) = self.first_keyword(&edge.target) {
                table.insert(keyword.to_string(), *probability);
            }
            for (name, &chance) in sublocation_probabilities {
                if chance > 0.0 {
                    table.insert(name.clone(), chance);
                }
            }
        }
        table
    }

    fn first_keyword(&self, id: &ElementId) -> Option<&'a str> {
        self.nodes.get(id).copied().and_then(Node::first_keyword)
    }

    fn first_keywords<'b>(&self, ids: impl Iterator<Item = &'b ElementId>) -> Vec<String> {
        dedup(ids.filter_map(|id| self.first_keyword(id)).collect())
    }
}

fn acquaintance(relationship: &str, thoughts: &str) -> Acquaintance {
    Acquaintance {
        relationship: relationship.to_string(),
        thoughts: thoughts.to_string(),
    }
}

/// Remove repeats, keeping first occurrences in order.
fn dedup(keywords: Vec<&str>) -> Vec<String> {
    keywords
        .into_iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

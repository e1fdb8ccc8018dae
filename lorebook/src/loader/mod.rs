//! Loader - rebuilds a world graph from a lorebook document.
//!
//! The lorebook stores relations redundantly (triggers, spawn tables, knows
//! maps), so the graph's edges are re-derived from them in four passes:
//! 1. **Locations**: nodes, their sublocations, keyword and sublocation-name maps
//! 2. **Characters and events**: nodes plus spawn edges resolved from `canSpawnAt`
//! 3. **Adjacency**: location triggers that name another location
//! 4. **Relationships**: one knows edge per pair of acquainted characters
//!
//! Keys resolve case-insensitively. Anything that does not resolve is dropped
//! and recorded in the [`ImportReport`].

mod layout;
mod report;

pub use layout::*;
pub use report::*;

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use world_graph::{
    validate_connection, Edge, EdgeKind, ElementId, GraphError, GraphSettings, GraphSnapshot,
    IdAllocator, IdKind, Node, NodeKind, NodeType, Position,
};

use crate::compiler::ANY_LOCATION;
use crate::error::LoadError;
use crate::schema::{Category, LoreEntry, SCHEMA_VERSION};

/// Name given to events imported without one.
pub const UNNAMED_EVENT: &str = "Unnamed Event";

/// A rebuilt graph and what could not be carried over.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub snapshot: GraphSnapshot,
    pub report: ImportReport,
}

/// Load a JSON document with default settings.
pub fn load(document: Value) -> Result<ImportOutcome, LoadError> {
    Loader::default().load_value(document)
}

/// Imports lorebooks using a set of creation defaults and a layout grid.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    settings: GraphSettings,
    layout: LayoutSettings,
}

impl Loader {
    pub fn new(settings: GraphSettings, layout: LayoutSettings) -> Self {
        Self { settings, layout }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn layout(&self) -> &LayoutSettings {
        &self.layout
    }

    /// Parse and load a JSON document.
    pub fn load_str(&self, text: &str) -> Result<ImportOutcome, LoadError> {
        let document: Value = serde_json::from_str(text)?;
        self.load_value(document)
    }

    /// Load a bare entry array or a `{ "entries": [...] }` wrapper.
    pub fn load_value(&self, document: Value) -> Result<ImportOutcome, LoadError> {
        let parsed = read_entries(document)?;
        let entries: Vec<(usize, &LoreEntry)> = parsed
            .entries
            .iter()
            .map(|(index, entry)| (*index, entry))
            .collect();
        self.assemble(parsed.total, &entries, parsed.report)
    }

    /// Load already deserialized entries.
    pub fn load_entries(&self, entries: &[LoreEntry]) -> Result<ImportOutcome, LoadError> {
        let indexed: Vec<(usize, &LoreEntry)> = entries.iter().enumerate().collect();
        self.assemble(entries.len(), &indexed, ImportReport::default())
    }

    fn assemble(
        &self,
        total: usize,
        entries: &[(usize, &LoreEntry)],
        report: ImportReport,
    ) -> Result<ImportOutcome, LoadError> {
        let mut assembly = Assembly::new(&self.settings, report);

        for &(index, entry) in entries {
            if let Category::Other(category) = &entry.category {
                assembly.issue(ImportIssue::UnknownCategory {
                    index,
                    category: category.clone(),
                });
            }
        }

        let mut locations = Vec::new();
        for &(index, entry) in entries {
            if entry.category == Category::Location {
                let position = self.layout.grid_position(index, total);
                locations.push((assembly.location(entry, position)?, entry));
            }
        }

        let mut characters = Vec::new();
        for &(index, entry) in entries {
            let position = self.layout.grid_position(index, total);
            match entry.category {
                Category::Character => characters.push((assembly.character(entry, position)?, entry)),
                Category::Event => assembly.event(entry, position)?,
                _ => {}
            }
        }

        for (id, entry) in &locations {
            assembly.adjacency(id, entry)?;
        }

        assembly.relationships(&characters)?;

        let outcome = assembly.finish();
        debug!(
            entries = total,
            nodes = outcome.snapshot.nodes.len(),
            edges = outcome.snapshot.edges.len(),
            issues = outcome.report.len(),
            "loaded lorebook"
        );
        Ok(outcome)
    }
}

/// Entries read from a document, with their positions in it.
pub(crate) struct ParsedDocument {
    pub entries: Vec<(usize, LoreEntry)>,
    pub total: usize,
    pub report: ImportReport,
}

/// Unwrap the document shape and deserialize each entry on its own, so one
/// bad entry does not sink the rest.
pub(crate) fn read_entries(document: Value) -> Result<ParsedDocument, LoadError> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut wrapper) => {
            if let Some(version) = wrapper.get("schemaVersion").filter(|v| !v.is_null()) {
                if version.as_u64() != Some(SCHEMA_VERSION) {
                    return Err(LoadError::UnsupportedSchemaVersion {
                        found: version.to_string(),
                        expected: SCHEMA_VERSION,
                    });
                }
            }
            match wrapper.remove("entries") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(LoadError::InvalidDocument(
                        "object has no `entries` array".to_string(),
                    ))
                }
            }
        }
        other => {
            return Err(LoadError::InvalidDocument(format!(
                "expected an array of entries or an object, found {}",
                json_kind(&other)
            )))
        }
    };

    let total = items.len();
    let mut entries = Vec::with_capacity(total);
    let mut report = ImportReport::default();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<LoreEntry>(item) {
            Ok(entry) => entries.push((index, entry)),
            Err(err) => {
                let issue = ImportIssue::MalformedEntry {
                    index,
                    reason: err.to_string(),
                };
                warn!(%issue, "lorebook import issue");
                report.issues.push(issue);
            }
        }
    }

    Ok(ParsedDocument {
        entries,
        total,
        report,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Where a sublocation name points.
struct SublocationRef {
    id: ElementId,
    parent: ElementId,
    name: String,
}

/// Spawn target -> (parent probability, sublocation overrides).
type SpawnTargets = IndexMap<ElementId, (f64, IndexMap<String, f64>)>;

/// The graph under construction during one import.
struct Assembly<'s> {
    settings: &'s GraphSettings,
    ids: IdAllocator,
    nodes: Vec<Node>,
    index: HashMap<ElementId, usize>,
    edges: Vec<Edge>,
    report: ImportReport,

    /// Lowercased keyword -> location.
    locations: HashMap<String, ElementId>,
    /// Lowercased name -> sublocation.
    sublocations: HashMap<String, SublocationRef>,
    /// Lowercased keyword -> character.
    characters: HashMap<String, ElementId>,

    adjacent_pairs: HashSet<(ElementId, ElementId)>,
}

impl<'s> Assembly<'s> {
    fn new(settings: &'s GraphSettings, report: ImportReport) -> Self {
        Self {
            settings,
            ids: IdAllocator::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            report,
            locations: HashMap::new(),
            sublocations: HashMap::new(),
            characters: HashMap::new(),
            adjacent_pairs: HashSet::new(),
        }
    }

    fn finish(self) -> ImportOutcome {
        ImportOutcome {
            snapshot: GraphSnapshot {
                nodes: self.nodes,
                edges: self.edges,
            },
            report: self.report,
        }
    }

    fn issue(&mut self, issue: ImportIssue) {
        warn!(%issue, "lorebook import issue");
        self.report.issues.push(issue);
    }

    fn push_node(&mut self, node: Node) -> ElementId {
        let id = node.id.clone();
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// A node carrying the fields every category shares.
    fn node_from(
        &mut self,
        entry: &LoreEntry,
        name: String,
        kind: NodeKind,
        position: Position,
    ) -> Result<Node, GraphError> {
        let id = self.ids.allocate(IdKind::Node(kind.node_type()))?;
        let mut node = Node::new(id, name, kind)
            .with_keywords(entry.keywords.iter().cloned())
            .with_position(position);
        node.content = entry.content.clone();
        node.images = entry.images.clone();
        node.filters = entry.filters.clone();
        Ok(node)
    }

    fn claim_keywords(&mut self, scope: NodeType, keywords: &[String], id: &ElementId) {
        let map = match scope {
            NodeType::Character => &mut self.characters,
            _ => &mut self.locations,
        };

        let mut collisions = Vec::new();
        for keyword in keywords {
            match map.entry(keyword.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(id.clone());
                }
                Entry::Occupied(slot) if slot.get() != id => {
                    collisions.push(ImportIssue::KeywordCollision {
                        scope,
                        keyword: keyword.clone(),
                        kept: slot.get().clone(),
                        ignored: id.clone(),
                    });
                }
                Entry::Occupied(_) => {}
            }
        }

        for collision in collisions {
            self.issue(collision);
        }
    }

    fn location(&mut self, entry: &LoreEntry, position: Position) -> Result<ElementId, GraphError> {
        let mut node = self.node_from(entry, entry.name.clone(), NodeKind::Location, position)?;
        node.content_short = Some(entry.content_short.clone());
        let id = self.push_node(node);
        self.claim_keywords(NodeType::Location, &entry.keywords, &id);

        let Some(sub_locations) = &entry.sub_locations else {
            return Ok(id);
        };

        let count = sub_locations.len();
        for (j, (name, sub)) in sub_locations.iter().enumerate() {
            let sub_id = self.ids.allocate(IdKind::Node(NodeType::Sublocation))?;
            let mut node = Node::new(
                sub_id.clone(),
                name.clone(),
                NodeKind::Sublocation { parent: id.clone() },
            )
            .with_position(sublocation_position(position, j, count, self.settings));
            node.images = sub.images.clone();
            self.push_node(node);

            match self.sublocations.entry(name.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(SublocationRef {
                        id: sub_id,
                        parent: id.clone(),
                        name: name.clone(),
                    });
                }
                Entry::Occupied(slot) => {
                    let kept = slot.get().id.clone();
                    self.issue(ImportIssue::SublocationCollision {
                        name: name.clone(),
                        kept,
                        ignored: sub_id,
                    });
                }
            }
        }

        Ok(id)
    }

    fn character(&mut self, entry: &LoreEntry, position: Position) -> Result<ElementId, GraphError> {
        let kind = NodeKind::Character {
            disabled_for: entry.disabled_for.clone().unwrap_or_default(),
        };
        let mut node = self.node_from(entry, entry.name.clone(), kind, position)?;
        node.content_short = Some(entry.content_short.clone());
        let id = self.push_node(node);
        self.claim_keywords(NodeType::Character, &entry.keywords, &id);

        self.spawn_edges(&id, entry)?;
        Ok(id)
    }

    fn event(&mut self, entry: &LoreEntry, position: Position) -> Result<(), GraphError> {
        let global_chance = entry
            .can_spawn_at
            .as_ref()
            .and_then(|table| table.get(ANY_LOCATION).copied());

        let name = if entry.name.is_empty() {
            UNNAMED_EVENT.to_string()
        } else {
            entry.name.clone()
        };
        let kind = NodeKind::Event {
            time_filter: entry.time_filter.clone().unwrap_or_default(),
            is_global: global_chance.is_some(),
            global_spawn_chance: global_chance.unwrap_or(self.settings.default_global_spawn_chance),
        };
        let node = self.node_from(entry, name, kind, position)?;
        let id = self.push_node(node);

        if global_chance.is_none() {
            self.spawn_edges(&id, entry)?;
        }
        Ok(())
    }

    /// Group `canSpawnAt` keys by location and emit one spawn edge each.
    /// Location keywords win over sublocation names.
    fn spawn_edges(&mut self, source: &ElementId, entry: &LoreEntry) -> Result<(), GraphError> {
        let Some(table) = &entry.can_spawn_at else {
            return Ok(());
        };

        let mut targets = SpawnTargets::new();
        let mut unresolved = Vec::new();
        for (key, &probability) in table {
            let lowered = key.to_lowercase();
            if let Some(location) = self.locations.get(&lowered) {
                targets
                    .entry(location.clone())
                    .or_insert_with(|| (probability, IndexMap::new()))
                    .0 = probability;
            } else if let Some(sub) = self.sublocations.get(&lowered) {
                targets
                    .entry(sub.parent.clone())
                    .or_insert_with(|| (self.settings.default_spawn_probability, IndexMap::new()))
                    .1
                    .insert(sub.name.clone(), probability);
            } else {
                unresolved.push(key.clone());
            }
        }

        for key in unresolved {
            self.issue(ImportIssue::UnresolvedReference {
                entry: entry.name.clone(),
                field: "canSpawnAt",
                key,
            });
        }

        for (target, (probability, sublocation_probabilities)) in targets {
            let kind = EdgeKind::Spawn {
                probability,
                sublocation_probabilities,
            };
            self.link(source, &target, kind)?;
        }
        Ok(())
    }

    fn adjacency(&mut self, id: &ElementId, entry: &LoreEntry) -> Result<(), GraphError> {
        for trigger in &entry.triggers {
            let Some(target) = self.locations.get(&trigger.to_lowercase()).cloned() else {
                self.issue(ImportIssue::UnresolvedReference {
                    entry: entry.name.clone(),
                    field: "triggers",
                    key: trigger.clone(),
                });
                continue;
            };

            if &target != id && self.adjacent_pairs.insert(unordered(id, &target)) {
                self.link(id, &target, EdgeKind::Adjacent)?;
            }
        }
        Ok(())
    }

    /// One knows edge per pair. The character listed first is the source;
    /// the other side's thoughts come from its own `knows` entry, if any.
    fn relationships(&mut self, characters: &[(ElementId, &LoreEntry)]) -> Result<(), GraphError> {
        let mut linked = HashSet::new();

        for (id, entry) in characters {
            let Some(knows) = &entry.knows else { continue };

            for (key, acquaintance) in knows {
                let Some(other) = self.characters.get(&key.to_lowercase()).cloned() else {
                    self.issue(ImportIssue::UnresolvedReference {
                        entry: entry.name.clone(),
                        field: "knows",
                        key: key.clone(),
                    });
                    continue;
                };
                if &other == id || !linked.insert(unordered(id, &other)) {
                    continue;
                }

                let target_thinks = characters
                    .iter()
                    .find(|(candidate, _)| *candidate == other)
                    .and_then(|(_, other_entry)| self.thoughts_about(other_entry, id))
                    .unwrap_or_default();

                let kind = EdgeKind::Knows {
                    relationship: acquaintance.relationship.clone(),
                    source_thinks: acquaintance.thoughts.clone(),
                    target_thinks,
                };
                self.link(id, &other, kind)?;
            }
        }
        Ok(())
    }

    /// What `entry` says about the character `about`.
    fn thoughts_about(&self, entry: &LoreEntry, about: &ElementId) -> Option<String> {
        entry
            .knows
            .as_ref()?
            .iter()
            .find(|(key, _)| self.characters.get(&key.to_lowercase()) == Some(about))
            .map(|(_, acquaintance)| acquaintance.thoughts.clone())
    }

    /// Add an edge if the connection rules allow it.
    fn link(&mut self, source: &ElementId, target: &ElementId, kind: EdgeKind) -> Result<(), GraphError> {
        let (Some(&s), Some(&t)) = (self.index.get(source), self.index.get(target)) else {
            return Ok(());
        };

        match validate_connection(&self.nodes[s], &self.nodes[t], kind.edge_type()) {
            Ok(()) => {
                let id = self.ids.allocate(IdKind::Edge)?;
                self.edges
                    .push(Edge::new(id, source.clone(), target.clone(), kind));
            }
            Err(err) => self.issue(ImportIssue::rejected(source, target, err)),
        }
        Ok(())
    }
}

fn unordered(a: &ElementId, b: &ElementId) -> (ElementId, ElementId) {
    if a.as_str() <= b.as_str() {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

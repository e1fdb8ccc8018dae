//! Graph store - the mutable world graph and its lifecycle rules.
//!
//! Every mutating call validates first and writes second, so an observer
//! never sees a half-applied change (a node gone but its edges still there).

mod ids;
mod snapshot;

pub use ids::*;
pub use snapshot::*;

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::connection::{connection_type, validate_connection};
use crate::content;
use crate::{
    Edge, EdgeKind, EdgeType, ElementId, ElementPatch, GraphError, GraphSettings, IdKind, Node,
    NodeKind, NodeType, Position,
};

/// Borrowed view of a stored element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> &'a ElementId {
        match self {
            ElementRef::Node(node) => &node.id,
            ElementRef::Edge(edge) => &edge.id,
        }
    }
}

/// Which encoded text field to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Content,
    ContentShort,
}

/// Everything removed by one deletion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Removal {
    pub nodes: Vec<ElementId>,
    pub edges: Vec<ElementId>,
}

/// The world graph being authored.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<ElementId, Node>,
    edges: IndexMap<ElementId, Edge>,
    ids: IdAllocator,
    settings: GraphSettings,

    /// The element the editing surface is looking at. Stored as an id so
    /// reads always reflect the current stored value.
    selection: Option<ElementId>,
}

impl GraphStore {
    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with custom creation defaults.
    pub fn with_settings(settings: GraphSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Add a node of the given type with that type's default fields.
    ///
    /// Sublocations need a parent and go through [`GraphStore::add_sublocation`].
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        position: Option<Position>,
    ) -> Result<ElementId, GraphError> {
        let kind = match node_type {
            NodeType::Location => NodeKind::Location,
            NodeType::Character => NodeKind::Character {
                disabled_for: Vec::new(),
            },
            NodeType::Event => NodeKind::Event {
                time_filter: Vec::new(),
                is_global: false,
                global_spawn_chance: self.settings.default_global_spawn_chance,
            },
            NodeType::Sublocation => return Err(GraphError::SublocationRequiresParent),
        };

        let position = position.unwrap_or_else(|| self.next_free_position());
        let id = self.ids.allocate(IdKind::Node(node_type))?;
        let node = Node::new(id.clone(), node_type.default_name(), kind).with_position(position);
        self.nodes.insert(id.clone(), node);

        debug!(%id, %node_type, "added node");
        Ok(id)
    }

    /// Add a sublocation under an existing location, placed just below the
    /// parent and one step right of its rightmost sibling.
    pub fn add_sublocation(
        &mut self,
        parent_id: &ElementId,
        name: impl Into<String>,
    ) -> Result<ElementId, GraphError> {
        let parent = self
            .nodes
            .get(parent_id)
            .ok_or_else(|| GraphError::UnknownElement(parent_id.clone()))?;
        if parent.node_type() != NodeType::Location {
            return Err(GraphError::NotALocation(parent_id.clone()));
        }

        let spacing = self.settings.sublocation_spacing;
        let dx = self
            .sublocations_of(parent_id)
            .map(|sibling| sibling.position.x - parent.position.x + spacing)
            .fold(0.0, f64::max);
        let position = parent.position.offset(dx, self.settings.sublocation_drop);

        let mut name = name.into();
        if name.is_empty() {
            name = NodeType::Sublocation.default_name().to_string();
        }

        let id = self.ids.allocate(IdKind::Node(NodeType::Sublocation))?;
        let node = Node::new(
            id.clone(),
            name,
            NodeKind::Sublocation {
                parent: parent_id.clone(),
            },
        )
        .with_position(position);
        self.nodes.insert(id.clone(), node);

        debug!(%id, parent = %parent_id, "added sublocation");
        Ok(id)
    }

    /// Add an edge between two existing nodes.
    ///
    /// Endpoint types are not checked here; callers that need the type
    /// guarantee use [`GraphStore::connect`].
    pub fn add_edge(
        &mut self,
        source: &ElementId,
        target: &ElementId,
        kind: EdgeKind,
    ) -> Result<ElementId, GraphError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::UnknownElement(endpoint.clone()));
            }
        }

        let id = self.ids.allocate(IdKind::Edge)?;
        let edge = Edge::new(id.clone(), source.clone(), target.clone(), kind);
        debug!(%id, %source, %target, edge_type = %edge.edge_type(), "added edge");
        self.edges.insert(id.clone(), edge);
        Ok(id)
    }

    /// Add an edge after checking it against the connection table.
    pub fn connect(
        &mut self,
        source: &ElementId,
        target: &ElementId,
        kind: EdgeKind,
    ) -> Result<ElementId, GraphError> {
        let source_node = self.require_node(source)?;
        let target_node = self.require_node(target)?;
        validate_connection(source_node, target_node, kind.edge_type())?;
        self.add_edge(source, target, kind)
    }

    /// Handle a "request edge from A to B" gesture: the edge type follows
    /// from the endpoint types and the payload starts from defaults.
    pub fn request_edge(
        &mut self,
        source: &ElementId,
        target: &ElementId,
    ) -> Result<ElementId, GraphError> {
        let source_type = self.require_node(source)?.node_type();
        let target_type = self.require_node(target)?.node_type();
        let edge_type = connection_type(source_type, target_type).ok_or(GraphError::Unconnectable {
            source_type,
            target_type,
        })?;

        let kind = match edge_type {
            EdgeType::Spawn => EdgeKind::spawn(self.settings.default_spawn_probability),
            EdgeType::Adjacent => EdgeKind::Adjacent,
            EdgeType::Knows => EdgeKind::knows(""),
        };
        self.connect(source, target, kind)
    }

    /// The edge type a "request edge from A to B" gesture would create, or
    /// `None` if the pair cannot be connected.
    pub fn edge_type_between(
        &self,
        source: &ElementId,
        target: &ElementId,
    ) -> Result<Option<EdgeType>, GraphError> {
        let source_node = self.require_node(source)?;
        let target_node = self.require_node(target)?;
        if source == target {
            return Ok(None);
        }
        Ok(connection_type(source_node.node_type(), target_node.node_type()))
    }

    /// Merge a partial update into a node or an edge.
    pub fn update_element(
        &mut self,
        id: &ElementId,
        patch: impl Into<ElementPatch>,
    ) -> Result<(), GraphError> {
        match patch.into() {
            ElementPatch::Node(patch) => {
                let Some(node) = self.nodes.get_mut(id) else {
                    return Err(self.missing(id, "node"));
                };
                patch.apply_to(node)?;
            }
            ElementPatch::Edge(patch) => {
                let Some(edge) = self.edges.get_mut(id) else {
                    return Err(self.missing(id, "edge"));
                };
                patch.apply_to(edge)?;
            }
        }
        debug!(%id, "updated element");
        Ok(())
    }

    /// Rename a node, re-keying its encoded content fields to the new name.
    pub fn rename_node(&mut self, id: &ElementId, name: impl Into<String>) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownElement(id.clone()))?;
        let name = name.into();
        let node_type = node.node_type();

        if !node.content.is_empty() {
            let body = content::decode(&node.content, &node.name, node_type);
            node.content = content::encode(&body, &name, node_type);
        }
        if let Some(short) = node.content_short.as_mut().filter(|short| !short.is_empty()) {
            let body = content::decode(short.as_str(), &node.name, node_type);
            *short = content::encode(&body, &name, node_type);
        }
        node.name = name;
        Ok(())
    }

    /// Store `body` in a content field, wrapped in the node's key.
    pub fn set_content_body(
        &mut self,
        id: &ElementId,
        field: ContentField,
        body: &str,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownElement(id.clone()))?;
        let node_type = node.node_type();
        let encoded = content::encode(body, &node.name, node_type);

        match (field, node_type) {
            (_, NodeType::Sublocation) | (ContentField::ContentShort, NodeType::Event) => {
                Err(GraphError::InapplicableField {
                    id: id.clone(),
                    node_type,
                    field: match field {
                        ContentField::Content => "content",
                        ContentField::ContentShort => "contentShort",
                    },
                })
            }
            (ContentField::Content, _) => {
                node.content = encoded;
                Ok(())
            }
            (ContentField::ContentShort, _) => {
                node.content_short = Some(encoded);
                Ok(())
            }
        }
    }

    /// The decoded body of a content field.
    pub fn content_body(&self, id: &ElementId, field: ContentField) -> Option<String> {
        let node = self.nodes.get(id)?;
        let raw = match field {
            ContentField::Content => node.content.as_str(),
            ContentField::ContentShort => node.content_short.as_deref()?,
        };
        Some(content::decode(raw, &node.name, node.node_type()))
    }

    /// Delete an element. A node takes its incident edges and, for a
    /// location, its sublocations (and their edges) with it.
    pub fn delete_element(&mut self, id: &ElementId) -> Result<Removal, GraphError> {
        let mut removal = Removal::default();

        if self.edges.shift_remove(id).is_some() {
            removal.edges.push(id.clone());
        } else if self.nodes.contains_key(id) {
            let doomed_nodes: HashSet<ElementId> = std::iter::once(id.clone())
                .chain(self.sublocations_of(id).map(|node| node.id.clone()))
                .collect();
            let doomed_edges: HashSet<ElementId> = self
                .edges
                .values()
                .filter(|edge| doomed_nodes.contains(&edge.source) || doomed_nodes.contains(&edge.target))
                .map(|edge| edge.id.clone())
                .collect();

            removal.nodes = self
                .nodes
                .keys()
                .filter(|key| doomed_nodes.contains(*key))
                .cloned()
                .collect();
            removal.edges = self
                .edges
                .keys()
                .filter(|key| doomed_edges.contains(*key))
                .cloned()
                .collect();

            self.nodes.retain(|key, _| !doomed_nodes.contains(key));
            self.edges.retain(|key, _| !doomed_edges.contains(key));
        } else {
            return Err(GraphError::UnknownElement(id.clone()));
        }

        if let Some(selected) = &self.selection {
            if removal.nodes.contains(selected) || removal.edges.contains(selected) {
                self.selection = None;
            }
        }

        debug!(
            %id,
            nodes = removal.nodes.len(),
            edges = removal.edges.len(),
            "deleted element"
        );
        Ok(removal)
    }

    /// Remove everything and restart numbering.
    pub fn clear_graph(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.ids.reset();
        self.selection = None;
        info!("cleared graph");
    }

    /// Replace the whole graph. Numbering continues past the highest ids in
    /// the snapshot. An invalid snapshot leaves the store unchanged.
    pub fn load_elements(&mut self, snapshot: GraphSnapshot) -> Result<(), GraphError> {
        snapshot.validate()?;

        self.ids.reseed_from(snapshot.ids());
        self.nodes = snapshot
            .nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        self.edges = snapshot
            .edges
            .into_iter()
            .map(|edge| (edge.id.clone(), edge))
            .collect();
        self.selection = None;

        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "loaded graph"
        );
        Ok(())
    }

    /// Copy the current graph value.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    /// Mark an element as the current selection.
    pub fn select(&mut self, id: &ElementId) -> Result<(), GraphError> {
        if self.element(id).is_none() {
            return Err(GraphError::UnknownElement(id.clone()));
        }
        self.selection = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The selected element as currently stored.
    pub fn selection(&self) -> Option<ElementRef<'_>> {
        self.selection.as_ref().and_then(|id| self.element(id))
    }

    pub fn element(&self, id: &ElementId) -> Option<ElementRef<'_>> {
        self.nodes
            .get(id)
            .map(ElementRef::Node)
            .or_else(|| self.edges.get(id).map(ElementRef::Edge))
    }

    pub fn node(&self, id: &ElementId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &ElementId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Sublocations whose parent is `parent`.
    pub fn sublocations_of<'a>(&'a self, parent: &'a ElementId) -> impl Iterator<Item = &'a Node> {
        self.nodes
            .values()
            .filter(move |node| node.parent() == Some(parent))
    }

    /// Edges with `node` as source or target.
    pub fn edges_touching<'a>(&'a self, node: &'a ElementId) -> impl Iterator<Item = &'a Edge> {
        self.edges.values().filter(move |edge| edge.touches(node))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    fn require_node(&self, id: &ElementId) -> Result<&Node, GraphError> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::UnknownElement(id.clone()))
    }

    fn missing(&self, id: &ElementId, expected: &'static str) -> GraphError {
        if self.element(id).is_some() {
            GraphError::PatchMismatch {
                id: id.clone(),
                expected,
            }
        } else {
            GraphError::UnknownElement(id.clone())
        }
    }

    fn next_free_position(&self) -> Position {
        let step = (self.nodes.len() % 10) as f64 * self.settings.node_stagger;
        self.settings.node_origin.offset(step, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EdgePatch, IdScope, NodePatch};

    fn named_location(store: &mut GraphStore, keyword: &str) -> ElementId {
        let id = store.add_node(NodeType::Location, None).unwrap();
        store
            .update_element(&id, NodePatch::new().with_name(keyword).with_keywords([keyword]))
            .unwrap();
        id
    }

    #[test]
    fn test_add_node_applies_type_defaults() {
        let mut store = GraphStore::new();
        let loc = store.add_node(NodeType::Location, Some(Position::new(10.0, 20.0))).unwrap();
        let event = store.add_node(NodeType::Event, None).unwrap();

        let loc_node = store.node(&loc).unwrap();
        assert_eq!(loc.as_str(), "loc_1");
        assert_eq!(loc_node.name, "New Location");
        assert_eq!(loc_node.content_short.as_deref(), Some(""));
        assert_eq!(loc_node.position, Position::new(10.0, 20.0));

        let event_node = store.node(&event).unwrap();
        assert_eq!(event.as_str(), "event_2");
        assert!(event_node.content_short.is_none());
        assert!(matches!(
            event_node.kind,
            NodeKind::Event { is_global: false, global_spawn_chance, .. } if global_spawn_chance == 0.1
        ));
    }

    #[test]
    fn test_add_node_rejects_bare_sublocation() {
        let mut store = GraphStore::new();
        assert_eq!(
            store.add_node(NodeType::Sublocation, None),
            Err(GraphError::SublocationRequiresParent)
        );
    }

    #[test]
    fn test_sublocations_are_placed_beside_siblings() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, Some(Position::new(100.0, 100.0))).unwrap();

        let first = store.add_sublocation(&forest, "Clearing").unwrap();
        let second = store.add_sublocation(&forest, "").unwrap();

        assert_eq!(store.node(&first).unwrap().position, Position::new(100.0, 120.0));
        assert_eq!(store.node(&second).unwrap().position, Position::new(150.0, 120.0));
        assert_eq!(store.node(&second).unwrap().name, "New Sublocation");
        assert_eq!(store.sublocations_of(&forest).count(), 2);
    }

    #[test]
    fn test_new_sublocation_skips_past_remaining_siblings() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, Some(Position::new(100.0, 100.0))).unwrap();
        let first = store.add_sublocation(&forest, "Clearing").unwrap();
        let second = store.add_sublocation(&forest, "Thicket").unwrap();

        store.delete_element(&first).unwrap();
        let third = store.add_sublocation(&forest, "Glade").unwrap();

        assert_eq!(store.node(&second).unwrap().position, Position::new(150.0, 120.0));
        assert_eq!(store.node(&third).unwrap().position, Position::new(200.0, 120.0));
    }

    #[test]
    fn test_sublocation_parent_must_be_location() {
        let mut store = GraphStore::new();
        let bob = store.add_node(NodeType::Character, None).unwrap();
        assert_eq!(
            store.add_sublocation(&bob, "Pocket"),
            Err(GraphError::NotALocation(bob.clone()))
        );
        assert_eq!(
            store.add_sublocation(&"loc_99".into(), "Nowhere"),
            Err(GraphError::UnknownElement("loc_99".into()))
        );
    }

    #[test]
    fn test_add_edge_requires_existing_endpoints() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, None).unwrap();
        let err = store
            .add_edge(&forest, &"loc_42".into(), EdgeKind::Adjacent)
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownElement("loc_42".into()));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_connect_checks_table() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, None).unwrap();
        let bob = store.add_node(NodeType::Character, None).unwrap();

        assert_eq!(store.edge_type_between(&bob, &forest), Ok(Some(EdgeType::Spawn)));
        assert_eq!(store.edge_type_between(&forest, &bob), Ok(None));

        let edge = store.connect(&bob, &forest, EdgeKind::spawn(0.3)).unwrap();
        assert_eq!(edge.as_str(), "edge_1");

        assert!(matches!(
            store.connect(&forest, &bob, EdgeKind::spawn(0.3)),
            Err(GraphError::InvalidConnection { .. })
        ));
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_request_edge_picks_type_and_defaults() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, None).unwrap();
        let storm = store.add_node(NodeType::Event, None).unwrap();
        let alice = store.add_node(NodeType::Character, None).unwrap();
        let bob = store.add_node(NodeType::Character, None).unwrap();

        let spawn = store.request_edge(&storm, &forest).unwrap();
        let knows = store.request_edge(&alice, &bob).unwrap();

        assert_eq!(store.edge(&spawn).unwrap().kind, EdgeKind::spawn(0.1));
        assert_eq!(store.edge(&knows).unwrap().kind, EdgeKind::knows(""));
        assert_eq!(
            store.request_edge(&forest, &alice),
            Err(GraphError::Unconnectable {
                source_type: NodeType::Location,
                target_type: NodeType::Character,
            })
        );
        assert_eq!(
            store.request_edge(&bob, &bob),
            Err(GraphError::SelfConnection(bob.clone()))
        );
    }

    #[test]
    fn test_update_element_rejects_wrong_patch_kind() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, None).unwrap();
        let cave = store.add_node(NodeType::Location, None).unwrap();
        let edge = store.add_edge(&forest, &cave, EdgeKind::Adjacent).unwrap();

        assert_eq!(
            store.update_element(&edge, NodePatch::new().with_name("x")),
            Err(GraphError::PatchMismatch {
                id: edge.clone(),
                expected: "node",
            })
        );
        assert_eq!(
            store.update_element(&forest, EdgePatch::new().with_probability(0.5)),
            Err(GraphError::PatchMismatch {
                id: forest.clone(),
                expected: "edge",
            })
        );
    }

    #[test]
    fn test_selection_follows_updates() {
        let mut store = GraphStore::new();
        let bob = store.add_node(NodeType::Character, None).unwrap();
        store.select(&bob).unwrap();

        store
            .update_element(&bob, NodePatch::new().with_name("Bob"))
            .unwrap();

        assert_eq!(store.selection().map(|element| element.id()), Some(&bob));
        match store.selection() {
            Some(ElementRef::Node(node)) => assert_eq!(node.name, "Bob"),
            other => panic!("unexpected selection {:?}", other),
        }
    }

    #[test]
    fn test_delete_location_cascades() {
        let mut store = GraphStore::new();
        let forest = named_location(&mut store, "forest");
        let cave = named_location(&mut store, "cave");
        let clearing = store.add_sublocation(&forest, "Clearing").unwrap();
        let bob = store.add_node(NodeType::Character, None).unwrap();

        let adjacent = store.connect(&forest, &cave, EdgeKind::Adjacent).unwrap();
        let spawn = store.connect(&bob, &forest, EdgeKind::spawn(0.3)).unwrap();
        let unrelated = store.connect(&bob, &cave, EdgeKind::spawn(0.2)).unwrap();
        store.select(&clearing).unwrap();

        let removal = store.delete_element(&forest).unwrap();

        assert_eq!(removal.nodes, vec![forest.clone(), clearing.clone()]);
        assert_eq!(removal.edges, vec![adjacent, spawn]);
        assert!(store.node(&clearing).is_none());
        assert!(store.edge(&unrelated).is_some());
        assert_eq!(store.edges_touching(&bob).count(), 1);
        assert!(store.selection().is_none());
        assert!(store.snapshot().validate().is_ok());
    }

    #[test]
    fn test_delete_sublocation_drops_its_stray_edges() {
        let mut store = GraphStore::new();
        let forest = store.add_node(NodeType::Location, None).unwrap();
        let clearing = store.add_sublocation(&forest, "Clearing").unwrap();
        let bob = store.add_node(NodeType::Character, None).unwrap();
        // add_edge does not enforce types, so this edge can exist.
        store.add_edge(&bob, &clearing, EdgeKind::spawn(0.5)).unwrap();

        store.delete_element(&forest).unwrap();

        assert_eq!(store.edge_count(), 0);
        assert!(store.snapshot().validate().is_ok());
    }

    #[test]
    fn test_delete_edge_only() {
        let mut store = GraphStore::new();
        let a = store.add_node(NodeType::Location, None).unwrap();
        let b = store.add_node(NodeType::Location, None).unwrap();
        let edge = store.add_edge(&a, &b, EdgeKind::Adjacent).unwrap();

        let removal = store.delete_element(&edge).unwrap();
        assert_eq!(removal.edges, vec![edge]);
        assert!(removal.nodes.is_empty());
        assert_eq!(store.node_count(), 2);

        assert!(matches!(
            store.delete_element(&"edge_1".into()),
            Err(GraphError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = GraphStore::new();
        let first = store.add_node(NodeType::Location, None).unwrap();
        store.delete_element(&first).unwrap();
        let second = store.add_node(NodeType::Location, None).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.as_str(), "loc_2");
    }

    #[test]
    fn test_clear_resets_numbering() {
        let mut store = GraphStore::new();
        store.add_node(NodeType::Location, None).unwrap();
        store.add_node(NodeType::Character, None).unwrap();
        store.clear_graph();

        assert!(store.is_empty());
        assert_eq!(store.add_node(NodeType::Location, None).unwrap().as_str(), "loc_1");
    }

    #[test]
    fn test_load_elements_reseeds_counters() {
        let mut source = GraphStore::new();
        for _ in 0..3 {
            source.add_node(NodeType::Location, None).unwrap();
        }
        let a: ElementId = "loc_1".into();
        let c: ElementId = "loc_3".into();
        source.add_edge(&a, &c, EdgeKind::Adjacent).unwrap();

        let mut store = GraphStore::new();
        store.load_elements(source.snapshot()).unwrap();

        assert_eq!(store.add_node(NodeType::Character, None).unwrap().as_str(), "char_4");
        assert_eq!(store.add_edge(&a, &c, EdgeKind::Adjacent).unwrap().as_str(), "edge_2");
    }

    #[test]
    fn test_spent_counter_never_overwrites_nodes() {
        let far = ElementId::from(format!("loc_{}", u64::MAX));
        let mut snapshot = GraphSnapshot::new();
        snapshot
            .nodes
            .push(Node::new(far.clone(), "Far Shore", NodeKind::Location));

        let mut store = GraphStore::new();
        store.load_elements(snapshot).unwrap();

        assert_eq!(
            store.add_node(NodeType::Character, None),
            Err(GraphError::IdsExhausted(IdScope::Node))
        );
        assert_eq!(
            store.add_sublocation(&far, "Dock"),
            Err(GraphError::IdsExhausted(IdScope::Node))
        );
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.node(&far).unwrap().name, "Far Shore");
    }

    #[test]
    fn test_load_elements_failure_leaves_store_untouched() {
        let mut store = GraphStore::new();
        let kept = store.add_node(NodeType::Location, None).unwrap();

        let mut broken = GraphSnapshot::new();
        broken.edges.push(Edge::new(
            "edge_1".into(),
            "loc_7".into(),
            "loc_8".into(),
            EdgeKind::Adjacent,
        ));

        assert!(store.load_elements(broken).is_err());
        assert!(store.node(&kept).is_some());
        assert_eq!(store.add_node(NodeType::Location, None).unwrap().as_str(), "loc_2");
    }

    #[test]
    fn test_content_body_round_trip_and_rename() {
        let mut store = GraphStore::new();
        let bob = store.add_node(NodeType::Character, None).unwrap();
        store.rename_node(&bob, "Bob").unwrap();
        store
            .set_content_body(&bob, ContentField::Content, "He is tall")
            .unwrap();
        store
            .set_content_body(&bob, ContentField::ContentShort, "Tall")
            .unwrap();

        assert_eq!(store.node(&bob).unwrap().content, "\nBob=[He is tall]");

        store.rename_node(&bob, "Robert").unwrap();
        let node = store.node(&bob).unwrap();
        assert_eq!(node.content, "\nRobert=[He is tall]");
        assert_eq!(node.content_short.as_deref(), Some("\nRobert=[Tall]"));
        assert_eq!(
            store.content_body(&bob, ContentField::Content).as_deref(),
            Some("He is tall")
        );
    }

    #[test]
    fn test_content_short_rejected_for_events() {
        let mut store = GraphStore::new();
        let storm = store.add_node(NodeType::Event, None).unwrap();
        assert!(matches!(
            store.set_content_body(&storm, ContentField::ContentShort, "x"),
            Err(GraphError::InapplicableField { field: "contentShort", .. })
        ));
        store
            .set_content_body(&storm, ContentField::Content, "Thunder")
            .unwrap();
        assert_eq!(store.node(&storm).unwrap().content, "\nCurrent event=[Thunder]");
    }
}

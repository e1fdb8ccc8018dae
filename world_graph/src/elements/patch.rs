//! Partial updates merged into stored elements.

use indexmap::IndexMap;

use super::{Edge, EdgeKind, Filters, Images, Node, NodeKind, NodeType, Position};
use crate::GraphError;

/// A partial update for either kind of element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPatch {
    Node(NodePatch),
    Edge(EdgePatch),
}

impl From<NodePatch> for ElementPatch {
    fn from(patch: NodePatch) -> Self {
        ElementPatch::Node(patch)
    }
}

impl From<EdgePatch> for ElementPatch {
    fn from(patch: EdgePatch) -> Self {
        ElementPatch::Edge(patch)
    }
}

/// Shallow field merge for a node. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodePatch {
    pub name: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub content: Option<String>,
    pub content_short: Option<String>,
    pub images: Option<Images>,
    pub filters: Option<Filters>,
    pub position: Option<Position>,
    pub disabled_for: Option<Vec<String>>,
    pub time_filter: Option<Vec<String>>,
    pub is_global: Option<bool>,
    pub global_spawn_chance: Option<f64>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_content_short(mut self, content_short: impl Into<String>) -> Self {
        self.content_short = Some(content_short.into());
        self
    }

    pub fn with_images(mut self, images: Images) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_disabled_for(mut self, disabled_for: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.disabled_for = Some(disabled_for.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_time_filter(mut self, time_filter: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.time_filter = Some(time_filter.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_global(mut self, is_global: bool) -> Self {
        self.is_global = Some(is_global);
        self
    }

    pub fn with_global_spawn_chance(mut self, chance: f64) -> Self {
        self.global_spawn_chance = Some(chance);
        self
    }

    /// Reject fields that the node's type does not carry.
    fn check(&self, node: &Node) -> Result<(), GraphError> {
        let node_type = node.node_type();
        let inapplicable = |field| GraphError::InapplicableField {
            id: node.id.clone(),
            node_type,
            field,
        };

        if node_type == NodeType::Sublocation {
            if self.keywords.is_some() {
                return Err(inapplicable("keywords"));
            }
            if self.content.is_some() {
                return Err(inapplicable("content"));
            }
            if self.filters.is_some() {
                return Err(inapplicable("filters"));
            }
        }
        if self.content_short.is_some()
            && matches!(node_type, NodeType::Event | NodeType::Sublocation)
        {
            return Err(inapplicable("contentShort"));
        }
        if self.disabled_for.is_some() && node_type != NodeType::Character {
            return Err(inapplicable("disabledFor"));
        }
        if node_type != NodeType::Event {
            if self.time_filter.is_some() {
                return Err(inapplicable("timeFilter"));
            }
            if self.is_global.is_some() {
                return Err(inapplicable("isGlobal"));
            }
            if self.global_spawn_chance.is_some() {
                return Err(inapplicable("globalSpawnChance"));
            }
        }
        Ok(())
    }

    /// Merge into `node`. Nothing is written unless every field applies.
    pub fn apply_to(self, node: &mut Node) -> Result<(), GraphError> {
        self.check(node)?;

        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(keywords) = self.keywords {
            node.keywords = keywords;
        }
        if let Some(content) = self.content {
            node.content = content;
        }
        if let Some(content_short) = self.content_short {
            node.content_short = Some(content_short);
        }
        if let Some(images) = self.images {
            node.images = images;
        }
        if let Some(filters) = self.filters {
            node.filters = filters;
        }
        if let Some(position) = self.position {
            node.position = position;
        }

        match &mut node.kind {
            NodeKind::Character { disabled_for } => {
                if let Some(value) = self.disabled_for {
                    *disabled_for = value;
                }
            }
            NodeKind::Event {
                time_filter,
                is_global,
                global_spawn_chance,
            } => {
                if let Some(value) = self.time_filter {
                    *time_filter = value;
                }
                if let Some(value) = self.is_global {
                    *is_global = value;
                }
                if let Some(value) = self.global_spawn_chance {
                    *global_spawn_chance = value;
                }
            }
            NodeKind::Location | NodeKind::Sublocation { .. } => {}
        }

        Ok(())
    }
}

/// Shallow field merge for an edge payload. Endpoints are immutable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgePatch {
    pub probability: Option<f64>,
    /// Replaces the whole override map.
    pub sublocation_probabilities: Option<IndexMap<String, f64>>,
    pub relationship: Option<String>,
    pub source_thinks: Option<String>,
    pub target_thinks: Option<String>,
}

impl EdgePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    pub fn with_sublocation_probabilities(
        mut self,
        overrides: impl IntoIterator<Item = (impl Into<String>, f64)>,
    ) -> Self {
        self.sublocation_probabilities = Some(
            overrides
                .into_iter()
                .map(|(name, probability)| (name.into(), probability))
                .collect(),
        );
        self
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn with_source_thinks(mut self, thoughts: impl Into<String>) -> Self {
        self.source_thinks = Some(thoughts.into());
        self
    }

    pub fn with_target_thinks(mut self, thoughts: impl Into<String>) -> Self {
        self.target_thinks = Some(thoughts.into());
        self
    }

    fn check(&self, edge: &Edge) -> Result<(), GraphError> {
        let inapplicable = |field| GraphError::InapplicableEdgeField {
            id: edge.id.clone(),
            edge_type: edge.edge_type(),
            field,
        };

        let spawn_fields = [
            (self.probability.is_some(), "probability"),
            (self.sublocation_probabilities.is_some(), "sublocationProbabilities"),
        ];
        let knows_fields = [
            (self.relationship.is_some(), "relationship"),
            (self.source_thinks.is_some(), "sourceThinks"),
            (self.target_thinks.is_some(), "targetThinks"),
        ];

        let foreign: &[(bool, &'static str)] = match edge.kind {
            EdgeKind::Spawn { .. } => &knows_fields,
            EdgeKind::Knows { .. } => &spawn_fields,
            EdgeKind::Adjacent => {
                if let Some((_, field)) = spawn_fields.iter().find(|(set, _)| *set) {
                    return Err(inapplicable(*field));
                }
                &knows_fields
            }
        };
        match foreign.iter().find(|(set, _)| *set) {
            Some((_, field)) => Err(inapplicable(*field)),
            None => Ok(()),
        }
    }

    /// Merge into `edge`. Nothing is written unless every field applies.
    pub fn apply_to(self, edge: &mut Edge) -> Result<(), GraphError> {
        self.check(edge)?;

        match &mut edge.kind {
            EdgeKind::Spawn {
                probability,
                sublocation_probabilities,
            } => {
                if let Some(value) = self.probability {
                    *probability = value;
                }
                if let Some(value) = self.sublocation_probabilities {
                    *sublocation_probabilities = value;
                }
            }
            EdgeKind::Knows {
                relationship,
                source_thinks,
                target_thinks,
            } => {
                if let Some(value) = self.relationship {
                    *relationship = value;
                }
                if let Some(value) = self.source_thinks {
                    *source_thinks = value;
                }
                if let Some(value) = self.target_thinks {
                    *target_thinks = value;
                }
            }
            EdgeKind::Adjacent => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementId;

    fn event() -> Node {
        Node::new(
            ElementId::from("event_1"),
            "Festival",
            NodeKind::Event {
                time_filter: Vec::new(),
                is_global: false,
                global_spawn_chance: 0.1,
            },
        )
    }

    #[test]
    fn test_node_patch_merges_fields() {
        let mut node = event();
        NodePatch::new()
            .with_name("Harvest Festival")
            .with_global(true)
            .with_global_spawn_chance(0.4)
            .apply_to(&mut node)
            .unwrap();

        assert_eq!(node.name, "Harvest Festival");
        assert!(node.is_global_event());
        assert!(matches!(
            node.kind,
            NodeKind::Event { global_spawn_chance, .. } if global_spawn_chance == 0.4
        ));
    }

    #[test]
    fn test_node_patch_rejects_foreign_field_atomically() {
        let mut node = event();
        let err = NodePatch::new()
            .with_name("Renamed")
            .with_content_short("nope")
            .apply_to(&mut node)
            .unwrap_err();

        assert!(matches!(err, GraphError::InapplicableField { field: "contentShort", .. }));
        assert_eq!(node.name, "Festival");
    }

    #[test]
    fn test_edge_patch_updates_spawn_overrides() {
        let mut edge = Edge::new("edge_1".into(), "char_1".into(), "loc_2".into(), EdgeKind::spawn(0.1));
        EdgePatch::new()
            .with_probability(0.3)
            .with_sublocation_probabilities([("Clearing", 0.6), ("Cellar", 0.0)])
            .apply_to(&mut edge)
            .unwrap();

        match edge.kind {
            EdgeKind::Spawn {
                probability,
                sublocation_probabilities,
            } => {
                assert_eq!(probability, 0.3);
                assert_eq!(sublocation_probabilities.len(), 2);
                assert_eq!(sublocation_probabilities["Cellar"], 0.0);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_edge_patch_rejects_payload_of_other_type() {
        let mut edge = Edge::new("edge_1".into(), "loc_1".into(), "loc_2".into(), EdgeKind::Adjacent);
        let err = EdgePatch::new().with_relationship("friends").apply_to(&mut edge).unwrap_err();
        assert!(matches!(err, GraphError::InapplicableEdgeField { field: "relationship", .. }));

        let err = EdgePatch::new().with_probability(0.2).apply_to(&mut edge).unwrap_err();
        assert!(matches!(err, GraphError::InapplicableEdgeField { field: "probability", .. }));
    }
}

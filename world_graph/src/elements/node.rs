//! Node definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ElementId, NodeType, Position};

/// One or more image URLs stored under a time/context key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageUrls {
    One(String),
    Many(Vec<String>),
}

impl ImageUrls {
    /// Iterate over the stored URLs regardless of shape.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let urls: &[String] = match self {
            ImageUrls::One(url) => std::slice::from_ref(url),
            ImageUrls::Many(urls) => urls,
        };
        urls.iter().map(String::as_str)
    }
}

/// Image key (e.g. "day", "night") -> URLs.
pub type Images = IndexMap<String, ImageUrls>;

/// Activation filters interpreted by the narrative runtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_any: Vec<String>,

    /// Filter keys this crate does not interpret, kept verbatim.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Filters {
    pub fn requiring_any(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            requires_any: tags.into_iter().map(Into::into).collect(),
            other: serde_json::Map::new(),
        }
    }
}

/// Type-specific node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    Location,
    Character {
        #[serde(default)]
        disabled_for: Vec<String>,
    },
    Event {
        #[serde(default)]
        time_filter: Vec<String>,
        #[serde(default)]
        is_global: bool,
        #[serde(default)]
        global_spawn_chance: f64,
    },
    Sublocation {
        parent: ElementId,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Location => NodeType::Location,
            NodeKind::Character { .. } => NodeType::Character,
            NodeKind::Event { .. } => NodeType::Event,
            NodeKind::Sublocation { .. } => NodeType::Sublocation,
        }
    }
}

/// A node of the world graph.
///
/// Sublocations only use `name`, `images` and `position`; their remaining
/// common fields stay empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: ElementId,
    pub name: String,

    /// Ordered keywords; the first one is the node's linkage key.
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub content: String,

    /// Absent for events and sublocations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_short: Option<String>,

    #[serde(default)]
    pub images: Images,

    #[serde(default)]
    pub filters: Filters,

    #[serde(default)]
    pub position: Position,

    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Create a node with empty common fields.
    pub fn new(id: ElementId, name: impl Into<String>, kind: NodeKind) -> Self {
        let content_short = match kind {
            NodeKind::Location | NodeKind::Character { .. } => Some(String::new()),
            NodeKind::Event { .. } | NodeKind::Sublocation { .. } => None,
        };
        Self {
            id,
            name: name.into(),
            keywords: Vec::new(),
            content: String::new(),
            content_short,
            images: Images::new(),
            filters: Filters::default(),
            position: Position::default(),
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// The node's externally visible linkage key.
    pub fn first_keyword(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }

    /// Parent location, for sublocations.
    pub fn parent(&self) -> Option<&ElementId> {
        match &self.kind {
            NodeKind::Sublocation { parent } => Some(parent),
            _ => None,
        }
    }

    /// Whether this is an event flagged to spawn anywhere.
    pub fn is_global_event(&self) -> bool {
        matches!(self.kind, NodeKind::Event { is_global: true, .. })
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_serializes_with_type_tag() {
        let node = Node::new(
            ElementId::from("char_1"),
            "Bob",
            NodeKind::Character {
                disabled_for: vec!["night".to_string()],
            },
        )
        .with_keywords(["bob"]);

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "character");
        assert_eq!(value["disabledFor"], json!(["night"]));
        assert_eq!(value["contentShort"], "");
        assert_eq!(value["keywords"], json!(["bob"]));
    }

    #[test]
    fn test_event_node_round_trips() {
        let raw = json!({
            "id": "event_4",
            "type": "event",
            "name": "Storm",
            "keywords": ["storm"],
            "timeFilter": ["night"],
            "isGlobal": true,
            "globalSpawnChance": 0.25,
            "filters": { "requiresAny": ["rain"], "mood": "grim" }
        });

        let node: Node = serde_json::from_value(raw).unwrap();
        assert!(node.is_global_event());
        assert!(node.content_short.is_none());
        assert_eq!(node.filters.requires_any, vec!["rain"]);
        assert_eq!(node.filters.other["mood"], "grim");

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["globalSpawnChance"], 0.25);
        assert!(back.get("contentShort").is_none());
    }

    #[test]
    fn test_sublocation_parent() {
        let node = Node::new(
            ElementId::from("subloc_2"),
            "Clearing",
            NodeKind::Sublocation {
                parent: ElementId::from("loc_1"),
            },
        );
        assert_eq!(node.parent(), Some(&ElementId::from("loc_1")));
        assert_eq!(node.first_keyword(), None);
    }

    #[test]
    fn test_filters_requiring_any() {
        let filters = Filters::requiring_any(["day", "rain"]);
        assert_eq!(serde_json::to_value(&filters).unwrap(), json!({ "requiresAny": ["day", "rain"] }));
        assert_eq!(serde_json::to_value(Filters::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_image_urls_accept_both_shapes() {
        let images: Images =
            serde_json::from_value(json!({ "day": "a.png", "night": ["b.png", "c.png"] })).unwrap();
        assert_eq!(images["day"].iter().collect::<Vec<_>>(), vec!["a.png"]);
        assert_eq!(images["night"].iter().count(), 2);
    }
}

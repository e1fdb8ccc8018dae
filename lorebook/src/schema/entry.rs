//! A single lorebook entry.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use world_graph::{Filters, Images, NodeType};

/// Entry category. Anything unrecognized is kept so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Location,
    Character,
    Event,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Location => "location",
            Category::Character => "character",
            Category::Event => "event",
            Category::Other(other) => other,
        }
    }

    /// The node type an entry of this category becomes.
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            Category::Location => Some(NodeType::Location),
            Category::Character => Some(NodeType::Character),
            Category::Event => Some(NodeType::Event),
            Category::Other(_) => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "location" => Category::Location,
            "character" => Category::Character,
            "event" => Category::Event,
            _ => Category::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one character knows about another.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Acquaintance {
    pub relationship: String,
    pub thoughts: String,
}

/// A sublocation as listed under its parent location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubLocationEntry {
    pub images: Images,
}

/// One entry of a lorebook.
///
/// Fields that only some categories carry are optional; the compiler sets
/// exactly the ones its category uses, and the loader tolerates any of them
/// being missing or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoreEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content_short: String,

    /// First keywords of related entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub triggers: Vec<String>,

    /// Location keyword or sublocation name -> spawn probability. Events may
    /// use the single key `"any"` to spawn everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_spawn_at: Option<IndexMap<String, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_filter: Option<Vec<String>>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Images,

    #[serde(default, deserialize_with = "null_as_default")]
    pub filters: Filters,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_for: Option<Vec<String>>,

    #[serde(default = "enabled_by_default", deserialize_with = "null_as_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_locations: Option<IndexMap<String, SubLocationEntry>>,

    /// Other character's first keyword -> what this character knows of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knows: Option<IndexMap<String, Acquaintance>>,
}

fn enabled_by_default() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(enabled_by_default))
}

impl LoreEntry {
    /// An empty, enabled entry of the given category.
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            keywords: Vec::new(),
            category,
            name: name.into(),
            content: String::new(),
            content_short: String::new(),
            triggers: Vec::new(),
            can_spawn_at: None,
            time_filter: None,
            images: Images::new(),
            filters: Filters::default(),
            disabled_for: None,
            enabled: true,
            sub_locations: None,
            knows: None,
        }
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_triggers(mut self, triggers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_spawn(mut self, key: impl Into<String>, probability: f64) -> Self {
        self.can_spawn_at
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), probability);
        self
    }

    pub fn with_sub_location(mut self, name: impl Into<String>) -> Self {
        self.sub_locations
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), SubLocationEntry::default());
        self
    }

    pub fn with_acquaintance(
        mut self,
        keyword: impl Into<String>,
        relationship: impl Into<String>,
        thoughts: impl Into<String>,
    ) -> Self {
        self.knows.get_or_insert_with(IndexMap::new).insert(
            keyword.into(),
            Acquaintance {
                relationship: relationship.into(),
                thoughts: thoughts.into(),
            },
        );
        self
    }

    /// The entry's linkage key.
    pub fn first_keyword(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }
}

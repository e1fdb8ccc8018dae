//! Configuration for graph defaults and import layout.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [graph]
//! default_spawn_probability = 0.25
//!
//! [layout]
//! column_spacing = 240.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use world_graph::GraphSettings;

use crate::error::ConfigError;
use crate::loader::{LayoutSettings, Loader};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LorebookConfig {
    pub graph: GraphSettings,
    pub layout: LayoutSettings,
}

impl LorebookConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// A loader using these settings.
    pub fn loader(&self) -> Loader {
        Loader::new(self.graph.clone(), self.layout.clone())
    }
}

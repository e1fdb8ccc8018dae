//! Error types for lorebook loading and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// A lorebook document that cannot be imported at all.
///
/// Problems with individual entries or references are not errors; they are
/// collected in the [`ImportReport`](crate::ImportReport).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("lorebook is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid lorebook document: {0}")]
    InvalidDocument(String),

    #[error("unsupported lorebook schema version {found} (expected {expected})")]
    UnsupportedSchemaVersion { found: String, expected: u64 },

    #[error("cannot build graph: {0}")]
    Graph(#[from] world_graph::GraphError),
}

/// Configuration that cannot be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

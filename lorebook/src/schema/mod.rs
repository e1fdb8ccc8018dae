//! The lorebook document consumed by the narrative runtime.
//!
//! A document is either a bare array of entries or the wrapper form
//! `{ "schemaVersion": 1, "entries": [...] }`.

mod entry;

pub use entry::*;

use serde::{Deserialize, Serialize};

/// The only wrapper version this crate reads and writes.
pub const SCHEMA_VERSION: u64 = 1;

/// The wrapper form of a lorebook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LorebookDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u64>,

    #[serde(default)]
    pub entries: Vec<LoreEntry>,
}

impl LorebookDocument {
    /// Wrap compiled entries, stamped with the current schema version.
    pub fn wrap(entries: Vec<LoreEntry>) -> Self {
        Self {
            schema_version: Some(SCHEMA_VERSION),
            entries,
        }
    }
}

//! Non-fatal findings collected while importing a lorebook.

use serde::Serialize;
use world_graph::{ElementId, GraphError, NodeType};

/// One thing the loader could not honour exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ImportIssue {
    /// A `canSpawnAt`, `triggers` or `knows` key matching nothing.
    UnresolvedReference {
        entry: String,
        field: &'static str,
        key: String,
    },

    /// Two nodes share a keyword after lowercasing; the first one keeps it.
    KeywordCollision {
        scope: NodeType,
        keyword: String,
        kept: ElementId,
        ignored: ElementId,
    },

    /// Two sublocations share a name after lowercasing; the first one keeps it.
    SublocationCollision {
        name: String,
        kept: ElementId,
        ignored: ElementId,
    },

    /// An entry whose category is not location, character or event.
    UnknownCategory { index: usize, category: String },

    /// An entry that is not a well-formed lorebook entry.
    MalformedEntry { index: usize, reason: String },

    /// An edge the connection rules refused.
    RejectedConnection {
        source: ElementId,
        target: ElementId,
        reason: String,
    },
}

impl ImportIssue {
    pub(crate) fn rejected(source: &ElementId, target: &ElementId, error: GraphError) -> Self {
        ImportIssue::RejectedConnection {
            source: source.clone(),
            target: target.clone(),
            reason: error.to_string(),
        }
    }
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportIssue::UnresolvedReference { entry, field, key } => {
                write!(f, "{}: {} key '{}' matches nothing", entry, field, key)
            }
            ImportIssue::KeywordCollision {
                scope,
                keyword,
                kept,
                ignored,
            } => write!(
                f,
                "{} keyword '{}' already belongs to {}; ignored for {}",
                scope, keyword, kept, ignored
            ),
            ImportIssue::SublocationCollision {
                name,
                kept,
                ignored,
            } => write!(
                f,
                "sublocation name '{}' already belongs to {}; ignored for {}",
                name, kept, ignored
            ),
            ImportIssue::UnknownCategory { index, category } => {
                write!(f, "entry {} skipped: unknown category '{}'", index, category)
            }
            ImportIssue::MalformedEntry { index, reason } => {
                write!(f, "entry {} skipped: {}", index, reason)
            }
            ImportIssue::RejectedConnection {
                source,
                target,
                reason,
            } => write!(f, "edge {} -> {} rejected: {}", source, target, reason),
        }
    }
}

/// Everything noteworthy about one import, in the order it was found.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImportReport {
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &ImportIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, ImportIssue::UnresolvedReference { .. }))
    }

    pub fn collisions(&self) -> impl Iterator<Item = &ImportIssue> {
        self.issues.iter().filter(|issue| {
            matches!(
                issue,
                ImportIssue::KeywordCollision { .. } | ImportIssue::SublocationCollision { .. }
            )
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ImportIssue> {
        self.issues.iter().filter(|issue| {
            matches!(
                issue,
                ImportIssue::UnknownCategory { .. } | ImportIssue::MalformedEntry { .. }
            )
        })
    }

    /// One-line tally for command output.
    pub fn summary(&self) -> String {
        format!(
            "unresolved references: {}, collisions: {}, skipped entries: {}",
            self.unresolved().count(),
            self.collisions().count(),
            self.skipped().count()
        )
    }
}

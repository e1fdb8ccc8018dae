//! Round-trip verification: load a lorebook, compile it again, and compare
//! the fields that are derived from graph edges.
//!
//! Comparison ignores ordering. Rebuilt edges follow entry order, so derived
//! lists can come back permuted even when they carry the same relations.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::compiler::compile;
use crate::error::LoadError;
use crate::loader::{read_entries, ImportReport, Loader};
use crate::schema::{Category, LoreEntry};

/// A derived field that changed on the way through the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub category: Category,
    pub name: String,
    pub field: &'static str,
    pub expected: String,
    pub found: String,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}': {} expected {} but compiled to {}",
            self.category, self.name, self.field, self.expected, self.found
        )
    }
}

/// Result of a round-trip check.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckOutcome {
    pub mismatches: Vec<Mismatch>,
    pub report: ImportReport,
}

impl CheckOutcome {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Load `document`, compile the result, and compare `triggers`,
/// `canSpawnAt` and `subLocations` entry by entry.
///
/// Entries are paired by category and position within that category, which
/// is the order both directions preserve.
pub fn check_round_trip(loader: &Loader, document: Value) -> Result<CheckOutcome, LoadError> {
    let parsed = read_entries(document)?;
    let originals: Vec<LoreEntry> = parsed.entries.into_iter().map(|(_, entry)| entry).collect();

    let outcome = loader.load_entries(&originals)?;
    let mut report = parsed.report;
    report.issues.extend(outcome.report.issues);
    let compiled = compile(&outcome.snapshot);

    let mut mismatches = Vec::new();
    for category in [Category::Location, Category::Character, Category::Event] {
        let before = originals.iter().filter(|entry| entry.category == category);
        let after = compiled.iter().filter(|entry| entry.category == category);
        for (original, rebuilt) in before.zip(after) {
            compare(original, rebuilt, &mut mismatches);
        }
    }

    debug!(
        entries = originals.len(),
        mismatches = mismatches.len(),
        "checked lorebook round trip"
    );
    Ok(CheckOutcome { mismatches, report })
}

fn compare(original: &LoreEntry, rebuilt: &LoreEntry, mismatches: &mut Vec<Mismatch>) {
    let mut differs = |field: &'static str, expected: String, found: String| {
        if expected != found {
            mismatches.push(Mismatch {
                category: original.category.clone(),
                name: original.name.clone(),
                field,
                expected,
                found,
            });
        }
    };

    differs("triggers", as_set(&original.triggers), as_set(&rebuilt.triggers));

    if original.category != Category::Location {
        differs(
            "canSpawnAt",
            spawn_table(original.can_spawn_at.as_ref()),
            spawn_table(rebuilt.can_spawn_at.as_ref()),
        );
    }

    if original.category == Category::Location {
        let names = |entry: &LoreEntry| {
            entry
                .sub_locations
                .iter()
                .flat_map(|subs| subs.keys().cloned())
                .collect::<Vec<_>>()
        };
        differs("subLocations", as_set(&names(original)), as_set(&names(rebuilt)));
    }
}

fn as_set(items: &[String]) -> String {
    format!("{:?}", items.iter().collect::<BTreeSet<_>>())
}

fn spawn_table(table: Option<&IndexMap<String, f64>>) -> String {
    let sorted: Vec<(&String, &f64)> = table
        .map(|table| {
            let mut pairs: Vec<_> = table.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            pairs
        })
        .unwrap_or_default();
    format!("{:?}", sorted)
}

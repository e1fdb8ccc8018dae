//! Command implementations.

use anyhow::{Context, Result};
use lorebook::{
    check_round_trip, compile, CheckOutcome, ImportReport, LorebookConfig, LorebookDocument,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;
use world_graph::GraphSnapshot;

use crate::{Cli, Commands};

/// Run a parsed command line.
pub fn execute(cli: &Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => LorebookConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => LorebookConfig::default(),
    };

    match &cli.command {
        Commands::Compile {
            input,
            output,
            wrapped,
        } => {
            run_compile(input, output.as_deref(), *wrapped)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Import { input, output } => {
            let report = run_import(&config, input, output.as_deref())?;
            eprintln!("{}", report.summary());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { input } => {
            let outcome = run_check(&config, input)?;
            let mut stdout = std::io::stdout().lock();
            for mismatch in &outcome.mismatches {
                writeln!(stdout, "{}", mismatch)?;
            }
            eprintln!("{}", outcome.report.summary());

            if outcome.is_consistent() {
                writeln!(stdout, "ok: lorebook round-trips")?;
                Ok(ExitCode::SUCCESS)
            } else {
                writeln!(stdout, "{} mismatch(es)", outcome.mismatches.len())?;
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Compile a snapshot file. Returns the number of entries written.
pub fn run_compile(input: &Path, output: Option<&Path>, wrapped: bool) -> Result<usize> {
    let snapshot: GraphSnapshot = read_json(input)?;
    snapshot
        .validate()
        .with_context(|| format!("invalid graph in {}", input.display()))?;

    let entries = compile(&snapshot);
    let count = entries.len();
    if wrapped {
        write_json(&LorebookDocument::wrap(entries), output)?;
    } else {
        write_json(&entries, output)?;
    }

    info!(input = %input.display(), entries = count, "compiled lorebook");
    Ok(count)
}

/// Import a lorebook file and write the rebuilt snapshot.
pub fn run_import(config: &LorebookConfig, input: &Path, output: Option<&Path>) -> Result<ImportReport> {
    let document = read_json(input)?;
    let outcome = config
        .loader()
        .load_value(document)
        .with_context(|| format!("import {}", input.display()))?;

    write_json(&outcome.snapshot, output)?;

    info!(
        input = %input.display(),
        nodes = outcome.snapshot.nodes.len(),
        edges = outcome.snapshot.edges.len(),
        issues = outcome.report.len(),
        "imported lorebook"
    );
    Ok(outcome.report)
}

/// Check that a lorebook file survives import and recompilation.
pub fn run_check(config: &LorebookConfig, input: &Path) -> Result<CheckOutcome> {
    let document = read_json(input)?;
    check_round_trip(&config.loader(), document).with_context(|| format!("check {}", input.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).context("serialize output")?;
    text.push('\n');

    match output {
        Some(path) => std::fs::write(path, text).with_context(|| format!("write {}", path.display())),
        None => {
            std::io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("write stdout")
        }
    }
}

//! # Lorebook CLI
//!
//! File-level front end over the `lorebook` crate.
//!
//! ## Available Commands
//!
//! - `compile` - Graph snapshot JSON -> lorebook JSON
//! - `import` - Lorebook JSON -> graph snapshot JSON, with an import report
//! - `check` - Load then compile a lorebook and report fields that change
//!
//! Results go to stdout unless `--output` is given; reports and logs go to
//! stderr.

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log format (`json` or text).
pub const LOG_FORMAT_VAR: &str = "LOREBOOK_LOG_FORMAT";

const DEFAULT_FILTER: &str = "lorebook=info,world_graph=info,lorebook_cli=info";
const VERBOSE_FILTER: &str = "lorebook=debug,world_graph=debug,lorebook_cli=debug";

/// Compile world graphs into lorebooks and back.
#[derive(Parser, Debug)]
#[command(name = "lorebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with graph defaults and import layout
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a graph snapshot into lorebook entries
    Compile {
        /// Graph snapshot JSON
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit `{ "schemaVersion": 1, "entries": [...] }` instead of a bare array
        #[arg(long)]
        wrapped: bool,
    },

    /// Import a lorebook into a graph snapshot
    Import {
        /// Lorebook JSON (bare array or wrapped)
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify that a lorebook survives import and recompilation
    Check {
        /// Lorebook JSON (bare array or wrapped)
        input: PathBuf,
    },
}

/// Install the global tracing subscriber. Logs go to stderr.
///
/// `RUST_LOG` overrides the default filter unless `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let log_format = std::env::var(LOG_FORMAT_VAR).unwrap_or_else(|_| "text".to_string());
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt.json())
                .init();
        }
        _ => {
            tracing_subscriber::registry().with(filter).with(fmt).init();
        }
    }
}

//! # lorebook
//!
//! ```bash
//! lorebook compile world.json -o lorebook.json --wrapped
//! lorebook import lorebook.json -o world.json
//! lorebook check lorebook.json
//! ```
//!
//! Set `LOREBOOK_LOG_FORMAT=json` for machine-parseable logs.

use clap::Parser;
use lorebook_cli::{execute, init_tracing, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

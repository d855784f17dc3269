//! Strata CLI - frontend structure graph and contract verification.
//!
//! Usage:
//!   strata generate                      # Write tools/graph/frontend-graph.json
//!   strata generate --source-root web/src
//!   strata verify [snapshot] [--json]    # Exit 0 pass, 1 fail, 2 unloadable
//!   strata stats [snapshot]              # Node and edge counts

use anyhow::Result;
use clap::Parser;
use strata::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .init();

    match execute(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn execute(cli: Cli) -> Result<i32> {
    Ok(run(cli)?)
}

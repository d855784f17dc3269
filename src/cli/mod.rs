//! CLI module for Strata.
//!
//! Commands:
//! - generate: scan the frontend tree and write the graph snapshot
//! - verify: run the contract checks over a snapshot
//! - stats: node and edge counts of a snapshot

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::error;

use crate::config::{GeneratorConfig, StrataConfig, VerifierConfig};
use crate::error::Result;
use crate::graph::build_graph;
use crate::verify::{
    load_snapshot, Snapshot, Verifier, EXIT_FAILED, EXIT_PASSED, EXIT_UNLOADABLE,
};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Frontend structure graph and architectural contract checks")]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // ─── Generation ───────────────────────────────────────────────
    /// Scan the frontend source tree and write frontend-graph.json
    Generate {
        /// Frontend source root (overrides config)
        #[arg(long)]
        source_root: Option<PathBuf>,

        /// Directory the snapshot is written to (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    // ─── Verification ─────────────────────────────────────────────
    /// Verify architectural contracts against a graph snapshot
    Verify {
        /// Snapshot path (default: the configured merged baseline)
        snapshot: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Fail to load (exit 2) if controllers, dtos, components or hooks are missing
        #[arg(long)]
        strict: bool,
    },

    /// Show node and edge counts of a snapshot
    Stats {
        /// Snapshot path (default: the configured merged baseline)
        snapshot: Option<PathBuf>,
    },
}

impl Cli {
    /// Default log directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Run a parsed command line and return the process exit status.
pub fn run(cli: Cli) -> Result<i32> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let config_path = StrataConfig::default_path(&root);
    let config = StrataConfig::load(&config_path).resolve(&root);

    match cli.command {
        Commands::Generate {
            source_root,
            output_dir,
        } => {
            let mut generator = config.generator;
            if let Some(dir) = source_root {
                generator.source_root = anchored(&root, dir);
            }
            if let Some(dir) = output_dir {
                generator.output_dir = anchored(&root, dir);
            }
            generate(&generator)
        }
        Commands::Verify {
            snapshot,
            json,
            strict,
        } => {
            let mut verifier = config.verifier;
            verifier.require_sections |= strict;
            let path = snapshot_path(&root, snapshot, &verifier.baseline_path);
            verify(&path, &verifier, json)
        }
        Commands::Stats { snapshot } => {
            let path = snapshot_path(&root, snapshot, &config.verifier.baseline_path);
            stats(&path)
        }
    }
}

fn generate(config: &GeneratorConfig) -> Result<i32> {
    let graph = build_graph(config)?;
    let path = config.output_path();
    graph.save(&path)?;
    println!("Frontend graph written to {}", path.display());
    println!("  {}", graph.stats());
    Ok(EXIT_PASSED)
}

fn verify(path: &Path, config: &VerifierConfig, json: bool) -> Result<i32> {
    let snapshot = match load_snapshot(path, config) {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_snapshot_error() => {
            error!(error = %e, "cannot verify");
            eprintln!("ERROR: {}", e);
            return Ok(EXIT_UNLOADABLE);
        }
        Err(e) => return Err(e),
    };
    let report = Verifier::new(config).run(&snapshot);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(if report.passed { EXIT_PASSED } else { EXIT_FAILED })
}

fn stats(path: &Path) -> Result<i32> {
    let snapshot = match Snapshot::load(path) {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_snapshot_error() => {
            eprintln!("ERROR: {}", e);
            return Ok(EXIT_UNLOADABLE);
        }
        Err(e) => return Err(e),
    };
    let stats = snapshot.stats();
    println!("Strata - Graph Statistics");
    println!("═════════════════════════");
    println!();
    println!("Types:          {}", stats.types);
    println!("API functions:  {}", stats.api_functions);
    println!("Hooks:          {}", stats.hooks);
    println!("Components:     {}", stats.components);
    println!("Edges:          {}", stats.edges);
    if !snapshot.controllers.is_empty() || !snapshot.dtos.is_empty() {
        println!("Controllers:    {}", snapshot.controllers.len());
        println!("DTOs:           {}", snapshot.dtos.len());
    }
    Ok(EXIT_PASSED)
}

fn snapshot_path(root: &Path, given: Option<PathBuf>, baseline: &Path) -> PathBuf {
    given.map_or_else(|| baseline.to_path_buf(), |p| anchored(root, p))
}

fn anchored(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

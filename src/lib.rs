//! Task dependency engine for spec-driven feature work.
//!
//! A feature moves through a fixed set of phases; once it reaches `tasks`
//! it carries a graph of tasks with declared dependencies. The engine
//! validates that graph, hands out tasks in dependency order with the
//! context left behind by their prerequisites, and persists every change
//! to a versioned YAML document.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod model;
pub mod ports;
pub mod store;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PROJSPEC_LOG";

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    init_logging(cli.verbose);
    commands::dispatch(&cli.command)
}

/// Installs the stderr log subscriber. Later calls are no-ops.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

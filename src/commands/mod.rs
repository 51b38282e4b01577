//! Command dispatch and handlers.
//!
//! Handlers take the service context and store root explicitly so tests
//! can drive them against in-memory adapters. Output goes to stdout;
//! errors come back as strings naming the feature, task or phase at fault.

pub mod advance;
pub mod complete;
pub mod init;
pub mod new;
pub mod next;
pub mod reopen;
pub mod show;
pub mod start;
pub mod status;
pub mod tasks;
pub mod validate;

use std::path::Path;

use crate::cli::Command;
use crate::config::store_root;
use crate::context::ServiceContext;
use crate::engine::Engine;

/// Dispatch a parsed command to its handler using live adapters and the
/// store root from the environment.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = ServiceContext::live();
    dispatch_with_context(command, &ctx, &store_root())
}

/// Dispatch a command with the given service context and store root.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext, root: &Path) -> Result<(), String> {
    match command {
        Command::Init => init::run(ctx, root),
        Command::New { name, description } => new::run(ctx, root, name, description),
        Command::Tasks { feature, file } => tasks::run(ctx, root, feature, file),
        Command::Advance { feature, phase, force } => advance::run(ctx, root, feature, *phase, *force),
        Command::Reopen { feature, phase, reset } => reopen::run(ctx, root, feature, *phase, reset),
        Command::Next { feature, json } => next::run(ctx, root, feature, *json),
        Command::Start { feature, task } => start::run(ctx, root, feature, task),
        Command::Complete { feature, task, summary, skip } => {
            complete::run(ctx, root, feature, task, summary, *skip)
        }
        Command::Validate { feature } => validate::run(ctx, root, feature),
        Command::Status { feature, json } => status::run(ctx, root, feature.as_deref(), *json),
        Command::Show { feature } => show::run(ctx, root, feature),
    }
}

/// Opens the engine, turning failures into display strings.
pub(crate) fn open<'a>(ctx: &'a ServiceContext, root: &Path) -> Result<Engine<'a>, String> {
    Engine::open(ctx, root).map_err(|e| e.to_string())
}

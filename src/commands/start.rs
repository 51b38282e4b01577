//! `projspec start` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::model::TaskId;

use super::next::print_bundle;
use super::open;

/// Execute the `start` command: mark the task in progress and print its
/// context.
///
/// # Errors
///
/// Returns an error string if the task is unknown, not pending, or blocked.
pub fn run(ctx: &ServiceContext, root: &Path, feature: &str, task: &TaskId) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let bundle = engine.start_task(feature, task).map_err(|e| e.to_string())?;
    println!("Started {task}");
    println!();
    print_bundle(&bundle, &engine.config().context.always_include);
    Ok(())
}

//! `projspec complete` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::graph::TaskProgress;
use crate::model::TaskId;

use super::open;

/// Execute the `complete` command.
///
/// # Errors
///
/// Returns an error string if the task cannot move to completed/skipped.
pub fn run(
    ctx: &ServiceContext,
    root: &Path,
    feature: &str,
    task: &TaskId,
    summary: &str,
    skip: bool,
) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let updated = engine.record_completion(feature, task, summary, skip).map_err(|e| e.to_string())?;
    let progress = TaskProgress::of(&updated.tasks);
    let verb = if skip { "Skipped" } else { "Completed" };
    println!(
        "{verb} {task} ({}/{} done, {:.0}%)",
        progress.done(),
        progress.total,
        progress.percentage()
    );
    Ok(())
}

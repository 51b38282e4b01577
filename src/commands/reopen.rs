//! `projspec reopen` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::model::{Phase, TaskId};

use super::open;

/// Execute the `reopen` command.
///
/// # Errors
///
/// Returns an error string if the target phase is not earlier, the feature
/// is archived, or a reset task is unknown or unfinished.
pub fn run(
    ctx: &ServiceContext,
    root: &Path,
    feature: &str,
    phase: Phase,
    reset: &[TaskId],
) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let updated = engine.reopen(feature, phase, reset).map_err(|e| e.to_string())?;
    println!("Feature {} reopened at phase {}", updated.full_name(), updated.phase);
    for id in reset {
        println!("  reset {id} to pending");
    }
    Ok(())
}

//! `projspec advance` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::model::Phase;

use super::open;

/// Execute the `advance` command.
///
/// # Errors
///
/// Returns an error string naming the feature, both phases and the reason
/// if the move is rejected.
pub fn run(ctx: &ServiceContext, root: &Path, feature: &str, phase: Phase, force: bool) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let before = engine.feature(feature).map_err(|e| e.to_string())?.phase;
    let updated = engine.advance_phase(feature, phase, force).map_err(|e| e.to_string())?;
    if before == updated.phase {
        println!("Feature {} is already in phase {}", updated.full_name(), updated.phase);
    } else {
        println!("Feature {}: {before} -> {}", updated.full_name(), updated.phase);
    }
    Ok(())
}

//! `projspec new` command.

use std::path::Path;

use crate::context::ServiceContext;

use super::open;

/// Execute the `new` command.
///
/// # Errors
///
/// Returns an error string if the name is not kebab-case or the feature
/// cannot be stored.
pub fn run(ctx: &ServiceContext, root: &Path, name: &str, description: &str) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let feature = engine.create_feature(name, description).map_err(|e| e.to_string())?;
    println!("Created feature {} (phase {})", feature.full_name(), feature.phase);
    println!("  branch:    {}", feature.branch_ref);
    println!("  worktree:  {}", feature.workspace_ref);
    Ok(())
}

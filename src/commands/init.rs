//! `projspec init` command.

use std::path::Path;

use crate::config::ProjectConfig;
use crate::context::ServiceContext;

/// Execute the `init` command: write a default `projspec.yaml`.
///
/// # Errors
///
/// Returns an error string if a config already exists or cannot be written.
pub fn run(ctx: &ServiceContext, root: &Path) -> Result<(), String> {
    let path = ProjectConfig::default().init(ctx, root).map_err(|e| e.to_string())?;
    println!("Wrote {}", path.display());
    Ok(())
}

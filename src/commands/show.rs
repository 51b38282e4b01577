//! `projspec show` command.

use std::path::Path;

use crate::context::ServiceContext;

use super::open;

/// Execute the `show` command: print the stored document as YAML.
///
/// # Errors
///
/// Returns an error string if the feature cannot be loaded.
pub fn run(ctx: &ServiceContext, root: &Path, feature: &str) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let loaded = engine.feature(feature).map_err(|e| e.to_string())?;
    let yaml = serde_yaml::to_string(&loaded).map_err(|e| format!("failed to render: {e}"))?;
    print!("{yaml}");
    Ok(())
}

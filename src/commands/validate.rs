//! `projspec validate` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::graph::problems;

use super::open;

/// Execute the `validate` command.
///
/// Lists every structural problem, not just the first.
///
/// # Errors
///
/// Returns an error string if the feature cannot be loaded or its graph
/// has problems.
pub fn run(ctx: &ServiceContext, root: &Path, feature: &str) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let loaded = engine.feature(feature).map_err(|e| e.to_string())?;
    let found = problems(&loaded.tasks);
    if found.is_empty() {
        println!("Task graph for {} is valid ({} task(s))", loaded.full_name(), loaded.tasks.len());
        return Ok(());
    }
    for problem in &found {
        println!("  {problem}");
    }
    Err(format!("feature {} has {} structural problem(s)", loaded.id, found.len()))
}

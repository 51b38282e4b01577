//! `projspec tasks` command: load a task graph from YAML.

use std::path::Path;

use serde_yaml::Value;

use crate::context::ServiceContext;
use crate::model::TaskDefinition;

use super::open;

/// Parses task definitions from YAML text.
///
/// Accepts a bare list or a mapping whose only key is `tasks`. Unknown
/// keys anywhere are an error.
///
/// # Errors
///
/// Returns a description of the parse failure.
pub fn parse_definitions(yaml: &str) -> Result<Vec<TaskDefinition>, String> {
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| format!("invalid task file: {e}"))?;
    let list = match value {
        Value::Mapping(mut map) => {
            let tasks = map
                .remove("tasks")
                .ok_or_else(|| "invalid task file: expected a list or a `tasks` key".to_string())?;
            if let Some((key, _)) = map.iter().next() {
                return Err(format!("invalid task file: unknown key {}", render_key(key)));
            }
            tasks
        }
        other => other,
    };
    serde_yaml::from_value(list).map_err(|e| format!("invalid task file: {e}"))
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => format!("`{s}`"),
        other => format!("{other:?}"),
    }
}

/// Execute the `tasks` command.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or parsed, the
/// feature is in the wrong phase, or the graph is invalid.
pub fn run(ctx: &ServiceContext, root: &Path, feature: &str, file: &Path) -> Result<(), String> {
    let yaml = ctx
        .fs
        .read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let definitions = parse_definitions(&yaml)?;

    let engine = open(ctx, root)?;
    let updated = engine.populate_tasks(feature, definitions).map_err(|e| e.to_string())?;
    println!("Loaded {} task(s) into feature {}", updated.tasks.len(), updated.full_name());
    Ok(())
}

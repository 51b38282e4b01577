//! `projspec status` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::engine::FeatureStatus;

use super::open;

/// Execute the `status` command.
///
/// With a feature id, shows that feature's phase, progress and next task.
/// Without one, prints a table of every feature.
///
/// # Errors
///
/// Returns an error string if a feature cannot be loaded.
pub fn run(ctx: &ServiceContext, root: &Path, feature: Option<&str>, json: bool) -> Result<(), String> {
    let engine = open(ctx, root)?;

    if let Some(id) = feature {
        let status = engine.status(id).map_err(|e| e.to_string())?;
        if json {
            println!("{}", to_json(&status)?);
        } else {
            print_one(&status);
        }
        return Ok(());
    }

    let all = engine.status_all().map_err(|e| e.to_string())?;
    if json {
        println!("{}", to_json(&all)?);
        return Ok(());
    }
    if all.is_empty() {
        println!("No features found in store.");
        return Ok(());
    }

    let rows: Vec<(String, String, String, String)> = all
        .iter()
        .map(|s| {
            (
                s.id.clone(),
                s.name.clone(),
                s.phase.to_string(),
                format!("{}/{}", s.progress.done(), s.progress.total),
            )
        })
        .collect();

    let id_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(2).max(2);
    let name_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(4).max(4);
    let phase_width = rows.iter().map(|r| r.2.len()).max().unwrap_or(5).max(5);

    println!("{:<id_width$}  {:<name_width$}  {:<phase_width$}  TASKS", "ID", "NAME", "PHASE");
    println!("{:-<id_width$}  {:-<name_width$}  {:-<phase_width$}  -----", "", "", "");
    for (id, name, phase, tasks) in &rows {
        println!("{id:<id_width$}  {name:<name_width$}  {phase:<phase_width$}  {tasks}");
    }
    println!("\n{} feature(s) total.", rows.len());
    Ok(())
}

fn print_one(status: &FeatureStatus) {
    let p = &status.progress;
    println!("Feature {}-{}", status.id, status.name);
    println!("  phase:     {}", status.phase);
    println!(
        "  progress:  {}/{} done ({:.0}%)  pending {}, in progress {}, completed {}, skipped {}",
        p.done(),
        p.total,
        status.percentage,
        p.pending,
        p.in_progress,
        p.completed,
        p.skipped
    );
    if let Some(next) = &status.next_task {
        println!("  next:      {next}");
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

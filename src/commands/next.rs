//! `projspec next` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::engine::NextAction;
use crate::graph::ContextBundle;

use super::open;

/// Execute the `next` command.
///
/// # Errors
///
/// Returns an error string if the feature is not yet in the tasks phase
/// or its graph is invalid.
pub fn run(ctx: &ServiceContext, root: &Path, feature: &str, json: bool) -> Result<(), String> {
    let engine = open(ctx, root)?;
    let action = engine.next_action(feature).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&action).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let always_include = &engine.config().context.always_include;
    match &action {
        NextAction::ResumeTask { task_id, bundle, also_active } => {
            println!("Resume {task_id}");
            if !also_active.is_empty() {
                let ids: Vec<&str> = also_active.iter().map(|id| id.as_str()).collect();
                println!("Warning: also in progress: {}", ids.join(", "));
            }
            println!();
            print_bundle(bundle, always_include);
        }
        NextAction::StartTask { task_id, bundle } => {
            println!("Start {task_id}");
            println!();
            print_bundle(bundle, always_include);
        }
        NextAction::AllComplete => {
            let phase = engine.feature(feature).map_err(|e| e.to_string())?.phase;
            println!("All tasks complete. Feature is in phase {phase}.");
        }
        NextAction::Blocked { tasks } => {
            println!("No task is ready. Blocked:");
            for blocked in tasks {
                let deps: Vec<&str> = blocked.unsatisfied.iter().map(|id| id.as_str()).collect();
                println!("  {} waits on {}", blocked.task_id, deps.join(", "));
            }
        }
    }
    Ok(())
}

/// Prints a context bundle as plain text.
pub(crate) fn print_bundle(bundle: &ContextBundle, always_include: &[String]) {
    println!("{}: {}", bundle.task_id, bundle.name);
    if !bundle.description.is_empty() {
        println!();
        println!("{}", bundle.description);
    }
    if !bundle.dependency_summaries.is_empty() {
        println!();
        println!("Dependencies:");
        for dep in &bundle.dependency_summaries {
            println!("  {} {} ({})", dep.task_id, dep.name, dep.status);
            if let Some(summary) = &dep.summary {
                for line in summary.lines() {
                    println!("    {line}");
                }
            }
        }
    }
    if !bundle.hints.is_empty() {
        println!();
        println!("Hints:");
        for hint in &bundle.hints {
            println!("  {hint}");
        }
    }
    if !always_include.is_empty() {
        println!();
        println!("Always read:");
        for path in always_include {
            println!("  {path}");
        }
    }
}

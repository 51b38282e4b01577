//! Structural validation of a task graph.

use std::collections::HashSet;

use crate::error::StructuralError;
use crate::model::TaskGraph;

use super::cycle::find_cycle;

/// Lists every structural problem in the graph.
///
/// Duplicate ids come first (document order), then unknown dependency
/// references (task id order), then at most one cycle. Cycle detection
/// only runs once ids and references are clean, since a cycle through a
/// duplicated or dangling id is not meaningful.
#[must_use]
pub fn problems(graph: &TaskGraph) -> Vec<StructuralError> {
    let mut found = Vec::new();

    let mut seen = HashSet::new();
    for task in graph {
        if !seen.insert(&task.id) {
            found.push(StructuralError::DuplicateTask(task.id.clone()));
        }
    }

    for (id, task) in graph.by_id() {
        for dep in &task.depends_on {
            if !seen.contains(dep) {
                found.push(StructuralError::UnknownDependency {
                    task: id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    if found.is_empty() {
        if let Some(chain) = find_cycle(graph) {
            found.push(StructuralError::Cycle(chain));
        }
    }

    found
}

/// Checks that ids are unique, every dependency exists, and the graph is
/// acyclic.
///
/// # Errors
///
/// Returns the first problem [`problems`] would list.
pub fn validate(graph: &TaskGraph) -> Result<(), StructuralError> {
    match problems(graph).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Like [`validate`], but also rejects an empty graph. Used wherever a
/// feature is about to enter or stay in the tasks phase.
///
/// # Errors
///
/// Returns [`StructuralError::EmptyGraph`] or the first structural problem.
pub fn validate_populated(graph: &TaskGraph) -> Result<(), StructuralError> {
    if graph.is_empty() {
        return Err(StructuralError::EmptyGraph);
    }
    validate(graph)
}

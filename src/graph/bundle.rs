//! Context bundles for starting or resuming a task.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::model::{Task, TaskGraph, TaskId, TaskStatus};

/// What a direct dependency left behind for the task that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySummary {
    /// The dependency's id.
    pub task_id: TaskId,
    /// The dependency's name.
    pub name: String,
    /// Its status (completed or skipped, in a valid run).
    pub status: TaskStatus,
    /// The summary recorded when it finished, if any.
    pub summary: Option<String>,
}

/// Everything the execution agent needs to pick up a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextBundle {
    /// The task being started or resumed.
    pub task_id: TaskId,
    /// Its name.
    pub name: String,
    /// Its description.
    pub description: String,
    /// Direct dependencies, prerequisites first.
    pub dependency_summaries: Vec<DependencySummary>,
    /// The task's context hints, unmodified.
    pub hints: Vec<String>,
}

impl ContextBundle {
    /// Builds the bundle for `task_id`, or `None` if no such task exists.
    ///
    /// Dependency summaries follow a topological order of the task's whole
    /// dependency subgraph (transitive prerequisites first), with ties
    /// broken by ascending id. Only direct dependencies are included.
    #[must_use]
    pub fn build(graph: &TaskGraph, task_id: &TaskId) -> Option<Self> {
        let index = graph.by_id();
        let task = *index.get(task_id)?;

        let dependency_summaries = dependency_order(&index, task)
            .into_iter()
            .filter(|id| task.depends_on.contains(*id))
            .filter_map(|id| index.get(id))
            .map(|dep| DependencySummary {
                task_id: dep.id.clone(),
                name: dep.name.clone(),
                status: dep.status,
                summary: dep.summary.clone(),
            })
            .collect();

        Some(Self {
            task_id: task.id.clone(),
            name: task.name.clone(),
            description: task.description.clone(),
            dependency_summaries,
            hints: task.context_hints.clone(),
        })
    }
}

/// Topologically orders every transitive dependency of `task`.
///
/// Kahn's algorithm over the ancestor subgraph, always releasing the
/// smallest ready id. Nodes left over by a cycle are appended in id order
/// so the result stays total.
fn dependency_order<'g>(index: &BTreeMap<&'g TaskId, &'g Task>, task: &'g Task) -> Vec<&'g TaskId> {
    let mut ancestors: BTreeSet<&TaskId> = BTreeSet::new();
    let mut stack: Vec<&TaskId> = task.depends_on.iter().collect();
    while let Some(id) = stack.pop() {
        let Some(&dep) = index.get(id) else {
            continue;
        };
        if dep.id != task.id && ancestors.insert(&dep.id) {
            stack.extend(dep.depends_on.iter());
        }
    }

    let mut pending: HashMap<&TaskId, usize> = HashMap::new();
    let mut dependents: HashMap<&TaskId, Vec<&TaskId>> = HashMap::new();
    for &id in &ancestors {
        let deps: Vec<&TaskId> = index[id]
            .depends_on
            .iter()
            .filter(|d| ancestors.contains(*d))
            .collect();
        pending.insert(id, deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(id);
        }
    }

    let mut ready: BTreeSet<&TaskId> =
        pending.iter().filter(|(_, &n)| n == 0).map(|(&id, _)| id).collect();
    let mut order = Vec::with_capacity(ancestors.len());
    while let Some(id) = ready.pop_first() {
        order.push(id);
        for &next in dependents.get(id).map(Vec::as_slice).unwrap_or_default() {
            if let Some(n) = pending.get_mut(next) {
                *n -= 1;
                if *n == 0 {
                    ready.insert(next);
                }
            }
        }
    }

    if order.len() < ancestors.len() {
        let placed: BTreeSet<&TaskId> = order.iter().copied().collect();
        order.extend(ancestors.iter().copied().filter(|id| !placed.contains(id)));
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TaskDefinition};

    fn task(id: &str, deps: &[&str]) -> Task {
        TaskDefinition {
            id: id.into(),
            name: format!("{id} name"),
            description: format!("{id} description"),
            priority: Priority::P2,
            depends_on: deps.iter().map(|d| TaskId::from(*d)).collect(),
            context_hints: vec![format!("src/{id}.rs")],
        }
        .into()
    }

    fn done(mut task: Task, summary: &str) -> Task {
        task.status = TaskStatus::Completed;
        task.summary = Some(summary.to_string());
        task
    }

    fn summary_ids(bundle: &ContextBundle) -> Vec<&str> {
        bundle.dependency_summaries.iter().map(|d| d.task_id.as_str()).collect()
    }

    #[test]
    fn carries_description_and_hints() {
        let graph = TaskGraph::new(vec![task("T1", &[])]);
        let bundle = ContextBundle::build(&graph, &"T1".into()).unwrap();
        assert_eq!(bundle.description, "T1 description");
        assert_eq!(bundle.hints, vec!["src/T1.rs"]);
        assert!(bundle.dependency_summaries.is_empty());
    }

    #[test]
    fn unknown_task_yields_none() {
        let graph = TaskGraph::new(vec![task("T1", &[])]);
        assert!(ContextBundle::build(&graph, &"T2".into()).is_none());
    }

    #[test]
    fn prerequisites_of_prerequisites_come_first() {
        // T1 and T3 both build on T2, so T2 leads even though T1 sorts first.
        let graph = TaskGraph::new(vec![
            done(task("T2", &[]), "- T2 built the base"),
            done(task("T1", &["T2"]), "- T1 on top"),
            done(task("T3", &["T2"]), "- T3 alongside"),
            task("T4", &["T1", "T3", "T2"]),
        ]);
        let bundle = ContextBundle::build(&graph, &"T4".into()).unwrap();
        assert_eq!(summary_ids(&bundle), vec!["T2", "T1", "T3"]);
        assert_eq!(bundle.dependency_summaries[0].summary.as_deref(), Some("- T2 built the base"));
    }

    #[test]
    fn independent_dependencies_sort_by_id() {
        let graph = TaskGraph::new(vec![
            done(task("T10", &[]), "ten"),
            done(task("T2", &[]), "two"),
            task("T11", &["T10", "T2"]),
        ]);
        let bundle = ContextBundle::build(&graph, &"T11".into()).unwrap();
        assert_eq!(summary_ids(&bundle), vec!["T2", "T10"]);
    }

    #[test]
    fn transitive_only_ancestors_are_excluded() {
        let graph = TaskGraph::new(vec![
            done(task("T1", &[]), "one"),
            done(task("T2", &["T1"]), "two"),
            task("T3", &["T2"]),
        ]);
        let bundle = ContextBundle::build(&graph, &"T3".into()).unwrap();
        assert_eq!(summary_ids(&bundle), vec!["T2"]);
    }

    #[test]
    fn building_twice_is_identical() {
        let graph = TaskGraph::new(vec![
            done(task("T1", &[]), "one"),
            done(task("T2", &[]), "two"),
            task("T3", &["T2", "T1"]),
        ]);
        let first = ContextBundle::build(&graph, &"T3".into()).unwrap();
        let second = ContextBundle::build(&graph, &"T3".into()).unwrap();
        assert_eq!(first, second);
    }
}

//! Feature state document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use super::task::Task;
use super::task_id::TaskId;

/// The full set of tasks for one feature, in document order.
///
/// Document order carries no meaning; every ordering decision goes through
/// [`TaskId`]'s `Ord`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskGraph {
    tasks: Vec<Task>,
}

impl TaskGraph {
    /// Wraps a task list without validating it.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Looks up a task by id for mutation.
    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Index of tasks keyed by id, in id order.
    ///
    /// When ids collide the first occurrence wins; validation reports the
    /// duplicate separately.
    #[must_use]
    pub fn by_id(&self) -> BTreeMap<&TaskId, &Task> {
        let mut index = BTreeMap::new();
        for task in &self.tasks {
            index.entry(&task.id).or_insert(task);
        }
        index
    }
}

impl<'a> IntoIterator for &'a TaskGraph {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// The umbrella unit of work: one feature and its task graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    /// Three-digit sequence id (e.g. `"001"`).
    pub id: String,
    /// Kebab-case feature name.
    pub name: String,
    /// Free-text feature description.
    #[serde(default)]
    pub description: String,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Branch name in the external VCS. Not interpreted.
    pub branch_ref: String,
    /// Worktree location. Not interpreted.
    pub workspace_ref: String,
    /// When the feature was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last saved.
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency stamp; bumped on every save.
    pub version: u64,
    /// The task graph; empty until the graph producer fills it.
    #[serde(default)]
    pub tasks: TaskGraph,
}

impl Feature {
    /// `<id>-<name>`, used for default branch and worktree names.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskDefinition, TaskStatus};

    fn task(id: &str) -> Task {
        TaskDefinition {
            id: id.into(),
            name: format!("task {id}"),
            description: String::new(),
            priority: crate::model::Priority::P2,
            depends_on: std::collections::BTreeSet::new(),
            context_hints: vec![],
        }
        .into()
    }

    #[test]
    fn by_id_orders_naturally() {
        let graph = TaskGraph::new(vec![task("T10"), task("T2"), task("T1")]);
        let ids: Vec<&str> = graph.by_id().keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T10"]);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut graph = TaskGraph::new(vec![task("T1")]);
        graph.get_mut(&"T1".into()).unwrap().status = TaskStatus::InProgress;
        assert_eq!(graph.get(&"T1".into()).unwrap().status, TaskStatus::InProgress);
        assert!(graph.get(&"T9".into()).is_none());
    }

    #[test]
    fn graph_serializes_as_plain_list() {
        let graph = TaskGraph::new(vec![task("T1")]);
        let yaml = serde_yaml::to_string(&graph).unwrap();
        assert!(yaml.starts_with("- id: T1"));
    }
}

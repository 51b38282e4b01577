//! Readiness classification and next-task selection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{TaskGraph, TaskId, TaskStatus};

/// How a single task stands relative to its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Readiness {
    /// Completed or skipped.
    Done,
    /// In progress.
    Active,
    /// Pending and every dependency is done.
    Ready,
    /// Pending with at least one dependency outstanding.
    Blocked {
        /// Dependencies that are not done, in id order.
        unsatisfied: Vec<TaskId>,
    },
}

/// A blocked task together with what it is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedTask {
    /// The blocked task.
    pub task_id: TaskId,
    /// Dependencies that are not done.
    pub unsatisfied: Vec<TaskId>,
}

/// What the resolver recommends doing next, by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Continue the lowest-id active task.
    Resume {
        /// Task to resume.
        task_id: TaskId,
        /// Other tasks that are also in progress. Should be empty.
        also_active: Vec<TaskId>,
    },
    /// Start the lowest-id ready task.
    Start {
        /// Task to start.
        task_id: TaskId,
    },
    /// Every task is done.
    AllComplete,
    /// Nothing is ready or active but not everything is done.
    Blocked {
        /// Every blocked task with its outstanding dependencies.
        tasks: Vec<BlockedTask>,
    },
}

/// Readiness of every task in a graph, keyed in id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessReport {
    entries: BTreeMap<TaskId, Readiness>,
}

impl ReadinessReport {
    /// Classifies every task in the graph.
    ///
    /// A dependency on an id missing from the graph counts as unsatisfied.
    #[must_use]
    pub fn classify(graph: &TaskGraph) -> Self {
        let index = graph.by_id();
        let is_done =
            |id: &TaskId| index.get(id).is_some_and(|task| task.status.is_done());

        let entries = index
            .iter()
            .map(|(&id, &task)| {
                let readiness = match task.status {
                    TaskStatus::Completed | TaskStatus::Skipped => Readiness::Done,
                    TaskStatus::InProgress => Readiness::Active,
                    TaskStatus::Pending => {
                        let unsatisfied: Vec<TaskId> =
                            task.depends_on.iter().filter(|dep| !is_done(*dep)).cloned().collect();
                        if unsatisfied.is_empty() {
                            Readiness::Ready
                        } else {
                            Readiness::Blocked { unsatisfied }
                        }
                    }
                };
                (id.clone(), readiness)
            })
            .collect();

        Self { entries }
    }

    /// Readiness of one task.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Readiness> {
        self.entries.get(id)
    }

    /// Every task with its readiness, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &Readiness)> {
        self.entries.iter()
    }

    /// Active task ids in ascending order.
    #[must_use]
    pub fn active(&self) -> Vec<&TaskId> {
        self.matching(|r| matches!(r, Readiness::Active))
    }

    /// Ready task ids in ascending order.
    #[must_use]
    pub fn ready(&self) -> Vec<&TaskId> {
        self.matching(|r| matches!(r, Readiness::Ready))
    }

    /// Blocked tasks with their unsatisfied dependencies.
    #[must_use]
    pub fn blocked(&self) -> Vec<BlockedTask> {
        self.entries
            .iter()
            .filter_map(|(id, r)| match r {
                Readiness::Blocked { unsatisfied } => Some(BlockedTask {
                    task_id: id.clone(),
                    unsatisfied: unsatisfied.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Whether every task is done. Vacuously true for an empty graph.
    #[must_use]
    pub fn all_done(&self) -> bool {
        self.entries.values().all(|r| matches!(r, Readiness::Done))
    }

    /// Picks the next unit of work.
    ///
    /// Active tasks win over ready ones so interrupted work is resumed
    /// before anything new starts. Ties go to the lowest id.
    #[must_use]
    pub fn select(&self) -> Selection {
        let active = self.active();
        if let Some((first, rest)) = active.split_first() {
            return Selection::Resume {
                task_id: (*first).clone(),
                also_active: rest.iter().map(|id| (*id).clone()).collect(),
            };
        }
        if let Some(first) = self.ready().first() {
            return Selection::Start { task_id: (*first).clone() };
        }
        if self.all_done() {
            return Selection::AllComplete;
        }
        Selection::Blocked { tasks: self.blocked() }
    }

    fn matching(&self, pred: impl Fn(&Readiness) -> bool) -> Vec<&TaskId> {
        self.entries.iter().filter(|(_, r)| pred(*r)).map(|(id, _)| id).collect()
    }
}

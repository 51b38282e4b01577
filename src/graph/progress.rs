//! Task progress counts.

use serde::Serialize;

use crate::model::{TaskGraph, TaskStatus};

/// Per-status task counts for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskProgress {
    /// All tasks.
    pub total: usize,
    /// Not started.
    pub pending: usize,
    /// Being worked on.
    pub in_progress: usize,
    /// Finished.
    pub completed: usize,
    /// Deliberately not done.
    pub skipped: usize,
}

impl TaskProgress {
    /// Counts tasks by status.
    #[must_use]
    pub fn of(graph: &TaskGraph) -> Self {
        graph.iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            match task.status {
                TaskStatus::Pending => acc.pending += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Completed => acc.completed += 1,
                TaskStatus::Skipped => acc.skipped += 1,
            }
            acc
        })
    }

    /// Completed plus skipped.
    #[must_use]
    pub fn done(&self) -> usize {
        self.completed + self.skipped
    }

    /// Share of done tasks, 0–100. Zero for an empty graph.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.done() as f64 / self.total as f64 * 100.0
    }

    /// Whether there is at least one task and all are done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done() == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Task, TaskDefinition};

    fn task(id: &str, status: TaskStatus) -> Task {
        let mut task: Task = TaskDefinition {
            id: id.into(),
            name: id.to_string(),
            description: String::new(),
            priority: Priority::P2,
            depends_on: std::collections::BTreeSet::new(),
            context_hints: vec![],
        }
        .into();
        task.status = status;
        task
    }

    #[test]
    fn counts_each_status() {
        let graph = TaskGraph::new(vec![
            task("T1", TaskStatus::Completed),
            task("T2", TaskStatus::Skipped),
            task("T3", TaskStatus::InProgress),
            task("T4", TaskStatus::Pending),
        ]);
        let progress = TaskProgress::of(&graph);
        assert_eq!(
            progress,
            TaskProgress { total: 4, pending: 1, in_progress: 1, completed: 1, skipped: 1 }
        );
        assert!((progress.percentage() - 50.0).abs() < f64::EPSILON);
        assert!(!progress.is_complete());
    }

    #[test]
    fn empty_graph_is_not_complete() {
        let progress = TaskProgress::of(&TaskGraph::default());
        assert!(progress.percentage().abs() < f64::EPSILON);
        assert!(!progress.is_complete());
    }

    #[test]
    fn skipped_counts_toward_completion() {
        let graph = TaskGraph::new(vec![
            task("T1", TaskStatus::Skipped),
            task("T2", TaskStatus::Completed),
        ]);
        assert!(TaskProgress::of(&graph).is_complete());
    }
}

//! Task records and their status.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task_id::TaskId;

/// Where a task sits in its own lifecycle.
///
/// Moves only forward: `pending → in_progress → {completed, skipped}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Pending,
    /// Claimed by the execution agent.
    InProgress,
    /// Finished with a summary.
    Completed,
    /// Deliberately not done; counts as satisfied for dependents.
    Skipped,
}

impl TaskStatus {
    /// `completed` and `skipped` both satisfy dependents.
    #[must_use]
    pub fn is_done(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Whether moving from `self` to `to` is a forward step.
    #[must_use]
    pub fn can_advance_to(self, to: Self) -> bool {
        match self {
            Self::Pending => to != Self::Pending,
            Self::InProgress => to.is_done(),
            Self::Completed | Self::Skipped => false,
        }
    }

    /// Lowercase name as it appears in the state document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational priority; selection order ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Must have.
    P1,
    /// Should have.
    #[default]
    P2,
    /// Nice to have.
    P3,
}

/// One unit of work within a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    /// Unique within the feature; never changes.
    pub id: TaskId,
    /// Short human-readable name.
    pub name: String,
    /// Free-text description handed to the execution agent.
    #[serde(default)]
    pub description: String,
    /// Current status.
    #[serde(default = "pending")]
    pub status: TaskStatus,
    /// Informational priority.
    #[serde(default)]
    pub priority: Priority,
    /// Ids of tasks that must be done first.
    #[serde(default, alias = "dependsOn")]
    pub depends_on: BTreeSet<TaskId>,
    /// Opaque location hints passed through to the context bundle.
    #[serde(default, alias = "contextHints")]
    pub context_hints: Vec<String>,
    /// Completion summary, present only once the task is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// When the task entered `in_progress`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the task was completed or skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

const fn pending() -> TaskStatus {
    TaskStatus::Pending
}

impl Task {
    /// Puts the task back to `pending`, dropping its summary and timestamps.
    pub fn reset(&mut self) {
        self.status = TaskStatus::Pending;
        self.summary = None;
        self.started_at = None;
        self.completed_at = None;
    }
}

/// A task as supplied by the graph producer, before it has any status.
///
/// Unknown keys are rejected so a misspelled dependency list cannot
/// silently produce a task with no prerequisites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDefinition {
    /// Unique task id.
    pub id: TaskId,
    /// Short human-readable name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Informational priority.
    #[serde(default)]
    pub priority: Priority,
    /// Ids of tasks that must be done first.
    #[serde(default, alias = "dependsOn")]
    pub depends_on: BTreeSet<TaskId>,
    /// Opaque location hints.
    #[serde(default, alias = "contextHints")]
    pub context_hints: Vec<String>,
}

impl From<TaskDefinition> for Task {
    fn from(def: TaskDefinition) -> Self {
        Self {
            id: def.id,
            name: def.name,
            description: def.description,
            status: TaskStatus::Pending,
            priority: def.priority,
            depends_on: def.depends_on,
            context_hints: def.context_hints,
            summary: None,
            started_at: None,
            completed_at: None,
        }
    }
}

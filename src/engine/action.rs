//! Values the engine hands back to its caller.

use serde::Serialize;

use crate::graph::{BlockedTask, ContextBundle, TaskProgress};
use crate::model::{Feature, Phase, TaskId};

/// The engine's recommendation for what to work on next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextAction {
    /// Pick an in-progress task back up.
    ResumeTask {
        /// Task to resume.
        task_id: TaskId,
        /// Everything needed to continue it.
        bundle: ContextBundle,
        /// Other tasks also marked in progress. Non-empty means something
        /// started work without finishing it.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        also_active: Vec<TaskId>,
    },
    /// Begin a task whose dependencies are all done.
    StartTask {
        /// Task to start.
        task_id: TaskId,
        /// Everything needed to begin it.
        bundle: ContextBundle,
    },
    /// Every task is completed or skipped.
    AllComplete,
    /// Only blocked tasks remain.
    Blocked {
        /// Each blocked task and the dependencies holding it up.
        tasks: Vec<BlockedTask>,
    },
}

/// One feature's position in the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStatus {
    /// Feature id.
    pub id: String,
    /// Feature name.
    pub name: String,
    /// Current phase.
    pub phase: Phase,
    /// Task counts.
    pub progress: TaskProgress,
    /// Percentage of tasks done.
    pub percentage: f64,
    /// The task `next` would hand out, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_task: Option<TaskId>,
}

impl FeatureStatus {
    pub(crate) fn of(feature: &Feature, next_task: Option<TaskId>) -> Self {
        let progress = TaskProgress::of(&feature.tasks);
        Self {
            id: feature.id.clone(),
            name: feature.name.clone(),
            phase: feature.phase,
            progress,
            percentage: progress.percentage(),
            next_task,
        }
    }
}

//! Error taxonomy shared by every engine operation.
//!
//! Each variant carries the feature, task or phase that caused it so the
//! caller never has to guess what to fix.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Phase, TaskId, TaskStatus};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// The task graph is malformed. Nothing may be mutated until it is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Two tasks share an id.
    #[error("duplicate task id '{0}'")]
    DuplicateTask(TaskId),

    /// A task depends on an id that is not in the graph.
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency {
        /// The task declaring the dependency.
        task: TaskId,
        /// The missing id.
        dependency: TaskId,
    },

    /// The dependency relation loops back on itself.
    #[error("dependency cycle: {}", format_chain(.0))]
    Cycle(Vec<TaskId>),

    /// A graph with no tasks cannot drive the tasks phase.
    #[error("task graph is empty")]
    EmptyGraph,
}

fn format_chain(chain: &[TaskId]) -> String {
    chain.iter().map(TaskId::as_str).collect::<Vec<_>>().join(" -> ")
}

/// A status change or mutation that the current state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The task id does not exist in the feature.
    #[error("feature {feature} has no task '{task}'")]
    UnknownTask {
        /// Feature id.
        feature: String,
        /// Requested task id.
        task: TaskId,
    },

    /// The requested status change would move the task backward or sideways.
    #[error("task '{task}' cannot move from {from} to {to}")]
    IllegalTransition {
        /// Task id.
        task: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The task cannot start or complete while dependencies are outstanding.
    #[error("task '{task}' has unfinished dependencies: {}", format_chain(.unsatisfied))]
    DependenciesUnmet {
        /// Task id.
        task: TaskId,
        /// Dependencies that are not completed or skipped.
        unsatisfied: Vec<TaskId>,
    },

    /// The feature is complete or archived.
    #[error("feature {feature} is {phase}; no further changes are allowed")]
    TerminalPhase {
        /// Feature id.
        feature: String,
        /// The terminal phase.
        phase: Phase,
    },

    /// The operation is not meaningful in the feature's current phase.
    #[error("feature {feature} is in phase {phase}; cannot {operation}")]
    PhaseMismatch {
        /// Feature id.
        feature: String,
        /// Current phase.
        phase: Phase,
        /// What was attempted.
        operation: &'static str,
    },

    /// Only completed or skipped tasks can be reset by a reopen.
    #[error("task '{task}' is {status}; only completed or skipped tasks can be reset")]
    TaskNotResettable {
        /// Task id.
        task: TaskId,
        /// Its current status.
        status: TaskStatus,
    },

    /// Feature names are kebab-case.
    #[error("invalid feature name '{0}': use lowercase letters, digits and hyphens")]
    InvalidFeatureName(String),
}

/// A phase change that the lifecycle rules reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feature {feature} cannot move from {from} to {to}: {reason}")]
pub struct TransitionError {
    /// Feature id.
    pub feature: String,
    /// Current phase.
    pub from: Phase,
    /// Requested phase.
    pub to: Phase,
    /// Why the move was rejected.
    pub reason: String,
}

/// The persisted document could not be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No state document exists for the feature.
    #[error("feature {feature} not found at {}", .path.display())]
    NotFound {
        /// Feature id.
        feature: String,
        /// Expected document path.
        path: PathBuf,
    },

    /// The document exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document was read but failed to parse or failed an integrity check.
    #[error("corrupt state document {}: {detail}", .path.display())]
    Corrupt {
        /// Document path.
        path: PathBuf,
        /// What was wrong with it.
        detail: String,
    },

    /// Writing the document failed; the previous version is still in place.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Someone else saved the feature since it was loaded.
    #[error("feature {feature} was modified concurrently (loaded version {expected}, stored version {found}); reload and retry")]
    Conflict {
        /// Feature id.
        feature: String,
        /// Version the caller loaded.
        expected: u64,
        /// Version currently on disk.
        found: u64,
    },

    /// Another writer holds the feature's lock file.
    #[error("feature {feature} is being written by another process; if none is running, remove {}", .path.display())]
    Locked {
        /// Feature id.
        feature: String,
        /// Lock file path.
        path: PathBuf,
    },

    /// The feature id is not a three-digit number.
    #[error("invalid feature id '{0}': expected three digits such as 001, optionally followed by -name")]
    InvalidId(String),

    /// A feature with this id already exists.
    #[error("feature {0} already exists")]
    AlreadyExists(String),
}

/// Any failure an engine operation can report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed task graph.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Illegal status change or mutation.
    #[error(transparent)]
    State(#[from] StateError),

    /// Rejected phase change.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

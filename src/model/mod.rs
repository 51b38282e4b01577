//! Persisted document types for features and their task graphs.
//!
//! These mirror the YAML state document one-to-one. Status and phase are
//! closed enums; anything else in the file is rejected at parse time.

mod feature;
mod phase;
mod task;
mod task_id;

pub use feature::{Feature, TaskGraph};
pub use phase::Phase;
pub use task::{Priority, Task, TaskDefinition, TaskStatus};
pub use task_id::TaskId;

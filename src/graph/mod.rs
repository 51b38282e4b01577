//! Computations over a feature's task graph.
//!
//! Everything here is a pure function of a [`TaskGraph`]: no I/O, no
//! clock, no hidden state. The engine loads a graph, asks these modules
//! questions, and persists whatever it decides to change.
//!
//! [`TaskGraph`]: crate::model::TaskGraph

pub mod bundle;
pub mod cycle;
pub mod progress;
pub mod readiness;
pub mod validate;

pub use bundle::{ContextBundle, DependencySummary};
pub use cycle::find_cycle;
pub use progress::TaskProgress;
pub use readiness::{BlockedTask, Readiness, ReadinessReport, Selection};
pub use validate::{problems, validate, validate_populated};

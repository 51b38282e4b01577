//! Feature phase state machine.
//!
//! ```text
//! new → spec → plan → tasks → implement → review → complete
//!                                                     ↓
//!                 (any phase) ───────────────────→ archived
//! ```
//!
//! `tasks → implement` fires on the first task start and
//! `implement → review` the moment every task is done. Everything else is
//! an explicit request checked by [`check_advance`] or [`check_reopen`].

use tracing::info;

use crate::error::{StateError, TransitionError};
use crate::graph::{validate_populated, ReadinessReport};
use crate::model::{Feature, Phase};

/// A phase change that was applied to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Phase before the change.
    pub from: Phase,
    /// Phase after the change.
    pub to: Phase,
}

fn reject(feature: &Feature, to: Phase, reason: impl Into<String>) -> TransitionError {
    TransitionError { feature: feature.id.clone(), from: feature.phase, to, reason: reason.into() }
}

/// Checks whether `feature` may move forward to `target`.
///
/// Without `force` only a single step is allowed and `review` requires
/// every task to be done. `force` permits any forward jump and skips the
/// all-done check. Neither form can move backward, leave `archived`, or
/// enter the task phases with an empty or invalid graph.
///
/// # Errors
///
/// Returns a [`TransitionError`] naming the reason the move was refused.
pub fn check_advance(feature: &Feature, target: Phase, force: bool) -> Result<(), TransitionError> {
    let current = feature.phase;

    if current == Phase::Archived {
        return Err(reject(feature, target, "feature is archived"));
    }
    if target == current {
        return if current.is_terminal() {
            Err(reject(feature, target, format!("feature is already {current}")))
        } else {
            Ok(())
        };
    }
    if target < current {
        return Err(reject(feature, target, "moving backward requires a reopen"));
    }
    if target == Phase::Archived {
        return Ok(());
    }
    if !force && current.next() != Some(target) {
        return Err(reject(
            feature,
            target,
            format!("next phase is {}; pass force to skip ahead", current.next().unwrap_or(current)),
        ));
    }

    if current < Phase::Tasks && target >= Phase::Tasks {
        validate_populated(&feature.tasks)
            .map_err(|e| reject(feature, target, format!("task graph not usable: {e}")))?;
    }

    if target >= Phase::Review && !force {
        let report = ReadinessReport::classify(&feature.tasks);
        if !report.all_done() {
            let open: Vec<String> = report
                .iter()
                .filter(|(_, r)| !matches!(r, crate::graph::Readiness::Done))
                .map(|(id, _)| id.to_string())
                .collect();
            return Err(reject(
                feature,
                target,
                format!("tasks not done: {}", open.join(", ")),
            ));
        }
    }

    Ok(())
}

/// Checks whether `feature` may be reopened to the earlier phase `target`.
///
/// # Errors
///
/// Returns a [`TransitionError`] if the feature is archived or `target` is
/// not strictly earlier than the current phase.
pub fn check_reopen(feature: &Feature, target: Phase) -> Result<(), TransitionError> {
    if feature.phase == Phase::Archived {
        return Err(reject(feature, target, "feature is archived"));
    }
    if target >= feature.phase {
        return Err(reject(feature, target, "reopen must move to an earlier phase"));
    }
    Ok(())
}

/// Rejects task mutations outside the `tasks` and `implement` phases.
///
/// # Errors
///
/// [`StateError::TerminalPhase`] for `complete`/`archived`, otherwise
/// [`StateError::PhaseMismatch`].
pub fn ensure_task_mutation(feature: &Feature, operation: &'static str) -> Result<(), StateError> {
    if feature.phase.is_terminal() {
        return Err(StateError::TerminalPhase { feature: feature.id.clone(), phase: feature.phase });
    }
    if !feature.phase.allows_task_mutation() {
        return Err(StateError::PhaseMismatch {
            feature: feature.id.clone(),
            phase: feature.phase,
            operation,
        });
    }
    Ok(())
}

/// Moves the feature to `to` and logs the change.
pub fn apply(feature: &mut Feature, to: Phase) -> PhaseChange {
    let change = PhaseChange { from: feature.phase, to };
    feature.phase = to;
    info!(feature = %feature.id, from = %change.from, to = %change.to, "phase changed");
    change
}

/// `tasks → implement` on the first task start. No-op in any other phase.
pub fn on_task_started(feature: &mut Feature) -> Option<PhaseChange> {
    (feature.phase == Phase::Tasks).then(|| apply(feature, Phase::Implement))
}

/// `implement → review` once every task is done. No-op in any other phase.
pub fn on_all_complete(feature: &mut Feature) -> Option<PhaseChange> {
    (feature.phase == Phase::Implement).then(|| apply(feature, Phase::Review))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Task, TaskDefinition, TaskGraph, TaskStatus};
    use chrono::Utc;

    fn feature(phase: Phase, tasks: Vec<Task>) -> Feature {
        Feature {
            id: "001".into(),
            name: "auth".into(),
            description: String::new(),
            phase,
            branch_ref: "001-auth".into(),
            workspace_ref: "worktrees/001-auth".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
            tasks: TaskGraph::new(tasks),
        }
    }

    fn task(id: &str, deps: &[&str], status: TaskStatus) -> Task {
        let mut task: Task = TaskDefinition {
            id: id.into(),
            name: id.to_string(),
            description: String::new(),
            priority: Priority::P2,
            depends_on: deps.iter().map(|d| (*d).into()).collect(),
            context_hints: vec![],
        }
        .into();
        task.status = status;
        task
    }

    #[test]
    fn single_forward_step_is_allowed() {
        assert!(check_advance(&feature(Phase::New, vec![]), Phase::Spec, false).is_ok());
        assert!(check_advance(&feature(Phase::Spec, vec![]), Phase::Plan, false).is_ok());
    }

    #[test]
    fn skipping_ahead_needs_force() {
        let f = feature(Phase::New, vec![]);
        let err = check_advance(&f, Phase::Plan, false).unwrap_err();
        assert!(err.reason.contains("next phase is spec"));
        assert!(check_advance(&f, Phase::Plan, true).is_ok());
    }

    #[test]
    fn tasks_phase_requires_populated_valid_graph() {
        let empty = feature(Phase::Plan, vec![]);
        let err = check_advance(&empty, Phase::Tasks, false).unwrap_err();
        assert!(err.reason.contains("task graph is empty"));
        // Force does not bypass graph validity.
        assert!(check_advance(&empty, Phase::Tasks, true).is_err());

        let cyclic = feature(
            Phase::Plan,
            vec![
                task("T1", &["T2"], TaskStatus::Pending),
                task("T2", &["T1"], TaskStatus::Pending),
            ],
        );
        let err = check_advance(&cyclic, Phase::Tasks, false).unwrap_err();
        assert!(err.reason.contains("T1 -> T2 -> T1"));

        let ok = feature(Phase::Plan, vec![task("T1", &[], TaskStatus::Pending)]);
        assert!(check_advance(&ok, Phase::Tasks, false).is_ok());
    }

    #[test]
    fn review_requires_all_done_unless_forced() {
        let f = feature(
            Phase::Implement,
            vec![task("T1", &[], TaskStatus::Completed), task("T2", &[], TaskStatus::Pending)],
        );
        let err = check_advance(&f, Phase::Review, false).unwrap_err();
        assert!(err.reason.contains("T2"));
        assert!(check_advance(&f, Phase::Review, true).is_ok());
    }

    #[test]
    fn backward_moves_are_rejected() {
        let f = feature(Phase::Implement, vec![task("T1", &[], TaskStatus::Pending)]);
        let err = check_advance(&f, Phase::Plan, true).unwrap_err();
        assert!(err.reason.contains("reopen"));
    }

    #[test]
    fn terminal_phases() {
        let complete = feature(Phase::Complete, vec![]);
        assert!(check_advance(&complete, Phase::Complete, false).is_err());
        assert!(check_advance(&complete, Phase::Archived, false).is_ok());

        let archived = feature(Phase::Archived, vec![]);
        for target in Phase::ALL {
            assert!(check_advance(&archived, target, true).is_err());
        }
        assert!(check_reopen(&archived, Phase::Plan).is_err());
    }

    #[test]
    fn archive_is_reachable_from_any_live_phase() {
        for phase in [Phase::New, Phase::Plan, Phase::Implement, Phase::Review] {
            assert!(check_advance(&feature(phase, vec![]), Phase::Archived, false).is_ok());
        }
    }

    #[test]
    fn reopen_must_go_backward() {
        let f = feature(Phase::Review, vec![]);
        assert!(check_reopen(&f, Phase::Implement).is_ok());
        assert!(check_reopen(&f, Phase::Review).is_err());
        assert!(check_reopen(&f, Phase::Complete).is_err());
    }

    #[test]
    fn task_mutation_phases() {
        assert!(ensure_task_mutation(&feature(Phase::Tasks, vec![]), "start a task").is_ok());
        assert!(ensure_task_mutation(&feature(Phase::Implement, vec![]), "start a task").is_ok());
        assert!(matches!(
            ensure_task_mutation(&feature(Phase::Plan, vec![]), "start a task"),
            Err(StateError::PhaseMismatch { .. })
        ));
        assert!(matches!(
            ensure_task_mutation(&feature(Phase::Archived, vec![]), "start a task"),
            Err(StateError::TerminalPhase { .. })
        ));
    }

    #[test]
    fn automatic_transitions_fire_only_from_their_phase() {
        let mut f = feature(Phase::Tasks, vec![]);
        assert_eq!(
            on_task_started(&mut f),
            Some(PhaseChange { from: Phase::Tasks, to: Phase::Implement })
        );
        assert_eq!(on_task_started(&mut f), None);
        assert_eq!(
            on_all_complete(&mut f),
            Some(PhaseChange { from: Phase::Implement, to: Phase::Review })
        );
        assert_eq!(on_all_complete(&mut f), None);
        assert_eq!(f.phase, Phase::Review);
    }
}

//! The task dependency engine.
//!
//! Every operation is one synchronous step: load the feature, check the
//! request against the lifecycle rules and the task graph, mutate a copy,
//! and persist it with a single versioned save. Nothing is written unless
//! every check passes, so a rejected request leaves the stored document
//! exactly as it was.

mod action;

pub use action::{FeatureStatus, NextAction};

use std::path::Path;

use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::context::ServiceContext;
use crate::error::{EngineError, Result, StateError};
use crate::graph::{validate, validate_populated, ContextBundle, Readiness, ReadinessReport, Selection};
use crate::lifecycle;
use crate::model::{Feature, Phase, TaskDefinition, TaskGraph, TaskId, TaskStatus};
use crate::store::FeatureStore;

/// Drives features through their lifecycle and hands out tasks.
pub struct Engine<'a> {
    ctx: &'a ServiceContext,
    store: FeatureStore<'a>,
    config: ProjectConfig,
}

impl<'a> Engine<'a> {
    /// Opens the store at `root`, reading `projspec.yaml` if present.
    ///
    /// # Errors
    ///
    /// Returns a store error if the config exists but is unreadable or corrupt.
    pub fn open(ctx: &'a ServiceContext, root: &Path) -> Result<Self> {
        let config = ProjectConfig::load(ctx, root)?;
        Ok(Self::with_config(ctx, root, config))
    }

    /// Creates an engine with an explicit config.
    #[must_use]
    pub fn with_config(ctx: &'a ServiceContext, root: &Path, config: ProjectConfig) -> Self {
        Self { ctx, store: FeatureStore::new(ctx, root), config }
    }

    /// The project config in effect.
    #[must_use]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Loads a feature as stored.
    ///
    /// # Errors
    ///
    /// Returns a store error if the feature is missing or unreadable.
    pub fn feature(&self, feature_id: &str) -> Result<Feature> {
        Ok(self.store.load(feature_id)?)
    }

    /// Creates a feature in phase `new` with the next free id.
    ///
    /// # Errors
    ///
    /// [`StateError::InvalidFeatureName`] unless `name` is kebab-case, or a
    /// store error.
    pub fn create_feature(&self, name: &str, description: &str) -> Result<Feature> {
        if !is_kebab_case(name) {
            return Err(StateError::InvalidFeatureName(name.to_string()).into());
        }
        let id = self.store.next_id()?;
        let full_name = format!("{id}-{name}");
        let base = self.config.worktrees.base_path.trim_end_matches('/');
        let now = self.ctx.clock.now();
        let feature = Feature {
            id,
            name: name.to_string(),
            description: description.to_string(),
            phase: Phase::New,
            branch_ref: full_name.clone(),
            workspace_ref: format!("{base}/{full_name}"),
            created_at: now,
            updated_at: now,
            version: 0,
            tasks: TaskGraph::default(),
        };
        let created = self.store.create(&feature)?;
        info!(feature = %created.id, name = %created.name, "created feature");
        Ok(created)
    }

    /// Replaces the feature's task graph with freshly defined tasks, all
    /// `pending`.
    ///
    /// Allowed in `plan`, and in `tasks` while no task has been started.
    ///
    /// # Errors
    ///
    /// A state error in any other phase, or a structural error if the new
    /// graph is empty or invalid.
    pub fn populate_tasks(&self, feature_id: &str, definitions: Vec<TaskDefinition>) -> Result<Feature> {
        let mut feature = self.store.load(feature_id)?;
        let untouched = feature.tasks.iter().all(|t| t.status == TaskStatus::Pending);
        match feature.phase {
            Phase::Plan => {}
            Phase::Tasks if untouched => {}
            phase if phase.is_terminal() => {
                return Err(StateError::TerminalPhase { feature: feature.id, phase }.into());
            }
            phase => {
                return Err(StateError::PhaseMismatch {
                    feature: feature.id,
                    phase,
                    operation: "replace the task graph",
                }
                .into());
            }
        }

        feature.tasks = TaskGraph::new(definitions.into_iter().map(Into::into).collect());
        validate_populated(&feature.tasks)?;
        let saved = self.store.save(&feature)?;
        info!(feature = %saved.id, tasks = saved.tasks.len(), "populated task graph");
        Ok(saved)
    }

    /// Moves the feature forward to `target`. Requesting the current phase
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// A [`TransitionError`](crate::error::TransitionError) if the lifecycle
    /// rules reject the move, or a store error.
    pub fn advance_phase(&self, feature_id: &str, target: Phase, force: bool) -> Result<Feature> {
        let mut feature = self.store.load(feature_id)?;
        lifecycle::check_advance(&feature, target, force)?;
        if feature.phase == target {
            return Ok(feature);
        }
        lifecycle::apply(&mut feature, target);
        Ok(self.store.save(&feature)?)
    }

    /// Moves the feature back to the earlier phase `target`, returning each
    /// task in `reset` to `pending`.
    ///
    /// # Errors
    ///
    /// A transition error if `target` is not earlier or the feature is
    /// archived; a state error if a reset task is unknown or not done; a
    /// structural error if the graph is invalid.
    pub fn reopen(&self, feature_id: &str, target: Phase, reset: &[TaskId]) -> Result<Feature> {
        let mut feature = self.store.load(feature_id)?;
        lifecycle::check_reopen(&feature, target)?;

        for id in reset {
            let Some(task) = feature.tasks.get_mut(id) else {
                return Err(unknown_task(&feature.id, id));
            };
            if !task.status.is_done() {
                return Err(StateError::TaskNotResettable { task: id.clone(), status: task.status }.into());
            }
            task.reset();
            info!(feature = %feature.id, task = %id, "reset task to pending");
        }

        lifecycle::apply(&mut feature, target);
        if target >= Phase::Tasks {
            validate_populated(&feature.tasks)?;
        } else {
            validate(&feature.tasks)?;
        }
        Ok(self.store.save(&feature)?)
    }

    /// Recommends the next unit of work.
    ///
    /// Task statuses are never changed here, so repeated calls without an
    /// intervening mutation return the same action. The only side effects
    /// are the automatic phase changes: `tasks → implement` when a task is
    /// handed out and `implement → review` once everything is done.
    ///
    /// # Errors
    ///
    /// A phase mismatch before `tasks`, a structural error if the graph is
    /// invalid, or a store error. Recommending a task that could not then be
    /// started or completed is refused the same way `start_task` would be:
    /// terminal phases give [`StateError::TerminalPhase`] and `review` gives
    /// [`StateError::PhaseMismatch`].
    pub fn next_action(&self, feature_id: &str) -> Result<NextAction> {
        let mut feature = self.store.load(feature_id)?;
        if feature.phase < Phase::Tasks {
            return Err(StateError::PhaseMismatch {
                feature: feature.id,
                phase: feature.phase,
                operation: "choose the next task",
            }
            .into());
        }
        validate_populated(&feature.tasks)?;

        let selection = ReadinessReport::classify(&feature.tasks).select();
        if matches!(selection, Selection::Resume { .. } | Selection::Start { .. }) {
            lifecycle::ensure_task_mutation(&feature, "hand out a task")?;
        }
        let change = match &selection {
            Selection::Resume { .. } | Selection::Start { .. } => lifecycle::on_task_started(&mut feature),
            Selection::AllComplete => lifecycle::on_all_complete(&mut feature),
            Selection::Blocked { .. } => None,
        };
        if change.is_some() {
            feature = self.store.save(&feature)?;
        }

        let action = match selection {
            Selection::Resume { task_id, also_active } => {
                if !also_active.is_empty() {
                    warn!(
                        feature = %feature.id,
                        resuming = %task_id,
                        also_active = ?also_active,
                        "more than one task is in progress"
                    );
                }
                let bundle = bundle_for(&feature, &task_id)?;
                NextAction::ResumeTask { task_id, bundle, also_active }
            }
            Selection::Start { task_id } => {
                let bundle = bundle_for(&feature, &task_id)?;
                NextAction::StartTask { task_id, bundle }
            }
            Selection::AllComplete => NextAction::AllComplete,
            Selection::Blocked { tasks } => {
                warn!(
                    feature = %feature.id,
                    blocked = tasks.len(),
                    "no task is ready or in progress but work remains"
                );
                NextAction::Blocked { tasks }
            }
        };
        Ok(action)
    }

    /// Marks a ready task `in_progress` and returns its context bundle.
    ///
    /// # Errors
    ///
    /// A state error if the phase forbids task changes, the task is unknown
    /// or not pending, or its dependencies are unmet.
    pub fn start_task(&self, feature_id: &str, task_id: &TaskId) -> Result<ContextBundle> {
        let mut feature = self.load_for_task_change(feature_id, "start a task")?;

        match ReadinessReport::classify(&feature.tasks).get(task_id) {
            None => return Err(unknown_task(&feature.id, task_id)),
            Some(Readiness::Ready) => {}
            Some(Readiness::Blocked { unsatisfied }) => {
                return Err(StateError::DependenciesUnmet {
                    task: task_id.clone(),
                    unsatisfied: unsatisfied.clone(),
                }
                .into());
            }
            Some(Readiness::Active | Readiness::Done) => {
                let from = feature.tasks.get(task_id).map_or(TaskStatus::Pending, |t| t.status);
                return Err(illegal(task_id, from, TaskStatus::InProgress));
            }
        }

        let now = self.ctx.clock.now();
        if let Some(task) = feature.tasks.get_mut(task_id) {
            task.status = TaskStatus::InProgress;
            task.started_at = Some(now);
        }
        lifecycle::on_task_started(&mut feature);
        let saved = self.store.save(&feature)?;
        info!(feature = %saved.id, task = %task_id, "task started");
        bundle_for(&saved, task_id)
    }

    /// Records that a task finished, storing the execution agent's summary.
    ///
    /// A completion needs every dependency done; a skip is accepted from
    /// `pending` or `in_progress` regardless.
    ///
    /// # Errors
    ///
    /// A state error if the phase forbids task changes, the task is unknown,
    /// already done, or (for a completion) has unmet dependencies.
    pub fn record_completion(
        &self,
        feature_id: &str,
        task_id: &TaskId,
        summary: &str,
        skipped: bool,
    ) -> Result<Feature> {
        let operation = if skipped { "skip a task" } else { "complete a task" };
        let mut feature = self.load_for_task_change(feature_id, operation)?;
        let target = if skipped { TaskStatus::Skipped } else { TaskStatus::Completed };

        let Some(task) = feature.tasks.get(task_id) else {
            return Err(unknown_task(&feature.id, task_id));
        };
        if !task.status.can_advance_to(target) {
            return Err(illegal(task_id, task.status, target));
        }
        if !skipped {
            if let Some(Readiness::Blocked { unsatisfied }) =
                ReadinessReport::classify(&feature.tasks).get(task_id)
            {
                return Err(StateError::DependenciesUnmet {
                    task: task_id.clone(),
                    unsatisfied: unsatisfied.clone(),
                }
                .into());
            }
        }

        let now = self.ctx.clock.now();
        if let Some(task) = feature.tasks.get_mut(task_id) {
            task.status = target;
            task.summary = (!summary.is_empty()).then(|| summary.to_string());
            task.completed_at = Some(now);
        }
        lifecycle::on_task_started(&mut feature);
        let saved = self.store.save(&feature)?;
        info!(feature = %saved.id, task = %task_id, status = %target, "task finished");
        Ok(saved)
    }

    /// Checks the stored graph for structural problems.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem, or a store error.
    pub fn validate_graph(&self, feature_id: &str) -> Result<()> {
        let feature = self.store.load(feature_id)?;
        validate(&feature.tasks)?;
        Ok(())
    }

    /// Phase, progress and next task for one feature.
    ///
    /// # Errors
    ///
    /// Returns a store error if the feature cannot be loaded.
    pub fn status(&self, feature_id: &str) -> Result<FeatureStatus> {
        let feature = self.store.load(feature_id)?;
        Ok(status_of(&feature))
    }

    /// Status of every stored feature, in id order.
    ///
    /// # Errors
    ///
    /// Returns a store error if any feature cannot be loaded.
    pub fn status_all(&self) -> Result<Vec<FeatureStatus>> {
        self.store
            .list()?
            .iter()
            .map(|id| Ok(status_of(&self.store.load(id)?)))
            .collect()
    }

    fn load_for_task_change(&self, feature_id: &str, operation: &'static str) -> Result<Feature> {
        let feature = self.store.load(feature_id)?;
        lifecycle::ensure_task_mutation(&feature, operation)?;
        validate_populated(&feature.tasks)?;
        Ok(feature)
    }
}

fn status_of(feature: &Feature) -> FeatureStatus {
    let next = if feature.phase.allows_task_mutation() && validate(&feature.tasks).is_ok() {
        match ReadinessReport::classify(&feature.tasks).select() {
            Selection::Resume { task_id, .. } | Selection::Start { task_id } => Some(task_id),
            Selection::AllComplete | Selection::Blocked { .. } => None,
        }
    } else {
        None
    };
    FeatureStatus::of(feature, next)
}

fn bundle_for(feature: &Feature, task_id: &TaskId) -> Result<ContextBundle> {
    ContextBundle::build(&feature.tasks, task_id).ok_or_else(|| unknown_task(&feature.id, task_id))
}

fn unknown_task(feature: &str, task: &TaskId) -> EngineError {
    StateError::UnknownTask { feature: feature.to_string(), task: task.clone() }.into()
}

fn illegal(task: &TaskId, from: TaskStatus, to: TaskStatus) -> EngineError {
    StateError::IllegalTransition { task: task.clone(), from, to }.into()
}

/// Lowercase letters, digits and single hyphens between them.
fn is_kebab_case(name: &str) -> bool {
    !name.is_empty()
        && name.split('-').all(|part| {
            !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FixedClock, MemoryFileSystem};
    use crate::error::{StoreError, StructuralError};
    use crate::model::Priority;
    use crate::ports::Clock;
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        ctx: ServiceContext,
        clock: FixedClock,
        fs: MemoryFileSystem,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap());
            let fs = MemoryFileSystem::new();
            let ctx = ServiceContext::new(Box::new(clock.clone()), Box::new(fs.clone()));
            Self { ctx, clock, fs }
        }

        fn engine(&self) -> Engine<'_> {
            Engine::open(&self.ctx, Path::new("/proj/.projspec")).unwrap()
        }
    }

    fn def(id: &str, deps: &[&str]) -> TaskDefinition {
        TaskDefinition {
            id: id.into(),
            name: format!("Task {id}"),
            description: format!("Implement {id}"),
            priority: Priority::P2,
            depends_on: deps.iter().map(|d| TaskId::from(*d)).collect(),
            context_hints: vec![format!("src/{}.rs", id.to_lowercase())],
        }
    }

    /// A feature in phase `tasks` with T1 → {T2, T3}.
    fn feature_in_tasks(engine: &Engine<'_>) -> String {
        let feature = engine.create_feature("user-auth", "Login flow").unwrap();
        engine.advance_phase(&feature.id, Phase::Plan, true).unwrap();
        engine
            .populate_tasks(&feature.id, vec![def("T1", &[]), def("T2", &["T1"]), def("T3", &["T1"])])
            .unwrap();
        engine.advance_phase(&feature.id, Phase::Tasks, false).unwrap();
        feature.id
    }

    #[test]
    fn create_feature_assigns_ids_and_refs() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let first = engine.create_feature("user-auth", "Login").unwrap();
        let second = engine.create_feature("billing", "").unwrap();

        assert_eq!(first.id, "001");
        assert_eq!(second.id, "002");
        assert_eq!(first.phase, Phase::New);
        assert_eq!(first.version, 1);
        assert_eq!(first.branch_ref, "001-user-auth");
        assert_eq!(first.workspace_ref, "./worktrees/001-user-auth");
    }

    #[test]
    fn create_feature_uses_configured_worktree_base() {
        let fx = Fixture::new();
        let mut config = ProjectConfig::default();
        config.worktrees.base_path = "/tmp/wt/".into();
        let engine = Engine::with_config(&fx.ctx, Path::new("/proj/.projspec"), config);
        let feature = engine.create_feature("search", "").unwrap();
        assert_eq!(feature.workspace_ref, "/tmp/wt/001-search");
    }

    #[test]
    fn feature_names_must_be_kebab_case() {
        let fx = Fixture::new();
        let engine = fx.engine();
        for bad in ["", "User-Auth", "user auth", "-auth", "auth-", "a--b", "auth_x"] {
            assert!(
                matches!(
                    engine.create_feature(bad, ""),
                    Err(EngineError::State(StateError::InvalidFeatureName(_)))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert!(engine.create_feature("oauth2-login", "").is_ok());
    }

    #[test]
    fn populate_is_rejected_outside_plan_and_untouched_tasks() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let feature = engine.create_feature("auth", "").unwrap();
        let err = engine.populate_tasks(&feature.id, vec![def("T1", &[])]).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::PhaseMismatch { phase: Phase::New, .. })));

        let id = feature_in_tasks(&engine);
        engine.populate_tasks(&id, vec![def("T1", &[])]).unwrap();
        engine.start_task(&id, &"T1".into()).unwrap();
        let err = engine.populate_tasks(&id, vec![def("T1", &[])]).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::PhaseMismatch { .. })));
    }

    #[test]
    fn populate_rejects_invalid_graph_atomically() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        let before = engine.feature(&id).unwrap();

        let err = engine
            .populate_tasks(&id, vec![def("T1", &["T2"]), def("T2", &["T1"])])
            .unwrap_err();
        assert!(matches!(err, EngineError::Structural(StructuralError::Cycle(_))));
        let err = engine.populate_tasks(&id, vec![]).unwrap_err();
        assert!(matches!(err, EngineError::Structural(StructuralError::EmptyGraph)));
        let err = engine.populate_tasks(&id, vec![def("T1", &["T7"])]).unwrap_err();
        assert!(matches!(err, EngineError::Structural(StructuralError::UnknownDependency { .. })));

        assert_eq!(engine.feature(&id).unwrap(), before);
    }

    #[test]
    fn next_action_before_tasks_is_a_phase_mismatch() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let feature = engine.create_feature("auth", "").unwrap();
        let err = engine.next_action(&feature.id).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::PhaseMismatch { .. })));
    }

    #[test]
    fn next_action_moves_tasks_to_implement_without_touching_tasks() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);

        let action = engine.next_action(&id).unwrap();
        assert!(matches!(&action, NextAction::StartTask { task_id, .. } if task_id.as_str() == "T1"));

        let feature = engine.feature(&id).unwrap();
        assert_eq!(feature.phase, Phase::Implement);
        assert!(feature.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[test]
    fn next_action_refuses_tasks_it_could_not_hand_out() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        engine.advance_phase(&id, Phase::Archived, false).unwrap();
        let before = engine.feature(&id).unwrap();

        let err = engine.next_action(&id).unwrap_err();
        assert!(matches!(
            err,
            EngineError::State(StateError::TerminalPhase { phase: Phase::Archived, .. })
        ));
        assert_eq!(engine.feature(&id).unwrap(), before);

        let forced = feature_in_tasks(&engine);
        engine.advance_phase(&forced, Phase::Review, true).unwrap();
        let err = engine.next_action(&forced).unwrap_err();
        assert!(matches!(
            err,
            EngineError::State(StateError::PhaseMismatch { phase: Phase::Review, .. })
        ));
    }

    #[test]
    fn next_action_reports_all_complete_after_archive() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        for task in ["T1", "T2", "T3"] {
            engine.record_completion(&id, &task.into(), "", false).unwrap();
        }
        engine.advance_phase(&id, Phase::Archived, false).unwrap();
        assert_eq!(engine.next_action(&id).unwrap(), NextAction::AllComplete);
        assert_eq!(engine.feature(&id).unwrap().phase, Phase::Archived);
    }

    #[test]
    fn start_task_sets_status_and_timestamp() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        fx.clock.advance(Duration::minutes(5));

        let bundle = engine.start_task(&id, &"T1".into()).unwrap();
        assert_eq!(bundle.task_id.as_str(), "T1");
        assert_eq!(bundle.hints, vec!["src/t1.rs"]);

        let feature = engine.feature(&id).unwrap();
        let t1 = feature.tasks.get(&"T1".into()).unwrap();
        assert_eq!(t1.status, TaskStatus::InProgress);
        assert_eq!(t1.started_at, Some(fx.clock.now()));
        assert_eq!(feature.phase, Phase::Implement);
    }

    #[test]
    fn start_task_rejects_blocked_and_unknown() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);

        let err = engine.start_task(&id, &"T2".into()).unwrap_err();
        assert_eq!(err.to_string(), "task 'T2' has unfinished dependencies: T1");
        let err = engine.start_task(&id, &"T9".into()).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::UnknownTask { .. })));

        engine.start_task(&id, &"T1".into()).unwrap();
        let err = engine.start_task(&id, &"T1".into()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::State(StateError::IllegalTransition { from: TaskStatus::InProgress, .. })
        ));
    }

    #[test]
    fn completion_requires_dependencies_but_skip_does_not() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);

        let err = engine.record_completion(&id, &"T2".into(), "done", false).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::DependenciesUnmet { .. })));

        let feature = engine.record_completion(&id, &"T2".into(), "not needed", true).unwrap();
        let t2 = feature.tasks.get(&"T2".into()).unwrap();
        assert_eq!(t2.status, TaskStatus::Skipped);
        assert_eq!(t2.summary.as_deref(), Some("not needed"));
        assert!(t2.completed_at.is_some());
    }

    #[test]
    fn completed_task_cannot_restart_and_store_is_unchanged() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        engine.start_task(&id, &"T1".into()).unwrap();
        engine.record_completion(&id, &"T1".into(), "- wrote it", false).unwrap();
        let before = engine.feature(&id).unwrap();

        assert!(engine.start_task(&id, &"T1".into()).is_err());
        assert!(engine.record_completion(&id, &"T1".into(), "again", true).is_err());
        assert_eq!(engine.feature(&id).unwrap(), before);
    }

    #[test]
    fn task_changes_rejected_in_terminal_phases() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        engine.advance_phase(&id, Phase::Archived, false).unwrap();

        for result in [
            engine.start_task(&id, &"T1".into()).map(|_| ()),
            engine.record_completion(&id, &"T1".into(), "", true).map(|_| ()),
            engine.populate_tasks(&id, vec![def("T1", &[])]).map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(EngineError::State(StateError::TerminalPhase { phase: Phase::Archived, .. }))
            ));
        }
        assert!(matches!(
            engine.advance_phase(&id, Phase::Review, true),
            Err(EngineError::InvalidTransition(_))
        ));
    }

    #[test]
    fn advancing_to_current_phase_does_not_save() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let feature = engine.create_feature("auth", "").unwrap();
        let same = engine.advance_phase(&feature.id, Phase::New, false).unwrap();
        assert_eq!(same.version, feature.version);
    }

    #[test]
    fn reopen_resets_chosen_tasks_only() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        engine.record_completion(&id, &"T1".into(), "base", false).unwrap();
        engine.record_completion(&id, &"T2".into(), "two", false).unwrap();
        engine.record_completion(&id, &"T3".into(), "three", false).unwrap();
        assert_eq!(engine.next_action(&id).unwrap(), NextAction::AllComplete);
        assert_eq!(engine.feature(&id).unwrap().phase, Phase::Review);

        let feature = engine.reopen(&id, Phase::Implement, &["T3".into()]).unwrap();
        assert_eq!(feature.phase, Phase::Implement);
        let t3 = feature.tasks.get(&"T3".into()).unwrap();
        assert_eq!(t3.status, TaskStatus::Pending);
        assert_eq!(t3.summary, None);
        assert_eq!(t3.completed_at, None);
        assert_eq!(feature.tasks.get(&"T2".into()).unwrap().summary.as_deref(), Some("two"));

        assert!(matches!(
            engine.next_action(&id).unwrap(),
            NextAction::StartTask { task_id, .. } if task_id.as_str() == "T3"
        ));
    }

    #[test]
    fn reopen_rejects_unfinished_or_unknown_tasks() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        engine.start_task(&id, &"T1".into()).unwrap();

        let err = engine.reopen(&id, Phase::Tasks, &["T1".into()]).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::TaskNotResettable { .. })));
        let err = engine.reopen(&id, Phase::Tasks, &["T8".into()]).unwrap_err();
        assert!(matches!(err, EngineError::State(StateError::UnknownTask { .. })));
        assert_eq!(engine.feature(&id).unwrap().phase, Phase::Implement);
    }

    #[test]
    fn status_reports_progress_and_next_task() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        engine.record_completion(&id, &"T1".into(), "", false).unwrap();
        engine.create_feature("billing", "").unwrap();

        let status = engine.status(&id).unwrap();
        assert_eq!(status.progress.completed, 1);
        assert_eq!(status.progress.total, 3);
        assert_eq!(status.next_task, Some("T2".into()));

        let all = engine.status_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].phase, Phase::New);
        assert_eq!(all[1].next_task, None);
    }

    #[test]
    fn failed_save_surfaces_and_keeps_state() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = feature_in_tasks(&engine);
        let before = engine.feature(&id).unwrap();

        fx.fs.fail_writes(true);
        let err = engine.start_task(&id, &"T1".into()).unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::WriteFailed { .. })));
        fx.fs.fail_writes(false);
        assert_eq!(engine.feature(&id).unwrap(), before);
    }
}

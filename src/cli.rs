//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::{Phase, TaskId};

/// Top-level CLI parser for `projspec`.
#[derive(Debug, Parser)]
#[command(name = "projspec", version, about = "Drive features through phases and hand out tasks in dependency order")]
pub struct Cli {
    /// Log at debug level (overrides `PROJSPEC_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a default projspec.yaml into the store root.
    Init,

    /// Create a feature in phase `new`.
    New {
        /// Kebab-case feature name (e.g. `user-auth`).
        name: String,
        /// Free-text description.
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Load a task graph from a YAML file.
    Tasks {
        /// Feature id (`001` or `001-user-auth`).
        feature: String,
        /// YAML file with the task definitions.
        file: PathBuf,
    },

    /// Move a feature forward to a later phase.
    Advance {
        /// Feature id.
        feature: String,
        /// Target phase.
        phase: Phase,
        /// Allow skipping phases and the all-tasks-done check.
        #[arg(long)]
        force: bool,
    },

    /// Move a feature back to an earlier phase.
    Reopen {
        /// Feature id.
        feature: String,
        /// Target phase.
        phase: Phase,
        /// Completed or skipped task to return to pending. Repeatable.
        #[arg(long = "reset", value_name = "TASK")]
        reset: Vec<TaskId>,
    },

    /// Show the next task to work on with its context.
    Next {
        /// Feature id.
        feature: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Mark a ready task as in progress.
    Start {
        /// Feature id.
        feature: String,
        /// Task id.
        task: TaskId,
    },

    /// Record that a task is finished.
    Complete {
        /// Feature id.
        feature: String,
        /// Task id.
        task: TaskId,
        /// What was done, for the tasks that depend on this one.
        #[arg(short, long)]
        summary: String,
        /// Record the task as skipped rather than completed.
        #[arg(long)]
        skip: bool,
    },

    /// Check a feature's task graph for structural problems.
    Validate {
        /// Feature id.
        feature: String,
    },

    /// Show phase and progress for one feature or all of them.
    Status {
        /// Feature id; omit for every feature.
        feature: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print a feature's stored state document.
    Show {
        /// Feature id.
        feature: String,
    },
}

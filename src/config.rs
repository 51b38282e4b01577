//! Project configuration (`projspec.yaml`) and store location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::ServiceContext;
use crate::error::StoreError;

/// Environment variable overriding the store root.
pub const STORE_ENV: &str = "PROJSPEC_STORE";

/// Store root used when [`STORE_ENV`] is unset.
pub const DEFAULT_STORE: &str = ".projspec";

/// File name of the project configuration inside the store root.
pub const CONFIG_FILE: &str = "projspec.yaml";

/// Resolves the store root from the environment.
#[must_use]
pub fn store_root() -> PathBuf {
    std::env::var(STORE_ENV).map_or_else(|_| PathBuf::from(DEFAULT_STORE), PathBuf::from)
}

/// Project identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Display name; defaults to the working directory's name when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Where feature worktrees live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorktreesSection {
    /// Base directory for per-feature worktrees.
    #[serde(default = "default_worktree_base")]
    pub base_path: String,
}

impl Default for WorktreesSection {
    fn default() -> Self {
        Self { base_path: default_worktree_base() }
    }
}

fn default_worktree_base() -> String {
    "./worktrees".to_string()
}

/// Files shown alongside every context bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSection {
    /// Paths the execution agent should always read.
    #[serde(default = "default_always_include")]
    pub always_include: Vec<String>,
}

impl Default for ContextSection {
    fn default() -> Self {
        Self { always_include: default_always_include() }
    }
}

fn default_always_include() -> Vec<String> {
    vec!["CLAUDE.md".to_string()]
}

/// Contents of `projspec.yaml`. Every section is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Schema version, `major.minor`.
    pub version: String,
    /// Project identity.
    #[serde(default)]
    pub project: ProjectSection,
    /// Worktree layout.
    #[serde(default)]
    pub worktrees: WorktreesSection,
    /// Context settings.
    #[serde(default)]
    pub context: ContextSection,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            project: ProjectSection::default(),
            worktrees: WorktreesSection::default(),
            context: ContextSection::default(),
        }
    }
}

impl ProjectConfig {
    /// Loads `<root>/projspec.yaml`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unreadable`] or [`StoreError::Corrupt`] if the
    /// file exists but cannot be read or parsed.
    pub fn load(ctx: &ServiceContext, root: &Path) -> Result<Self, StoreError> {
        let path = root.join(CONFIG_FILE);
        if !ctx.fs.exists(&path) {
            return Ok(Self::default());
        }
        let contents = ctx
            .fs
            .read_to_string(&path)
            .map_err(|source| StoreError::Unreadable { path: path.clone(), source })?;
        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| StoreError::Corrupt { path: path.clone(), detail: e.to_string() })?;
        if !is_version(&config.version) {
            return Err(StoreError::Corrupt {
                path,
                detail: format!("version '{}' is not major.minor", config.version),
            });
        }
        Ok(config)
    }

    /// Writes this config to `<root>/projspec.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if a config is already present,
    /// or [`StoreError::WriteFailed`] if writing fails.
    pub fn init(&self, ctx: &ServiceContext, root: &Path) -> Result<PathBuf, StoreError> {
        let path = root.join(CONFIG_FILE);
        if ctx.fs.exists(&path) {
            return Err(StoreError::AlreadyExists(path.display().to_string()));
        }
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| StoreError::Corrupt { path: path.clone(), detail: e.to_string() })?;
        ctx.fs
            .write_atomic(&path, &yaml)
            .map_err(|source| StoreError::WriteFailed { path: path.clone(), source })?;
        Ok(path)
    }
}

fn is_version(v: &str) -> bool {
    v.split_once('.').is_some_and(|(major, minor)| {
        !major.is_empty()
            && !minor.is_empty()
            && major.bytes().all(|b| b.is_ascii_digit())
            && minor.bytes().all(|b| b.is_ascii_digit())
    })
}

//! Feature store: persistence for feature state documents.
//!
//! One YAML document per feature, holding the feature's phase and its
//! whole task graph. All I/O goes through the `FileSystem` port:
//!
//! ```text
//! <root>/
//!   ├── projspec.yaml
//!   └── features/
//!       ├── 001.yaml
//!       └── 002.yaml
//! ```
//!
//! Saves are validated, version-checked and atomic. A save whose loaded
//! version no longer matches the stored one is rejected as a conflict
//! instead of overwriting someone else's update. The version check and the
//! replace happen while holding `features/<id>.lock`, created exclusively,
//! so two writers cannot both pass the check.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::error::{EngineError, StoreError};
use crate::graph::validate;
use crate::model::Feature;
use crate::ports::FileSystem;

/// Persistence layer for feature state documents.
pub struct FeatureStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> FeatureStore<'a> {
    /// Creates a new store rooted at the given path.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// The store root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads a feature by id. `"001"` and `"001-user-auth"` both resolve
    /// to feature `001`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidId`] if `id` is not numeric,
    /// [`StoreError::NotFound`] if no document exists, [`StoreError::Unreadable`]
    /// if it cannot be read, [`StoreError::Corrupt`] if it does not parse or
    /// its id does not match the file it was read from.
    pub fn load(&self, id: &str) -> Result<Feature, StoreError> {
        let id = normalize_id(id)?;
        let path = self.feature_path(id);
        if !self.ctx.fs.exists(&path) {
            return Err(StoreError::NotFound { feature: id.to_string(), path });
        }
        let contents = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|source| StoreError::Unreadable { path: path.clone(), source })?;
        let feature: Feature = serde_yaml::from_str(&contents)
            .map_err(|e| StoreError::Corrupt { path: path.clone(), detail: e.to_string() })?;

        if feature.id != id {
            return Err(StoreError::Corrupt {
                path,
                detail: format!("document holds feature '{}', expected '{id}'", feature.id),
            });
        }
        if feature.version == 0 {
            return Err(StoreError::Corrupt { path, detail: "version must be at least 1".into() });
        }

        debug!(feature = %feature.id, version = feature.version, phase = %feature.phase, "loaded feature");
        Ok(feature)
    }

    /// Lists stored feature ids in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unreadable`] if the features directory cannot be listed.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.features_dir();
        if !self.ctx.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        let entries = self
            .ctx
            .fs
            .list_dir(&dir)
            .map_err(|source| StoreError::Unreadable { path: dir.clone(), source })?;
        let mut ids: Vec<String> = entries
            .into_iter()
            .filter_map(|name| name.strip_suffix(".yaml").map(String::from))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// The id a new feature would get: one past the highest numeric id.
    ///
    /// # Errors
    ///
    /// Propagates listing failures.
    pub fn next_id(&self) -> Result<String, StoreError> {
        let highest = self.list()?.iter().filter_map(|id| id.parse::<u32>().ok()).max().unwrap_or(0);
        Ok(format!("{:03}", highest + 1))
    }

    /// Persists a brand-new feature at version 1.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] if the id is taken, a structural error
    /// if the graph is invalid, or a write failure.
    pub fn create(&self, feature: &Feature) -> Result<Feature, EngineError> {
        validate(&feature.tasks)?;
        if normalize_id(&feature.id)? != feature.id {
            return Err(StoreError::InvalidId(feature.id.clone()).into());
        }
        let _lock = self.lock(&feature.id)?;
        let path = self.feature_path(&feature.id);
        if self.ctx.fs.exists(&path) {
            return Err(StoreError::AlreadyExists(feature.id.clone()).into());
        }
        let mut created = feature.clone();
        created.version = 1;
        self.write(&path, &created)?;
        debug!(feature = %created.id, "created feature");
        Ok(created)
    }

    /// Persists a modified feature.
    ///
    /// `feature.version` must be the version it was loaded at. The graph is
    /// validated first; then the stored version is compared, and only if
    /// it still matches is the document replaced, with the version bumped
    /// and `updated_at` set. On any error the stored document is unchanged.
    ///
    /// # Errors
    ///
    /// A structural error for an invalid graph, [`StoreError::Conflict`] if
    /// another writer got there first, [`StoreError::Locked`] if another
    /// writer is saving right now, or any load/write failure.
    pub fn save(&self, feature: &Feature) -> Result<Feature, EngineError> {
        validate(&feature.tasks)?;

        let _lock = self.lock(&feature.id)?;
        let stored = self.load(&feature.id)?;
        if stored.version != feature.version {
            return Err(StoreError::Conflict {
                feature: feature.id.clone(),
                expected: feature.version,
                found: stored.version,
            }
            .into());
        }

        let mut saved = feature.clone();
        saved.version = feature.version + 1;
        saved.updated_at = self.ctx.clock.now();
        self.write(&self.feature_path(&saved.id), &saved)?;
        debug!(feature = %saved.id, version = saved.version, "saved feature");
        Ok(saved)
    }

    fn write(&self, path: &Path, feature: &Feature) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(feature).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            detail: format!("failed to serialize: {e}"),
        })?;
        self.ctx
            .fs
            .write_atomic(path, &yaml)
            .map_err(|source| StoreError::WriteFailed { path: path.to_path_buf(), source })
    }

    fn lock(&self, id: &str) -> Result<WriteLock<'_>, StoreError> {
        let path = self.features_dir().join(format!("{id}.lock"));
        let acquired = self
            .ctx
            .fs
            .create_new(&path, "")
            .map_err(|source| StoreError::WriteFailed { path: path.clone(), source })?;
        if !acquired {
            return Err(StoreError::Locked { feature: id.to_string(), path });
        }
        Ok(WriteLock { fs: self.ctx.fs.as_ref(), path })
    }

    fn features_dir(&self) -> PathBuf {
        self.root.join("features")
    }

    fn feature_path(&self, id: &str) -> PathBuf {
        self.features_dir().join(format!("{id}.yaml"))
    }
}

/// Exclusive hold on one feature's document; released on drop.
struct WriteLock<'s> {
    fs: &'s dyn FileSystem,
    path: PathBuf,
}

impl Drop for WriteLock<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.fs.remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}

/// `"001-user-auth"` → `"001"`. Anything but three or more digits before
/// the first hyphen is rejected, which also keeps ids from escaping the
/// features directory.
fn normalize_id(id: &str) -> Result<&str, StoreError> {
    let num = id.split_once('-').map_or(id, |(num, _)| num);
    if num.len() < 3 || !num.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(num)
}

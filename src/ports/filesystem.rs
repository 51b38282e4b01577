//! Filesystem port for file I/O operations.

use std::path::Path;

/// Provides filesystem access for reading and writing store documents.
///
/// Abstracting the filesystem lets the store run against real disk or an
/// in-memory tree in tests.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Replaces a file so that readers observe either the old or the new
    /// contents, never a partial write.
    ///
    /// On failure the previous contents of `path` must be left intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary write or the final rename fails.
    fn write_atomic(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Creates `path` with `contents` only if it does not exist yet.
    ///
    /// The existence check and the creation are a single step, so of two
    /// concurrent callers exactly one gets `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created for any reason other
    /// than already existing.
    fn create_new(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the entries in a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;
}

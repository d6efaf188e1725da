//! Search path registries.
//!
//! Each registry holds two append-only lists: extra root directories and
//! subdirectory names tried under every root. The resolver always walks both
//! lists newest-first.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Subdirectories seeded into the generic data registry.
pub const DEFAULT_DATA_SUBDIRECTORIES: &[&str] = &["data", ""];

/// Subdirectories seeded into the samples registry.
pub const DEFAULT_SAMPLES_SUBDIRECTORIES: &[&str] = &["samples/data", "data", ""];

/// Registry behind [`add_data_search_path`] and friends.
pub static DATA_REGISTRY: LazyLock<SearchRegistry> =
    LazyLock::new(|| SearchRegistry::with_subdirectories(DEFAULT_DATA_SUBDIRECTORIES));

/// Registry used by [`crate::samples::find_file`].
pub static SAMPLES_REGISTRY: LazyLock<SearchRegistry> =
    LazyLock::new(|| SearchRegistry::with_subdirectories(DEFAULT_SAMPLES_SUBDIRECTORIES));

/// Ordered search roots and subdirectory names.
///
/// Both lists are guarded by a mutex; readers receive a snapshot and never
/// iterate while holding the lock.
#[derive(Debug, Default)]
pub struct SearchRegistry {
    search_paths: Mutex<Vec<PathBuf>>,
    subdirectories: Mutex<Vec<String>>,
}

impl SearchRegistry {
    /// Empty registry with no search paths and no subdirectories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with the given subdirectory names.
    pub fn with_subdirectories(subdirectories: &[&str]) -> Self {
        Self {
            search_paths: Mutex::new(Vec::new()),
            subdirectories: Mutex::new(subdirectories.iter().map(ToString::to_string).collect()),
        }
    }

    /// Append a search root if it is an existing directory.
    ///
    /// Returns whether the path was accepted.
    pub fn add_search_path(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !path.is_dir() {
            debug!(path = %path.display(), "Ignoring search path: not a directory");
            return false;
        }
        lock(&self.search_paths).push(path.to_path_buf());
        true
    }

    /// Append a subdirectory name. The directory does not need to exist.
    pub fn add_search_subdirectory(&self, name: impl Into<String>) {
        lock(&self.subdirectories).push(name.into());
    }

    /// Snapshot of the search roots in insertion order.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        lock(&self.search_paths).clone()
    }

    /// Snapshot of the subdirectory names in insertion order.
    pub fn subdirectories(&self) -> Vec<String> {
        lock(&self.subdirectories).clone()
    }
}

// The lists are append-only, so a panic while holding the lock cannot leave them inconsistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Add a root directory to the generic data registry.
pub fn add_data_search_path(path: impl AsRef<Path>) -> bool {
    DATA_REGISTRY.add_search_path(path)
}

/// Add a subdirectory name to the generic data registry.
pub fn add_data_search_subdirectory(name: impl Into<String>) {
    DATA_REGISTRY.add_search_subdirectory(name);
}

//! Sample data lookup.
//!
//! Same resolution as [`crate::paths::find_data_file`], but with its own
//! registry (seeded with `samples/data`, `data` and the root itself) and the
//! `DATAFIND_SAMPLES_DATA_PATH` configuration parameter.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DataFileError;
use crate::paths::{DataFileRequest, DataFinder, SAMPLES_REGISTRY};

/// Add a root directory to the samples registry.
pub fn add_samples_data_search_path(path: impl AsRef<Path>) -> bool {
    SAMPLES_REGISTRY.add_search_path(path)
}

/// Add a subdirectory name to the samples registry.
pub fn add_samples_data_search_subdirectory(name: impl Into<String>) {
    SAMPLES_REGISTRY.add_search_subdirectory(name);
}

/// Locate a sample file.
///
/// Unless `silent` is set, logs a warning whenever the result differs from
/// the requested path. With `required`, a miss is an error instead of `None`.
pub fn find_file(
    relative: impl AsRef<Path>,
    required: bool,
    silent: bool,
) -> Result<Option<PathBuf>, DataFileError> {
    find_file_with(&DataFinder::samples(), relative.as_ref(), required, silent)
}

/// [`find_file`] against an explicit finder.
pub fn find_file_with(
    finder: &DataFinder<'_>,
    relative: &Path,
    required: bool,
    silent: bool,
) -> Result<Option<PathBuf>, DataFileError> {
    debug!(relative = %relative.display(), required, "samples::find_file()");
    let result = finder.find(&DataFileRequest::new(relative))?;

    if result.as_deref() != Some(relative) && !silent {
        let resolved = result
            .as_deref()
            .map_or_else(String::new, |path| path.display().to_string());
        warn!(
            relative = %relative.display(),
            resolved,
            "samples::find_file() resolved to a different path"
        );
    }

    if result.is_none() && required {
        return Err(DataFileError::RequiredResourceMissing {
            path: relative.to_path_buf(),
        });
    }
    Ok(result)
}

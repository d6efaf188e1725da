//! Data file lookup error types.
//!
//! A file that cannot be found is not an error: lookups return `Ok(None)`.
//! Only the conditions below reach the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by data file lookups.
#[derive(Debug, Error)]
pub enum DataFileError {
    /// A caller asked for a file with `required = true` and no candidate existed.
    #[error("Can't find required data file: {}", path.display())]
    RequiredResourceMissing { path: PathBuf },

    /// The crate was built without the `filesystem` feature.
    #[error("File system support is disabled in this build")]
    Unsupported,

    /// An empty relative path was provided.
    #[error("Data file path cannot be empty")]
    EmptyPath,
}

impl DataFileError {
    /// The relative path that could not be located, if this is a missing-resource error.
    pub fn missing_path(&self) -> Option<&std::path::Path> {
        match self {
            Self::RequiredResourceMissing { path } => Some(path),
            _ => None,
        }
    }
}

/// Fails with [`DataFileError::Unsupported`] when filesystem support is compiled out.
pub(crate) fn ensure_filesystem_support() -> Result<(), DataFileError> {
    if cfg!(feature = "filesystem") {
        Ok(())
    } else {
        Err(DataFileError::Unsupported)
    }
}

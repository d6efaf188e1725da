//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from lookup errors to exit codes.

use datafind_core::DataFileError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Lookup error from the core library.
    #[error(transparent)]
    Lookup(#[from] DataFileError),

    /// Failed to render output.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits:
    /// - 2: Misuse of shell command (empty path)
    /// - 66: Required input missing (EX_NOINPUT)
    /// - 70: Internal software error (EX_SOFTWARE)
    /// - 74: Output failure (EX_IOERR)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Lookup(DataFileError::EmptyPath) => 2,
            Self::Lookup(DataFileError::RequiredResourceMissing { .. }) => 66,
            Self::Lookup(DataFileError::Unsupported) => 70,
            Self::Output(_) => 74,
        }
    }
}

//! Sample command handler.

use std::io::Write;
use std::path::{Path, PathBuf};

use datafind_core::DataFinder;
use datafind_core::paths::SearchRegistry;
use datafind_core::samples;
use tracing::debug;

use super::{Outcome, write_line};
use crate::error::CliError;

/// Arguments of the `sample` command.
#[derive(Debug, Clone, Copy)]
pub struct SampleArgs<'a> {
    pub path: &'a str,
    pub search_paths: &'a [PathBuf],
    pub subdirs: &'a [String],
    pub required: bool,
    pub silent: bool,
}

/// Execute the sample command against the samples registry.
pub fn execute(
    registry: &SearchRegistry,
    finder: &DataFinder<'_>,
    args: &SampleArgs<'_>,
    out: &mut dyn Write,
) -> Result<Outcome, CliError> {
    for path in args.search_paths {
        if !registry.add_search_path(path) {
            debug!(path = %path.display(), "ignoring --search-path");
        }
    }
    for subdir in args.subdirs {
        registry.add_search_subdirectory(subdir.clone());
    }

    let found = samples::find_file_with(finder, Path::new(args.path), args.required, args.silent)?;
    match found {
        Some(path) => {
            write_line(out, &path.display().to_string())?;
            Ok(Outcome::Found)
        }
        None => Ok(Outcome::NotFound),
    }
}

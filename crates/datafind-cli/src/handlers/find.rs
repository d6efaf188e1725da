//! Find command handler.
//!
//! Resolves a data file through the generic registry and prints its path.

use std::io::Write;
use std::path::{Path, PathBuf};

use datafind_core::paths::SearchRegistry;
use datafind_core::{DataFileError, DataFileRequest, DataFinder};
use tracing::debug;

use super::{Outcome, write_line};
use crate::error::CliError;

/// Arguments of the `find` command.
#[derive(Debug, Clone, Copy)]
pub struct FindArgs<'a> {
    pub path: &'a str,
    pub param: Option<&'a str>,
    pub search_paths: &'a [PathBuf],
    pub subdirs: &'a [String],
    pub required: bool,
    pub explain: bool,
}

/// Execute the find command.
///
/// Extra search paths and subdirectories are added to `registry` before the
/// lookup, so they take precedence over anything registered earlier. With
/// `explain`, the match is printed as JSON together with the stage that
/// produced it.
pub fn execute(
    registry: &SearchRegistry,
    finder: &DataFinder<'_>,
    args: &FindArgs<'_>,
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

    let relative = Path::new(args.path);
    let mut request = DataFileRequest::new(relative);
    if let Some(param) = args.param {
        request = request.with_parameter(param);
    }

    match finder.find_traced(&request)? {
        Some(resolution) if args.explain => {
            let json = serde_json::to_string_pretty(&resolution)
                .map_err(|e| CliError::Output(e.to_string()))?;
            write_line(out, &json)?;
            Ok(Outcome::Found)
        }
        Some(resolution) => {
            write_line(out, &resolution.path.display().to_string())?;
            Ok(Outcome::Found)
        }
        None if args.required => Err(DataFileError::RequiredResourceMissing {
            path: relative.to_path_buf(),
        }
        .into()),
        None => Ok(Outcome::NotFound),
    }
}

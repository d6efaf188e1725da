//! Directory containment checks.
//!
//! Used to decide whether the working directory or the running module lives
//! inside the build tree or the install prefix.

use std::fs;
use std::path::Path;

use tracing::trace;

const fn is_path_sep(c: u8) -> bool {
    c == b'/' || c == b'\\'
}

/// Check whether `path` is `base` itself or lies somewhere below it.
///
/// Purely lexical: `/` and `\` are interchangeable, one trailing separator on
/// `base` is ignored, and a match must end on a component boundary so that
/// `/a/b` does not contain `/a/bc`. An empty `base` contains nothing.
pub fn is_sub_directory(base: &str, path: &str) -> bool {
    let base = base.as_bytes();
    let path = path.as_bytes();

    let Some(&last) = base.last() else {
        return false;
    };
    let n = if is_path_sep(last) { base.len() - 1 } else { base.len() };
    if path.len() < n {
        return false;
    }

    let prefix_matches = base[..n]
        .iter()
        .zip(path)
        .all(|(&b, &p)| b == p || (is_path_sep(b) && is_path_sep(p)));
    if !prefix_matches {
        return false;
    }

    path.len() == n || is_path_sep(path[n])
}

/// Containment check that also sees through symbolic links.
///
/// Tries the raw strings first, then the canonical forms of both paths. A path
/// that cannot be canonicalized (typically because it does not exist) only
/// fails the second attempt.
pub fn is_within(base: &Path, path: &Path) -> bool {
    let raw = is_sub_directory(&base.to_string_lossy(), &path.to_string_lossy());
    let result = raw
        || match (fs::canonicalize(base), fs::canonicalize(path)) {
            (Ok(base), Ok(path)) => {
                is_sub_directory(&base.to_string_lossy(), &path.to_string_lossy())
            }
            _ => false,
        };
    trace!(
        base = %base.display(),
        path = %path.display(),
        result,
        "is_sub_directory()"
    );
    result
}

//! Deployment layout known at compile time.
//!
//! `build.rs` records where the crate was built and, when packagers ask for
//! it, where it will be installed. The resolver uses these to recognize build
//! trees, source checkouts and installed packages.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Separator for list-valued build variables.
pub const LIST_SEPARATOR: char = ';';

/// File whose presence identifies the root of a source checkout.
pub const SOURCE_ROOT_MARKER: &str = "crates/datafind-core/Cargo.toml";

/// Build-relative directories tried when no override is given at build time.
pub const DEFAULT_BUILD_SUBDIRECTORIES: &[&str] = &["..", ""];

/// Directory layout used by the heuristic stages of the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Build directory (cargo target directory unless overridden).
    pub build_dir: Option<PathBuf>,
    /// Directories under `build_dir` that may hold data, in probe order.
    pub build_subdirs: Vec<String>,
    /// Marker file identifying a source root, relative to that root.
    pub source_marker: Option<String>,
    /// Install data directories relative to the module's directory.
    pub install_data_dirs_relative: Vec<String>,
    /// Install prefix the module is expected to live under.
    pub install_prefix: Option<PathBuf>,
    /// Data directory relative to `install_prefix`.
    pub data_install_path: Option<String>,
}

impl Layout {
    /// Layout recorded by the build script.
    pub fn compiled() -> Self {
        Self {
            build_dir: Some(PathBuf::from(env!("DATAFIND_BUILD_DIR"))),
            build_subdirs: option_env!("DATAFIND_BUILD_DIR_SEARCH_PATHS").map_or_else(
                || {
                    DEFAULT_BUILD_SUBDIRECTORIES
                        .iter()
                        .map(ToString::to_string)
                        .collect()
                },
                split_list,
            ),
            source_marker: Some(SOURCE_ROOT_MARKER.to_string()),
            install_data_dirs_relative: option_env!("DATAFIND_INSTALL_DATA_DIR_RELATIVE")
                .map(split_list)
                .unwrap_or_default(),
            install_prefix: option_env!("DATAFIND_INSTALL_PREFIX").map(PathBuf::from),
            data_install_path: option_env!("DATAFIND_DATA_INSTALL_PATH").map(ToString::to_string),
        }
    }

    /// Layout with every heuristic disabled.
    ///
    /// Only the as-is candidate, search paths and configuration overrides
    /// are consulted by a resolver using it.
    pub fn detached() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>, subdirs: &[&str]) -> Self {
        self.build_dir = Some(build_dir.into());
        self.build_subdirs = subdirs.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_source_marker(mut self, marker: impl Into<String>) -> Self {
        self.source_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn with_install_relative(mut self, dirs: &[&str]) -> Self {
        self.install_data_dirs_relative = dirs.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_install_prefix(
        mut self,
        prefix: impl Into<PathBuf>,
        data_path: impl Into<String>,
    ) -> Self {
        self.install_prefix = Some(prefix.into());
        self.data_install_path = Some(data_path.into());
        self
    }
}

/// Split a `;`-separated list, keeping empty entries (they mean "the directory itself").
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR).map(ToString::to_string).collect()
}

fn display_opt(value: Option<&str>) -> &str {
    value.unwrap_or("<unset>")
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = LIST_SEPARATOR.to_string();
        writeln!(
            f,
            "build_dir = {}",
            display_opt(self.build_dir.as_deref().and_then(|p| p.to_str()))
        )?;
        writeln!(f, "build_subdirs = {}", self.build_subdirs.join(&sep))?;
        writeln!(
            f,
            "source_marker = {}",
            display_opt(self.source_marker.as_deref())
        )?;
        writeln!(
            f,
            "install_data_dirs_relative = {}",
            self.install_data_dirs_relative.join(&sep)
        )?;
        writeln!(
            f,
            "install_prefix = {}",
            display_opt(self.install_prefix.as_deref().and_then(|p| p.to_str()))
        )?;
        write!(
            f,
            "data_install_path = {}",
            display_opt(self.data_install_path.as_deref())
        )
    }
}

//! Data file resolution.
//!
//! Given a relative resource path, tries a fixed sequence of candidate roots
//! and returns the first file that exists. Stage order:
//!
//! 0. the path as given (absolute, or relative to the working directory)
//! 1. search paths, newest first, without subdirectories
//! 2. `<PARAM>_HINT` directories
//! 3. `<PARAM>` directories (final when set)
//! 4. the build tree, when the working directory is inside it
//! 5. a source checkout found from the working directory
//! 6. the build tree, when the running module is inside it
//! 7. install directories relative to the running module
//! 8. the install prefix data directory
//!
//! Stages 2 to 8 combine each root with the subdirectory list, newest first.

use std::env;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::{ConfigSource, EnvConfig, hint_name};
use super::layout::Layout;
use super::locator::{ModuleLocator, NativeModuleLocator};
use super::registry::{DATA_REGISTRY, SAMPLES_REGISTRY, SearchRegistry};
use super::relationship::is_within;
use crate::error::{DataFileError, ensure_filesystem_support};

/// Configuration parameter consulted by the generic resolver.
pub const DEFAULT_DATA_PARAMETER: &str = "DATAFIND_DATA_PATH";

/// Configuration parameter consulted by the samples resolver.
pub const SAMPLES_DATA_PARAMETER: &str = "DATAFIND_SAMPLES_DATA_PATH";

/// Number of directories (the start included) checked for the source marker.
pub const SOURCE_ROOT_SEARCH_LEVELS: usize = 3;

static COMPILED_LAYOUT: LazyLock<Layout> = LazyLock::new(Layout::compiled);
static ENV_CONFIG: EnvConfig = EnvConfig;
static NATIVE_LOCATOR: NativeModuleLocator = NativeModuleLocator;

/// Which stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AsIs,
    SearchPath,
    Hint,
    Override,
    BuildTree,
    SourceTree,
    ModuleBuildTree,
    InstallRelative,
    InstallPrefix,
}

/// A located data file and how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: PathBuf,
    pub stage: Stage,
}

/// One lookup: the relative path plus optional per-call overrides.
#[derive(Debug, Clone, Copy)]
pub struct DataFileRequest<'r> {
    relative: &'r Path,
    parameter: Option<&'r str>,
    search_paths: Option<&'r [PathBuf]>,
    subdirectories: Option<&'r [String]>,
}

impl<'r> DataFileRequest<'r> {
    pub fn new(relative: &'r Path) -> Self {
        Self {
            relative,
            parameter: None,
            search_paths: None,
            subdirectories: None,
        }
    }

    /// Override the configuration parameter name used for `_HINT`/bare lookups.
    #[must_use]
    pub const fn with_parameter(mut self, parameter: &'r str) -> Self {
        self.parameter = Some(parameter);
        self
    }

    /// Use these search paths instead of the registry's.
    #[must_use]
    pub const fn with_search_paths(mut self, search_paths: &'r [PathBuf]) -> Self {
        self.search_paths = Some(search_paths);
        self
    }

    /// Use these subdirectory names instead of the registry's.
    #[must_use]
    pub const fn with_subdirectories(mut self, subdirectories: &'r [String]) -> Self {
        self.subdirectories = Some(subdirectories);
        self
    }

    pub const fn relative(&self) -> &'r Path {
        self.relative
    }
}

/// Join two path fragments, treating an empty fragment as absent.
pub(crate) fn join(base: &Path, path: &Path) -> PathBuf {
    if base.as_os_str().is_empty() {
        path.to_path_buf()
    } else if path.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Candidate generator shared by every stage.
struct Probe<'a> {
    relative: &'a Path,
    subdirectories: &'a [String],
}

impl Probe<'_> {
    /// Test `prefix/relative`.
    fn try_prefix(&self, prefix: &Path) -> Option<PathBuf> {
        let candidate = join(prefix, self.relative);
        debug!(candidate = %candidate.display(), "Trying data file candidate");
        candidate.exists().then_some(candidate)
    }

    /// `root/subdir` prefixes, newest subdirectory first.
    fn prefixes<'p>(&'p self, root: &'p Path) -> impl Iterator<Item = PathBuf> + 'p {
        self.subdirectories
            .iter()
            .rev()
            .map(move |subdir| join(root, Path::new(subdir)))
    }

    /// Test `root/subdir/relative` for every subdirectory.
    fn try_root(&self, root: &Path) -> Option<PathBuf> {
        self.prefixes(root)
            .find_map(|prefix| self.try_prefix(&prefix))
    }
}

/// Resolver over an explicit layout, registry, configuration and locator.
///
/// [`DataFinder::data`] and [`DataFinder::samples`] wire up the process-wide
/// state; [`DataFinder::new`] lets callers supply their own.
pub struct DataFinder<'a> {
    layout: &'a Layout,
    registry: &'a SearchRegistry,
    config: &'a dyn ConfigSource,
    locator: &'a dyn ModuleLocator,
    parameter: Option<&'a str>,
    working_dir: Option<PathBuf>,
}

impl DataFinder<'static> {
    /// Generic data resolver backed by the process-wide registry.
    pub fn data() -> Self {
        Self::new(&COMPILED_LAYOUT, &DATA_REGISTRY, &ENV_CONFIG, &NATIVE_LOCATOR)
            .with_parameter(DEFAULT_DATA_PARAMETER)
    }

    /// Samples resolver backed by the process-wide samples registry.
    pub fn samples() -> Self {
        Self::new(
            &COMPILED_LAYOUT,
            &SAMPLES_REGISTRY,
            &ENV_CONFIG,
            &NATIVE_LOCATOR,
        )
        .with_parameter(SAMPLES_DATA_PARAMETER)
    }
}

impl<'a> DataFinder<'a> {
    /// Resolver with no default configuration parameter.
    pub fn new(
        layout: &'a Layout,
        registry: &'a SearchRegistry,
        config: &'a dyn ConfigSource,
        locator: &'a dyn ModuleLocator,
    ) -> Self {
        Self {
            layout,
            registry,
            config,
            locator,
            parameter: None,
            working_dir: None,
        }
    }

    /// Parameter used when a request does not name one.
    #[must_use]
    pub fn with_parameter(mut self, parameter: &'a str) -> Self {
        self.parameter = Some(parameter);
        self
    }

    /// Directory the build and source heuristics start from.
    ///
    /// Defaults to the process working directory. The as-is candidate is
    /// unaffected and stays relative to the process working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The parameter this finder falls back to.
    pub const fn parameter(&self) -> Option<&'a str> {
        self.parameter
    }

    /// Locate `request`, returning the path of the first existing candidate.
    pub fn find(&self, request: &DataFileRequest<'_>) -> Result<Option<PathBuf>, DataFileError> {
        Ok(self.find_traced(request)?.map(|resolution| resolution.path))
    }

    /// Like [`DataFinder::find`], also reporting the stage that matched.
    pub fn find_traced(
        &self,
        request: &DataFileRequest<'_>,
    ) -> Result<Option<Resolution>, DataFileError> {
        ensure_filesystem_support()?;
        if request.relative.as_os_str().is_empty() {
            return Err(DataFileError::EmptyPath);
        }

        let parameter = request.parameter.or(self.parameter);
        debug!(
            relative = %request.relative.display(),
            parameter = parameter.unwrap_or("<none>"),
            "find_data_file()"
        );

        let registry_paths;
        let search_paths = if let Some(paths) = request.search_paths {
            paths
        } else {
            registry_paths = self.registry.search_paths();
            registry_paths.as_slice()
        };

        let registry_subdirs;
        let subdirectories = if let Some(subdirs) = request.subdirectories {
            subdirs
        } else {
            registry_subdirs = self.registry.subdirectories();
            registry_subdirs.as_slice()
        };

        let probe = Probe {
            relative: request.relative,
            subdirectories,
        };
        let resolution = self.search(&probe, search_paths, parameter);
        if resolution.is_none() {
            debug!(relative = %request.relative.display(), "Data file not found");
        }
        Ok(resolution)
    }

    fn search(
        &self,
        probe: &Probe<'_>,
        search_paths: &[PathBuf],
        parameter: Option<&str>,
    ) -> Option<Resolution> {
        let found = |stage: Stage| move |path: PathBuf| Resolution { path, stage };

        // 0: as given
        if let Some(path) = probe.try_prefix(Path::new("")) {
            return Some(found(Stage::AsIs)(path));
        }

        // 1: explicit search paths, newest first
        if let Some(path) = search_paths
            .iter()
            .rev()
            .find_map(|prefix| probe.try_prefix(prefix))
        {
            return Some(found(Stage::SearchPath)(path));
        }

        if let Some(parameter) = parameter.filter(|p| !p.is_empty()) {
            // 2: supplementary hints
            let hint = hint_name(parameter);
            if let Some(path) = self.try_config_dirs(probe, &hint) {
                return Some(found(Stage::Hint)(path));
            }

            // 3: authoritative override
            match self.try_override(probe, parameter) {
                ControlFlow::Break(path) => return path.map(found(Stage::Override)),
                ControlFlow::Continue(()) => {}
            }
        }

        self.search_layout(probe).map(|(stage, path)| found(stage)(path))
    }

    /// Stages 4 to 8.
    fn search_layout(&self, probe: &Probe<'_>) -> Option<(Stage, PathBuf)> {
        let layout = self.layout;
        let cwd = self.working_dir.clone().or_else(|| env::current_dir().ok());

        // 4: working directory inside the build tree
        let mut tested_build_dir = false;
        if let (Some(cwd), Some(build_dir)) = (&cwd, &layout.build_dir) {
            if is_within(build_dir, cwd) {
                debug!(cwd = %cwd.display(), "The current directory is a build sub-directory");
                if let Some(path) = self.try_build_tree(probe, build_dir) {
                    return Some((Stage::BuildTree, path));
                }
                tested_build_dir = true;
            }
        }

        // 5: source checkout above the working directory
        if let (Some(cwd), Some(marker)) = (&cwd, &layout.source_marker) {
            if let Some(source_dir) = find_source_root(cwd, marker) {
                debug!(source = %source_dir.display(), "The current directory is a source sub-directory");
                if source_dir.is_dir() {
                    if let Some(path) = probe.try_root(&source_dir) {
                        return Some((Stage::SourceTree, path));
                    }
                }
            }
        }

        let module_path = self.locator.locate();
        match &module_path {
            Some(path) => debug!(module = %path.display(), "Detected module path"),
            None => info!("Can't detect module binaries location"),
        }

        // 6: running module inside the build tree
        if !tested_build_dir {
            if let (Some(module), Some(build_dir)) = (&module_path, &layout.build_dir) {
                if is_within(build_dir, module) {
                    debug!(module = %module.display(), "The binary module directory is a build sub-directory");
                    if let Some(path) = self.try_build_tree(probe, build_dir) {
                        return Some((Stage::ModuleBuildTree, path));
                    }
                }
            }
        }

        // 7: install layout relative to the module
        if let Some(module) = module_path.as_deref() {
            if !layout.install_data_dirs_relative.is_empty() {
                let module_dir = module
                    .parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .unwrap_or(module);
                for relative in &layout.install_data_dirs_relative {
                    let datapath = join(module_dir, Path::new(relative));
                    debug!(datapath = %datapath.display(), "Trying install path (from binary path)");
                    if datapath.is_dir() {
                        if let Some(path) = probe.try_root(&datapath) {
                            return Some((Stage::InstallRelative, path));
                        }
                    } else {
                        debug!(datapath = %datapath.display(), "Skipping, not a valid directory");
                    }
                }
            }
        }

        // 8: fixed install prefix, only when the module runs from it
        if let (Some(prefix), Some(data_path)) = (&layout.install_prefix, &layout.data_install_path)
        {
            let module = module_path.as_deref().unwrap_or(prefix);
            if is_within(prefix, module) {
                let datapath = join(prefix, Path::new(data_path));
                if datapath.is_dir() {
                    debug!(datapath = %datapath.display(), "Trying install path");
                    if let Some(path) = probe.try_root(&datapath) {
                        return Some((Stage::InstallPrefix, path));
                    }
                }
            }
        }

        None
    }

    /// Probe every directory listed under configuration parameter `name`.
    fn try_config_dirs(&self, probe: &Probe<'_>, name: &str) -> Option<PathBuf> {
        self.try_dirs(probe, name, &self.config.paths(name))
    }

    fn try_override(&self, probe: &Probe<'_>, parameter: &str) -> ControlFlow<Option<PathBuf>> {
        let overrides = self.config.paths(parameter);
        if let Some(path) = self.try_dirs(probe, parameter, &overrides) {
            return ControlFlow::Break(Some(path));
        }
        if overrides.is_empty() {
            return ControlFlow::Continue(());
        }
        info!(
            parameter,
            relative = %probe.relative.display(),
            "Can't find data file via configuration override"
        );
        ControlFlow::Break(None)
    }

    fn try_dirs(&self, probe: &Probe<'_>, name: &str, dirs: &[String]) -> Option<PathBuf> {
        for datapath in dirs.iter().filter(|dir| !dir.is_empty()) {
            let datapath = Path::new(datapath);
            if datapath.is_dir() {
                debug!(parameter = name, datapath = %datapath.display(), "Trying configured data path");
                if let Some(path) = probe.try_root(datapath) {
                    return Some(path);
                }
            } else {
                warn!(
                    parameter = name,
                    datapath = %datapath.display(),
                    "Configured data path is not a directory"
                );
            }
        }
        None
    }

    fn try_build_tree(&self, probe: &Probe<'_>, build_dir: &Path) -> Option<PathBuf> {
        for subdir in &self.layout.build_subdirs {
            let datapath = join(build_dir, Path::new(subdir));
            debug!(datapath = %datapath.display(), "Trying build directory");
            if datapath.is_dir() {
                if let Some(path) = probe.try_root(&datapath) {
                    return Some(path);
                }
            }
        }
        None
    }
}

/// Walk up from `start` looking for the directory that contains `marker`.
fn find_source_root(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut candidate = start.to_path_buf();
    for _ in 0..SOURCE_ROOT_SEARCH_LEVELS {
        if candidate.join(marker).exists() {
            return Some(candidate);
        }
        candidate = candidate.join("..");
    }
    None
}

/// Locate a data file using the process-wide data registry.
///
/// `parameter` defaults to [`DEFAULT_DATA_PARAMETER`]; `search_paths` and
/// `subdirectories` replace the registry's lists when given.
pub fn find_data_file(
    relative: impl AsRef<Path>,
    parameter: Option<&str>,
    search_paths: Option<&[PathBuf]>,
    subdirectories: Option<&[String]>,
) -> Result<Option<PathBuf>, DataFileError> {
    let mut request = DataFileRequest::new(relative.as_ref());
    if let Some(parameter) = parameter {
        request = request.with_parameter(parameter);
    }
    if let Some(paths) = search_paths {
        request = request.with_search_paths(paths);
    }
    if let Some(subdirs) = subdirectories {
        request = request.with_subdirectories(subdirs);
    }
    DataFinder::data().find(&request)
}

/// Locate a data file, failing with [`DataFileError::RequiredResourceMissing`]
/// when `required` is set and nothing was found.
pub fn find_data_file_required(
    relative: impl AsRef<Path>,
    required: bool,
    parameter: Option<&str>,
) -> Result<Option<PathBuf>, DataFileError> {
    let relative = relative.as_ref();
    debug!(
        relative = %relative.display(),
        required,
        parameter = parameter.unwrap_or("NULL"),
        "find_data_file_required()"
    );
    let result = find_data_file(relative, parameter, None, None)?;
    if result.is_none() && required {
        return Err(DataFileError::RequiredResourceMissing {
            path: relative.to_path_buf(),
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::config::{MockConfigSource, StaticConfig};
    use crate::paths::locator::{FixedModuleLocator, MockModuleLocator};
    use crate::paths::registry::DEFAULT_DATA_SUBDIRECTORIES;
    use crate::paths::test_utils::{CwdGuard, lock_env};
    use std::fs;
    use tempfile::tempdir;

    const PARAM: &str = "DATAFIND_TEST_PATH";

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"data").unwrap();
    }

    fn data_registry() -> SearchRegistry {
        SearchRegistry::with_subdirectories(DEFAULT_DATA_SUBDIRECTORIES)
    }

    fn find_in(
        layout: &Layout,
        registry: &SearchRegistry,
        config: &dyn ConfigSource,
        locator: &dyn ModuleLocator,
        relative: &str,
    ) -> Option<Resolution> {
        DataFinder::new(layout, registry, config, locator)
            .with_parameter(PARAM)
            .with_working_dir("/nonexistent-datafind-cwd")
            .find_traced(&DataFileRequest::new(Path::new(relative)))
            .unwrap()
    }

    #[test]
    fn join_skips_empty_fragments() {
        assert_eq!(join(Path::new(""), Path::new("a.xml")), PathBuf::from("a.xml"));
        assert_eq!(join(Path::new("/r"), Path::new("")), PathBuf::from("/r"));
        assert_eq!(join(Path::new("/r"), Path::new("d")), PathBuf::from("/r/d"));
    }

    #[test]
    fn empty_relative_path_is_rejected() {
        let layout = Layout::detached();
        let registry = data_registry();
        let err = DataFinder::new(&layout, &registry, &StaticConfig::new(), &FixedModuleLocator(None))
            .find(&DataFileRequest::new(Path::new("")))
            .unwrap_err();
        assert!(matches!(err, DataFileError::EmptyPath));
    }

    #[test]
    fn absolute_path_is_returned_as_is() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("haar.xml");
        touch(&file);

        let registry = data_registry();
        let other = tempdir().unwrap();
        registry.add_search_path(other.path());

        let found = find_in(
            &Layout::detached(),
            &registry,
            &StaticConfig::new(),
            &FixedModuleLocator(None),
            &file.to_string_lossy(),
        )
        .unwrap();
        assert_eq!(found.path, file);
        assert_eq!(found.stage, Stage::AsIs);
    }

    #[test]
    fn relative_path_in_working_directory_is_returned_unchanged() {
        let _guard = lock_env();
        let temp = tempdir().unwrap();
        touch(&temp.path().join("haar.xml"));
        let _cwd = CwdGuard::enter(temp.path());

        let layout = Layout::detached();
        let registry = data_registry();
        let found = DataFinder::new(&layout, &registry, &StaticConfig::new(), &FixedModuleLocator(None))
            .with_parameter(PARAM)
            .find(&DataFileRequest::new(Path::new("haar.xml")))
            .unwrap();
        assert_eq!(found, Some(PathBuf::from("haar.xml")));
    }

    #[test]
    fn newest_search_path_wins() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        touch(&a.path().join("x.bin"));
        touch(&b.path().join("x.bin"));

        let registry = data_registry();
        registry.add_search_path(a.path());
        registry.add_search_path(b.path());

        let found = find_in(
            &Layout::detached(),
            &registry,
            &StaticConfig::new(),
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.path, b.path().join("x.bin"));
        assert_eq!(found.stage, Stage::SearchPath);
    }

    #[test]
    fn search_paths_do_not_use_subdirectories() {
        let root = tempdir().unwrap();
        touch(&root.path().join("data").join("x.bin"));

        let registry = data_registry();
        registry.add_search_path(root.path());

        let found = find_in(
            &Layout::detached(),
            &registry,
            &StaticConfig::new(),
            &FixedModuleLocator(None),
            "x.bin",
        );
        assert!(found.is_none());
    }

    #[test]
    fn empty_subdirectory_is_tried_before_data() {
        let hint = tempdir().unwrap();
        touch(&hint.path().join("x.bin"));
        touch(&hint.path().join("data").join("x.bin"));

        let config = StaticConfig::new().with(&hint_name(PARAM), [hint.path().to_string_lossy()]);
        let found = find_in(
            &Layout::detached(),
            &data_registry(),
            &config,
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.path, hint.path().join("x.bin"));
        assert_eq!(found.stage, Stage::Hint);
    }

    #[test]
    fn data_subdirectory_is_used_when_root_lacks_file() {
        let hint = tempdir().unwrap();
        touch(&hint.path().join("data").join("x.bin"));

        let config = StaticConfig::new().with(&hint_name(PARAM), [hint.path().to_string_lossy()]);
        let found = find_in(
            &Layout::detached(),
            &data_registry(),
            &config,
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.path, hint.path().join("data").join("x.bin"));
    }

    #[test]
    fn newest_subdirectory_wins() {
        let hint = tempdir().unwrap();
        touch(&hint.path().join("data").join("x.bin"));
        touch(&hint.path().join("extra").join("x.bin"));

        let registry = SearchRegistry::with_subdirectories(&["data", "extra"]);
        let config = StaticConfig::new().with(&hint_name(PARAM), [hint.path().to_string_lossy()]);
        let found = find_in(
            &Layout::detached(),
            &registry,
            &config,
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.path, hint.path().join("extra").join("x.bin"));
    }

    #[test]
    fn hint_entries_that_are_not_directories_are_skipped() {
        let temp = tempdir().unwrap();
        let not_dir = temp.path().join("plain-file");
        touch(&not_dir);
        let good = tempdir().unwrap();
        touch(&good.path().join("x.bin"));

        let config = StaticConfig::new().with(
            &hint_name(PARAM),
            [
                String::new(),
                not_dir.to_string_lossy().into_owned(),
                good.path().to_string_lossy().into_owned(),
            ],
        );
        let found = find_in(
            &Layout::detached(),
            &data_registry(),
            &config,
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.path, good.path().join("x.bin"));
    }

    #[test]
    fn hint_miss_falls_through_to_layout() {
        let hint = tempdir().unwrap();
        let build = tempdir().unwrap();
        touch(&build.path().join("x.bin"));

        let layout = Layout::detached().with_build_dir(build.path(), &[""]);
        let config = StaticConfig::new().with(&hint_name(PARAM), [hint.path().to_string_lossy()]);
        let locator = FixedModuleLocator(Some(build.path().join("bin").join("app")));
        let found = find_in(&layout, &data_registry(), &config, &locator, "x.bin").unwrap();
        assert_eq!(found.stage, Stage::ModuleBuildTree);
    }

    #[test]
    fn hint_is_tried_before_override() {
        let hint = tempdir().unwrap();
        let bare = tempdir().unwrap();
        touch(&hint.path().join("x.bin"));
        touch(&bare.path().join("x.bin"));

        let config = StaticConfig::new()
            .with(&hint_name(PARAM), [hint.path().to_string_lossy()])
            .with(PARAM, [bare.path().to_string_lossy()]);
        let found = find_in(
            &Layout::detached(),
            &data_registry(),
            &config,
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.stage, Stage::Hint);
        assert_eq!(found.path, hint.path().join("x.bin"));
    }

    #[test]
    fn override_match_is_returned() {
        let bare = tempdir().unwrap();
        touch(&bare.path().join("data").join("x.bin"));

        let config = StaticConfig::new().with(PARAM, [bare.path().to_string_lossy()]);
        let found = find_in(
            &Layout::detached(),
            &data_registry(),
            &config,
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.stage, Stage::Override);
    }

    #[test]
    fn override_miss_stops_before_build_tree() {
        let bare = tempdir().unwrap();
        let build = tempdir().unwrap();
        touch(&build.path().join("x.bin"));

        let layout = Layout::detached().with_build_dir(build.path(), &[""]);
        let config = StaticConfig::new().with(PARAM, [bare.path().to_string_lossy()]);

        let mut locator = MockModuleLocator::new();
        locator.expect_locate().never();

        let registry = data_registry();
        let finder = DataFinder::new(&layout, &registry, &config, &locator)
            .with_parameter(PARAM)
            .with_working_dir(build.path());
        assert_eq!(finder.find(&DataFileRequest::new(Path::new("x.bin"))).unwrap(), None);
    }

    #[test]
    fn override_of_only_empty_entries_is_still_final() {
        let build = tempdir().unwrap();
        touch(&build.path().join("x.bin"));

        let layout = Layout::detached().with_build_dir(build.path(), &[""]);
        let config = StaticConfig::new().with(PARAM, [""]);
        let registry = data_registry();
        let locator = FixedModuleLocator(None);
        let finder = DataFinder::new(&layout, &registry, &config, &locator)
            .with_parameter(PARAM)
            .with_working_dir(build.path());
        assert_eq!(finder.find(&DataFileRequest::new(Path::new("x.bin"))).unwrap(), None);
    }

    #[test]
    fn config_is_queried_for_hint_then_override() {
        let mut config = MockConfigSource::new();
        let mut seq = mockall::Sequence::new();
        config
            .expect_paths()
            .withf(|name| name == "DATAFIND_TEST_PATH_HINT")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Vec::new());
        config
            .expect_paths()
            .withf(|name| name == PARAM)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Vec::new());

        let found = find_in(
            &Layout::detached(),
            &data_registry(),
            &config,
            &FixedModuleLocator(None),
            "datafind-absent.bin",
        );
        assert!(found.is_none());
    }

    #[test]
    fn no_parameter_skips_configuration() {
        let mut config = MockConfigSource::new();
        config.expect_paths().never();

        let layout = Layout::detached();
        let registry = data_registry();
        let locator = FixedModuleLocator(None);
        let finder = DataFinder::new(&layout, &registry, &config, &locator);
        assert_eq!(
            finder
                .find(&DataFileRequest::new(Path::new("datafind-absent.bin")))
                .unwrap(),
            None
        );
    }

    #[test]
    fn working_dir_in_build_tree_probes_build_subdirs() {
        let build = tempdir().unwrap();
        touch(&build.path().join("share").join("data").join("x.bin"));
        let cwd = build.path().join("work");
        fs::create_dir_all(&cwd).unwrap();

        let layout = Layout::detached().with_build_dir(build.path(), &["missing", "share"]);
        let mut locator = MockModuleLocator::new();
        locator.expect_locate().never();

        let registry = data_registry();
        let config = StaticConfig::new();
        let finder = DataFinder::new(&layout, &registry, &config, &locator).with_working_dir(&cwd);
        let found = finder
            .find_traced(&DataFileRequest::new(Path::new("x.bin")))
            .unwrap();
        // The build tree matched, so the module was never consulted
        assert_eq!(
            found,
            Some(Resolution {
                path: build.path().join("share").join("data").join("x.bin"),
                stage: Stage::BuildTree,
            })
        );
    }

    #[test]
    fn source_root_is_found_two_levels_up() {
        let source = tempdir().unwrap();
        touch(&source.path().join("marker.toml"));
        touch(&source.path().join("data").join("x.bin"));
        let cwd = source.path().join("a").join("b");
        fs::create_dir_all(&cwd).unwrap();

        let layout = Layout::detached().with_source_marker("marker.toml");
        let registry = data_registry();
        let config = StaticConfig::new();
        let locator = FixedModuleLocator(None);
        let finder = DataFinder::new(&layout, &registry, &config, &locator).with_working_dir(&cwd);
        let found = finder
            .find_traced(&DataFileRequest::new(Path::new("x.bin")))
            .unwrap()
            .unwrap();
        assert_eq!(found.stage, Stage::SourceTree);
        assert!(found.path.ends_with("data/x.bin"));
    }

    #[test]
    fn source_root_beyond_three_levels_is_ignored() {
        let source = tempdir().unwrap();
        touch(&source.path().join("marker.toml"));
        touch(&source.path().join("x.bin"));
        let cwd = source.path().join("a").join("b").join("c");
        fs::create_dir_all(&cwd).unwrap();

        assert_eq!(find_source_root(&cwd, "marker.toml"), None);
        assert!(find_source_root(&source.path().join("a").join("b"), "marker.toml").is_some());
    }

    #[test]
    fn build_tree_then_source_tree_both_run() {
        // Working directory is inside the build tree, but only the source tree has the file
        let root = tempdir().unwrap();
        let build = root.path().join("target");
        fs::create_dir_all(build.join("data")).unwrap();
        touch(&root.path().join("marker.toml"));
        touch(&root.path().join("x.bin"));

        let layout = Layout::detached()
            .with_build_dir(&build, &["data"])
            .with_source_marker("marker.toml");
        let registry = data_registry();
        let config = StaticConfig::new();
        let locator = FixedModuleLocator(None);
        let finder = DataFinder::new(&layout, &registry, &config, &locator).with_working_dir(&build);
        let found = finder
            .find_traced(&DataFileRequest::new(Path::new("x.bin")))
            .unwrap()
            .unwrap();
        assert_eq!(found.stage, Stage::SourceTree);
    }

    #[test]
    fn install_dir_relative_to_module() {
        let prefix = tempdir().unwrap();
        let bin = prefix.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        touch(&prefix.path().join("share").join("app").join("x.bin"));

        let layout = Layout::detached().with_install_relative(&["../nowhere", "../share/app"]);
        let locator = FixedModuleLocator(Some(bin.join("app")));
        let found = find_in(&layout, &data_registry(), &StaticConfig::new(), &locator, "x.bin").unwrap();
        assert_eq!(found.stage, Stage::InstallRelative);
        assert_eq!(found.path, bin.join("../share/app").join("x.bin"));
    }

    #[test]
    fn install_relative_requires_module_path() {
        let layout = Layout::detached().with_install_relative(&[""]);
        let found = find_in(
            &layout,
            &data_registry(),
            &StaticConfig::new(),
            &FixedModuleLocator(None),
            "datafind-absent.bin",
        );
        assert!(found.is_none());
    }

    #[test]
    fn install_prefix_used_when_module_inside_it() {
        let prefix = tempdir().unwrap();
        touch(&prefix.path().join("share").join("datafind").join("x.bin"));

        let layout = Layout::detached().with_install_prefix(prefix.path(), "share/datafind");
        let locator = FixedModuleLocator(Some(prefix.path().join("lib").join("libapp.so")));
        let found = find_in(&layout, &data_registry(), &StaticConfig::new(), &locator, "x.bin").unwrap();
        assert_eq!(found.stage, Stage::InstallPrefix);
    }

    #[test]
    fn install_prefix_used_when_module_unknown() {
        let prefix = tempdir().unwrap();
        touch(&prefix.path().join("share").join("datafind").join("x.bin"));

        let layout = Layout::detached().with_install_prefix(prefix.path(), "share/datafind");
        let found = find_in(
            &layout,
            &data_registry(),
            &StaticConfig::new(),
            &FixedModuleLocator(None),
            "x.bin",
        )
        .unwrap();
        assert_eq!(found.stage, Stage::InstallPrefix);
    }

    #[test]
    fn install_prefix_ignored_when_module_elsewhere() {
        let prefix = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        touch(&prefix.path().join("share").join("datafind").join("x.bin"));

        let layout = Layout::detached().with_install_prefix(prefix.path(), "share/datafind");
        let locator = FixedModuleLocator(Some(elsewhere.path().join("app")));
        let found = find_in(&layout, &data_registry(), &StaticConfig::new(), &locator, "x.bin");
        assert!(found.is_none());
    }

    #[test]
    fn request_lists_replace_registry_lists() {
        let registered = tempdir().unwrap();
        let explicit = tempdir().unwrap();
        touch(&registered.path().join("x.bin"));
        touch(&explicit.path().join("x.bin"));

        let registry = data_registry();
        registry.add_search_path(registered.path());
        let layout = Layout::detached();
        let locator = FixedModuleLocator(None);
        let config = StaticConfig::new();
        let finder = DataFinder::new(&layout, &registry, &config, &locator);

        let paths = vec![explicit.path().to_path_buf()];
        let found = finder
            .find(&DataFileRequest::new(Path::new("x.bin")).with_search_paths(&paths))
            .unwrap();
        assert_eq!(found, Some(explicit.path().join("x.bin")));
    }

    #[test]
    fn request_parameter_overrides_finder_default() {
        let bare = tempdir().unwrap();
        touch(&bare.path().join("x.bin"));

        let config = StaticConfig::new().with("OTHER_PARAM", [bare.path().to_string_lossy()]);
        let layout = Layout::detached();
        let registry = data_registry();
        let locator = FixedModuleLocator(None);
        let finder = DataFinder::new(&layout, &registry, &config, &locator).with_parameter(PARAM);

        let found = finder
            .find_traced(&DataFileRequest::new(Path::new("x.bin")).with_parameter("OTHER_PARAM"))
            .unwrap()
            .unwrap();
        assert_eq!(found.stage, Stage::Override);
    }

    #[test]
    fn required_wrapper_reports_missing_path() {
        let err = find_data_file_required("datafind-never-present-7f3a.bin", true, Some(PARAM))
            .unwrap_err();
        assert_eq!(
            err.missing_path(),
            Some(Path::new("datafind-never-present-7f3a.bin"))
        );
        assert_eq!(
            find_data_file_required("datafind-never-present-7f3a.bin", false, Some(PARAM)).unwrap(),
            None
        );
    }
}

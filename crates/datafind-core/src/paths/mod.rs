//! Data file lookup across deployment layouts.
//!
//! This module provides the resolution machinery used by every datafind entry point:
//! - Search path registries (generic and samples)
//! - Directory containment checks
//! - Module location probes
//! - Configuration overrides
//! - The staged resolver itself
//!
//! # Design
//!
//! - Returns `Option<PathBuf>` for lookups; `None` means not found, never an error
//! - Process-wide state is reachable through `DataFinder::data`/`DataFinder::samples`,
//!   while `DataFinder::new` takes every collaborator explicitly
//! - OS-specific logic is kept private in `locator`

mod config;
mod layout;
mod locator;
mod registry;
mod relationship;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export public API

// Configuration overrides
pub use config::{ConfigSource, EnvConfig, HINT_SUFFIX, StaticConfig, hint_name};

// Compile-time layout
pub use layout::{
    DEFAULT_BUILD_SUBDIRECTORIES, LIST_SEPARATOR, Layout, SOURCE_ROOT_MARKER, split_list,
};

// Module location
pub use locator::{FixedModuleLocator, ModuleLocator, NativeModuleLocator, bin_location};

// Registries
pub use registry::{
    DATA_REGISTRY, DEFAULT_DATA_SUBDIRECTORIES, DEFAULT_SAMPLES_SUBDIRECTORIES, SAMPLES_REGISTRY,
    SearchRegistry, add_data_search_path, add_data_search_subdirectory,
};

// Containment
pub use relationship::{is_sub_directory, is_within};

// Resolution
pub use resolver::{
    DEFAULT_DATA_PARAMETER, DataFileRequest, DataFinder, Resolution, SAMPLES_DATA_PARAMETER,
    SOURCE_ROOT_SEARCH_LEVELS, Stage, find_data_file, find_data_file_required,
};

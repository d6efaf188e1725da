//! Locate runtime data files regardless of how the library was deployed.
//!
//! Callers name a resource by a relative path; the resolver tries the path as
//! given, registered search roots, configuration overrides, the build tree,
//! a source checkout and finally the install layout, returning the first file
//! that exists.
//!
//! ```no_run
//! use datafind_core::{add_data_search_path, find_data_file};
//!
//! add_data_search_path("/opt/assets");
//! if let Some(path) = find_data_file("cascades/haar.xml", None, None, None)? {
//!     println!("using {}", path.display());
//! }
//! # Ok::<(), datafind_core::DataFileError>(())
//! ```
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod paths;
pub mod samples;

pub use error::DataFileError;

// Re-export the lookup surface
pub use paths::{
    DEFAULT_DATA_PARAMETER, DataFileRequest, DataFinder, Layout, Resolution,
    SAMPLES_DATA_PARAMETER, Stage, add_data_search_path, add_data_search_subdirectory,
    bin_location, find_data_file, find_data_file_required, is_sub_directory,
};
pub use samples::{add_samples_data_search_path, add_samples_data_search_subdirectory};

//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locate a data file using the generic data registry
    Find {
        /// Relative path of the resource
        path: String,
        /// Configuration parameter consulted for `<NAME>` and `<NAME>_HINT` overrides
        #[arg(long = "param", env = "DATAFIND_PARAM")]
        param: Option<String>,
        /// Extra search root, probed directly without subdirectories (may be repeated; later roots win)
        #[arg(long = "search-path")]
        search_paths: Vec<PathBuf>,
        /// Extra subdirectory tried under override, build, source and install roots (may be repeated)
        #[arg(long = "subdir")]
        subdirs: Vec<String>,
        /// Fail when the file cannot be found
        #[arg(long)]
        required: bool,
        /// Also print which lookup stage matched
        #[arg(long)]
        explain: bool,
    },
    /// Locate a sample file using the samples registry
    Sample {
        /// Relative path of the sample
        path: String,
        /// Extra search root, probed directly without subdirectories (may be repeated; later roots win)
        #[arg(long = "search-path")]
        search_paths: Vec<PathBuf>,
        /// Extra subdirectory tried under override, build, source and install roots (may be repeated)
        #[arg(long = "subdir")]
        subdirs: Vec<String>,
        /// Fail when the file cannot be found
        #[arg(long)]
        required: bool,
        /// Do not warn when the resolved path differs from the request
        #[arg(long)]
        silent: bool,
    },
    /// Show the compiled layout and detected module location
    Layout {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

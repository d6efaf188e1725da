use std::env;
use std::path::{Path, PathBuf};

/// Layout variables that packagers may set at build time.
///
/// Each one is forwarded to rustc so `option_env!` sees the same value the
/// build script saw, and changes to it trigger a rebuild.
const FORWARDED_VARS: &[&str] = &[
    "DATAFIND_BUILD_DIR_SEARCH_PATHS",
    "DATAFIND_INSTALL_DATA_DIR_RELATIVE",
    "DATAFIND_INSTALL_PREFIX",
    "DATAFIND_DATA_INSTALL_PATH",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DATAFIND_BUILD_DIR");

    // Build directory: explicit override, else the cargo target directory.
    // OUT_DIR is <target>/[<triple>/]<profile>/build/<pkg>-<hash>/out
    let build_dir = env::var("DATAFIND_BUILD_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| target_dir_from_out_dir(Path::new(&env::var("OUT_DIR").unwrap_or_default())))
        .unwrap_or_else(|| {
            // Fall back to the workspace root (two directories up from crates/datafind-core)
            let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
            manifest_dir
                .parent()
                .and_then(Path::parent)
                .map_or_else(|| manifest_dir.clone(), Path::to_path_buf)
        });

    println!(
        "cargo:rustc-env=DATAFIND_BUILD_DIR={}",
        build_dir.to_string_lossy()
    );

    for var in FORWARDED_VARS {
        println!("cargo:rerun-if-env-changed={var}");
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                println!("cargo:rustc-env={var}={value}");
            }
        }
    }
}

/// Walk up from OUT_DIR to the directory holding the per-profile output.
fn target_dir_from_out_dir(out_dir: &Path) -> Option<PathBuf> {
    // out -> <pkg>-<hash> -> build -> <profile> -> <target dir>
    let profile_dir = out_dir.ancestors().nth(3)?;
    let parent = profile_dir.parent()?;

    // `--target` builds add a <triple> level under the target directory
    let target = env::var("TARGET").unwrap_or_default();
    if !target.is_empty() && parent.file_name().is_some_and(|name| name == target.as_str()) {
        return parent.parent().map(Path::to_path_buf);
    }
    Some(parent.to_path_buf())
}

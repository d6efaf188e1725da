//! Layout command handler.
//!
//! Displays the compiled deployment layout for diagnostics, in the same
//! `key = value` format used by [`datafind_core::Layout`]'s `Display`.

use std::io::Write;
use std::path::{Path, PathBuf};

use datafind_core::Layout;
use serde::Serialize;

use super::write_line;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct LayoutReport<'a> {
    #[serde(flatten)]
    layout: &'a Layout,
    module_location: Option<PathBuf>,
}

/// Execute the layout command.
pub fn execute(
    layout: &Layout,
    module_location: Option<&Path>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if json {
        let report = LayoutReport {
            layout,
            module_location: module_location.map(Path::to_path_buf),
        };
        let rendered =
            serde_json::to_string_pretty(&report).map_err(|e| CliError::Output(e.to_string()))?;
        return write_line(out, &rendered);
    }

    write_line(out, &layout.to_string())?;
    let module = module_location.map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    write_line(out, &format!("module_location = {module}"))
}

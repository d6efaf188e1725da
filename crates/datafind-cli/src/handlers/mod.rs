//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Take the collaborators they need explicitly (registry, finder, writer)
//! - Delegate the lookup to `datafind_core`
//! - Format output for the terminal
//!
//! `main.rs` wires the process-wide registries and finders in.

use std::io::Write;

use crate::error::CliError;

pub mod find;
pub mod layout;
pub mod sample;

/// Result of a lookup command that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    NotFound,
}

impl Outcome {
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Found => 0,
            Self::NotFound => 1,
        }
    }
}

pub(crate) fn write_line(out: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(out, "{line}").map_err(|e| CliError::Output(e.to_string()))
}

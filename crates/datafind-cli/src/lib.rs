//! Command-line front end for `datafind-core`.
//!
//! Parses arguments, wires the process-wide registries into the handlers and
//! maps lookup failures to exit codes.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use commands::Commands;
pub use error::CliError;
pub use handlers::Outcome;
pub use parser::Cli;

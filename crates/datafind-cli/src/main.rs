//! CLI entry point.
//!
//! The only place the process-wide registries and the compiled layout are
//! handed to the handlers.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use datafind_cli::handlers::find::FindArgs;
use datafind_cli::handlers::sample::SampleArgs;
use datafind_cli::{Cli, CliError, Commands, Outcome, handlers};
use datafind_core::paths::{DATA_REGISTRY, SAMPLES_REGISTRY};
use datafind_core::{DataFinder, Layout, bin_location};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report(outcome: Outcome, path: &str) -> u8 {
    if outcome == Outcome::NotFound {
        eprintln!("{path}: not found");
    }
    outcome.exit_code()
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(0);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Find {
            path,
            param,
            search_paths,
            subdirs,
            required,
            explain,
        } => {
            let args = FindArgs {
                path: &path,
                param: param.as_deref(),
                search_paths: &search_paths,
                subdirs: &subdirs,
                required,
                explain,
            };
            let outcome =
                handlers::find::execute(&DATA_REGISTRY, &DataFinder::data(), &args, &mut out)?;
            Ok(report(outcome, &path))
        }
        Commands::Sample {
            path,
            search_paths,
            subdirs,
            required,
            silent,
        } => {
            let args = SampleArgs {
                path: &path,
                search_paths: &search_paths,
                subdirs: &subdirs,
                required,
                silent,
            };
            let outcome = handlers::sample::execute(
                &SAMPLES_REGISTRY,
                &DataFinder::samples(),
                &args,
                &mut out,
            )?;
            Ok(report(outcome, &path))
        }
        Commands::Layout { json } => {
            handlers::layout::execute(
                &Layout::compiled(),
                bin_location().as_deref(),
                json,
                &mut out,
            )?;
            Ok(0)
        }
    }
}

fn main() -> ExitCode {
    // Load environment variables before anything reads the override parameters
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(err.downcast_ref::<CliError>().map_or(1, CliError::exit_code))
        }
    }
}

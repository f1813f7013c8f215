//! `quotekeeper` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional file logging, dispatch one command.
//! - Map failures to a non-zero exit status with a one-line message.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use quotekeeper_core::{default_log_level, init_logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let db_path = cli.db_path();
    match commands::run(cli.command, &db_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

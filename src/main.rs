//! `homecache` command-line entry point.
//!
//! - `homecache copy`: archive the payloads named by a manifest.
//! - `homecache normalize`: rename legacy regional root folders.
//! - `homecache query`: filter and rewrite a manifest.
//!
//! Usage errors, configuration errors and a missing manifest exit with code
//! 1. Problems with individual manifest lines never do.

mod cli;
mod commands;
mod error;
mod logging;
mod summary;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use homecache_config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        },
    };
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        },
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Copy(args) => commands::copy::execute(args, &config),
        Command::Normalize(args) => commands::normalize::execute(args, &config),
        Command::Query(args) => commands::query::execute(args),
    }
}

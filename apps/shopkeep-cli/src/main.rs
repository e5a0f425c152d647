//! # Shopkeep Entry Point
//!
//! Parses flags and hands over to [`shopkeep_cli::run`]. Exits with status 1
//! if startup fails (bad config, malformed backing file, unwritable log).

use std::process::ExitCode;

use clap::Parser;
use shopkeep_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match shopkeep_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shopkeep: {}", err);
            ExitCode::FAILURE
        }
    }
}

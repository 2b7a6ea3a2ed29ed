use clap::Parser;
use std::process::ExitCode;

use xfind::{Cli, Output};

fn main() -> ExitCode {
    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::stdout().error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

//! Command-line interface for xfind
//!
//! clap handles the outer surface (verbosity, the search path); everything
//! after the path is a find-style flag list handed to [`crate::args::parse`].

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

pub mod output;

pub use output::Output;

use crate::args;
use crate::config::Settings;
use crate::engine::Engine;

const FLAGS_HELP: &str = "\
Flags:
  -name <glob>              match the base name (* and ?), repeatable
  -exclude <glob>           skip matching entries, prune matching directories
  -type <file|dir|both>     restrict entry kind, repeatable
  -match <text>             match files containing text
  -regex <pattern>          match files with a line matching pattern
  -exec <action> [args...]  run an action for every match
  -delete                   delete matches after the walk
  -debug                    print what would run instead of running it

Actions:
  print [args...]           print the arguments
  printmatch                print matching lines with their numbers
  count                     count matches
  countlines                count lines of matched files
  countmatch                count matching lines
  <command> [args...]       run an external command

Placeholders: {} is the matched entry, [] its directory (once per directory).

Examples:
  xfind . -name \"*.go\" -exec print {}
  xfind src -match TODO -exec printmatch
  xfind build -name \"*.o\" -debug -delete";

/// xfind - find files and run actions on them
#[derive(Parser, Debug)]
#[command(name = "xfind", version, about, long_about = None, after_help = FLAGS_HELP)]
pub struct Cli {
    /// Increase log verbosity (can be repeated)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(long)]
    pub quiet: bool,

    /// Directory to search
    pub path: Option<PathBuf>,

    /// Find-style flags, e.g. -name "*.rs" -exec print {}
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "FLAGS")]
    pub flags: Vec<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let Some(path) = self.path else {
            Cli::command().print_help()?;
            return Ok(());
        };
        if self.flags.is_empty() {
            Cli::command().print_help()?;
            return Ok(());
        }

        let parsed = args::parse(self.flags).context("Invalid arguments")?;
        let settings = Settings::load().context("Failed to load settings")?;
        let engine = Engine::new(parsed, &settings, Output::stdout())?;

        engine
            .run(&path)
            .with_context(|| format!("Search of {} failed", path.display()))?;
        Ok(())
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

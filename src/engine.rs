//! Wires parsed flags, settings and output into one search run

use anyhow::{Context, Result};
use std::path::Path;

use crate::actions::{Counters, Dispatcher, TraversalState, finalize};
use crate::args::ParsedArgs;
use crate::cli::output::Output;
use crate::config::Settings;
use crate::error::WalkError;
use crate::exec::{Shell, ShellRunner};
use crate::filters::FilterConfig;
use crate::walk;

/// What a finished run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched_files: usize,
    pub matched_dirs: usize,
    pub counters: Counters,
    pub deleted: usize,
}

#[derive(Debug)]
pub struct Engine {
    filters: FilterConfig,
    dispatcher: Dispatcher,
    delete: bool,
}

impl Engine {
    pub fn new(parsed: ParsedArgs, settings: &Settings, output: Output) -> Result<Self> {
        let shell =
            Shell::with_overrides(settings.shell.as_deref(), settings.shell_flag.as_deref());
        let runner = ShellRunner::new(shell, settings.workdir())
            .context("Failed to start command runtime")?;

        let ParsedArgs {
            filters,
            actions,
            delete,
            debug,
        } = parsed;
        let dispatcher =
            Dispatcher::new(actions, filters.content.clone(), runner, output).with_debug(debug);

        Ok(Self {
            filters,
            dispatcher,
            delete,
        })
    }

    /// Walk `root`, dispatch every match, then report counters and delete.
    ///
    /// A traversal failure skips the counter report and deletion entirely.
    pub fn run(&self, root: &Path) -> Result<RunSummary, WalkError> {
        let mut state = TraversalState::new();

        walk::walk(
            root,
            |entry| self.filters.excluded(entry),
            |entry| self.filters.matches(entry),
            |entry| self.dispatcher.dispatch(&mut state, entry),
        )?;

        let output = self.dispatcher.output();
        finalize::report_counters(self.dispatcher.templates(), &state.counters, output);
        let deleted = if self.delete {
            finalize::delete_matches(&state, self.dispatcher.is_debug(), output)
        } else {
            0
        };

        let summary = RunSummary {
            matched_files: state.matched_files().len(),
            matched_dirs: state.matched_dirs().len(),
            counters: state.counters,
            deleted,
        };
        tracing::info!(
            "Matched {} files and {} directories",
            summary.matched_files,
            summary.matched_dirs
        );
        Ok(summary)
    }
}

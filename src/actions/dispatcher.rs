use std::ops::ControlFlow;

use super::{Action, ActionTemplate, BuiltinAction, Invocation, TraversalState};
use crate::cli::output::Output;
use crate::exec::{ExecutionCallbacks, ExecutionEvent, ShellRunner};
use crate::filters::ContentMatcher;
use crate::filters::content;
use crate::shared::os;
use crate::walk::Entry;

/// Which per-line reports a matched file needs
#[derive(Debug, Default, Clone, Copy)]
struct LineReport {
    print_matches: bool,
    count_lines: bool,
    count_matches: bool,
}

impl LineReport {
    fn request(&mut self, builtin: BuiltinAction) {
        match builtin {
            BuiltinAction::PrintMatch => self.print_matches = true,
            BuiltinAction::CountLines => self.count_lines = true,
            BuiltinAction::CountMatch => self.count_matches = true,
            BuiltinAction::Print | BuiltinAction::Count => {}
        }
    }

    fn is_requested(&self) -> bool {
        self.print_matches || self.count_lines || self.count_matches
    }
}

/// Runs the registered actions against every matched entry
#[derive(Debug)]
pub struct Dispatcher {
    templates: Vec<ActionTemplate>,
    content: ContentMatcher,
    runner: ShellRunner,
    output: Output,
    debug: bool,
}

impl Dispatcher {
    pub fn new(
        templates: Vec<ActionTemplate>,
        content: ContentMatcher,
        runner: ShellRunner,
        output: Output,
    ) -> Self {
        Self {
            templates,
            content,
            runner,
            output,
            debug: false,
        }
    }

    /// Print command lines instead of running anything
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn templates(&self) -> &[ActionTemplate] {
        &self.templates
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Handle one matched entry
    pub fn dispatch(&self, state: &mut TraversalState, entry: &Entry) {
        let dir = entry.containing_dir();
        let first_visit = state.mark_processed(dir);
        state.record_match(entry);

        let mut report = LineReport::default();
        for template in &self.templates {
            if template.is_directory_scoped() && !first_visit {
                tracing::trace!("'{}' already ran for {}", template.name(), dir.display());
                continue;
            }

            let invocation = template.expand(entry.path(), dir);
            if self.debug {
                self.output.line_bytes(&os::to_bytes(&invocation.command_line()));
                continue;
            }

            match &invocation.action {
                Action::Builtin(BuiltinAction::Print) => print_params(&self.output, &invocation),
                Action::Builtin(BuiltinAction::Count) => state.counters.files_counted += 1,
                Action::Builtin(builtin) => report.request(*builtin),
                Action::External(_) => self.run_external(&invocation),
            }
        }

        if report.is_requested() && entry.is_file() {
            self.report_lines(state, entry, report);
        }
    }

    fn run_external(&self, invocation: &Invocation) {
        let command_line = invocation.command_line();
        tracing::debug!("Executing {}", command_line.to_string_lossy());

        let output = self.output.clone();
        let callbacks = ExecutionCallbacks::new()
            .with_output(move |line| output.line(line))
            .with_event(|event, param| match event {
                ExecutionEvent::ShellError => tracing::warn!("{}: {}", event, param),
                _ => tracing::debug!("{}: {}", event, param),
            });

        if self.runner.run(&invocation.name, command_line, callbacks).is_none() {
            tracing::warn!("Command '{}' did not complete successfully", invocation.name);
        }
    }

    fn report_lines(&self, state: &mut TraversalState, entry: &Entry, report: LineReport) {
        let counters = &mut state.counters;
        let scanned = content::scan_lines(entry.path(), |number, line| {
            if report.count_lines {
                counters.lines_scanned += 1;
            }
            if let Some(matched) = self.content.match_line(line) {
                if report.count_matches {
                    counters.lines_matched += 1;
                }
                if report.print_matches {
                    self.output.line(&format!("{number:>5}: {matched}"));
                }
            }
            ControlFlow::Continue(())
        });

        if let Err(e) = scanned {
            tracing::warn!("Cannot read {}: {}", entry.path().display(), e);
        }
    }
}

/// `print`: the parameters joined by one space, nothing when there are none
fn print_params(output: &Output, invocation: &Invocation) {
    if invocation.params.is_empty() {
        return;
    }

    let joined = invocation
        .params
        .iter()
        .map(|param| os::to_bytes(param))
        .collect::<Vec<_>>()
        .join(&b' ');
    output.line_bytes(&joined);
}

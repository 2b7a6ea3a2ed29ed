//! One external command run
//!
//! A `CommandExecution` starts the templated command line through the shell,
//! drains its stdout line by line on a separate task and waits for both the
//! drain and the process exit before returning. Failures never propagate: the
//! caller gets `None` and the reason is reported through the event callback
//! and the log.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::shell::{self, Shell};

/// Everything needed to run one command
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Name used in events and log lines
    pub command_name: String,
    /// Command line after placeholder substitution
    pub command_line: OsString,
    pub workdir: Option<PathBuf>,
    /// Values for `$1`, `$2`, … in the command line
    pub params: Vec<OsString>,
}

/// Lifecycle events reported while a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// Emitted before start with the working directory
    ShellInfo,
    /// The process could not be started
    ShellError,
    /// Standard output reached end of stream
    ShellComplete,
}

impl ExecutionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionEvent::ShellInfo => "shell_info",
            ExecutionEvent::ShellError => "shell_error",
            ExecutionEvent::ShellComplete => "shell_complete",
        }
    }
}

impl fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type MatchOutputFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;
pub type OutputFn = Arc<dyn Fn(&str) + Send + Sync>;
pub type EventFn = Arc<dyn Fn(ExecutionEvent, &str) + Send + Sync>;

/// Optional hooks into a running command
#[derive(Clone, Default)]
pub struct ExecutionCallbacks {
    /// Filter deciding which output lines reach `output`; absent lets all through
    pub match_output: Option<MatchOutputFn>,
    pub output: Option<OutputFn>,
    pub event: Option<EventFn>,
}

impl ExecutionCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_output(
        mut self,
        f: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.match_output = Some(Arc::new(f));
        self
    }

    pub fn with_output(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.output = Some(Arc::new(f));
        self
    }

    pub fn with_event(
        mut self,
        f: impl Fn(ExecutionEvent, &str) + Send + Sync + 'static,
    ) -> Self {
        self.event = Some(Arc::new(f));
        self
    }

    fn line(&self, line: &str) {
        let wanted = self.match_output.as_ref().is_none_or(|matches| matches(line));
        if let (true, Some(output)) = (wanted, &self.output) {
            output(line);
        }
    }

    fn emit(&self, event: ExecutionEvent, param: &str) {
        if let Some(callback) = &self.event {
            callback(event, param);
        }
    }
}

impl fmt::Debug for ExecutionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionCallbacks")
            .field("match_output", &self.match_output.is_some())
            .field("output", &self.output.is_some())
            .field("event", &self.event.is_some())
            .finish()
    }
}

/// A single external command run
#[derive(Debug)]
pub struct CommandExecution {
    context: ExecutionContext,
    callbacks: ExecutionCallbacks,
    shell: Shell,
}

impl CommandExecution {
    pub fn new(context: ExecutionContext, callbacks: ExecutionCallbacks) -> Self {
        Self {
            context,
            callbacks,
            shell: Shell::native(),
        }
    }

    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    /// Run the command to completion.
    ///
    /// Returns the process id when the command started and exited with
    /// status zero; `None` for an empty command line, a start failure or a
    /// non-zero exit.
    pub async fn execute(&self) -> Option<u32> {
        let tokens = shell::split_command_line(&self.context.command_line);
        if tokens.is_empty() {
            return None;
        }

        let script = shell::make_shell_command(&tokens, &self.context.params);
        let name = self.context.command_name.clone();

        let mut cmd = self.shell.command(&script);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if let Some(workdir) = &self.context.workdir {
            cmd.current_dir(workdir);
            self.callbacks
                .emit(ExecutionEvent::ShellInfo, &workdir.to_string_lossy());
        }

        tracing::debug!(
            "Running '{}' via {} {}",
            script.to_string_lossy(),
            self.shell.program(),
            self.shell.flag()
        );
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to start '{}': {}", name, e);
                self.callbacks.emit(ExecutionEvent::ShellError, &name);
                return None;
            }
        };
        let pid = child.id();

        let Some(stdout) = child.stdout.take() else {
            tracing::warn!("No stdout captured for '{}'", name);
            return None;
        };

        let callbacks = self.callbacks.clone();
        let drain_name = name.clone();
        let drain = tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        callbacks.line(line.trim_end_matches(['\n', '\r']));
                    }
                    Err(e) => {
                        tracing::warn!("Reading output of '{}' failed: {}", drain_name, e);
                        break;
                    }
                }
            }
            callbacks.emit(ExecutionEvent::ShellComplete, &drain_name);
        });

        if let Err(e) = drain.await {
            tracing::warn!("Output task for '{}' failed: {}", name, e);
        }

        match child.wait().await {
            Ok(status) if status.success() => pid,
            Ok(status) => {
                tracing::warn!("'{}' exited with {}", name, status);
                None
            }
            Err(e) => {
                tracing::warn!("Waiting for '{}' failed: {}", name, e);
                None
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn context(command_line: &str) -> ExecutionContext {
        ExecutionContext {
            command_name: "test".to_string(),
            command_line: command_line.into(),
            workdir: None,
            params: Vec::new(),
        }
    }

    fn collector() -> (Arc<Mutex<Vec<String>>>, ExecutionCallbacks) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let callbacks = ExecutionCallbacks::new()
            .with_output(move |line| sink.lock().unwrap().push(line.to_string()));
        (lines, callbacks)
    }

    #[tokio::test]
    async fn test_streams_stdout_lines() {
        let (lines, callbacks) = collector();
        let exec = CommandExecution::new(context("printf 'one\\ntwo\\n'"), callbacks);

        assert!(exec.execute().await.is_some());
        assert_eq!(*lines.lock().unwrap(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_match_filter_drops_lines() {
        let (lines, callbacks) = collector();
        let callbacks = callbacks.with_match_output(|line| line.starts_with('k'));
        let exec = CommandExecution::new(context("printf 'keep\\ndrop\\nkept\\n'"), callbacks);

        exec.execute().await;
        assert_eq!(*lines.lock().unwrap(), vec!["keep", "kept"]);
    }

    #[tokio::test]
    async fn test_positional_params() {
        let (lines, callbacks) = collector();
        let mut ctx = context("echo $1 $2");
        ctx.params = vec!["hello".into(), "big world".into()];

        CommandExecution::new(ctx, callbacks).execute().await;
        assert_eq!(*lines.lock().unwrap(), vec!["hello big world"]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_yields_none() {
        let exec = CommandExecution::new(context("exit 3"), ExecutionCallbacks::new());
        assert!(exec.execute().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_command_line() {
        let exec = CommandExecution::new(context("   "), ExecutionCallbacks::new());
        assert!(exec.execute().await.is_none());
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callbacks = ExecutionCallbacks::new().with_event(move |event, param| {
            sink.lock().unwrap().push(format!("{event}:{param}"));
        });

        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut ctx = context("pwd");
        ctx.workdir = Some(temp_dir.path().to_path_buf());
        CommandExecution::new(ctx, callbacks).execute().await;

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("shell_info:"));
        assert_eq!(events[1], "shell_complete:test");
    }

    #[tokio::test]
    async fn test_start_failure_reports_shell_error() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callbacks = ExecutionCallbacks::new().with_event(move |event, _| {
            sink.lock().unwrap().push(event);
        });

        let exec = CommandExecution::new(context("true"), callbacks)
            .with_shell(Shell::new("/definitely/not/a/shell", "-c"));

        assert!(exec.execute().await.is_none());
        assert_eq!(*events.lock().unwrap(), vec![ExecutionEvent::ShellError]);
    }
}

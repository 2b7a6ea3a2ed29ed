//! External command execution
//!
//! Commands run one at a time: the runner blocks on each execution until its
//! output has been drained and the process has exited.

pub mod execution;
pub mod shell;

pub use execution::{CommandExecution, ExecutionCallbacks, ExecutionContext, ExecutionEvent};
pub use shell::Shell;

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};

/// Owns the runtime external commands are driven on
#[derive(Debug)]
pub struct ShellRunner {
    runtime: Runtime,
    shell: Shell,
    workdir: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new(shell: Shell, workdir: Option<PathBuf>) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            runtime,
            shell,
            workdir,
        })
    }

    /// Run `command_line` and block until it has finished
    pub fn run(
        &self,
        command_name: &str,
        command_line: OsString,
        callbacks: ExecutionCallbacks,
    ) -> Option<u32> {
        let context = ExecutionContext {
            command_name: command_name.to_string(),
            command_line,
            workdir: self.workdir.clone(),
            params: Vec::new(),
        };
        let execution = CommandExecution::new(context, callbacks).with_shell(self.shell.clone());
        self.runtime.block_on(execution.execute())
    }
}

//! Output system for xfind
//!
//! Result lines (prints, match reports, counters, command output) go to a
//! shared writer, stdout by default, so they stay in order and can be
//! captured. Diagnostics go to stderr with `console` styling.

use console::style;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Output handler shared by the dispatcher and the command runner
#[derive(Clone)]
pub struct Output {
    writer: Arc<Mutex<dyn Write + Send>>,
}

impl Output {
    /// Write results to stdout
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    /// Write results to any writer
    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Write results into a buffer that can be read back
    pub fn captured() -> (Self, CapturedOutput) {
        let buffer = CapturedOutput::default();
        (Self::to_writer(buffer.clone()), buffer)
    }

    /// Print one result line
    pub fn line(&self, text: &str) {
        self.line_bytes(text.as_bytes());
    }

    /// Print one result line given as raw bytes, such as a non-UTF-8 path
    pub fn line_bytes(&self, bytes: &[u8]) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let written = writer
            .write_all(bytes)
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush());
        if let Err(e) = written {
            tracing::debug!("Dropping output line: {}", e);
        }
    }

    /// Print a `label: value` summary line
    pub fn summary_stats(&self, label: &str, value: usize) {
        self.line(&format!("{label}: {value}"));
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// In-memory sink behind `Output::captured`
#[derive(Clone, Default)]
pub struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Everything written so far
    pub fn text(&self) -> String {
        self.buffer
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }

    /// Everything written so far, unchanged
    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().map(|buf| buf.clone()).unwrap_or_default()
    }

    /// Everything written so far, split into lines
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

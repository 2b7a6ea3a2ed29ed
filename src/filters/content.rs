//! Line-level content matching
//!
//! A line matches when it contains any configured substring or satisfies any
//! configured regex. The same matcher drives the `-match`/`-regex` predicate
//! and the `printmatch`/`countmatch` reports.

use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::ControlFlow;
use std::path::Path;

/// Substring and regex filters applied to single lines
#[derive(Debug, Clone, Default)]
pub struct ContentMatcher {
    substrings: Vec<String>,
    regexes: Vec<Regex>,
}

impl ContentMatcher {
    pub fn new(substrings: Vec<String>, regexes: Vec<Regex>) -> Self {
        Self {
            substrings,
            regexes,
        }
    }

    pub fn add_substring(&mut self, text: String) {
        self.substrings.push(text);
    }

    pub fn add_regex(&mut self, regex: Regex) {
        self.regexes.push(regex);
    }

    /// True when neither `-match` nor `-regex` was given
    pub fn is_empty(&self) -> bool {
        self.substrings.is_empty() && self.regexes.is_empty()
    }

    pub fn substrings(&self) -> &[String] {
        &self.substrings
    }

    pub fn regexes(&self) -> &[Regex] {
        &self.regexes
    }

    /// Match a single line, returning the matched text.
    ///
    /// A substring hit yields the whole line. A regex hit yields its first
    /// capture group when that group participated, else the whole match.
    pub fn match_line<'l>(&self, line: &'l str) -> Option<&'l str> {
        if self.substrings.iter().any(|s| line.contains(s.as_str())) {
            return Some(line);
        }

        self.regexes.iter().find_map(|regex| {
            let caps = regex.captures(line)?;
            caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
        })
    }

    /// Check whether any line of the file matches, stopping at the first hit
    pub fn file_matches(&self, path: &Path) -> io::Result<bool> {
        let mut found = false;
        scan_lines(path, |_, line| {
            if self.match_line(line).is_some() {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }
}

/// Feed every line of a file to `visit` with its 1-based line number.
///
/// Line terminators (`\n` or `\r\n`) are stripped and invalid UTF-8 is
/// replaced rather than treated as an error.
pub fn scan_lines<F>(path: &Path, mut visit: F) -> io::Result<()>
where
    F: FnMut(usize, &str) -> ControlFlow<()>,
{
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        line_number += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let line = String::from_utf8_lossy(&buf);
        if visit(line_number, &line).is_break() {
            return Ok(());
        }
    }
}

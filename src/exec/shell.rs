//! Shell selection and command-line templating
//!
//! External actions always run through the host shell. Which shell, and the
//! platform launch attributes, live here and nowhere else. Command lines are
//! built from OS strings so non-UTF-8 paths reach the shell unchanged.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use tokio::process::Command;

use crate::shared::os;

/// Shell program plus the flag that makes it run an inline script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: String,
    flag: String,
}

impl Shell {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    /// `cmd.exe /C` on Windows, `/bin/sh -c` everywhere else
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::new(r"c:\windows\system32\cmd.exe", "/C")
        } else {
            Self::new("/bin/sh", "-c")
        }
    }

    /// Native shell with optional overrides for program and flag
    pub fn with_overrides(program: Option<&str>, flag: Option<&str>) -> Self {
        let native = Self::native();
        Self {
            program: program.map(str::to_string).unwrap_or(native.program),
            flag: flag.map(str::to_string).unwrap_or(native.flag),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Build the process that runs `script`
    pub fn command(&self, script: &OsStr) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.flag);
        push_script(&mut cmd, script);
        cmd
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(windows)]
fn push_script(cmd: &mut Command, script: &OsStr) {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    // cmd.exe parses the line itself
    cmd.raw_arg(script);
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn push_script(cmd: &mut Command, script: &OsStr) {
    cmd.arg(script);
}

/// Bytes that need a backslash inside double quotes
fn needs_escape(byte: u8) -> bool {
    if cfg!(unix) {
        matches!(byte, b'"' | b'\\' | b'$' | b'`')
    } else {
        byte == b'"'
    }
}

/// Whether a backslash escapes the next byte inside double quotes
fn escapes_in_quotes() -> bool {
    cfg!(unix)
}

/// True when the whole token is one double-quoted run
fn is_quoted(token: &[u8]) -> bool {
    let [b'"', inner @ .., b'"'] = token else {
        return false;
    };

    let mut escaped = false;
    for &byte in inner {
        match byte {
            _ if escaped => escaped = false,
            b'\\' if escapes_in_quotes() => escaped = true,
            b'"' => return false,
            _ => {}
        }
    }
    !escaped
}

/// Wrap a token in double quotes when it contains whitespace or a quote
pub fn quote_token(token: &[u8]) -> Cow<'_, [u8]> {
    let needs_quotes = token.iter().any(|b| b.is_ascii_whitespace() || *b == b'"');
    if !needs_quotes || is_quoted(token) {
        return Cow::Borrowed(token);
    }

    let mut quoted = Vec::with_capacity(token.len() + 2);
    quoted.push(b'"');
    for &byte in token {
        if needs_escape(byte) {
            quoted.push(b'\\');
        }
        quoted.push(byte);
    }
    quoted.push(b'"');
    Cow::Owned(quoted)
}

/// Join an action name and its parameters into one command line
pub fn make_command_line<S: AsRef<OsStr>>(name: &str, params: &[S]) -> OsString {
    let mut line = quote_token(name.as_bytes()).into_owned();
    for param in params {
        line.push(b' ');
        line.extend_from_slice(&quote_token(&os::to_bytes(param.as_ref())));
    }
    os::from_bytes(line)
}

/// Split a command line on whitespace, keeping double-quoted runs (quotes
/// included) inside one token.
pub fn split_command_line(line: &OsStr) -> Vec<OsString> {
    let mut tokens = Vec::new();
    let mut current = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for &byte in os::to_bytes(line).iter() {
        if escaped {
            escaped = false;
            current.push(byte);
            continue;
        }
        match byte {
            b'\\' if in_quotes && escapes_in_quotes() => {
                escaped = true;
                current.push(byte);
            }
            b'"' => {
                in_quotes = !in_quotes;
                current.push(byte);
            }
            b if b.is_ascii_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(os::from_bytes(std::mem::take(&mut current)));
                }
            }
            b => current.push(b),
        }
    }
    if !current.is_empty() {
        tokens.push(os::from_bytes(current));
    }

    tokens
}

/// The parameter a whole `$N` token refers to, 1-indexed
fn positional<'p>(token: &OsStr, params: &'p [OsString]) -> Option<&'p OsString> {
    let index = token.to_str()?.strip_prefix('$')?.parse::<usize>().ok()?;
    params.get(index.checked_sub(1)?)
}

/// Substitute `$1..$N` tokens from `params` and re-join into a shell script.
///
/// Only whole tokens are substituted. An index of zero, past the end, or not a
/// number leaves the token as it is.
pub fn make_shell_command(tokens: &[OsString], params: &[OsString]) -> OsString {
    let mut script = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            script.push(b' ');
        }
        let token = positional(token, params).unwrap_or(token);
        script.extend_from_slice(&quote_token(&os::to_bytes(token)));
    }
    os::from_bytes(script)
}

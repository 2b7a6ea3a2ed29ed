//! Error taxonomy for xfind
//!
//! Configuration errors abort before the walk starts and walk errors abort the
//! walk itself. Content-scan and execution failures never reach these types:
//! they are logged where they happen and the entry is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// A bad flag, arity, `-type` value or pattern in the argument list
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid argument ({index}): {token}")]
    InvalidArgument { index: usize, token: String },

    #[error("invalid parameter count for argument '{flag}': expected {min}..={max}, got {found}")]
    ArgumentCount {
        flag: &'static str,
        min: usize,
        max: usize,
        found: usize,
    },

    #[error("invalid parameter '{0}' for '-type' (expected file, dir or both)")]
    InvalidTypeValue(String),

    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid wildcard pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    /// The flag this error is about, when there is one
    pub fn flag(&self) -> Option<&str> {
        match self {
            ConfigError::ArgumentCount { flag, .. } => Some(*flag),
            ConfigError::InvalidTypeValue(_) => Some("-type"),
            ConfigError::InvalidRegex { .. } => Some("-regex"),
            ConfigError::InvalidArgument { .. } | ConfigError::InvalidPattern { .. } => None,
        }
    }
}

/// Failure while walking the tree; the walk stops at the first one
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot resolve search root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

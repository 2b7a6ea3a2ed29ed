//! # xfind
//!
//! Recursive file search with find-style predicates and templated actions.
//!
//! The search walks a directory tree depth-first, filters entries by name
//! glob, exclusion glob, entry type and file content, and runs actions on
//! every match: built-in reporters (`print`, `printmatch`, `count`,
//! `countlines`, `countmatch`) or external commands with `{}` and `[]`
//! placeholders substituted.
//!
//! ```bash
//! # Print every Go file under the current directory
//! xfind . -name "*.go" -exec print {}
//!
//! # Count TODO lines, then preview deleting object files
//! xfind src -match TODO -exec countmatch
//! xfind build -name "*.o" -debug -delete
//! ```

pub mod actions;
pub mod args;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod filters;
pub mod shared;
pub mod walk;

pub use cli::{Cli, Output};
pub use engine::{Engine, RunSummary};

/// Result type alias for xfind operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

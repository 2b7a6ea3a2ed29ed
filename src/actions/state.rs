//! Per-run traversal state
//!
//! Created fresh for every run and threaded by `&mut` through the walk
//! callback and the dispatcher.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::walk::Entry;

/// Running totals for the counting built-ins
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// Entries counted by `count`
    pub files_counted: usize,
    /// Lines scanned by `countlines`
    pub lines_scanned: usize,
    /// Lines matched by `countmatch`
    pub lines_matched: usize,
}

#[derive(Debug, Default)]
pub struct TraversalState {
    processed_dirs: HashSet<PathBuf>,
    matched_files: Vec<PathBuf>,
    matched_dirs: Vec<PathBuf>,
    pub counters: Counters,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `dir` as processed; true only the first time
    pub fn mark_processed(&mut self, dir: &Path) -> bool {
        self.processed_dirs.insert(dir.to_path_buf())
    }

    /// Remember a matched entry for `-delete`
    pub fn record_match(&mut self, entry: &Entry) {
        if entry.is_dir() {
            self.matched_dirs.push(entry.path().to_path_buf());
        } else {
            self.matched_files.push(entry.path().to_path_buf());
        }
    }

    pub fn matched_files(&self) -> &[PathBuf] {
        &self.matched_files
    }

    pub fn matched_dirs(&self) -> &[PathBuf] {
        &self.matched_dirs
    }
}

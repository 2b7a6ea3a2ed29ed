//! Depth-first traversal driver
//!
//! Walks the tree pre-order with absolute paths, sorted by file name inside
//! each directory. An excluded directory is pruned with its whole subtree; an
//! excluded file is skipped. Everything else that matches is handed to the
//! callback before any of its descendants is visited.

use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::WalkError;

/// Whether an entry is a directory or anything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A visited entry: absolute path, kind and base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    kind: EntryKind,
    name: String,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, kind, name }
    }

    fn from_dir_entry(entry: &DirEntry) -> Self {
        let kind = if entry.file_type().is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Self::new(entry.path(), kind)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Base name used by name and exclude globs
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// The directory `[]` resolves to: a directory itself, or a file's parent
    pub fn containing_dir(&self) -> &Path {
        match self.kind {
            EntryKind::Dir => &self.path,
            EntryKind::File => self.path.parent().unwrap_or(&self.path),
        }
    }
}

/// Fold `.` and `..` out of an absolute path without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    path.components().fold(PathBuf::new(), |mut normal, component| {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
        normal
    })
}

/// Walk `root`, calling `callback` for every entry that is not excluded and
/// satisfies `matches`.
pub fn walk<X, M, C>(
    root: &Path,
    mut exclude: X,
    mut matches: M,
    mut callback: C,
) -> Result<(), WalkError>
where
    X: FnMut(&Entry) -> bool,
    M: FnMut(&Entry) -> bool,
    C: FnMut(&Entry),
{
    let root = std::path::absolute(root)
        .map(|absolute| normalize(&absolute))
        .map_err(|source| WalkError::Root {
            path: root.to_path_buf(),
            source,
        })?;
    tracing::debug!("Walking {}", root.display());

    let mut entries = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(next) = entries.next() {
        let entry = Entry::from_dir_entry(&next?);

        if exclude(&entry) {
            if entry.is_dir() {
                tracing::trace!("Pruning excluded directory {}", entry.path().display());
                entries.skip_current_dir();
            } else {
                tracing::trace!("Skipping excluded file {}", entry.path().display());
            }
            continue;
        }

        if matches(&entry) {
            callback(&entry);
        }
    }

    Ok(())
}

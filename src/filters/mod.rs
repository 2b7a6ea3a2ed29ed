//! Predicate engine
//!
//! Composes the type, name, exclude and content filters into the two
//! decisions the walker needs per entry: is it excluded, and does it match.
//! All filters are ANDed; name globs and content filters are ORed among
//! themselves.

pub mod content;

pub use content::ContentMatcher;

use regex::Regex;

use crate::shared::glob::{self, Wildcard};
use crate::walk::{Entry, EntryKind};

/// Which entry kinds `-type` lets through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeSelector {
    files: bool,
    dirs: bool,
}

impl TypeSelector {
    pub const BOTH: TypeSelector = TypeSelector {
        files: true,
        dirs: true,
    };

    pub fn enable_files(&mut self) {
        self.files = true;
    }

    pub fn enable_dirs(&mut self) {
        self.dirs = true;
    }

    /// Nothing selected means both
    pub fn resolved(self) -> Self {
        if self.files || self.dirs { self } else { Self::BOTH }
    }

    pub fn allows(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::File => self.files,
            EntryKind::Dir => self.dirs,
        }
    }
}

/// Everything that decides whether an entry is visited and acted on
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub names: Vec<Wildcard>,
    pub excludes: Vec<Wildcard>,
    pub content: ContentMatcher,
    pub kinds: TypeSelector,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            excludes: Vec::new(),
            content: ContentMatcher::default(),
            kinds: TypeSelector::BOTH,
        }
    }
}

impl FilterConfig {
    pub fn substrings(&self) -> &[String] {
        self.content.substrings()
    }

    pub fn regexes(&self) -> &[Regex] {
        self.content.regexes()
    }

    /// True when the entry's base name matches any `-exclude` glob
    pub fn excluded(&self, entry: &Entry) -> bool {
        glob::any_match(&self.excludes, entry.name())
    }

    /// Type, then name, then content
    pub fn matches(&self, entry: &Entry) -> bool {
        if !self.kinds.allows(entry.kind()) {
            return false;
        }

        if !self.names.is_empty() && !glob::any_match(&self.names, entry.name()) {
            return false;
        }

        self.content_matches(entry)
    }

    fn content_matches(&self, entry: &Entry) -> bool {
        if self.content.is_empty() {
            return true;
        }
        if entry.is_dir() {
            return false;
        }

        match self.content.file_matches(entry.path()) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", entry.path().display(), e);
                false
            }
        }
    }
}

//! Shell-style wildcard matching
//!
//! `*` matches any run of characters (including none) and `?` matches exactly
//! one. Everything else is literal. Patterns are compiled once into anchored
//! regular expressions and matched against entry base names.

use regex::Regex;

use crate::error::ConfigError;

/// A compiled wildcard pattern
#[derive(Debug, Clone)]
pub struct Wildcard {
    pattern: String,
    regex: Regex,
}

impl Wildcard {
    /// Compile a wildcard pattern such as `*.go` or `file?.txt`
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&wildcard_to_regex(pattern)).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check whether `name` matches the whole pattern
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as given on the command line
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

/// Translate a wildcard into an anchored regex source string
pub fn wildcard_to_regex(pattern: &str) -> String {
    let normalized = pattern.replace('\\', "/");
    let escaped = regex::escape(&normalized)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    format!("^{escaped}$")
}

/// Check if any of the compiled patterns matches `name`
pub fn any_match(patterns: &[Wildcard], name: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_extension() {
        let glob = Wildcard::compile("*.go").unwrap();
        assert!(glob.is_match("main.go"));
        assert!(glob.is_match(".go"));
        assert!(!glob.is_match("main.gox"));
        assert!(!glob.is_match("main.g"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let glob = Wildcard::compile("file?.txt").unwrap();
        assert!(glob.is_match("file1.txt"));
        assert!(!glob.is_match("file.txt"));
        assert!(!glob.is_match("file12.txt"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let glob = Wildcard::compile("a+b(1).[ch]").unwrap();
        assert!(glob.is_match("a+b(1).[ch]"));
        assert!(!glob.is_match("aab(1).c"));

        let dot = Wildcard::compile("x.y").unwrap();
        assert!(!dot.is_match("xzy"));
    }

    #[test]
    fn test_exact_name() {
        let glob = Wildcard::compile(".git").unwrap();
        assert!(glob.is_match(".git"));
        assert!(!glob.is_match(".github"));
        assert!(!glob.is_match("x.git"));
    }

    #[test]
    fn test_backslashes_are_normalized() {
        assert_eq!(wildcard_to_regex(r"a\*"), "^a/.*$");
    }

    #[test]
    fn test_any_match() {
        let patterns = vec![
            Wildcard::compile("*.rs").unwrap(),
            Wildcard::compile("Cargo.*").unwrap(),
        ];
        assert!(any_match(&patterns, "lib.rs"));
        assert!(any_match(&patterns, "Cargo.toml"));
        assert!(!any_match(&patterns, "README.md"));
        assert!(!any_match(&[], "anything"));
    }
}

//! Runtime settings for xfind
//!
//! Built-in defaults are embedded from `default-config.toml`; any key can be
//! overridden with an `XFIND_` environment variable. No configuration files
//! are read.

use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use std::path::PathBuf;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Working directory for external commands
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Shell program overriding the platform shell
    #[serde(default)]
    pub shell: Option<String>,

    /// Flag passing the command line to `shell`
    #[serde(default)]
    pub shell_flag: Option<String>,
}

fn default_workdir() -> String {
    ".".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            shell: None,
            shell_flag: None,
        }
    }
}

impl Settings {
    /// Embedded defaults, then environment variables
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(Env::prefixed("XFIND_"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Working directory handed to external commands; none when empty
    pub fn workdir(&self) -> Option<PathBuf> {
        let workdir = self.workdir.trim();
        (!workdir.is_empty()).then(|| PathBuf::from(workdir))
    }
}

//! Run configuration: the per-run detector [`Config`] and the optional TOML
//! [`Settings`] file it is built from.
//!
//! Precedence, highest first: command-line flags, the file named by
//! `--config`, the file named by `KUBEDOCTOR_CONFIG`, compiled-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "KUBEDOCTOR_CONFIG";

pub const DEFAULT_RESTART_THRESHOLD: u32 = 3;

/// Parameters handed to every detector call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Restart count at or above which a container is reported by `HighRestarts`.
    pub restart_threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
        }
    }
}

/// File-backed settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub restart_threshold: u32,
    /// Problem ids excluded from the catalog for this run.
    pub disabled_problems: Vec<String>,
    /// `kubectl` binary used to list resources.
    pub kubectl: PathBuf,
    /// kubeconfig context, current context when unset.
    pub context: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
            disabled_problems: Vec::new(),
            kubectl: PathBuf::from("kubectl"),
            context: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Resolve settings from an explicit path, then `KUBEDOCTOR_CONFIG`, then
    /// defaults. A named file that cannot be loaded is an error.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&env_path));
        }

        debug!("no settings file given, using defaults");
        Ok(Self::default())
    }

    pub fn detector_config(&self) -> Config {
        Config {
            restart_threshold: self.restart_threshold,
        }
    }
}

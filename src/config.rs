//! Application configuration.
//!
//! Configuration is stored as YAML (default `templateworks.yaml`, path
//! overridable via the `TEMPLATEWORKS_CONFIG` environment variable) and
//! covers bootstrap behavior and content defaults. A missing file yields the
//! defaults; a malformed file is an error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Language;

pub const CONFIG_ENV_VAR: &str = "TEMPLATEWORKS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "templateworks.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed starter content for accounts that own no templates yet.
    #[serde(default = "default_seed_on_bootstrap")]
    pub seed_on_bootstrap: bool,

    /// Language applied to seeded content and offered first in editors.
    #[serde(default)]
    pub default_language: Language,

    /// Advisory per-operation store timeout in seconds for callers that wrap
    /// repository calls (default: 30). The repositories themselves never
    /// retry or time out.
    #[serde(default = "default_store_timeout")]
    pub store_timeout: u64,
}

fn default_seed_on_bootstrap() -> bool {
    true
}

fn default_store_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_on_bootstrap: default_seed_on_bootstrap(),
            default_language: Language::default(),
            store_timeout: default_store_timeout(),
        }
    }
}

impl Config {
    /// Resolve the config path: the environment override when set, otherwise
    /// the default file in the working directory.
    pub fn path() -> PathBuf {
        env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from the resolved path; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

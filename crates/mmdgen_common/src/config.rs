//! Tool configuration.
//!
//! Optional `mmdgen.toml` with `[render]` and `[output]` sections. CLI
//! flags override config values; config overrides built-in defaults. A
//! missing config file is the normal case.

use crate::render_options::{ImageFormat, RenderOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config filename looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "mmdgen.toml";

/// Output artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory receiving generated artifacts.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Default image format.
    #[serde(default)]
    pub format: ImageFormat,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("diagrams")
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: ImageFormat::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderOptions,

    #[serde(default)]
    pub output: OutputSection,
}

impl Config {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Load from the discovery chain, falling back to defaults. A config
    /// file that exists but fails to parse is reported and ignored rather
    /// than aborting the workflow.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let candidate = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config(),
        };

        let Some(path) = candidate else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("{:#}; using defaults", err);
                Self::default()
            }
        }
    }
}

/// Config discovery chain: `./mmdgen.toml`, then the user config
/// directory.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("mmdgen").join("config.toml");
        if user.exists() {
            return Some(user);
        }
    }

    None
}

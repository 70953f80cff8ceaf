use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_tick_rate_ms() -> u64 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// How long to wait for a key event before ticking (milliseconds)
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Show a desktop notification when a message is sent
    #[serde(default)]
    pub notifications: bool,

    /// kitty-style colour file to take the theme from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            notifications: false,
            theme_file: None,
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("contactform");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path` (or the default location), falling back to
    /// defaults when the file is missing or broken
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("{}", e);
                    return AppConfig::default();
                }
            },
        };

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return AppConfig::default();
        }

        match Self::read(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {:#}", e);
                AppConfig::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

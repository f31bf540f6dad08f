//! Application configuration management.
//!
//! Configuration is stored at `~/.config/splitcache/config.json` and covers
//! the data source URL, the optional site origin for offline pre-caching,
//! and whether the viewer starts in offline mode.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "splitcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default location of the published runs document
pub const DEFAULT_RUNS_URL: &str =
    "https://raw.githubusercontent.com/PWebGames/leaderboards/refs/heads/main/runs.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Override for the runs.json URL
    pub data_url: Option<String>,
    /// Origin of the leaderboard site, used by `--precache`
    pub site_origin: Option<String>,
    /// Start without touching the network
    #[serde(default)]
    pub offline: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// The effective runs.json URL
    pub fn runs_url(&self) -> &str {
        self.data_url.as_deref().unwrap_or(DEFAULT_RUNS_URL)
    }
}

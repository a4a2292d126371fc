//! Application configuration management.
//!
//! Configuration is stored at `~/.config/vestry/config.json` and covers
//! the content store URL, the parish display name, and the shared admin
//! secret. The secret can also be supplied through the
//! `VESTRY_ADMIN_SECRET` environment variable, which wins over the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "vestry";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Fallback shared admin secret when neither the environment nor the
/// config file provides one.
pub const DEFAULT_ADMIN_SECRET: &str = "ChurchofHolyRosary@2026";

/// Environment variable overriding the admin secret.
pub const ADMIN_SECRET_ENV: &str = "VESTRY_ADMIN_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub store_url: Option<String>,
    pub parish_name: Option<String>,
    pub admin_secret: Option<String>,
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

    /// Directory for draft and session storage.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Effective admin secret: environment, then config file, then the
    /// built-in default.
    pub fn admin_secret(&self) -> String {
        std::env::var(ADMIN_SECRET_ENV)
            .ok()
            .or_else(|| self.admin_secret.clone())
            .unwrap_or_else(|| DEFAULT_ADMIN_SECRET.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let config = Config {
            store_url: Some("https://content.holyrosary.example".to_string()),
            parish_name: Some("Church of the Holy Rosary".to_string()),
            admin_secret: None,
        };
        let json = serde_json::to_string(&config).expect("serialize config");
        let back: Config = serde_json::from_str(&json).expect("parse config");
        assert_eq!(back.store_url, config.store_url);
        assert_eq!(back.parish_name, config.parish_name);
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let config: Config = serde_json::from_str("{}").expect("parse empty config");
        assert!(config.store_url.is_none());
    }
}

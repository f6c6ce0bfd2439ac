//! App-level configuration for the Google backend.
//!
//! User-provided OAuth credentials stored at:
//!   ~/.config/hammers/google/app_config.toml

use anyhow::{Context, Result};
use hammers_core::HammersConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
}

pub fn base_dir() -> Result<PathBuf> {
    Ok(HammersConfig::config_dir()?.join("google"))
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&base_dir()?.join("app_config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google credentials not found.\n\n\
                Create {} with:\n\n\
                client_id = \"your-client-id.apps.googleusercontent.com\"\n\
                client_secret = \"your-client-secret\"\n\n\
                See https://console.cloud.google.com/apis/credentials for setup.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_explain_setup() {
        let dir = tempfile::tempdir().unwrap();

        let err = AppConfig::load_from(&dir.path().join("app_config.toml")).unwrap_err();

        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_loads_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_config.toml");
        std::fs::write(&path, "client_id = \"id\"\nclient_secret = \"secret\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
    }
}

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file security: {0}")]
    InsecureConfig(String),
}

/// Handshake listener configuration, loaded from a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub region: Option<RegionConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8080".
    pub bind_address: String,
    /// Shared secret gating the handshake endpoint. Requests without it are
    /// answered 404, the same as any unknown path.
    pub web_server_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Path of the directory workbook this host serves from - the central
    /// file, or a compartmentalized per-host export.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    /// Address-to-region table file; absent means region lookup is
    /// unavailable and every requester falls back to default home pages.
    pub table_path: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.web_server_secret.is_empty() {
            return Err(ConfigError::InsecureConfig(
                "web_server_secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxydir.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind_address = "127.0.0.1:8080"
web_server_secret = "FEDCBA9876543210"

[store]
path = "/var/lib/proxydir/directory.json"
"#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert!(config.region.is_none());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxydir.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind_address = "127.0.0.1:8080"
web_server_secret = ""

[store]
path = "directory.json"
"#,
        )
        .unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::InsecureConfig(_))
        ));
    }
}

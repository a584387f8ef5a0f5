use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::client::DEFAULT_ENDPOINT;

pub const ENDPOINT_ENV: &str = "INVENTORY_CHAT_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn save_endpoint(endpoint: &str) -> Result<()> {
        Self::save_endpoint_to(&Self::get_config_path()?, endpoint)
    }

    /// Update the stored endpoint, keeping the rest of the file.
    /// An unreadable existing file is an error rather than being replaced.
    pub fn save_endpoint_to(config_path: &Path, endpoint: &str) -> Result<()> {
        let mut config = Self::load_from(config_path).with_context(|| {
            format!("Refusing to overwrite unreadable config {}", config_path.display())
        })?;
        config.endpoint = Some(endpoint.to_string());
        config.save_to(config_path)
    }

    /// Pick the endpoint: explicit flag, then env var, then config file, then default.
    pub fn resolve_endpoint(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.or(env)
            .or(self.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("inventory-chat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: Some("http://warehouse:5000/api/query".to_string()),
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_endpoint_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        Config::save_endpoint_to(&path, "http://warehouse:5000/api/query").unwrap();

        assert_eq!(
            Config::load_from(&path).unwrap().endpoint.as_deref(),
            Some("http://warehouse:5000/api/query")
        );
    }

    #[test]
    fn save_endpoint_leaves_corrupt_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ broken").unwrap();

        let err = Config::save_endpoint_to(&path, "http://warehouse:5000/api/query").unwrap_err();

        assert!(err.to_string().contains("unreadable config"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn endpoint_precedence() {
        let config = Config {
            endpoint: Some("http://from-config/api/query".to_string()),
        };

        assert_eq!(
            config.resolve_endpoint(Some("http://flag/api/query"), Some("http://env/api/query")),
            "http://flag/api/query"
        );
        assert_eq!(
            config.resolve_endpoint(None, Some("http://env/api/query")),
            "http://env/api/query"
        );
        assert_eq!(config.resolve_endpoint(None, None), "http://from-config/api/query");
        assert_eq!(Config::new().resolve_endpoint(None, None), DEFAULT_ENDPOINT);
    }
}

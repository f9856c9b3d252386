//! Configuration management for topiclens

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use topiclens_deserializer::{CacheConfig, RegistryClientConfig};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Schema Registry URL (REST)
    pub schema_registry_url: Option<String>,

    /// Registry basic auth username
    pub registry_username: Option<String>,

    /// Registry basic auth password
    pub registry_password: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Upper bound on a schema fetch in seconds (unset: wait for the request)
    pub fetch_timeout_secs: Option<u64>,

    /// Schema cache settings
    pub cache: CacheSettings,

    /// Default output format
    pub output_format: OutputFormat,

    /// Enable colored output
    pub colored: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Compact,
    Pretty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_registry_url: None,
            registry_username: None,
            registry_password: None,
            request_timeout_secs: 10,
            fetch_timeout_secs: Some(30),
            cache: CacheSettings::default(),
            output_format: OutputFormat::Compact,
            colored: true,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_capacity: 1_000,
            ttl_secs: 3600,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_capacity: self.max_capacity,
            time_to_live: (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs)),
        }
    }
}

impl Config {
    /// Load config from `path` (or the default location), falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path(),
        };

        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to `path` (or the default location)
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path(),
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        Ok(path)
    }

    /// Get config file path (~/.topiclens/config.toml)
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".topiclens").join("config.toml")
    }

    /// Registry client settings, if a registry URL is configured
    pub fn registry_client_config(&self) -> Option<RegistryClientConfig> {
        let url = self.schema_registry_url.as_ref()?;

        let mut config = RegistryClientConfig::new(url.clone());
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        if let Some(username) = &self.registry_username {
            config.basic_auth = Some((
                username.clone(),
                self.registry_password.clone().unwrap_or_default(),
            ));
        }
        Some(config)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.schema_registry_url.is_none());
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.output_format, OutputFormat::Compact);
        assert!(!config.cache.enabled);
        assert!(config.colored);
        assert!(config.registry_client_config().is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let toml_str = r#"
            schema_registry_url = "http://registry:8081"
            output_format = "pretty"

            [cache]
            enabled = true
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(
            config.schema_registry_url.as_deref(),
            Some("http://registry:8081")
        );
        assert_eq!(config.output_format, OutputFormat::Pretty);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_capacity, 1_000);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_registry_client_config() {
        let config = Config {
            schema_registry_url: Some("http://registry:8081".to_string()),
            registry_username: Some("alice".to_string()),
            registry_password: Some("secret".to_string()),
            request_timeout_secs: 3,
            ..Config::default()
        };

        let client = config.registry_client_config().unwrap();
        assert_eq!(client.base_url, "http://registry:8081");
        assert_eq!(client.request_timeout, Duration::from_secs(3));
        assert_eq!(
            client.basic_auth,
            Some(("alice".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_zero_ttl_disables_expiry() {
        let settings = CacheSettings {
            ttl_secs: 0,
            ..CacheSettings::default()
        };
        assert_eq!(settings.to_cache_config().time_to_live, None);
        assert_eq!(
            CacheSettings::default().to_cache_config().time_to_live,
            Some(Duration::from_secs(3600))
        );
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            schema_registry_url: Some("http://test:8081".to_string()),
            fetch_timeout_secs: Some(5),
            output_format: OutputFormat::Pretty,
            colored: false,
            ..Config::default()
        };

        let written = config.save(Some(&config_path)).unwrap();
        assert_eq!(written, config_path);

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let loaded = Config::load(Some(&temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, Config::default());
    }
}

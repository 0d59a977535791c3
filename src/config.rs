//! Client configuration.
//!
//! Values resolve with priority: environment variables > config file >
//! defaults. Each setting remembers where its value came from so
//! `stockpile config show` can display provenance.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Default,
    File,
    Env,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::File => write!(f, "config file"),
            Source::Env => write!(f, "environment"),
        }
    }
}

/// A configuration value together with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Setting<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Setting<T> {
    fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

/// Shape of the YAML config file. All keys optional.
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    server_url: Option<String>,
    collection: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the document store server
    pub server_url: Setting<String>,
    /// Collection holding the inventory documents
    pub collection: Setting<String>,
    /// Config file the values were loaded from, if one was found
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Setting::new("http://localhost:8080".to_string(), Source::Default),
            collection: Setting::new("inventory".to_string(), Source::Default),
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(server_url) = file.server_url {
                config.server_url = Setting::new(server_url, Source::File);
            }
            if let Some(collection) = file.collection {
                config.collection = Setting::new(collection, Source::File);
            }
            config.config_file = Some(path);
        }

        // Apply environment variable overrides
        if let Ok(server_url) = std::env::var("STOCKPILE_SERVER_URL") {
            config.server_url = Setting::new(server_url, Source::Env);
        }
        if let Ok(collection) = std::env::var("STOCKPILE_COLLECTION") {
            config.collection = Setting::new(collection, Source::Env);
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/stockpile/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stockpile")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Tests mutate process-wide environment variables; serialize them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let _guard = ENV_LOCK.lock().unwrap();

        let config = Config::default();
        assert_eq!(config.server_url.value, "http://localhost:8080");
        assert_eq!(config.server_url.source, Source::Default);
        assert_eq!(config.collection.value, "inventory");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.collection.value, "inventory");
        assert_eq!(config.collection.source, Source::Default);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap();

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "server_url: http://store.example.com").unwrap();
        writeln!(file, "collection: pantry").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.server_url.value, "http://store.example.com");
        assert_eq!(config.server_url.source, Source::File);
        assert_eq!(config.collection.value, "pantry");
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "collection: pantry").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.server_url.source, Source::Default);
        assert_eq!(config.collection.source, Source::File);
    }

    #[test]
    fn test_env_var_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap();

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "collection: fromfile").unwrap();

        std::env::set_var("STOCKPILE_COLLECTION", "fromenv");
        let config = Config::load(Some(config_path));
        std::env::remove_var("STOCKPILE_COLLECTION");

        let config = config.unwrap();
        assert_eq!(config.collection.value, "fromenv");
        assert_eq!(config.collection.source, Source::Env);
    }

    #[test]
    fn test_invalid_yaml_error() {
        let _guard = ENV_LOCK.lock().unwrap();

        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

//! Application configuration.
//!
//! Priority: environment variables > YAML config file > defaults.
//!
//! Environment variables:
//! - `PANTRYCHEF_PORT`: port to listen on (default: 8080)
//! - `PANTRYCHEF_DATA_DIR`: directory holding the JSON documents
//!   (default: ~/.local/share/pantrychef)
//! - `PANTRYCHEF_CONFIG`: path to config file
//!   (default: ~/.config/pantrychef/config.yaml)
//! - `GEMINI_API_KEY`: credential for the generative model
//! - `PANTRYCHEF_GEMINI_MODEL`: model name (default: gemini-2.5-flash)

use serde::Deserialize;
use std::path::PathBuf;

use crate::gemini::{DEFAULT_MODEL, PLACEHOLDER_API_KEY};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory holding `ingredients.json` and `recipes.json`.
    pub data_dir: PathBuf,
    /// Gemini API key. Absent or placeholder means the model is unconfigured.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pantrychef");
        Self {
            port: 8080,
            data_dir,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("PANTRYCHEF_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        if let Ok(port) = std::env::var("PANTRYCHEF_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(data_dir) = std::env::var("PANTRYCHEF_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("PANTRYCHEF_GEMINI_MODEL") {
            config.gemini_model = model;
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/pantrychef/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pantrychef")
            .join("config.yaml")
    }

    /// Returns the API key if it is usable: present, non-empty, and not the
    /// example-file placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
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

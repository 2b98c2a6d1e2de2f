//! `config.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::DisplayPreferences;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_shop_name() -> String {
    "RAJENDRA BASTRALAY".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_shop_name")]
    pub shop_name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// CSV or JSON file used to seed the session store.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub widgets: DisplayPreferences,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shop_name: default_shop_name(),
            currency_symbol: default_currency_symbol(),
            data_file: None,
            log_filter: default_log_filter(),
            widgets: DisplayPreferences::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(PathBuf),
    Io(PathBuf, std::io::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(p) => write!(f, "config file not found: {}", p.display()),
            ConfigError::Io(p, e) => write!(f, "cannot read config file {}: {e}", p.display()),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(input).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if cfg.currency_symbol.is_empty() {
            return Err(ConfigError::Invalid("currency_symbol is empty".to_string()));
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::Missing(path.to_path_buf()),
            _ => ConfigError::Io(path.to_path_buf(), e),
        })?;
        Self::from_toml(&data)
    }

    /// Loads `path` when given; otherwise reads [`DEFAULT_CONFIG_PATH`] if it
    /// exists and falls back to defaults when it does not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

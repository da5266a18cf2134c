use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Time-related constants
// =============================================================================

/// How long a fetched catalog stays valid in the cache (8 hours)
pub const CATALOG_CACHE_TTL_SECS: u64 = 8 * 60 * 60;

/// Timeout for a whole update check in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Remote catalog
// =============================================================================

/// Cache key under which the normalized catalog is stored
pub const CATALOG_CACHE_KEY: &str = "boldgrid_theme_data";

/// Default base URL of the catalog API
pub const DEFAULT_API_BASE_URL: &str = "https://api.boldgrid.com";

/// Default path of the theme version call, relative to the base URL
pub const DEFAULT_THEME_DATA_PATH: &str = "/api/open/get-theme-data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub api: ApiConfig,
    pub channel: String,
    pub cache: CacheConfig,
    pub fetch_timeout_ms: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            channel: "stable".to_string(),
            cache: CacheConfig::default(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from a JSON file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Full URL of the theme version call
    pub fn theme_data_url(&self) -> String {
        format!(
            "{}{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.theme_data_path
        )
    }
}

/// Catalog API endpoint configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub theme_data_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            theme_data_path: DEFAULT_THEME_DATA_PATH.to_string(),
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Catalog lifetime in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: CATALOG_CACHE_TTL_SECS,
        }
    }
}

/// Returns the path to the data directory for theme-update-checker.
/// Uses $XDG_DATA_HOME/theme-update-checker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/theme-update-checker,
/// or ./theme-update-checker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the transient database file.
pub fn db_path() -> PathBuf {
    data_dir().join("transients.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("theme-update-checker.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("theme-update-checker")
}

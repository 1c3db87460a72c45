//! Shared TOML configuration for MotoLens services

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk configuration shared by MotoLens services.
///
/// Every field has a working default, so a missing or partial file is never
/// fatal. The catalog API key may live here or in the environment; the
/// environment takes precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TomlConfig {
    /// Catalog provider API key (environment variable takes precedence)
    pub catalog_api_key: Option<String>,
    /// Catalog provider connection and query parameters
    pub catalog: CatalogConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// Catalog provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub base_url: String,
    /// Host header value expected by the API gateway
    pub api_host: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Catalog language identifier (4 = English)
    pub lang_id: u32,
    /// Catalog country filter identifier (62 = Germany)
    pub country_filter_id: u32,
    /// Vehicle class identifier (1 = passenger cars)
    pub type_id: u32,
    /// Search parameter for OEM article lookups ("*" = all articles)
    pub search_param: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vehicle-catalog.p.rapidapi.com".to_string(),
            api_host: "vehicle-catalog.p.rapidapi.com".to_string(),
            timeout_seconds: 45,
            lang_id: 4,
            country_filter_id: 62,
            type_id: 1,
            search_param: "*".to_string(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the service listens on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5810 }
    }
}

/// Default configuration file path for a service:
/// `<config dir>/motolens/<service>.toml` (e.g. `~/.config/motolens/motolens-vp.toml`)
pub fn config_file_path(service: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("motolens").join(format!("{service}.toml")))
}

/// Load a service's TOML configuration from the default location.
///
/// A missing file yields defaults. An unreadable or malformed file is logged
/// and also yields defaults.
pub fn load_toml_config(service: &str) -> TomlConfig {
    let Some(path) = config_file_path(service) else {
        tracing::warn!("Could not determine config directory, using default configuration");
        return TomlConfig::default();
    };
    if !path.exists() {
        tracing::info!(path = %path.display(), "No configuration file found, using defaults");
        return TomlConfig::default();
    }
    match load_toml_config_from(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded configuration");
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load configuration, using defaults");
            TomlConfig::default()
        }
    }
}

/// Load TOML configuration from an explicit path.
///
/// Unlike [`load_toml_config`], errors here are returned to the caller: a
/// file the operator asked for that cannot be read or parsed is fatal.
/// Read failures surface as [`Error::Io`], parse failures as
/// [`Error::Config`].
pub fn load_toml_config_from(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))
}

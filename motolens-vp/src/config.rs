//! Configuration resolution for motolens-vp
//!
//! Two-tier catalog API key resolution with ENV → TOML priority. The key
//! is required; the service refuses to start without one.

use motolens_common::{Error, Result, TomlConfig};
use tracing::{info, warn};

/// Environment variable carrying the catalog API key
pub const API_KEY_ENV_VAR: &str = "MOTOLENS_CATALOG_API_KEY";

/// Resolve the catalog API key.
///
/// Priority: environment variable, then TOML config. Finding the key in
/// both places is flagged as a potential misconfiguration.
pub fn resolve_catalog_api_key(toml_config: &TomlConfig) -> Result<String> {
    let mut sources = Vec::new();

    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    if let Some(key) = &env_key {
        if is_valid_key(key) {
            sources.push("environment");
        }
    }

    let toml_key = toml_config.catalog_api_key.as_ref();
    if let Some(key) = toml_key {
        if is_valid_key(key) {
            sources.push("TOML");
        }
    }

    if sources.len() > 1 {
        warn!(
            "Catalog API key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Catalog API key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("Catalog API key loaded from TOML config");
            return Ok(key.clone());
        }
    }

    Err(Error::Config(
        "Catalog API key not configured. Please configure using one of:\n\
         1. Environment: MOTOLENS_CATALOG_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/motolens/motolens-vp.toml (catalog_api_key = \"your-key\")\n\
         \n\
         The key is issued with your catalog provider subscription."
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

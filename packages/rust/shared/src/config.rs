//! Application configuration for ItemSetCopier.
//!
//! User config lives at `~/.itemsetcopier/itemsetcopier.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ItemSetError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "itemsetcopier.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".itemsetcopier";

// ---------------------------------------------------------------------------
// Config structs (matching itemsetcopier.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reference-data service settings.
    #[serde(default)]
    pub catalog: CatalogSection,

    /// Translation behaviour.
    #[serde(default)]
    pub translate: TranslateSection,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Root URL of the versioned reference-data service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Locale of the item/champion names.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Age after which the cached catalog is refreshed.
    #[serde(default = "default_refresh_interval_hours")]
    pub refresh_interval_hours: u64,

    /// Upper bound for every single catalog request.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locale: default_locale(),
            refresh_interval_hours: default_refresh_interval_hours(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://ddragon.leagueoflegends.com".into()
}
fn default_locale() -> String {
    "en_US".into()
}
fn default_refresh_interval_hours() -> u64 {
    24
}
fn default_fetch_timeout_secs() -> u64 {
    10
}

/// `[translate]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateSection {
    /// Also add the "(Quick Charge)" variant of an item when the catalog has one.
    #[serde(default = "default_true")]
    pub include_quick_charge: bool,
}

impl Default for TranslateSection {
    fn default() -> Self {
        Self {
            include_quick_charge: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Catalog config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root URL of the reference-data service.
    pub base_url: String,
    /// Locale of the item/champion names.
    pub locale: String,
    /// Maximum age of a cached catalog before it is refreshed.
    pub refresh_interval: Duration,
    /// Timeout applied to each individual fetch.
    pub fetch_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CatalogConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.catalog.base_url.trim_end_matches('/').to_string(),
            locale: config.catalog.locale.clone(),
            refresh_interval: Duration::from_secs(
                config.catalog.refresh_interval_hours.saturating_mul(3600),
            ),
            fetch_timeout: Duration::from_secs(config.catalog.fetch_timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.itemsetcopier/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ItemSetError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.itemsetcopier/itemsetcopier.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ItemSetError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ItemSetError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ItemSetError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ItemSetError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ItemSetError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

//! Application configuration for PartCatalog.
//!
//! User config lives at `~/.partcatalog/partcatalog.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PartCatalogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "partcatalog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".partcatalog";

/// Folder under the game root that holds one directory per installed mod.
pub const DEFAULT_DATA_DIR: &str = "GameData";

/// Mod folders shipped with the base game.
pub const DEFAULT_STOCK_MODS: &[&str] = &["Squad", "SquadExpansion", "NASAmission"];

// ---------------------------------------------------------------------------
// Config structs (matching partcatalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scan settings.
    #[serde(default)]
    pub scan: ScanSection,

    /// Display-name overrides keyed by mod folder.
    #[serde(default)]
    pub mod_names: IndexMap<String, String>,
}

/// `[scan]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSection {
    /// Data folder below the scan root.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File extensions (without the dot) that may hold part definitions.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Mod folders treated as stock. `None` means the built-in set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_mods: Option<Vec<String>>,

    /// Mod folders excluded from the catalog entirely.
    #[serde(default)]
    pub ignore_mods: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            extensions: default_extensions(),
            stock_mods: None,
            ignore_mods: Vec::new(),
        }
    }
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.into()
}
fn default_extensions() -> Vec<String> {
    vec!["cfg".into()]
}

// ---------------------------------------------------------------------------
// Scan options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scan configuration: merged from config file + CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Data folder below the scan root (`GameData`).
    pub data_dir: String,
    /// Candidate file extensions, compared ASCII case-insensitively.
    pub extensions: Vec<String>,
    /// Mod folders whose parts are flagged `stock`.
    pub stock_mods: BTreeSet<String>,
    /// Mod folders skipped before parsing.
    pub ignore_mods: BTreeSet<String>,
    /// Mod folder → mod name overrides.
    pub mod_names: IndexMap<String, String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl ScanOptions {
    /// Replace the stock set with an explicit list of mod folders.
    pub fn with_stock_mods<I, S>(mut self, mods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stock_mods = mods.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the ignore set with an explicit list of mod folders.
    pub fn with_ignore_mods<I, S>(mut self, mods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_mods = mods.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the mod name for a folder, honouring overrides.
    pub fn mod_name<'a>(&'a self, dir: &'a str) -> &'a str {
        self.mod_names.get(dir).map(String::as_str).unwrap_or(dir)
    }
}

impl From<&AppConfig> for ScanOptions {
    fn from(config: &AppConfig) -> Self {
        let stock_mods = match &config.scan.stock_mods {
            Some(mods) => mods.iter().cloned().collect(),
            None => DEFAULT_STOCK_MODS.iter().map(|m| m.to_string()).collect(),
        };

        Self {
            data_dir: config.scan.data_dir.clone(),
            extensions: config.scan.extensions.clone(),
            stock_mods,
            ignore_mods: config.scan.ignore_mods.iter().cloned().collect(),
            mod_names: config.mod_names.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.partcatalog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PartCatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.partcatalog/partcatalog.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| PartCatalogError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PartCatalogError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_scan_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PartCatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PartCatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PartCatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the `[scan]` section describes a usable layout.
pub fn validate_scan_config(config: &AppConfig) -> Result<()> {
    let data_dir = Path::new(&config.scan.data_dir);
    let mut components = data_dir.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => {
            return Err(PartCatalogError::validation(format!(
                "data_dir must be a single folder name, got {:?}",
                config.scan.data_dir
            )));
        }
    }

    if config.scan.extensions.iter().all(|e| e.trim().is_empty()) {
        return Err(PartCatalogError::validation(
            "extensions must list at least one file extension",
        ));
    }

    Ok(())
}

//! `skillplan.toml` configuration.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs::{DEFAULT_SLOT_COUNT, DEFAULT_SLOT_PREFIX};
use crate::plan::CostFormula;
use crate::share::{RestorePolicy, TINYURL_ENDPOINT};
use crate::skills::DEFAULT_MATCH_LIMIT;

pub const CONFIG_FILE_NAME: &str = "skillplan.toml";
const APP_DIR: &str = "skillplan";

/// Parsed configuration. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub cost: CostConfig,
    pub slots: SlotsConfig,
    pub share: ShareConfig,
    pub restore: RestoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file; relative paths are resolved against the config file
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub formula: CostFormula,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    /// Slot directory; defaults to the platform data directory
    pub dir: Option<PathBuf>,
    pub prefix: String,
    pub count: usize,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: DEFAULT_SLOT_PREFIX.to_string(),
            count: DEFAULT_SLOT_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Page that share links point at
    pub base_url: String,
    pub shorten: bool,
    pub shortener_url: String,
    pub timeout_secs: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.invalid/skills/".to_string(),
            shorten: true,
            shortener_url: TINYURL_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ShareConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    pub policy: RestorePolicy,
}

impl Config {
    /// Load configuration for the CLI.
    ///
    /// An explicit path must exist. Without one, the platform config
    /// directory is tried and a missing file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return load_config(path)?
                .with_context(|| format!("Config file not found: {}", path.display()));
        }

        match default_config_path() {
            Some(path) => Ok(load_config(&path)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    /// Directory holding slot files.
    pub fn slots_dir(&self) -> PathBuf {
        self.slots.dir.clone().unwrap_or_else(default_slots_dir)
    }

    fn validate(&self) -> Result<()> {
        if self.search.limit == 0 {
            bail!("search.limit must be at least 1");
        }
        if self.slots.count == 0 {
            bail!("slots.count must be at least 1");
        }
        Ok(())
    }

    /// Resolve relative paths against the directory holding the config file.
    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.catalog.path, &mut self.slots.dir].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load and parse a config file
///
/// # Arguments
/// * `path` - Path to the TOML file
///
/// # Returns
/// * `Ok(Some(Config))` - Config loaded and parsed successfully
/// * `Ok(None)` - Config file doesn't exist
/// * `Err(_)` - Failed to read, parse or validate config
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.validate()?;

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(Some(config))
}

/// `<config dir>/skillplan/skillplan.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// `<data dir>/skillplan/slots`, falling back to `.skillplan/slots`.
pub fn default_slots_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join("slots"))
        .unwrap_or_else(|| PathBuf::from(".skillplan").join("slots"))
}

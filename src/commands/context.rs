//! Configuration and resources shared by the commands.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::fs::{FileStore, SlotStore};
use crate::plan::PlannerSession;
use crate::share::{shorten_or_original, TinyUrlShortener};
use crate::skills::CatalogIndex;

pub struct CommandContext {
    pub config: Config,
    catalog_path: Option<PathBuf>,
}

impl CommandContext {
    /// Load the config file and note an explicit catalog path.
    pub fn load(config_path: Option<&Path>, catalog_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(config_path)?;
        Ok(Self::new(config, catalog_path))
    }

    pub fn new(config: Config, catalog_path: Option<PathBuf>) -> Self {
        let catalog_path = catalog_path.or_else(|| config.catalog.path.clone());
        Self {
            config,
            catalog_path,
        }
    }

    /// Load the skill catalog from `--catalog` or the configured path.
    pub fn catalog(&self) -> Result<CatalogIndex> {
        let Some(path) = &self.catalog_path else {
            bail!("No skill catalog configured. Pass --catalog <path> or set [catalog] path in skillplan.toml");
        };
        let catalog = CatalogIndex::load_from_path(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        Ok(catalog)
    }

    pub fn session<'c>(&self, catalog: &'c CatalogIndex) -> PlannerSession<'c> {
        PlannerSession::new(catalog)
            .with_formula(self.config.cost.formula)
            .with_match_limit(self.config.search.limit)
    }

    pub fn slot_store(&self) -> SlotStore<FileStore> {
        SlotStore::with_layout(
            FileStore::new(self.config.slots_dir()),
            self.config.slots.prefix.clone(),
            self.config.slots.count,
        )
    }

    /// Shorten `long_url` when enabled, falling back to the long URL.
    pub fn shorten(&self, long_url: &str, enabled: bool) -> String {
        let share = &self.config.share;
        if !(enabled && share.shorten) {
            return long_url.to_string();
        }
        match TinyUrlShortener::new(&share.shortener_url, share.timeout()) {
            Ok(shortener) => shorten_or_original(&shortener, long_url),
            Err(e) => {
                tracing::warn!("URL shortener unavailable: {e}");
                long_url.to_string()
            }
        }
    }
}

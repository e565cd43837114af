//! Settings file handling.
//!
//! Grid settings live in a TOML file in the platform config directory. The
//! `COURT_GRID_CONFIG` environment variable points somewhere else, which
//! is how tests and multi-branch installs pick their file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::GridSettings;

pub const CONFIG_ENV_VAR: &str = "COURT_GRID_CONFIG";
const CONFIG_FILE_NAME: &str = "court-grid.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for the default location: the environment override if set,
    /// otherwise the platform config directory.
    pub fn from_environment() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("com", "CourtGrid", "CourtGrid")
            .ok_or_else(|| anyhow!("Could not determine a configuration directory"))?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<GridSettings> {
        if !self.path.exists() {
            log::info!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Ok(GridSettings::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let settings: GridSettings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        settings.validate().map_err(|e| anyhow!(e))?;

        log::info!(
            "Loaded settings from {}: {} courts, ceiling {}",
            self.path.display(),
            settings.courts.len(),
            settings.closing_ceiling
        );
        Ok(settings)
    }

    pub fn save(&self, settings: &GridSettings) -> Result<()> {
        settings.validate().map_err(|e| anyhow!(e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

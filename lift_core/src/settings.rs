//! Settings file support for Lift.
//!
//! Settings are loaded from `$XDG_CONFIG_HOME/lift/config.toml`. They cover
//! where data lives; the training program itself is stored as a blob
//! alongside the training state.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub data: DataSettings,
}

/// Data storage settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn home_dir_or_cwd() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir_or_cwd().join(".local/share"));
    base.join("lift")
}

impl Settings {
    /// Load settings from the standard path
    pub fn load() -> Result<Self> {
        let settings_path = Self::default_path();
        if settings_path.exists() {
            Self::load_from(&settings_path)
        } else {
            tracing::debug!(
                "No settings file found at {:?}, using defaults",
                settings_path
            );
            Ok(Self::default())
        }
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Get the default settings file path
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir_or_cwd().join(".config"));
        base.join("lift").join("config.toml")
    }

    /// Save the settings to the standard path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save the settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }
}

//! `rides.toml`: run knobs and file names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Settings file name looked up in the config directory.
pub const SETTINGS_FILE: &str = "rides.toml";

/// Values read from `rides.toml`. Unset knobs fall back to CLI defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Open seats a driver needs to take a rider from a neighboring location.
    pub threshold: Option<u32>,
    /// Farthest neighbor distance searched.
    pub max_distance: Option<u32>,
    /// Sunday service riders go to when their notes do not say.
    pub main_service: Option<String>,
    /// Pickup location for Friday riders who come late.
    pub late_friday_location: Option<String>,
    pub files: FileNames,
}

/// File names, relative to the config or data directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileNames {
    pub map: String,
    pub ignore_drivers: String,
    pub ignore_riders: String,
    pub driver_prefs: String,
    pub drivers: String,
    pub permanent: String,
    pub weekly: String,
    pub output: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            map: "map.txt".to_string(),
            ignore_drivers: "ignore_drivers.txt".to_string(),
            ignore_riders: "ignore_riders.txt".to_string(),
            driver_prefs: "driver_prefs.txt".to_string(),
            drivers: "drivers.csv".to_string(),
            permanent: "permanent.csv".to_string(),
            weekly: "weekly.csv".to_string(),
            output: "out.csv".to_string(),
        }
    }
}

/// Resolved locations of every input and output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePaths {
    pub map: PathBuf,
    pub ignore_drivers: PathBuf,
    pub ignore_riders: PathBuf,
    pub driver_prefs: PathBuf,
    pub drivers: PathBuf,
    pub permanent: PathBuf,
    pub weekly: PathBuf,
    pub output: PathBuf,
}

impl FileNames {
    /// Config files resolve under `config_dir`, sheets under `data_dir`.
    pub fn resolve(&self, config_dir: &Path, data_dir: &Path) -> FilePaths {
        FilePaths {
            map: config_dir.join(&self.map),
            ignore_drivers: config_dir.join(&self.ignore_drivers),
            ignore_riders: config_dir.join(&self.ignore_riders),
            driver_prefs: config_dir.join(&self.driver_prefs),
            drivers: data_dir.join(&self.drivers),
            permanent: data_dir.join(&self.permanent),
            weekly: data_dir.join(&self.weekly),
            output: data_dir.join(&self.output),
        }
    }
}

/// Load `rides.toml` from `config_dir`, or defaults when it is absent.
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let path = config_dir.join(SETTINGS_FILE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Err(error) => return Err(IngestError::read(path, error)),
    };
    parse_settings(&contents).map_err(|source| IngestError::Settings { path, source })
}

pub fn parse_settings(contents: &str) -> std::result::Result<Settings, toml::de::Error> {
    toml::from_str(contents)
}

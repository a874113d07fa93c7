//! Configuration management for skyline.
//!
//! Settings live in `config.toml` under the platform config directory.
//! Every field is optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Timelike};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use skyline_core::Theme;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// Log file name, placed in the local data directory.
const LOG_FILE: &str = "skyline.log";

/// Hour at which `auto` switches to the light sky.
const DAY_STARTS_AT: u32 = 6;

/// Hour at which `auto` switches back to the dark sky.
const NIGHT_STARTS_AT: u32 = 18;

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Theme requested by the user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
    /// Follow local time: light from 06:00, dark from 18:00.
    Auto,
}

impl ThemePreference {
    /// Resolve to a concrete theme for the given local hour (0-23).
    pub fn resolve_at(self, hour: u32) -> Theme {
        match self {
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::Light => Theme::Light,
            ThemePreference::Auto if (DAY_STARTS_AT..NIGHT_STARTS_AT).contains(&hour) => {
                Theme::Light
            }
            ThemePreference::Auto => Theme::Dark,
        }
    }

    /// Resolve against the current local time.
    pub fn resolve(self) -> Theme {
        self.resolve_at(Local::now().hour())
    }
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Starting theme.
    pub theme: ThemePreference,
    /// Stars in the night sky.
    pub star_count: usize,
    /// Birds in the day sky.
    pub bird_count: usize,
    /// Milliseconds between star twinkle updates.
    pub twinkle_interval_ms: u64,
    /// Milliseconds between bird flight updates.
    pub flight_interval_ms: u64,
    /// Scene pixels per terminal column.
    pub cell_width_px: u16,
    /// Scene pixels per terminal row.
    pub cell_height_px: u16,
    /// Fixed seed for the entity generators (None = random).
    pub seed: Option<u64>,
    /// Log filter, e.g. `info` or `skyline_scene=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemePreference::default(),
            star_count: 100,
            bird_count: 8,
            twinkle_interval_ms: 50,
            flight_interval_ms: 60,
            cell_width_px: 8,
            cell_height_px: 16,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "skyline")
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Path of the log file, if the platform has a data directory.
    pub fn log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE))
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse TOML and sanitize the result.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(content).map(Self::sanitized)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_error)?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Clamp values the engine cannot use.
    pub fn sanitized(mut self) -> Self {
        self.twinkle_interval_ms = self.twinkle_interval_ms.max(1);
        self.flight_interval_ms = self.flight_interval_ms.max(1);
        self.cell_width_px = self.cell_width_px.max(1);
        self.cell_height_px = self.cell_height_px.max(1);
        if self.log_level.trim().is_empty() {
            self.log_level = Config::default().log_level;
        }
        self
    }
}

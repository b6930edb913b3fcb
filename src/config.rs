//! User settings persisted in the OS config directory.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::model::calendar::clamp;
use crate::model::ViewMode;

pub const ZOOM_MIN: f32 = 0.05;
pub const ZOOM_MAX: f32 = 4.0;
pub const ROW_HEIGHT_MIN: f32 = 40.0;
pub const ROW_HEIGHT_MAX: f32 = 92.0;
/// Nominal width of the exported timeline area, in pixels.
pub const EXPORT_TIMELINE_WIDTH: f32 = 1100.0;
pub const PADDING_DAYS_MAX: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub padding_days: i64,
    pub zoom: f32,
    pub row_height: f32,
    pub view_mode: ViewMode,
    pub export_timeline_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            padding_days: 3,
            zoom: 1.0,
            row_height: 56.0,
            view_mode: ViewMode::Day,
            export_timeline_width: EXPORT_TIMELINE_WIDTH,
        }
    }
}

impl AppConfig {
    /// `config.json` under the platform config dir, or the working directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "PlanIt")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    /// Read and clamp a config file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&text)?;
        Ok(config.clamped())
    }

    /// Like [`AppConfig::read`] but never fails: a missing file yields the
    /// defaults silently, a broken one yields the defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("ignoring config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        std::fs::write(path, json).map_err(write_err)
    }

    pub fn clamped(mut self) -> Self {
        self.zoom = clamp_zoom(self.zoom);
        self.row_height = clamp_row_height(self.row_height);
        self.padding_days = clamp(self.padding_days, 0, PADDING_DAYS_MAX);
        if !self.export_timeline_width.is_finite() || self.export_timeline_width <= 0.0 {
            self.export_timeline_width = EXPORT_TIMELINE_WIDTH;
        }
        self
    }
}

pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        clamp(zoom, ZOOM_MIN, ZOOM_MAX)
    } else {
        1.0
    }
}

pub fn clamp_row_height(height: f32) -> f32 {
    if height.is_finite() {
        clamp(height, ROW_HEIGHT_MIN, ROW_HEIGHT_MAX)
    } else {
        ROW_HEIGHT_MIN
    }
}

//! Simulation settings with persistence
//!
//! Settings are read from `~/.config/roller/settings.toml` unless a path is
//! given on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use roller_core::{LayerMask, TimeConfig};
use roller_game::{CameraConfig, MovementConfig};
use roller_physics::{PhysicsConfig, SphereBodyConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::scene::Course;
use crate::script::{default_timeline, InputSegment};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// All simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub physics: PhysicsSettings,
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub demo: DemoSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        let sphere_layer = SphereBodyConfig::default().layer;
        Self {
            physics: PhysicsSettings::default(),
            movement: MovementConfig {
                stairs_mask: Course::stairs_mask(),
                probe_mask: LayerMask::ALL.without(sphere_layer),
                ..Default::default()
            },
            camera: CameraConfig {
                obstruction_mask: LayerMask::ALL.without(sphere_layer),
                ..Default::default()
            },
            demo: DemoSettings::default(),
        }
    }
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("roller"))
    }

    /// Settings file used when no path is given
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path` (or the default location), falling back to
    /// defaults when the file is missing or invalid
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read(&path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Read and parse a settings file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Save settings to `path` (or the default location) and return where
    /// they were written
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, SettingsError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().ok_or(SettingsError::NoConfigDir)?,
        };

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| SettingsError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// Physics and clock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    /// Simulation tick length in seconds
    pub fixed_timestep: f32,
    /// Simulated seconds per real second
    pub time_scale: f32,
    /// Longest frame the clock accepts before clamping
    pub max_delta_time: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        let time = TimeConfig::default();
        Self {
            gravity: PhysicsConfig::default().gravity,
            fixed_timestep: time.fixed_timestep,
            time_scale: time.time_scale,
            max_delta_time: time.max_delta_time,
        }
    }
}

impl PhysicsSettings {
    pub fn physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: self.gravity,
            timestep: self.fixed_timestep,
        }
    }

    pub fn time_config(&self) -> TimeConfig {
        TimeConfig {
            time_scale: self.time_scale,
            fixed_timestep: self.fixed_timestep,
            max_delta_time: self.max_delta_time,
        }
    }
}

/// Headless demo run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Simulated render frames per second
    pub frame_rate: f32,
    /// Run length in seconds
    pub duration: f32,
    /// Seconds between state summaries in the log
    pub report_interval: f32,
    pub script: Vec<InputSegment>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            duration: 12.0,
            report_interval: 1.0,
            script: default_timeline(),
        }
    }
}

//! Engine configuration file handling

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level engine configuration (JSON)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Upper bound on the delta handed to a single frame, in seconds
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta: f32,
}

fn default_max_frame_delta() -> f32 {
    0.25
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            controls: ControlsConfig::default(),
            max_frame_delta: default_max_frame_delta(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_title() -> String {
    "scene-engine".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

/// Fly-camera tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControlsConfig {
    /// Units per axis unit per frame
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Degrees per pointer unit
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

fn default_speed() -> f32 {
    0.2
}

fn default_sensitivity() -> f32 {
    0.1
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            sensitivity: default_sensitivity(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EngineError::Config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(EngineError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(EngineError::Config(format!(
                "max_frame_delta must be positive, got {}",
                self.max_frame_delta
            )));
        }
        if !(self.controls.speed.is_finite() && self.controls.sensitivity.is_finite()) {
            return Err(EngineError::Config("control values must be finite".into()));
        }
        Ok(())
    }
}

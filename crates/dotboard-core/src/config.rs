//! Tunable constants for the board, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Board configuration.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Smallest allowed zoom factor.
    pub min_scale: f64,
    /// Largest allowed zoom factor.
    pub max_scale: f64,
    /// Grid spacing in virtual units.
    pub grid_size: f64,
    /// Minimum on-screen grid pitch in pixels; zooms below it are rejected.
    pub min_grid_pitch: f64,
    /// Wheel zoom intensity per pixel of wheel delta.
    pub zoom_intensity: f64,
    /// Multiplicative zoom step for keyboard zoom.
    pub zoom_step: f64,
    /// Per-frame velocity multiplier during deceleration.
    pub friction: f64,
    /// Nominal frame interval in milliseconds.
    pub frame_interval_ms: f64,
    /// Velocity below which deceleration stops.
    pub velocity_epsilon: f64,
    /// Padding added around text bounds for hit-testing, in virtual units.
    pub hit_padding: f64,
    /// Smallest font size.
    pub min_font_size: f64,
    /// Largest font size.
    pub max_font_size: f64,
    /// Font size of newly created text.
    pub default_font_size: f64,
    /// Radius of the font-resize handle in screen pixels.
    pub resize_handle_radius: f64,
    /// Select animation length in milliseconds.
    pub select_duration_ms: f64,
    /// Deselect animation length in milliseconds.
    pub deselect_duration_ms: f64,
    /// Delete animation length in milliseconds.
    pub delete_duration_ms: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            grid_size: 50.0,
            min_grid_pitch: 25.0,
            zoom_intensity: 0.001,
            zoom_step: 1.1,
            friction: 0.95,
            frame_interval_ms: 16.67,
            velocity_epsilon: 0.01,
            hit_padding: 10.0,
            min_font_size: 32.0,
            max_font_size: 512.0,
            default_font_size: 48.0,
            resize_handle_radius: 8.0,
            select_duration_ms: 200.0,
            deselect_duration_ms: 150.0,
            delete_duration_ms: 200.0,
        }
    }
}

impl BoardConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the values are mutually consistent.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::Invalid(format!(
                "scale bounds [{}, {}] are empty or non-positive",
                self.min_scale, self.max_scale
            )));
        }
        if self.min_font_size <= 0.0 || self.min_font_size > self.max_font_size {
            return Err(ConfigError::Invalid(format!(
                "font size bounds [{}, {}] are empty or non-positive",
                self.min_font_size, self.max_font_size
            )));
        }
        if self.grid_size <= 0.0 {
            return Err(ConfigError::Invalid("grid_size must be positive".into()));
        }
        if self.grid_size * self.max_scale < self.min_grid_pitch {
            return Err(ConfigError::Invalid(format!(
                "grid pitch {} at max_scale {} is below min_grid_pitch {}",
                self.grid_size * self.max_scale,
                self.max_scale,
                self.min_grid_pitch
            )));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid("friction must be in [0, 1)".into()));
        }
        if self.frame_interval_ms <= 0.0 {
            return Err(ConfigError::Invalid(
                "frame_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

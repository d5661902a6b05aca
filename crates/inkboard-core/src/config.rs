//! Engine tuning knobs.

use crate::camera::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure to load an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not parse engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid engine config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Tunable constants for interaction, history and persistence.
///
/// Every field has a default; a JSON document only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom multiplier per wheel notch or zoom button press.
    pub wheel_zoom_step: f64,
    /// Padding around line/arrow endpoints for hit testing, in world units.
    pub line_hit_tolerance: f64,
    /// Radius of the resize handle hit region, in world units.
    pub handle_radius: f64,
    /// Opacity lost by the laser trail per animation frame.
    pub laser_fade_step: f64,
    /// Smallest font size a text resize can produce.
    pub min_font_size: f64,
    /// Font size as a fraction of the text box height after a resize.
    pub font_size_ratio: f64,
    /// Font size of committed text.
    pub default_font_size: f64,
    /// Edge length of icons dropped from the shape library.
    pub icon_size: f64,
    /// Quiet period after the last change before the scene is persisted.
    pub autosave_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_step: ZOOM_STEP,
            line_hit_tolerance: 10.0,
            handle_radius: 5.0,
            laser_fade_step: 0.05,
            min_font_size: 12.0,
            font_size_ratio: 0.8,
            default_font_size: 24.0,
            icon_size: 100.0,
            autosave_debounce_ms: 2000,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing keys keep their defaults.
    ///
    /// The result is validated; out-of-range values are rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Check every value is usable. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Zoom divides screen coordinates, so zero is never allowed
        if self.min_zoom <= 0.0 {
            errors.push(format!("min_zoom must be > 0, got {}", self.min_zoom));
        }
        if self.max_zoom < self.min_zoom {
            errors.push(format!(
                "max_zoom must be >= min_zoom ({}), got {}",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.wheel_zoom_step <= 1.0 {
            errors.push(format!("wheel_zoom_step must be > 1, got {}", self.wheel_zoom_step));
        }

        if self.line_hit_tolerance < 0.0 {
            errors.push(format!("line_hit_tolerance must be >= 0, got {}", self.line_hit_tolerance));
        }
        if self.handle_radius < 0.0 {
            errors.push(format!("handle_radius must be >= 0, got {}", self.handle_radius));
        }

        // A non-positive step would keep the fade running forever
        if self.laser_fade_step <= 0.0 {
            errors.push(format!("laser_fade_step must be > 0, got {}", self.laser_fade_step));
        }

        if self.min_font_size <= 0.0 {
            errors.push(format!("min_font_size must be > 0, got {}", self.min_font_size));
        }
        if self.font_size_ratio <= 0.0 {
            errors.push(format!("font_size_ratio must be > 0, got {}", self.font_size_ratio));
        }
        if self.default_font_size <= 0.0 {
            errors.push(format!("default_font_size must be > 0, got {}", self.default_font_size));
        }
        if self.icon_size <= 0.0 {
            errors.push(format!("icon_size must be > 0, got {}", self.icon_size));
        }

        errors
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

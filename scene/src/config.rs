//! Scene configuration: gesture thresholds, transform limits, camera, bridge.
//!
//! Defaults come from [`crate::consts`]. A host can overlay decoded URL
//! query parameters (`SceneConfig::from_pairs`) or load a JSON document
//! (`SceneConfig::from_json`); both validate the result.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::doc::Rgb;

/// Query keys that skip camera acquisition.
const BYPASS_KEYS: [&str; 2] = ["automation", "nocamera"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid number for `{key}`: {value:?}")]
    InvalidNumber { key: String, value: String },
    #[error("invalid scale range: min {min}, max {max}")]
    InvalidScaleRange { min: f64, max: f64 },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// All tunables for one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub long_press_ms: f64,
    pub intent_revert_ms: f64,
    pub bounce_ms: f64,
    pub move_threshold_px: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub log_capacity: usize,
    pub camera_fov_deg: f64,
    pub camera_distance: f64,
    pub camera_near: f64,
    pub camera_far: f64,
    pub object_half_extent: f64,
    pub selected_scale_boost: f64,
    pub bounce_scale_boost: f64,
    pub highlight_color: Rgb,
    pub smoothing_half_life_ms: f64,
    pub bridge_element_id: String,
    /// Skip camera acquisition and start active immediately (headless runs).
    pub bypass_camera: bool,
    /// Seed for placement colors.
    pub color_seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            intent_revert_ms: INTENT_REVERT_MS,
            bounce_ms: BOUNCE_MS,
            move_threshold_px: MOVE_THRESHOLD_PX,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            log_capacity: LOG_CAPACITY,
            camera_fov_deg: CAMERA_FOV_DEG,
            camera_distance: CAMERA_DISTANCE,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
            object_half_extent: OBJECT_HALF_EXTENT,
            selected_scale_boost: SELECTED_SCALE_BOOST,
            bounce_scale_boost: BOUNCE_SCALE_BOOST,
            highlight_color: Rgb::new(0xff, 0xd8, 0x4d),
            smoothing_half_life_ms: SMOOTHING_HALF_LIFE_MS,
            bridge_element_id: BRIDGE_ELEMENT_ID.to_owned(),
            bypass_camera: false,
            color_seed: 0x5eed,
        }
    }
}

impl SceneConfig {
    /// Defaults overlaid with decoded URL query pairs (`automation=1`, `max_scale=4`).
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumber` for an unparseable numeric value and
    /// `InvalidScaleRange` if the resulting bounds are unusable.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                k if BYPASS_KEYS.contains(&k) => config.bypass_camera = parse_flag(value),
                "long_press_ms" => config.long_press_ms = parse_number(key, value)?,
                "min_scale" => config.min_scale = parse_number(key, value)?,
                "max_scale" => config.max_scale = parse_number(key, value)?,
                "seed" => {
                    config.color_seed = value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    })?;
                }
                _ => log::debug!("ignoring query parameter `{key}`"),
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input and `InvalidScaleRange` for unusable bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the scale bounds are positive and ordered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScaleRange` otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min > 0.0 && max.is_finite() && min <= max) {
            return Err(ConfigError::InvalidScaleRange { min, max });
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "" | "1" | "true" | "yes" | "on")
}

fn parse_number(key: &str, value: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidNumber { key: key.to_owned(), value: value.to_owned() };
    let number = value.parse::<f64>().map_err(|_| invalid())?;
    if number.is_finite() { Ok(number) } else { Err(invalid()) }
}

//! # Settings
//!
//! Every tunable of the renderer and the camera lives in [`Settings`]. Values
//! come from a JSON file when one is given and fall back to the defaults below
//! field by field.
//!
//! Lookup order for the file:
//! 1. the first command-line argument
//! 2. the `VOXEL_SPACE_CONFIG` environment variable
//! 3. none: built-in defaults

use std::path::{Path, PathBuf};

use image::Rgb;
use log::info;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxel_renderer::{
    QualityLevel, QualityParameters, QualityPolicy, MAX_VIEW_DISTANCE,
};

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_SPACE_CONFIG";

/// Errors raised while loading or validating settings. Fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`Settings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Both quality presets and the level active at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    /// Level active at startup
    pub initial: QualityLevel,
    /// High quality preset
    pub high: QualityParameters,
    /// Low quality preset
    pub low: QualityParameters,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            initial: QualityLevel::High,
            high: QualityParameters {
                depth_growth_rate: 0.01,
                max_view_distance: 400.0,
                column_stride_switch_distance: 300.0,
                far_column_stride: 3,
            },
            low: QualityParameters {
                depth_growth_rate: 0.03,
                max_view_distance: 250.0,
                column_stride_switch_distance: 100.0,
                far_column_stride: 3,
            },
        }
    }
}

impl QualitySettings {
    /// Builds the runtime policy from these presets.
    pub fn policy(&self) -> QualityPolicy {
        QualityPolicy::new(self.initial, self.high, self.low)
    }
}

/// All renderer, camera and I/O tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grayscale image supplying terrain elevation
    pub height_map_path: PathBuf,
    /// Image supplying terrain color
    pub color_map_path: PathBuf,
    /// Framebuffer width in pixels
    pub screen_width: u32,
    /// Framebuffer height in pixels
    pub screen_height: u32,
    /// Color the framebuffer is cleared to each frame
    pub background_color: [u8; 3],
    /// Starting camera position on the terrain plane
    pub initial_position: [f32; 2],
    /// Starting yaw in radians
    pub initial_yaw: f32,
    /// Starting camera height
    pub initial_height: f32,
    /// Screen row of the horizon
    pub horizon: f32,
    /// Perspective height scale
    pub height_scale: f32,
    /// Distance moved per frame
    pub movement_speed: f32,
    /// Radians turned per frame
    pub rotation_speed: f32,
    /// Height change per frame
    pub height_increment: f32,
    /// Level-of-detail presets
    pub quality: QualitySettings,
    /// Where screenshots are written
    pub screenshot_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            height_map_path: PathBuf::from("assets/maps/height_map.png"),
            color_map_path: PathBuf::from("assets/maps/color_map.png"),
            screen_width: 800,
            screen_height: 600,
            background_color: [0, 0, 0],
            initial_position: [400.0, 400.0],
            initial_yaw: 0.0,
            initial_height: 10.0,
            horizon: 100.0,
            height_scale: 120.0,
            movement_speed: 5.0,
            rotation_speed: 0.06,
            height_increment: 10.0,
            quality: QualitySettings::default(),
            screenshot_path: PathBuf::from("screenshot.png"),
        }
    }
}

impl Settings {
    /// Resolves the settings source from the process arguments and environment.
    ///
    /// # Errors
    /// Returns [`SettingsError`] if a named file cannot be read, parsed or validated.
    pub fn from_env() -> Result<Self, SettingsError> {
        let path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => Self::load(&path),
            None => {
                info!("No settings file given, using defaults");
                let settings = Self::default();
                settings.validate()?;
                Ok(settings)
            }
        }
    }

    /// Reads and validates a JSON settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&contents)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parses and validates settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the values the renderer relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.screen_width == 0 {
            return Err(invalid("screen_width", "must be greater than zero"));
        }
        if self.screen_height == 0 {
            return Err(invalid("screen_height", "must be greater than zero"));
        }
        if !self.initial_yaw.is_finite() {
            return Err(invalid("initial_yaw", "must be finite"));
        }
        let presets = [
            ("quality.high", &self.quality.high),
            ("quality.low", &self.quality.low),
        ];
        for (field, preset) in presets {
            if preset.depth_growth_rate.is_nan() || preset.depth_growth_rate < 0.0 {
                return Err(invalid(field, "depth_growth_rate must not be negative"));
            }
            if !(preset.max_view_distance > 0.0 && preset.max_view_distance <= MAX_VIEW_DISTANCE) {
                return Err(invalid(field, "max_view_distance must be in (0, 2^24]"));
            }
            if preset.far_column_stride == 0 {
                return Err(invalid(field, "far_column_stride must be at least 1"));
            }
        }
        Ok(())
    }

    /// Background color as an RGB sample.
    pub fn background(&self) -> Rgb<u8> {
        Rgb(self.background_color)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

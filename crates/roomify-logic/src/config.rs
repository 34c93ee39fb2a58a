//! Engine and display configuration.
//!
//! `EngineConfig` holds every tunable used by layout, placement, culling and
//! framing. Defaults come from [`crate::constants`]; a JSON document may
//! override any subset of fields. [`validate_config`] reports every problem at once
//! rather than stopping at the first.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{camera, placement, walls};

/// Tunables for the layout/placement/view pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub wall_margin: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,
    pub floor_top_y: f32,
    pub min_spiral_step: f32,
    pub spiral_angle_step_deg: f32,
    pub wall_hide_threshold: f32,
    pub camera_distance_factor: f32,
    pub orbit_min_distance: f32,
    pub orbit_max_factor: f32,
    pub min_grid_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wall_margin: placement::WALL_MARGIN,
            wall_thickness: walls::DEFAULT_THICKNESS,
            wall_height: walls::DEFAULT_HEIGHT,
            floor_top_y: placement::FLOOR_TOP_Y,
            min_spiral_step: placement::MIN_SPIRAL_STEP,
            spiral_angle_step_deg: placement::SPIRAL_ANGLE_STEP_DEG,
            wall_hide_threshold: walls::HIDE_THRESHOLD,
            camera_distance_factor: camera::DISTANCE_FACTOR,
            orbit_min_distance: camera::ORBIT_MIN_DISTANCE,
            orbit_max_factor: camera::ORBIT_MAX_FACTOR,
            min_grid_size: camera::MIN_GRID_SIZE,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NegativeMargin(f32),
    NegativeWallThickness(f32),
    NonPositiveWallHeight(f32),
    /// A zero step would never advance the spiral.
    NonPositiveSpiralStep(f32),
    /// Angle step must divide a turn into at least one sample.
    InvalidAngleStep(f32),
    /// Dot products live in [-1, 1]; anything outside hides all or nothing.
    ThresholdOutOfRange(f32),
    NonPositiveCameraFactor(f32),
    NonFinite(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NegativeMargin(v) => write!(f, "wall margin must be >= 0, got {}", v),
            ConfigError::NegativeWallThickness(v) => {
                write!(f, "wall thickness must be >= 0, got {}", v)
            }
            ConfigError::NonPositiveWallHeight(v) => write!(f, "wall height must be > 0, got {}", v),
            ConfigError::NonPositiveSpiralStep(v) => {
                write!(f, "minimum spiral step must be > 0, got {}", v)
            }
            ConfigError::InvalidAngleStep(v) => {
                write!(f, "spiral angle step must be in (0, 360], got {}", v)
            }
            ConfigError::ThresholdOutOfRange(v) => {
                write!(f, "wall hide threshold must be in [-1, 1], got {}", v)
            }
            ConfigError::NonPositiveCameraFactor(v) => {
                write!(f, "camera factors must be > 0, got {}", v)
            }
            ConfigError::NonFinite(name) => write!(f, "{} is not a finite number", name),
        }
    }
}

/// Validate an engine configuration, returning all errors found.
pub fn validate_config(config: &EngineConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let fields = [
        ("wall_margin", config.wall_margin),
        ("wall_thickness", config.wall_thickness),
        ("wall_height", config.wall_height),
        ("floor_top_y", config.floor_top_y),
        ("min_spiral_step", config.min_spiral_step),
        ("spiral_angle_step_deg", config.spiral_angle_step_deg),
        ("wall_hide_threshold", config.wall_hide_threshold),
        ("camera_distance_factor", config.camera_distance_factor),
        ("orbit_min_distance", config.orbit_min_distance),
        ("orbit_max_factor", config.orbit_max_factor),
        ("min_grid_size", config.min_grid_size),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            errors.push(ConfigError::NonFinite(name));
        }
    }
    if !errors.is_empty() {
        return errors;
    }

    if config.wall_margin < 0.0 {
        errors.push(ConfigError::NegativeMargin(config.wall_margin));
    }
    if config.wall_thickness < 0.0 {
        errors.push(ConfigError::NegativeWallThickness(config.wall_thickness));
    }
    if config.wall_height <= 0.0 {
        errors.push(ConfigError::NonPositiveWallHeight(config.wall_height));
    }
    if config.min_spiral_step <= 0.0 {
        errors.push(ConfigError::NonPositiveSpiralStep(config.min_spiral_step));
    }
    if config.spiral_angle_step_deg <= 0.0 || config.spiral_angle_step_deg > 360.0 {
        errors.push(ConfigError::InvalidAngleStep(config.spiral_angle_step_deg));
    }
    if !(-1.0..=1.0).contains(&config.wall_hide_threshold) {
        errors.push(ConfigError::ThresholdOutOfRange(config.wall_hide_threshold));
    }
    if config.camera_distance_factor <= 0.0 {
        errors.push(ConfigError::NonPositiveCameraFactor(
            config.camera_distance_factor,
        ));
    }
    if config.orbit_max_factor <= 0.0 {
        errors.push(ConfigError::NonPositiveCameraFactor(config.orbit_max_factor));
    }

    errors
}

/// Viewer toggles that affect what the render snapshot reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_walls: bool,
    pub show_grid: bool,
    wall_opacity: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_walls: true,
            show_grid: true,
            wall_opacity: walls::DEFAULT_OPACITY,
        }
    }
}

impl DisplayConfig {
    /// Base material opacity for visible walls, always within `[0, MAX_OPACITY]`.
    pub fn wall_opacity(&self) -> f32 {
        clamp_opacity(self.wall_opacity)
    }

    pub fn set_wall_opacity(&mut self, opacity: f32) {
        self.wall_opacity = clamp_opacity(opacity);
    }
}

fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        return walls::DEFAULT_OPACITY;
    }
    opacity.clamp(0.0, walls::MAX_OPACITY)
}

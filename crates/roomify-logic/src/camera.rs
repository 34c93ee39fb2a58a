//! Camera framing for named view presets.
//!
//! Every preset is a function of the scene centre and its characteristic
//! scale only. With `d = scale × distance_factor`:
//!
//! | Preset | Position |
//! |--------|----------|
//! | `Perspective` | `(cx, 0.8d, cz + 0.8d)` |
//! | `Top` | `(cx, 1.5d, cz)` |
//! | `Front` | `(cx, 0.4d, cz + d)` |
//! | `Side` | `(cx + d, 0.4d, cz)` |
//!
//! All presets look at the scene centre at the target elevation.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;
use crate::constants::camera::TARGET_Y;
use crate::layout::SceneBounds;

/// Named camera configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreset {
    #[default]
    Perspective,
    Top,
    Front,
    Side,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 4] = [
        ViewPreset::Perspective,
        ViewPreset::Top,
        ViewPreset::Front,
        ViewPreset::Side,
    ];

    /// Position offset from the scene centre, in units of `d`.
    fn offset(self) -> Vec3 {
        match self {
            ViewPreset::Perspective => Vec3::new(0.0, 0.8, 0.8),
            ViewPreset::Top => Vec3::new(0.0, 1.5, 0.0),
            ViewPreset::Front => Vec3::new(0.0, 0.4, 1.0),
            ViewPreset::Side => Vec3::new(1.0, 0.4, 0.0),
        }
    }

    /// Straight-down views need an up vector that is not parallel to the view direction.
    fn up(self) -> Vec3 {
        match self {
            ViewPreset::Top => Vec3::NEG_Z,
            _ => Vec3::Y,
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewPreset::Perspective => "perspective",
            ViewPreset::Top => "top",
            ViewPreset::Front => "front",
            ViewPreset::Side => "side",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewPreset::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view preset '{}'", s))
    }
}

/// Camera position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    /// Unit vector from position to target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// Limits for user orbiting around the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Everything the renderer needs to frame a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Framing {
    pub preset: ViewPreset,
    pub pose: CameraPose,
    pub orbit: OrbitLimits,
    /// Edge length of the square ground grid, centred on the scene.
    pub grid_size: f32,
}

/// Camera pose for `preset` over `bounds`.
pub fn frame_view(preset: ViewPreset, bounds: &SceneBounds, config: &EngineConfig) -> CameraPose {
    let center = bounds.center();
    let target = Vec3::new(center.x, TARGET_Y, center.z);
    let distance = bounds.scale() * config.camera_distance_factor;
    let offset = preset.offset() * distance;
    CameraPose {
        position: Vec3::new(center.x + offset.x, offset.y, center.z + offset.z),
        target,
        up: preset.up(),
    }
}

pub fn orbit_limits(bounds: &SceneBounds, config: &EngineConfig) -> OrbitLimits {
    let min_distance = config.orbit_min_distance;
    OrbitLimits {
        min_distance,
        max_distance: (bounds.scale() * config.orbit_max_factor).max(min_distance),
    }
}

pub fn grid_size(bounds: &SceneBounds, config: &EngineConfig) -> f32 {
    (bounds.scale() * 2.0).max(config.min_grid_size)
}

/// Pose, orbit limits and grid size in one go.
pub fn frame_scene(preset: ViewPreset, bounds: &SceneBounds, config: &EngineConfig) -> Framing {
    Framing {
        preset,
        pose: frame_view(preset, bounds, config),
        orbit: orbit_limits(bounds, config),
        grid_size: grid_size(bounds, config),
    }
}

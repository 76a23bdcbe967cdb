//! Per-frame input snapshot
//!
//! Everything the core reads from the outside world in one frame is captured
//! here, once, at the boundary. The same type doubles as the JSON
//! configuration format: every field has a default, so a partial document
//! only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gfx::animation::AnimationPreset;
use crate::gfx::camera::{CameraParams, Projection};
use crate::gfx::lighting::LightParams;

/// Table placement: translation plus uniform scale about the surface anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableParams {
    pub position: [f32; 3],
    pub scale: f32,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }
}

/// Monitor placement relative to the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorParams {
    pub position: [f32; 3],
    /// Euler angles in degrees
    pub rotation: [f32; 3],
    pub scale: f32,
    /// Screen tilt about the hinge, degrees
    pub tilt: f32,
}

impl Default for MonitorParams {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -0.3],
            rotation: [0.0, 0.0, 0.0],
            scale: 1.0,
            tilt: 0.0,
        }
    }
}

/// Mouse placement relative to the table. The mouse has no rotation input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseParams {
    pub position: [f32; 3],
    pub scale: f32,
}

impl Default for MouseParams {
    fn default() -> Self {
        Self {
            position: [0.75, 0.0, 0.25],
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub enabled: bool,
    pub preset: AnimationPreset,
}

/// Discrete start events raised by the UI during the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTriggers {
    pub press_left: bool,
    pub press_right: bool,
    pub scroll: bool,
}

/// Everything the core reads in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    pub table: TableParams,
    pub monitor: MonitorParams,
    pub mouse: MouseParams,
    pub camera: CameraParams,
    pub projection: Projection,
    pub light: LightParams,
    pub wireframe: bool,
    pub background: [f32; 4],
    pub animation: AnimationSettings,
    pub triggers: AnimationTriggers,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            table: TableParams::default(),
            monitor: MonitorParams::default(),
            mouse: MouseParams::default(),
            camera: CameraParams::default(),
            projection: Projection::default(),
            light: LightParams::default(),
            wireframe: false,
            background: [1.0, 1.0, 1.0, 1.0],
            animation: AnimationSettings::default(),
            triggers: AnimationTriggers::default(),
        }
    }
}

impl InputSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Replaces non-finite values with their defaults.
    ///
    /// Missing or garbled UI values must never fail a frame; they fall back
    /// to the literal initial slider value instead.
    pub fn sanitized(&self) -> Self {
        let defaults = InputSnapshot::default();
        let mut out = self.clone();

        fix_vec3(&mut out.table.position, defaults.table.position, "table.position");
        fix_scalar(&mut out.table.scale, defaults.table.scale, "table.scale");

        fix_vec3(&mut out.monitor.position, defaults.monitor.position, "monitor.position");
        fix_vec3(&mut out.monitor.rotation, defaults.monitor.rotation, "monitor.rotation");
        fix_scalar(&mut out.monitor.scale, defaults.monitor.scale, "monitor.scale");
        fix_scalar(&mut out.monitor.tilt, defaults.monitor.tilt, "monitor.tilt");

        fix_vec3(&mut out.mouse.position, defaults.mouse.position, "mouse.position");
        fix_scalar(&mut out.mouse.scale, defaults.mouse.scale, "mouse.scale");

        fix_vec3(&mut out.camera.eye, defaults.camera.eye, "camera.eye");
        fix_vec3(&mut out.camera.at, defaults.camera.at, "camera.at");
        fix_vec3(&mut out.camera.up, defaults.camera.up, "camera.up");

        fix_vec3(&mut out.light.position, defaults.light.position, "light.position");
        fix_vec3(&mut out.light.color, defaults.light.color, "light.color");
        fix_vec3(&mut out.light.ambient, defaults.light.ambient, "light.ambient");
        fix_scalar(&mut out.light.diffuse_strength, defaults.light.diffuse_strength, "light.diffuse_strength");
        fix_scalar(&mut out.light.specular_strength, defaults.light.specular_strength, "light.specular_strength");

        if out.background.iter().any(|c| !c.is_finite()) {
            log::warn!("background is not finite, using default");
            out.background = defaults.background;
        }
        if !out.projection.is_finite() {
            log::warn!("projection parameters are not finite, using default");
            out.projection = defaults.projection;
        }

        out
    }
}

fn fix_scalar(value: &mut f32, default: f32, name: &str) {
    if !value.is_finite() {
        log::warn!("{} is not finite, falling back to {}", name, default);
        *value = default;
    }
}

fn fix_vec3(value: &mut [f32; 3], default: [f32; 3], name: &str) {
    if value.iter().any(|v| !v.is_finite()) {
        log::warn!("{} is not finite, falling back to {:?}", name, default);
        *value = default;
    }
}

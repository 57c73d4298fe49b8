use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::RendererOptions;

/// Scene, camera and animation constants for the viewer
///
/// Colors are `0xRRGGBB` integers. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub background: u32,

    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: [f32; 3],

    pub sky_color: u32,
    pub ground_color: u32,
    pub hemisphere_intensity: f32,

    pub light_color: u32,
    pub light_intensity: f32,
    pub light_position: [f32; 3],

    pub cube_color: u32,
    /// Radians added to the cube's Y rotation every frame
    pub rotation_step: f32,

    pub antialias: bool,
    pub alpha: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: 0xffeee3,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            camera_position: [0.0, 0.0, 4.0],
            sky_color: 0xffffff,
            ground_color: 0xbbbbff,
            hemisphere_intensity: 0.3,
            light_color: 0xffffff,
            light_intensity: 1.0,
            light_position: [0.2, 1.0, 1.0],
            cube_color: 0x107aeb,
            rotation_step: 0.02,
            antialias: true,
            alpha: true,
        }
    }
}

impl ViewerConfig {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }

    pub fn light_position(&self) -> Vec3 {
        Vec3::from_array(self.light_position)
    }

    /// Options the rendering backend should be created with
    pub fn renderer_options(&self, vsync: bool) -> RendererOptions {
        RendererOptions {
            antialias: self.antialias,
            alpha: self.alpha,
            vsync,
        }
    }
}

use anyhow::Result;

use super::window::WindowDimensions;
use crate::camera::PerspectiveCamera;
use crate::scene::Scene;

/// Construction options for a rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    /// Multisample the color target
    pub antialias: bool,
    /// Keep a transparent-capable drawing surface
    pub alpha: bool,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            vsync: true,
        }
    }
}

/// Rendering capability set used by the viewer
///
/// Sizes are logical pixels. The backend multiplies them by the pixel ratio to
/// get its drawing buffer size.
pub trait RenderBackend {
    /// Device pixels per logical pixel; may only reach the drawing buffer
    /// with the next `set_size`
    fn set_pixel_ratio(&mut self, ratio: f64);

    fn pixel_ratio(&self) -> f64;

    /// Resize the drawing surface; dimensions are stored as given
    fn set_size(&mut self, width: u32, height: u32);

    /// Size last passed to `set_size`
    fn size(&self) -> WindowDimensions;

    /// Draw one frame of `scene` as seen from `camera`
    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;
}

/// Drawing buffer size for a logical size at a pixel ratio
pub fn drawing_buffer_size(size: WindowDimensions, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| (v as f64 * pixel_ratio).floor().max(0.0) as u32;
    (scale(size.width), scale(size.height))
}

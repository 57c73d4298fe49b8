/// Window dimensions in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, passed through without clamping
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Host environment - viewport size, pixel density and redraw scheduling
pub trait WindowContext {
    /// Viewport size in logical pixels
    fn dimensions(&self) -> WindowDimensions;

    /// Physical pixels per logical pixel
    fn scale_factor(&self) -> f64;

    /// Ask the host to deliver another refresh tick
    fn request_redraw(&self);
}

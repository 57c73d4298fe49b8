use std::sync::Arc;

use winit::window::Window as WinitWindow;

use crate::core::{WindowContext, WindowDimensions};

/// Winit window exposed as the viewer's host environment
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }
}

impl WindowContext for Window {
    fn dimensions(&self) -> WindowDimensions {
        let logical = self
            .inner
            .inner_size()
            .to_logical::<f64>(self.inner.scale_factor());
        WindowDimensions::new(logical.width.round() as u32, logical.height.round() as u32)
    }

    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }
}

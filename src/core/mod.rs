pub mod animation;
pub mod backend;
pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod window;

pub use animation::{AnimationLoop, FpsCounter, FrameTask};
pub use backend::{drawing_buffer_size, RenderBackend, RendererOptions};
pub use controller::{Button, Controller};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use window::{WindowContext, WindowDimensions};

pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod light;
pub mod math;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod types;
pub mod viewer;
pub mod window;

pub use config::ViewerConfig;
pub use renderer::WgpuRenderer;
pub use viewer::Viewer;

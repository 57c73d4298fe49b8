use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window as WinitWindow, WindowId},
};

use rotating_cube::cli::Cli;
use rotating_cube::core::{AnimationLoop, WindowContext, WinitController};
use rotating_cube::window::Window;
use rotating_cube::{Viewer, ViewerConfig, WgpuRenderer};

// === Application ===

struct App {
    cli: Cli,
    config: ViewerConfig,
    window: Option<Window>,
    animation: Option<AnimationLoop<Viewer<WgpuRenderer>>>,
    input: WinitController,
}

impl App {
    fn new(cli: Cli, config: ViewerConfig) -> Self {
        Self {
            cli,
            config,
            window: None,
            animation: None,
            input: WinitController::default(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WinitWindow::default_attributes()
            .with_title(self.cli.title.as_str())
            .with_inner_size(LogicalSize::new(self.cli.width, self.cli.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let options = self.config.renderer_options(!self.cli.no_vsync);
        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), options))
            .context("Failed to initialize renderer")?;

        let window = Window::new(window);
        let viewer = Viewer::new(&window, renderer, &self.config);
        self.input.set_scale_factor(window.scale_factor());
        self.animation = Some(AnimationLoop::new(viewer));

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(animation) = &mut self.animation {
            animation.stop();
            log::info!("Stopped after {} frames", animation.frame_count());
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(animation)) = (&self.window, &mut self.animation) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(_) => animation.task_mut().resize(window),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.input.set_scale_factor(scale_factor);
                animation.task_mut().set_pixel_ratio(window);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = animation.tick() {
                    log::error!("Render error: {:#}", e);
                    self.shutdown(event_loop);
                }
            }
            other => {
                if self.input.process_event(&other) {
                    animation.task_mut().orbit(&self.input);
                    self.input.reset_deltas();
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let (Some(window), Some(animation)) = (&self.window, &self.animation) {
            if animation.is_running() {
                window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    log::info!("Rotating cube - drag to orbit, right-drag to pan, scroll to zoom, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}

use anyhow::{Context, Result};

use crate::camera::PerspectiveCamera;
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::core::{Controller, FrameTask, RenderBackend, WindowContext};
use crate::light::{DirectionalLight, HemisphereLight};
use crate::math::Color;
use crate::mesh::{BoxGeometry, Mesh, StandardMaterial};
use crate::scene::{NodeId, Scene};

/// One lit cube spinning in front of an orbitable camera
///
/// The viewer owns the scene, camera, orbit controls and rendering backend.
/// Refresh ticks call [`Viewer::render`], window resizes call
/// [`Viewer::resize`], and pointer input reaches the camera through
/// [`Viewer::orbit`].
pub struct Viewer<R: RenderBackend> {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    renderer: R,
    mesh: NodeId,
    rotation_step: f32,
}

impl<R: RenderBackend> Viewer<R> {
    /// Build the scene and size `renderer` to the host window
    pub fn new(host: &dyn WindowContext, mut renderer: R, config: &ViewerConfig) -> Self {
        let dims = host.dimensions();

        let mut camera = PerspectiveCamera::new(config.fov, dims.aspect(), config.near, config.far);
        camera.position = config.camera_position();
        camera.look_at(glam::Vec3::ZERO);

        let mut scene = Scene::new(Color::from_hex(config.background));

        scene.add(HemisphereLight::new(
            Color::from_hex(config.sky_color),
            Color::from_hex(config.ground_color),
            config.hemisphere_intensity,
        ));

        let mut light = DirectionalLight::new(Color::from_hex(config.light_color), config.light_intensity);
        light.position = config.light_position();
        scene.add(light);

        renderer.set_pixel_ratio(host.scale_factor());
        renderer.set_size(dims.width, dims.height);

        let material = StandardMaterial::new(Color::from_hex(config.cube_color));
        let mesh = scene.add(Mesh::new(BoxGeometry::default(), material));

        let controls = OrbitControls::new(&camera);

        log::info!(
            "Viewer initialized at {}x{} (pixel ratio {})",
            dims.width,
            dims.height,
            host.scale_factor()
        );

        Self {
            scene,
            camera,
            controls,
            renderer,
            mesh,
            rotation_step: config.rotation_step,
        }
    }

    /// Advance the cube one step and draw the frame
    pub fn render(&mut self) -> Result<()> {
        self.scene
            .mesh_mut(self.mesh)
            .context("Viewer mesh missing from scene")?
            .rotate_y(self.rotation_step);

        self.renderer.draw(&self.scene, &self.camera)
    }

    /// Match camera aspect and surface size to the host window
    ///
    /// Dimensions are passed through unchanged, including zero.
    pub fn resize(&mut self, host: &dyn WindowContext) {
        let dims = host.dimensions();
        self.camera.aspect = dims.aspect();
        self.camera.update_projection_matrix();
        self.renderer.set_size(dims.width, dims.height);
        log::debug!("Resized to {}x{}", dims.width, dims.height);
    }

    /// Follow a change of device pixel ratio, then resize
    pub fn set_pixel_ratio(&mut self, host: &dyn WindowContext) {
        self.renderer.set_pixel_ratio(host.scale_factor());
        self.resize(host);
    }

    /// Apply accumulated pointer input to the camera; returns true if it moved
    pub fn orbit(&mut self, input: &dyn Controller) -> bool {
        let height = self.renderer.size().height as f32;
        self.controls.update(&mut self.camera, input, height)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The spinning cube
    pub fn mesh(&self) -> Option<&Mesh> {
        self.scene.mesh(self.mesh)
    }
}

impl<R: RenderBackend> FrameTask for Viewer<R> {
    fn run_frame(&mut self) -> Result<()> {
        self.render()
    }
}

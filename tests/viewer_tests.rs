use std::cell::Cell;
use std::f32::consts::TAU;

use anyhow::Result;
use glam::Vec3;
use rotating_cube::camera::PerspectiveCamera;
use rotating_cube::core::{AnimationLoop, RenderBackend, WindowContext, WindowDimensions};
use rotating_cube::math::Color;
use rotating_cube::scene::Scene;
use rotating_cube::{Viewer, ViewerConfig};

/// Host window whose size tests can change between calls
struct MockHost {
    dims: Cell<WindowDimensions>,
}

impl MockHost {
    fn new(width: u32, height: u32) -> Self {
        Self {
            dims: Cell::new(WindowDimensions::new(width, height)),
        }
    }

    fn set_size(&self, width: u32, height: u32) {
        self.dims.set(WindowDimensions::new(width, height));
    }
}

impl WindowContext for MockHost {
    fn dimensions(&self) -> WindowDimensions {
        self.dims.get()
    }

    fn scale_factor(&self) -> f64 {
        1.0
    }

    fn request_redraw(&self) {}
}

/// Backend that records what it was asked to draw
#[derive(Default)]
struct RecordingBackend {
    size: WindowDimensions,
    pixel_ratio: f64,
    set_size_calls: usize,
    drawn_rotations: Vec<f32>,
    drawn_backgrounds: Vec<Color>,
    drawn_aspects: Vec<f32>,
}

impl RenderBackend for RecordingBackend {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = WindowDimensions::new(width, height);
        self.set_size_calls += 1;
    }

    fn size(&self) -> WindowDimensions {
        self.size
    }

    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let (_, mesh) = scene.meshes().next().expect("scene has a mesh");
        self.drawn_rotations.push(mesh.rotation.y);
        self.drawn_backgrounds.push(scene.background);
        self.drawn_aspects.push(camera.aspect);
        Ok(())
    }
}

fn viewer(host: &MockHost) -> Viewer<RecordingBackend> {
    Viewer::new(host, RecordingBackend::default(), &ViewerConfig::default())
}

fn rotation(viewer: &Viewer<RecordingBackend>) -> f32 {
    viewer.mesh().unwrap().rotation.y
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    #[test]
    fn test_no_render_calls_leave_orientation_at_zero() {
        let host = MockHost::new(800, 600);
        let viewer = viewer(&host);
        assert_eq!(rotation(&viewer), 0.0);
        assert!(viewer.renderer().drawn_rotations.is_empty());
    }

    #[test]
    fn test_each_render_adds_one_step() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        for n in 1..=50 {
            viewer.render().unwrap();
            let expected = n as f32 * 0.02;
            assert!((rotation(&viewer) - expected).abs() < 1e-5, "after {} frames", n);
        }
    }

    #[test]
    fn test_mesh_is_rotated_before_it_is_drawn() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        viewer.render().unwrap();
        viewer.render().unwrap();

        let drawn = &viewer.renderer().drawn_rotations;
        assert_eq!(drawn.len(), 2);
        assert!((drawn[0] - 0.02).abs() < 1e-6);
        assert!((drawn[1] - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_orientation_wraps_after_full_turn() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        let frames = 1000;
        for _ in 0..frames {
            viewer.render().unwrap();
            let r = rotation(&viewer);
            assert!((0.0..TAU).contains(&r));
        }

        let expected = (frames as f64 * 0.02).rem_euclid(std::f64::consts::TAU) as f32;
        assert!((rotation(&viewer) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_orientation_returns_near_start_after_one_period() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        // 100π frames is one full turn at 0.02 rad per frame
        let frames = (100.0 * std::f64::consts::PI).round() as usize;
        for _ in 0..frames {
            viewer.render().unwrap();
        }

        let r = rotation(&viewer);
        let distance_from_start = r.min(TAU - r);
        assert!(distance_from_start < 0.02, "rotation {}", r);
    }
}

#[cfg(test)]
mod resize_tests {
    use super::*;

    #[test]
    fn test_initial_aspect_and_size_follow_window() {
        let host = MockHost::new(800, 600);
        let viewer = viewer(&host);

        assert_eq!(viewer.camera().aspect, 800.0 / 600.0);
        assert_eq!(viewer.renderer().size(), WindowDimensions::new(800, 600));
        assert_eq!(viewer.renderer().pixel_ratio(), 1.0);
    }

    #[test]
    fn test_resize_updates_aspect_projection_and_surface() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);
        let before = viewer.camera().projection_matrix();

        host.set_size(1920, 1080);
        viewer.resize(&host);

        assert_eq!(viewer.camera().aspect, 1920.0 / 1080.0);
        assert_ne!(viewer.camera().projection_matrix(), before);
        assert_eq!(viewer.renderer().size(), WindowDimensions::new(1920, 1080));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        host.set_size(1280, 720);
        viewer.resize(&host);
        let aspect = viewer.camera().aspect;
        let projection = viewer.camera().projection_matrix();
        let size = viewer.renderer().size();

        viewer.resize(&host);
        assert_eq!(viewer.camera().aspect, aspect);
        assert_eq!(viewer.camera().projection_matrix(), projection);
        assert_eq!(viewer.renderer().size(), size);
    }

    #[test]
    fn test_resize_does_not_touch_rotation() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);
        viewer.render().unwrap();

        host.set_size(300, 900);
        viewer.resize(&host);
        assert!((rotation(&viewer) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_passes_through() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        host.set_size(800, 0);
        viewer.resize(&host);

        assert!(viewer.camera().aspect.is_infinite());
        assert_eq!(viewer.renderer().size(), WindowDimensions::new(800, 0));
    }

    #[test]
    fn test_various_sizes() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);

        for (w, h) in [(1, 1), (640, 480), (1024, 768), (2560, 1440), (3840, 2160), (600, 800)] {
            host.set_size(w, h);
            viewer.resize(&host);
            assert_eq!(viewer.camera().aspect, w as f32 / h as f32);
            assert_eq!(viewer.renderer().size(), WindowDimensions::new(w, h));
        }
    }
}

#[cfg(test)]
mod scene_tests {
    use super::*;

    #[test]
    fn test_background_is_constant_for_any_window_size() {
        for (w, h) in [(800, 600), (1, 1), (4000, 100)] {
            let host = MockHost::new(w, h);
            let viewer = viewer(&host);
            assert_eq!(viewer.scene().background, Color::from_hex(0xffeee3));
            assert_eq!(viewer.scene().background, Color::new(1.0, 0xee as f32 / 255.0, 0xe3 as f32 / 255.0));
        }
    }

    #[test]
    fn test_lights() {
        let host = MockHost::new(800, 600);
        let viewer = viewer(&host);

        let hemisphere = viewer.scene().hemisphere_light().unwrap();
        assert_eq!(hemisphere.sky_color, Color::from_hex(0xffffff));
        assert_eq!(hemisphere.ground_color, Color::from_hex(0xbbbbff));
        assert_eq!(hemisphere.intensity, 0.3);

        let directional = viewer.scene().directional_light().unwrap();
        assert_eq!(directional.intensity, 1.0);
        assert_eq!(directional.position, Vec3::new(0.2, 1.0, 1.0));
    }

    #[test]
    fn test_camera_looks_at_cube() {
        let host = MockHost::new(800, 600);
        let viewer = viewer(&host);
        assert_eq!(viewer.camera().position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(viewer.camera().target, Vec3::ZERO);
        assert_eq!(viewer.controls().target, Vec3::ZERO);
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_render_resize_render_scenario() {
        let host = MockHost::new(800, 600);
        let mut viewer = viewer(&host);
        assert!((viewer.camera().aspect - 1.333_333_3).abs() < 1e-6);

        viewer.render().unwrap();
        assert!((rotation(&viewer) - 0.02).abs() < 1e-6);

        host.set_size(1024, 768);
        viewer.resize(&host);
        assert_eq!(viewer.camera().aspect, 1024.0 / 768.0);
        assert_eq!(viewer.renderer().size(), WindowDimensions::new(1024, 768));

        for _ in 0..3 {
            viewer.render().unwrap();
        }
        assert!((rotation(&viewer) - 0.08).abs() < 1e-6);

        let backend = viewer.renderer();
        assert_eq!(backend.drawn_rotations.len(), 4);
        assert_eq!(backend.drawn_aspects[0], 800.0 / 600.0);
        assert_eq!(backend.drawn_aspects[3], 1024.0 / 768.0);
        assert!(backend
            .drawn_backgrounds
            .iter()
            .all(|c| *c == Color::from_hex(0xffeee3)));
    }

    #[test]
    fn test_animation_loop_drives_render() {
        let host = MockHost::new(800, 600);
        let mut animation = AnimationLoop::new(viewer(&host));

        for _ in 0..5 {
            assert!(animation.tick().unwrap());
        }
        assert_eq!(animation.frame_count(), 5);
        assert!((rotation(animation.task()) - 0.10).abs() < 1e-6);

        host.set_size(1024, 768);
        animation.task_mut().resize(&host);
        animation.stop();
        assert!(!animation.tick().unwrap());

        let viewer = animation.into_task();
        assert_eq!(viewer.renderer().drawn_rotations.len(), 5);
        assert_eq!(viewer.renderer().set_size_calls, 2);
    }

    #[test]
    fn test_custom_rotation_step() {
        let host = MockHost::new(800, 600);
        let config = ViewerConfig {
            rotation_step: 0.5,
            ..ViewerConfig::default()
        };
        let mut viewer = Viewer::new(&host, RecordingBackend::default(), &config);

        viewer.render().unwrap();
        viewer.render().unwrap();
        assert_eq!(viewer.mesh().unwrap().rotation.y, 1.0);
    }
}

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::{Button, Controller};

/// Keeps the polar angle away from the poles where `look_at` degenerates
const POLAR_EPSILON: f32 = 1e-6;
/// Distance factor per wheel line at `zoom_speed == 1`
const ZOOM_BASE: f32 = 0.95;

/// Mouse-driven orbiting around a target point
///
/// - left drag rotates the camera around `target`
/// - right drag pans `target` and camera together in the view plane
/// - middle drag and the wheel dolly towards or away from `target`
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Camera offset from the target in spherical coordinates (three.js convention)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around +Y measured from +Z
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

impl OrbitControls {
    /// Bind to `camera`, orbiting the point it currently looks at
    pub fn new(camera: &PerspectiveCamera) -> Self {
        Self {
            enabled: true,
            target: camera.target,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.1,
            max_distance: 1000.0,
        }
    }

    /// Current camera distance from the target
    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        camera.position.distance(self.target)
    }

    /// Apply accumulated pointer input to `camera`; returns true if it moved
    ///
    /// `viewport_height` is the render surface height in logical pixels; a drag
    /// across the full height turns the camera by one full revolution.
    pub fn update(
        &mut self,
        camera: &mut PerspectiveCamera,
        input: &dyn Controller,
        viewport_height: f32,
    ) -> bool {
        if !self.enabled || viewport_height <= 0.0 {
            return false;
        }

        let (dx, dy) = input.pointer_delta();
        let dragged = dx != 0.0 || dy != 0.0;
        let mut spherical = Spherical::from_offset(camera.position - self.target);
        let mut changed = false;

        if dragged && input.is_down(Button::MouseLeft) {
            spherical.theta -= TAU * dx / viewport_height * self.rotate_speed;
            spherical.phi -= TAU * dy / viewport_height * self.rotate_speed;
            changed = true;
        }

        if dragged && input.is_down(Button::MouseRight) {
            self.pan(camera, dx, dy, spherical.radius, viewport_height);
            changed = true;
        }

        let mut zoom_lines = input.scroll_delta();
        if dragged && input.is_down(Button::MouseMiddle) {
            // Dragging up pulls the camera in, like scrolling away from the user
            zoom_lines -= dy / viewport_height * 10.0;
        }
        if zoom_lines != 0.0 {
            spherical.radius *= ZOOM_BASE.powf(self.zoom_speed * zoom_lines);
            changed = true;
        }

        if !changed {
            return false;
        }

        spherical.phi = spherical.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = spherical.radius.clamp(self.min_distance, self.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);
        true
    }

    fn pan(
        &mut self,
        camera: &PerspectiveCamera,
        dx: f32,
        dy: f32,
        distance: f32,
        viewport_height: f32,
    ) {
        // World units covered by one pixel at the target's depth
        let target_distance = distance * (camera.fov.to_radians() * 0.5).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;

        let right = camera.right();
        let up = right.cross(camera.forward());
        self.target += (-right * dx + up * dy) * scale;
    }
}

use glam::{Mat3, Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::light::{DirectionalLight, HemisphereLight};
use crate::mesh::Mesh;

/// Mesh vertex as laid out in the vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame camera and lighting data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub _pad0: f32,
    pub sky_color: [f32; 3],
    pub hemisphere_intensity: f32,
    pub ground_color: [f32; 3],
    pub _pad1: f32,
    /// Unit vector pointing from the surface towards the light
    pub light_direction: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub _pad2: f32,
}

impl FrameUniform {
    pub fn new(
        camera: &PerspectiveCamera,
        hemisphere: Option<&HemisphereLight>,
        directional: Option<&DirectionalLight>,
    ) -> Self {
        let (sky_color, ground_color, hemisphere_intensity) = match hemisphere {
            Some(light) => (
                light.sky_color.to_linear(),
                light.ground_color.to_linear(),
                light.intensity,
            ),
            None => ([0.0; 3], [0.0; 3], 0.0),
        };
        let (light_direction, light_color, light_intensity) = match directional {
            Some(light) => (
                light.direction().to_array(),
                light.color.to_linear(),
                light.intensity,
            ),
            None => (Vec3::Y.to_array(), [0.0; 3], 0.0),
        };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.to_array(),
            _pad0: 0.0,
            sky_color,
            hemisphere_intensity,
            ground_color,
            _pad1: 0.0,
            light_direction,
            light_intensity,
            light_color,
            _pad2: 0.0,
        }
    }
}

/// Per-mesh transform and material data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, padded to mat4 for alignment
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub roughness: f32,
}

impl ObjectUniform {
    pub fn new(mesh: &Mesh) -> Self {
        let model = mesh.model_matrix();
        let normal = Mat3::from_mat4(model).inverse().transpose();

        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: Mat4::from_mat3(normal).to_cols_array_2d(),
            color: mesh.material.color.to_linear(),
            roughness: mesh.material.roughness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 144);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
    }

    #[test]
    fn test_frame_uniform_without_lights_is_dark() {
        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        let uniform = FrameUniform::new(&camera, None, None);
        assert_eq!(uniform.hemisphere_intensity, 0.0);
        assert_eq!(uniform.light_intensity, 0.0);
    }

    #[test]
    fn test_frame_uniform_light_direction_is_normalized() {
        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        let light = DirectionalLight::default();
        let uniform = FrameUniform::new(&camera, None, Some(&light));
        let length = Vec3::from_array(uniform.light_direction).length();
        assert!((length - 1.0).abs() < 1e-6);
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration, TextureView};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::core::{drawing_buffer_size, GpuContext, RenderBackend, RendererOptions, WindowDimensions};
use crate::mesh::Mesh;
use crate::scene::{NodeId, Scene};
use crate::types::{FrameUniform, ObjectUniform, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

/// GPU buffers for one scene mesh
struct MeshBuffers {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    uniform_buffer: Buffer,
    bind_group: BindGroup,
}

/// Logical size and pixel ratio, plus the buffer size the surface was last
/// configured at
#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfaceSize {
    logical: WindowDimensions,
    pixel_ratio: f64,
    configured: (u32, u32),
}

impl SurfaceSize {
    /// Sizing for a surface already configured at a physical size
    fn from_physical(width: u32, height: u32, pixel_ratio: f64) -> Self {
        let logical = PhysicalSize::new(width, height).to_logical::<f64>(pixel_ratio);
        Self {
            logical: WindowDimensions::new(logical.width.round() as u32, logical.height.round() as u32),
            pixel_ratio,
            configured: (width, height),
        }
    }

    fn buffer_size(&self) -> (u32, u32) {
        drawing_buffer_size(self.logical, self.pixel_ratio)
    }

    /// Takes effect on the next `set_size`
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    /// Record a logical size; returns the buffer size to configure when it
    /// changed and has area
    fn set_size(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.logical = WindowDimensions::new(width, height);
        let buffer = self.buffer_size();
        if buffer.0 == 0 || buffer.1 == 0 || buffer == self.configured {
            return None;
        }
        self.configured = buffer;
        Some(buffer)
    }
}

/// Forward renderer drawing a [`Scene`] to a window surface with wgpu
///
/// Sizes given to [`RenderBackend::set_size`] are logical; the surface is
/// configured at that size times the pixel ratio. A new pixel ratio reaches
/// the surface with the following `set_size`.
pub struct WgpuRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    sample_count: u32,
    pipeline: RenderPipeline,
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    object_layout: BindGroupLayout,
    depth_view: TextureView,
    msaa_view: Option<TextureView>,
    meshes: HashMap<NodeId, MeshBuffers>,
    sizing: SurfaceSize,
}

impl WgpuRenderer {
    /// Create a renderer presenting to `window`
    pub async fn new(window: Arc<Window>, options: RendererOptions) -> Result<Self> {
        let physical = window.inner_size();
        let sizing = SurfaceSize::from_physical(physical.width, physical.height, window.scale_factor());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let surface_config = Self::create_surface_config(&surface, &gpu, physical.width, physical.height, options);
        if physical.width > 0 && physical.height > 0 {
            surface.configure(gpu.device(), &surface_config);
        }

        let sample_count = Self::choose_sample_count(&gpu, surface_config.format, options);
        log::info!(
            "Surface {:?} {}x{}, {}x MSAA, alpha {:?}",
            surface_config.format,
            surface_config.width,
            surface_config.height,
            sample_count,
            surface_config.alpha_mode
        );

        let device = gpu.device();
        let frame_layout = Self::create_uniform_layout(device, "Frame Bind Group Layout");
        let object_layout = Self::create_uniform_layout(device, "Object Bind Group Layout");

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let pipeline = Self::create_pipeline(
            device,
            &frame_layout,
            &object_layout,
            surface_config.format,
            sample_count,
        );

        let (depth_view, msaa_view) =
            Self::create_attachments(device, &surface_config, sample_count);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            sample_count,
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            depth_view,
            msaa_view,
            meshes: HashMap::new(),
            sizing,
        })
    }

    /// Drawing buffer size in physical pixels
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        self.sizing.buffer_size()
    }

    /// Reconfigure the surface and attachments at a drawing buffer size
    fn configure(&mut self, (width, height): (u32, u32)) {
        if width == 0 || height == 0 {
            return;
        }
        log::debug!("Configuring surface at {}x{}", width, height);
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);

        let (depth_view, msaa_view) =
            Self::create_attachments(self.gpu.device(), &self.surface_config, self.sample_count);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    fn create_surface_config(
        surface: &Surface,
        gpu: &GpuContext,
        width: u32,
        height: u32,
        options: RendererOptions,
    ) -> SurfaceConfiguration {
        let caps = surface.get_capabilities(gpu.adapter());
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let alpha_mode = if options.alpha {
            [
                wgpu::CompositeAlphaMode::PreMultiplied,
                wgpu::CompositeAlphaMode::PostMultiplied,
            ]
            .into_iter()
            .find(|mode| caps.alpha_modes.contains(mode))
            .unwrap_or(caps.alpha_modes[0])
        } else {
            caps.alpha_modes[0]
        };

        let present_mode = if options.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn choose_sample_count(
        gpu: &GpuContext,
        format: wgpu::TextureFormat,
        options: RendererOptions,
    ) -> u32 {
        if !options.antialias {
            return 1;
        }
        let color = gpu.adapter().get_texture_format_features(format).flags;
        let depth = gpu.adapter().get_texture_format_features(DEPTH_FORMAT).flags;
        if color.sample_count_supported(MSAA_SAMPLES) && depth.sample_count_supported(MSAA_SAMPLES) {
            MSAA_SAMPLES
        } else {
            log::warn!("{}x MSAA unsupported for {:?}, antialiasing disabled", MSAA_SAMPLES, format);
            1
        }
    }

    fn create_uniform_layout(device: &Device, label: &str) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_pipeline(
        device: &Device,
        frame_layout: &BindGroupLayout,
        object_layout: &BindGroupLayout,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Standard Material Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("standard.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[frame_layout, object_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    /// Depth target plus the multisampled color target when MSAA is on
    fn create_attachments(
        device: &Device,
        config: &SurfaceConfiguration,
        sample_count: u32,
    ) -> (TextureView, Option<TextureView>) {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let msaa_view = (sample_count > 1).then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("MSAA Color Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format: config.format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        (depth_view, msaa_view)
    }

    fn upload_mesh(&self, mesh: &Mesh) -> MeshBuffers {
        let device = self.gpu.device();
        let geometry = mesh.geometry.build();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ObjectUniform::new(mesh)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::debug!(
            "Uploaded mesh: {} vertices, {} indices",
            geometry.vertices.len(),
            geometry.indices.len()
        );

        MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }
}

impl RenderBackend for WgpuRenderer {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.sizing.set_pixel_ratio(ratio);
    }

    fn pixel_ratio(&self) -> f64 {
        self.sizing.pixel_ratio
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(buffer) = self.sizing.set_size(width, height) {
            self.configure(buffer);
        }
    }

    fn size(&self) -> WindowDimensions {
        self.sizing.logical
    }

    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let (width, height) = self.drawing_buffer_size();
        if width == 0 || height == 0 {
            return Ok(());
        }

        for (id, mesh) in scene.meshes() {
            if !self.meshes.contains_key(&id) {
                let buffers = self.upload_mesh(mesh);
                self.meshes.insert(id, buffers);
            }
        }

        let frame = FrameUniform::new(camera, scene.hemisphere_light(), scene.directional_light());
        let queue = self.gpu.queue();
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));
        for (id, mesh) in scene.meshes() {
            if let Some(buffers) = self.meshes.get(&id) {
                queue.write_buffer(
                    &buffers.uniform_buffer,
                    0,
                    bytemuck::cast_slice(&[ObjectUniform::new(mesh)]),
                );
            }
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.configure(self.sizing.configured);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface texture acquisition timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(anyhow!("Failed to acquire surface texture: {}", e)),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&surface_view)),
            None => (&surface_view, None),
        };

        let background = scene.background.to_linear();
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background[0] as f64,
                            g: background[1] as f64,
                            b: background[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for (id, _) in scene.meshes() {
                if let Some(buffers) = self.meshes.get(&id) {
                    render_pass.set_bind_group(1, &buffers.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    render_pass.draw_indexed(0..buffers.index_count, 0, 0..1);
                }
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(())
    }
}

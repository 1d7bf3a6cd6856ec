//! Scene renderer: one opaque, depth-tested, textured pipeline.
//!
//! Bind group layout:
//! - group 0: per-frame uniforms (camera + light), owned here
//! - group 1: per-material base-color texture + sampler
//! - group 2: per-mesh model transform

use bytemuck::{Pod, Zeroable};

use crate::asset::Model;
use crate::camera::Camera;

use super::target::{COLOR_FORMAT, DEPTH_FORMAT};

/// Mesh vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Fixed point light applied to the whole scene.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: [0.5, 0.5, 0.5],
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Per-frame uniform block (group 0).
///
/// `vec4` fields keep std140-compatible 16-byte alignment without padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_pos: [f32; 4],
    pub light_color: [f32; 4],
}

impl FrameUniform {
    /// Snapshots the camera matrices and light parameters.
    ///
    /// The view-projection matrix is copied verbatim from the camera so
    /// every draw within the frame sees identical values.
    pub fn new(camera: &Camera, light: &PointLight) -> Self {
        let p = camera.position();
        let [lx, ly, lz] = light.position;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: [p.x, p.y, p.z, 1.0],
            light_pos: [lx, ly, lz, 1.0],
            light_color: light.color,
        }
    }
}

/// Bind group layouts shared with the asset loader.
pub struct SceneLayouts {
    pub material: wgpu::BindGroupLayout,
    pub mesh: wgpu::BindGroupLayout,
}

/// Issues draw calls for the loaded models against the active camera.
///
/// All pipeline and bind state is set inside the scene render pass; nothing
/// leaks into the UI pass that follows it.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_ubo: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    layouts: SceneLayouts,
    light: PointLight,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint frame bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint material bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let mesh = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint mesh bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint frame bg"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glint scene pipeline layout"),
            bind_group_layouts: &[&frame_layout, &material, &mesh],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glint scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Flattened glTF node transforms may mirror winding.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_ubo,
            frame_bind_group,
            layouts: SceneLayouts { material, mesh },
            light: PointLight::default(),
        }
    }

    /// Layouts the asset loader needs to build material/mesh bind groups.
    pub fn layouts(&self) -> &SceneLayouts {
        &self.layouts
    }

    /// Draws all models in slice order (fixed, deterministic) and returns
    /// the number of draw submissions recorded, one per mesh.
    ///
    /// The camera uniform is uploaded once per frame, so every draw sees
    /// identical matrices. Assumes opaque geometry; ordering among models is
    /// otherwise immaterial.
    pub fn draw_all(
        &self,
        queue: &wgpu::Queue,
        rpass: &mut wgpu::RenderPass<'_>,
        models: &[Model],
        camera: &Camera,
    ) -> u32 {
        let frame = FrameUniform::new(camera, &self.light);
        queue.write_buffer(&self.frame_ubo, 0, bytemuck::bytes_of(&frame));

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.frame_bind_group, &[]);

        let mut submissions = 0;
        for model in models {
            submissions += model.draw(rpass);
        }
        submissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::MotionDelta;
    use glam::Vec3;

    #[test]
    fn frame_uniform_matches_camera_matrices_bit_for_bit() {
        let mut camera = Camera::new(Vec3::new(0.0, 6.0, 8.0), -90.0, -36.9);
        camera.update(MotionDelta::ZERO, 1.0 / 60.0, 800.0 / 600.0);

        let light = PointLight::default();
        let a = FrameUniform::new(&camera, &light);
        let b = FrameUniform::new(&camera, &light);

        assert_eq!(a.view_proj, camera.view_projection().to_cols_array_2d());
        // Two snapshots within a frame are identical down to the bits.
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
    }
}

//! glTF model loading.
//!
//! A model owns its GPU buffers and bind groups; it is read-only during the
//! render loop. Node transforms from the default scene are flattened at load
//! time and uploaded as per-mesh uniforms.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::Vertex;
use crate::render::scene::SceneLayouts;

/// A loaded model: one GPU mesh per glTF primitive.
pub struct Model {
    label: String,
    meshes: Vec<Mesh>,
}

/// Raw mesh data for building a [`Model`] directly, without a glTF
/// document. Materials default to solid white.
pub struct MeshData<'a> {
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
    pub transform: Mat4,
}

struct Mesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    material: wgpu::BindGroup,
    transform: wgpu::BindGroup,
}

impl Model {
    /// Imports a glTF file and uploads its meshes and base-color textures.
    ///
    /// Any structural error (unreadable file, missing positions, empty
    /// scene) fails the load; materials degrade gracefully to a solid-color
    /// texture.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SceneLayouts,
        path: &Path,
    ) -> Result<Self> {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let (doc, buffers, images) =
            gltf::import(path).with_context(|| format!("failed to import glTF {}", path.display()))?;

        let scene = doc
            .default_scene()
            .or_else(|| doc.scenes().next())
            .with_context(|| format!("glTF {} contains no scenes", path.display()))?;

        let mut meshes = Vec::new();
        for node in scene.nodes() {
            collect_node(
                device,
                queue,
                layouts,
                &label,
                &buffers,
                &images,
                &node,
                Mat4::IDENTITY,
                &mut meshes,
            )?;
        }

        anyhow::ensure!(
            !meshes.is_empty(),
            "glTF {} contains no renderable meshes",
            path.display()
        );

        log::info!("loaded model '{label}' ({} meshes)", meshes.len());
        Ok(Self { label, meshes })
    }

    /// Builds a model from raw mesh data.
    pub fn from_meshes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SceneLayouts,
        label: &str,
        meshes: &[MeshData<'_>],
    ) -> Result<Self> {
        anyhow::ensure!(!meshes.is_empty(), "model '{label}' has no meshes");

        let meshes = meshes
            .iter()
            .map(|data| {
                anyhow::ensure!(
                    !data.vertices.is_empty() && !data.indices.is_empty(),
                    "mesh in '{label}' has empty geometry"
                );
                let material =
                    texture_material(device, queue, layouts, label, 1, 1, &[255, 255, 255, 255]);
                Ok(build_mesh(
                    device,
                    layouts,
                    label,
                    data.vertices,
                    data.indices,
                    material,
                    data.transform,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            label: label.to_string(),
            meshes,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Records this model's draw submissions into the scene pass; returns
    /// how many were recorded (one per mesh).
    ///
    /// Expects the scene pipeline and frame bind group (group 0) to be set.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) -> u32 {
        for mesh in &self.meshes {
            rpass.set_bind_group(1, &mesh.material, &[]);
            rpass.set_bind_group(2, &mesh.transform, &[]);
            rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
            rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
        self.meshes.len() as u32
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_node(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &SceneLayouts,
    label: &str,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    node: &gltf::Node<'_>,
    parent: Mat4,
    out: &mut Vec<Mesh>,
) -> Result<()> {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            out.push(upload_primitive(
                device, queue, layouts, label, buffers, images, &primitive, world,
            )?);
        }
    }

    for child in node.children() {
        collect_node(
            device, queue, layouts, label, buffers, images, &child, world, out,
        )?;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn upload_primitive(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &SceneLayouts,
    label: &str,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    primitive: &gltf::Primitive<'_>,
    world: Mat4,
) -> Result<Mesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .with_context(|| format!("primitive in '{label}' has no positions"))?
        .collect();

    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(iter) => iter.collect(),
        None => vec![[0.0, 1.0, 0.0]; positions.len()],
    };

    let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(tc) => tc.into_f32().collect(),
        None => vec![[0.0, 0.0]; positions.len()],
    };

    anyhow::ensure!(
        normals.len() == positions.len() && uvs.len() == positions.len(),
        "primitive in '{label}' has mismatched attribute counts"
    );

    let vertices: Vec<Vertex> = positions
        .iter()
        .zip(normals.iter())
        .zip(uvs.iter())
        .map(|((&position, &normal), &uv)| Vertex {
            position,
            normal,
            uv,
        })
        .collect();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(idx) => idx.into_u32().collect(),
        // Non-indexed geometry: synthesize a trivial index list.
        None => (0..vertices.len() as u32).collect(),
    };

    let material = build_material(device, queue, layouts, label, images, primitive);

    Ok(build_mesh(
        device, layouts, label, &vertices, &indices, material, world,
    ))
}

/// Uploads vertex/index buffers and the per-mesh transform uniform.
fn build_mesh(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    label: &str,
    vertices: &[Vertex],
    indices: &[u32],
    material: wgpu::BindGroup,
    world: Mat4,
) -> Mesh {
    let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} vertices")),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} indices")),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let transform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} transform")),
        contents: bytemuck::cast_slice(&world.to_cols_array_2d()),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    let transform = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} transform bg")),
        layout: &layouts.mesh,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: transform_buf.as_entire_binding(),
        }],
    });

    Mesh {
        vertex_buf,
        index_buf,
        index_count: indices.len() as u32,
        material,
        transform,
    }
}

/// Builds the material bind group: the base-color texture when present and
/// decodable, otherwise a 1x1 texture filled with the base-color factor.
fn build_material(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &SceneLayouts,
    label: &str,
    images: &[gltf::image::Data],
    primitive: &gltf::Primitive<'_>,
) -> wgpu::BindGroup {
    let pbr = primitive.material().pbr_metallic_roughness();

    let decoded = pbr
        .base_color_texture()
        .and_then(|info| images.get(info.texture().source().index()))
        .and_then(|data| match rgba_pixels(data) {
            Some(pixels) => Some((data.width, data.height, pixels)),
            None => {
                log::warn!(
                    "model '{label}': unsupported texture format {:?}; using base color factor",
                    data.format
                );
                None
            }
        });

    let (width, height, pixels) = decoded.unwrap_or_else(|| {
        let f = pbr.base_color_factor();
        let px = [
            (f[0].clamp(0.0, 1.0) * 255.0) as u8,
            (f[1].clamp(0.0, 1.0) * 255.0) as u8,
            (f[2].clamp(0.0, 1.0) * 255.0) as u8,
            (f[3].clamp(0.0, 1.0) * 255.0) as u8,
        ];
        (1, 1, px.to_vec())
    });

    texture_material(device, queue, layouts, label, width, height, &pixels)
}

/// Uploads an RGBA8 texture and builds the material bind group around it.
fn texture_material(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &SceneLayouts,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::BindGroup {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("{label} base color")),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&format!("{label} sampler")),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} material bg")),
        layout: &layouts.material,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

/// Expands a decoded glTF image to tightly-packed RGBA8, if representable.
fn rgba_pixels(data: &gltf::image::Data) -> Option<Vec<u8>> {
    use gltf::image::Format;

    match data.format {
        Format::R8G8B8A8 => Some(data.pixels.clone()),
        Format::R8G8B8 => {
            let mut out = Vec::with_capacity(data.pixels.len() / 3 * 4);
            for rgb in data.pixels.chunks_exact(3) {
                out.extend_from_slice(rgb);
                out.push(255);
            }
            Some(out)
        }
        Format::R8 => {
            let mut out = Vec::with_capacity(data.pixels.len() * 4);
            for &r in &data.pixels {
                out.extend_from_slice(&[r, r, r, 255]);
            }
            Some(out)
        }
        _ => None,
    }
}

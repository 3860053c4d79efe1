use crate::camera::FreeCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use gimbal_assets::{LineHandle, LineMesh, MeshData, MeshHandle, MeshStore};
use gimbal_scene::{AMBIENT_SCALE, Geometry, Passes, Scene};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const SHADOW_DEPTH_BIAS: f32 = 0.0005;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    light_matrix: [[f32; 4]; 4],
    light_dir: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuLineVertex {
    position: [f32; 3],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct GpuLines {
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

struct ShadowTarget {
    view: wgpu::TextureView,
    size: u32,
}

/// Draws a [`Scene`] in three passes: shadow depth, lit color, post-process overlay.
///
/// Each scene object owns one slot of the instance buffer, indexed by its
/// object id.
pub struct SceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    shadow_line_pipeline: wgpu::RenderPipeline,
    quad_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    shadow: ShadowTarget,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    lines: BTreeMap<LineHandle, GpuLines>,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    clear_color: f32,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shadow_map_size: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
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

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let shadow = create_shadow_target(device, shadow_map_size);
        let shadow_bind_group =
            create_shadow_bind_group(device, &shadow_layout, &shadow.view, &shadow_sampler);

        let mesh_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };
        let line_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuLineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                2 => Float32x4,
                3 => Float32x4,
                4 => Float32x4,
                5 => Float32x4,
                6 => Float32x4,
                7 => Float32x4,
            ],
        };
        let depth_state = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };
        let color_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        // Lit meshes
        let diffuse_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("diffuse_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::diffuse_shader().into()),
        });
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &shadow_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_layout),
            vertex: wgpu::VertexState {
                module: &diffuse_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout.clone(), instance_layout.clone()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &diffuse_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Imported meshes carry no guaranteed winding.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Coordinate frames
        let frame_only_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frame_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::line_shader().into()),
        });
        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&frame_only_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[line_vertex_layout.clone(), instance_layout.clone()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Shadow depth from the light camera; both faces so thin plates cast shadows.
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::shadow_shader().into()),
        });
        let shadow_depth_state = wgpu::DepthStencilState {
            bias: wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
            ..depth_state.clone()
        };
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&frame_only_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout.clone(), instance_layout.clone()],
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(shadow_depth_state.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        let shadow_line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_line_pipeline"),
            layout: Some(&frame_only_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &[line_vertex_layout, instance_layout],
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(shadow_depth_state),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Shadow map preview
        let quad_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_copy_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::QUAD_COPY_SHADER.into()),
        });
        let quad_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&shadow_layout],
            push_constant_ranges: &[],
        });
        let quad_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&quad_layout),
            vertex: wgpu::VertexState {
                module: &quad_shader,
                entry_point: Some("vs_quad"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &quad_shader,
                entry_point: Some("fs_quad"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let max_instances = 64u32;
        let instance_buffer = create_instance_buffer(device, max_instances);
        let depth_texture = create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            line_pipeline,
            shadow_pipeline,
            shadow_line_pipeline,
            quad_pipeline,
            frame_buffer,
            frame_bind_group,
            shadow_bind_group,
            shadow,
            meshes: BTreeMap::new(),
            lines: BTreeMap::new(),
            instance_buffer,
            max_instances,
            depth_texture,
            clear_color: 0.3,
        }
    }

    /// Create GPU buffers for every store entry not uploaded yet.
    pub fn upload(&mut self, device: &wgpu::Device, store: &MeshStore) {
        for (handle, mesh) in store.meshes() {
            if !self.meshes.contains_key(&handle) && !mesh.is_empty() {
                self.meshes.insert(handle, upload_mesh(device, mesh));
            }
        }
        for (handle, lines) in store.line_meshes() {
            if !self.lines.contains_key(&handle) && !lines.vertices.is_empty() {
                self.lines.insert(handle, upload_lines(device, lines));
            }
        }
        tracing::debug!(
            "uploaded {} meshes, {} line lists",
            self.meshes.len(),
            self.lines.len()
        );
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    pub fn set_clear_color(&mut self, grey: f32) {
        self.clear_color = grey.clamp(0.0, 1.0);
    }

    /// Render one frame: shadow pass, color pass, then the post-process overlay.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FreeCamera,
        light_matrix: Mat4,
        light_dir: Vec3,
        scene: &Scene,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                light_matrix: light_matrix.to_cols_array_2d(),
                light_dir: light_dir.extend(0.0).to_array(),
                params: [
                    AMBIENT_SCALE,
                    1.0 / self.shadow.size as f32,
                    SHADOW_DEPTH_BIAS,
                    0.0,
                ],
            }),
        );

        let instances: Vec<InstanceData> = scene
            .objects()
            .map(|(_, object)| InstanceData {
                model: object.transform.matrix().to_cols_array_2d(),
                ambient: object.material.ambient.extend(1.0).to_array(),
                diffuse: object.material.diffuse.extend(1.0).to_array(),
            })
            .collect();
        if instances.len() > self.max_instances as usize {
            self.max_instances = (instances.len() as u32).next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.max_instances);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (id, object) in scene.objects_in(Passes::SHADOW) {
                if let Geometry::Mesh(handle) = object.geometry {
                    self.draw_mesh(&mut pass, handle, id.0 as u32);
                }
            }

            pass.set_pipeline(&self.shadow_line_pipeline);
            for (id, object) in scene.objects_in(Passes::SHADOW) {
                if let Geometry::Lines(handle) = object.geometry {
                    self.draw_lines(&mut pass, handle, id.0 as u32);
                }
            }
        }

        {
            let c = self.clear_color as f64;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("color_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c,
                            g: c,
                            b: c,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(1, &self.shadow_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            pass.set_pipeline(&self.mesh_pipeline);
            for (id, object) in scene.objects_in(Passes::COLOR) {
                if let Geometry::Mesh(handle) = object.geometry {
                    self.draw_mesh(&mut pass, handle, id.0 as u32);
                }
            }

            pass.set_pipeline(&self.line_pipeline);
            for (id, object) in scene.objects_in(Passes::COLOR) {
                if let Geometry::Lines(handle) = object.geometry {
                    self.draw_lines(&mut pass, handle, id.0 as u32);
                }
            }
        }

        let overlay: Vec<MeshHandle> = scene
            .objects_in(Passes::POST_PROCESS)
            .filter_map(|(_, object)| match object.geometry {
                Geometry::Mesh(handle) => Some(handle),
                Geometry::Lines(_) => None,
            })
            .collect();
        if !overlay.is_empty() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("post_process_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.quad_pipeline);
            pass.set_bind_group(0, &self.shadow_bind_group, &[]);
            for handle in overlay {
                self.draw_mesh(&mut pass, handle, 0);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_lines(&self, pass: &mut wgpu::RenderPass<'_>, handle: LineHandle, instance: u32) {
        let Some(lines) = self.lines.get(&handle) else {
            return;
        };
        pass.set_vertex_buffer(0, lines.vertices.slice(..));
        pass.draw(0..lines.vertex_count, instance..instance + 1);
    }

    fn draw_mesh(&self, pass: &mut wgpu::RenderPass<'_>, handle: MeshHandle, instance: u32) {
        let Some(mesh) = self.meshes.get(&handle) else {
            tracing::trace!("mesh {handle:?} not uploaded, skipping");
            return;
        };
        pass.set_vertex_buffer(0, mesh.vertices.slice(..));
        pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
    }
}

/// Depth target for the light camera.
///
/// Oversized requests are clamped to the device limit; creation runs inside a
/// validation error scope and a failure is logged rather than fatal.
fn create_shadow_target(device: &wgpu::Device, requested: u32) -> ShadowTarget {
    let limit = device.limits().max_texture_dimension_2d;
    let size = requested.clamp(1, limit);
    if size != requested {
        tracing::warn!("shadow map size {requested} clamped to {size}");
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("shadow_depth"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        tracing::error!("Frame buffer not valid! {error}");
    } else {
        tracing::debug!("shadow target {size}x{size} ready");
    }
    ShadowTarget { view, size }
}

fn create_shadow_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("shadow_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_buffer"),
        size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> GpuMesh {
    let vertices: Vec<GpuVertex> = mesh
        .vertices
        .iter()
        .map(|v| GpuVertex {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
        })
        .collect();
    GpuMesh {
        vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        }),
        index_count: mesh.indices.len() as u32,
    }
}

fn upload_lines(device: &wgpu::Device, lines: &LineMesh) -> GpuLines {
    let vertices: Vec<GpuLineVertex> = lines
        .vertices
        .iter()
        .map(|v| GpuLineVertex {
            position: v.position.to_array(),
            color: v.color.to_array(),
        })
        .collect();
    GpuLines {
        vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        vertex_count: vertices.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_layouts_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 24);
        assert_eq!(std::mem::size_of::<GpuLineVertex>(), 24);
        // Six vec4 attributes at locations 2..=7.
        assert_eq!(std::mem::size_of::<InstanceData>(), 6 * 16);
        // Uniform buffers need 16-byte multiples.
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }
}

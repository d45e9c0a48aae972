use std::path::Path;

use bytemuck::{Pod, Zeroable};
use tracing::warn;
use wgpu::*;

use crate::model::{upload_vertices, MeshBuffer, VertexPcu, VertexPcutbn};
use crate::scene::Scene;

// Clear color of the active scene, Rgba8(70, 70, 70) converted to linear.
const SCENE_CLEAR: Color = Color { r: 0.0617, g: 0.0617, b: 0.0617, a: 1.0 };

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct LightingUniform {
    sun_direction: [f32; 3],
    sun_intensity: f32,
    ambient_intensity: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FrameUniform {
    debug_mode: i32,
    time: f32,
    _pad: [f32; 2],
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_uniform_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Reads an image file as RGBA8. A missing or unreadable file is logged and
/// replaced with a 1x1 fallback texel so rendering still works.
fn load_rgba_or_fallback(path: &str, fallback: [u8; 4]) -> (Vec<u8>, u32, u32) {
    if !path.is_empty() && Path::new(path).exists() {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = rgba.dimensions();
                return (rgba.into_raw(), w, h);
            }
            Err(err) => warn!("failed to decode texture \"{path}\": {err}"),
        }
    } else {
        warn!("texture \"{path}\" not found, using fallback texel");
    }
    (fallback.to_vec(), 1, 1)
}

fn create_texture_view(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    pixels: &[u8],
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
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
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_src: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout,
    format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
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
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// Consolidated render state to avoid parameter explosion
pub struct RenderState {
    pub format: TextureFormat,
    pub alpha_mode: CompositeAlphaMode,
    pub width: u32,
    pub height: u32,

    grid_pipeline: RenderPipeline,
    model_pipeline: RenderPipeline,

    grid_mesh: MeshBuffer,
    model_mesh: MeshBuffer,

    camera_buffer: Buffer,
    lighting_buffer: Buffer,
    model_model_buffer: Buffer,
    frame_buffer: Buffer,
    grid_bind_group: BindGroup,
    model_bind_group: BindGroup,
    texture_bind_group: BindGroup,

    // UI
    pub egui_renderer: egui_wgpu::Renderer,
    pub egui_primitives: Option<Vec<egui::ClippedPrimitive>>,
    pub egui_full_output: Option<egui::FullOutput>,
    pub egui_dpr: f32,
}

impl RenderState {
    pub fn new(
        device: &Device,
        queue: &Queue,
        format: TextureFormat,
        alpha_mode: CompositeAlphaMode,
        width: u32,
        height: u32,
        scene: &Scene,
        egui_renderer: egui_wgpu::Renderer,
    ) -> Self {
        let camera_buffer = create_uniform_buffer(device, "camera_buffer", std::mem::size_of::<CameraUniform>() as u64);
        let lighting_buffer = create_uniform_buffer(device, "lighting_buffer", std::mem::size_of::<LightingUniform>() as u64);
        let grid_model_buffer = create_uniform_buffer(device, "grid_model_buffer", std::mem::size_of::<ModelUniform>() as u64);
        let model_model_buffer = create_uniform_buffer(device, "model_model_buffer", std::mem::size_of::<ModelUniform>() as u64);
        let frame_buffer = create_uniform_buffer(device, "frame_buffer", std::mem::size_of::<FrameUniform>() as u64);

        // The grid draws with an identity model transform.
        queue.write_buffer(
            &grid_model_buffer,
            0,
            bytemuck::bytes_of(&ModelUniform { model: glam::Mat4::IDENTITY.to_cols_array_2d() }),
        );

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1), uniform_entry(2), uniform_entry(3)],
        });

        let make_uniform_bind_group = |label: &str, model_buffer: &Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &uniform_layout,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
                    wgpu::BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
                    wgpu::BindGroupEntry { binding: 2, resource: model_buffer.as_entire_binding() },
                    wgpu::BindGroupEntry { binding: 3, resource: frame_buffer.as_entire_binding() },
                ],
            })
        };
        let grid_bind_group = make_uniform_bind_group("grid_bind_group", &grid_model_buffer);
        let model_bind_group = make_uniform_bind_group("model_bind_group", &model_model_buffer);

        // Model textures, with 1x1 fallbacks (white diffuse, flat normal).
        let (diffuse_pixels, dw, dh) =
            load_rgba_or_fallback(&scene.diffuse_map_path(), [255, 255, 255, 255]);
        let diffuse_view = create_texture_view(
            device, queue, "diffuse_texture", &diffuse_pixels, dw, dh,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        let (normal_pixels, nw, nh) =
            load_rgba_or_fallback(&scene.normal_map_path(), [128, 128, 255, 255]);
        let normal_view = create_texture_view(
            device, queue, "normal_texture", &normal_pixels, nw, nh,
            wgpu::TextureFormat::Rgba8Unorm,
        );

        let diffuse_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("diffuse_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let normal_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("normal_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
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
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&diffuse_view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&diffuse_sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(&normal_view) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&normal_sampler) },
            ],
        });

        let grid_pipeline = create_pipeline(
            device,
            "grid_pipeline",
            include_str!("shaders/grid.wgsl"),
            &[&uniform_layout],
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<VertexPcu>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x4 },
                    wgpu::VertexAttribute { offset: 28, shader_location: 2, format: wgpu::VertexFormat::Float32x2 },
                ],
            },
            format,
            wgpu::TextureFormat::Depth32Float,
        );

        let model_pipeline = create_pipeline(
            device,
            "model_pipeline",
            include_str!("shaders/model.wgsl"),
            &[&uniform_layout, &texture_layout],
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<VertexPcutbn>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x4 },
                    wgpu::VertexAttribute { offset: 28, shader_location: 2, format: wgpu::VertexFormat::Float32x2 },
                    wgpu::VertexAttribute { offset: 36, shader_location: 3, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 48, shader_location: 4, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 60, shader_location: 5, format: wgpu::VertexFormat::Float32x3 },
                ],
            },
            format,
            wgpu::TextureFormat::Depth32Float,
        );

        let grid_mesh = upload_vertices(device, &scene.grid_verts, "grid_vertices");
        let model_mesh = upload_vertices(device, &scene.model_verts, "model_vertices");

        Self {
            format,
            alpha_mode,
            width,
            height,
            grid_pipeline,
            model_pipeline,
            grid_mesh,
            model_mesh,
            camera_buffer,
            lighting_buffer,
            model_model_buffer,
            frame_buffer,
            grid_bind_group,
            model_bind_group,
            texture_bind_group,
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: 1.0,
        }
    }

    /// Pushes the per-frame uniforms from the scene to the GPU.
    pub fn update_uniforms(&self, queue: &Queue, scene: &Scene) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: scene.camera().view_proj().to_cols_array_2d(),
            }),
        );
        queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::bytes_of(&LightingUniform {
                sun_direction: scene.sun_direction.to_array(),
                sun_intensity: scene.sun_intensity,
                ambient_intensity: scene.ambient_intensity,
                _pad: [0.0; 3],
            }),
        );
        queue.write_buffer(
            &self.model_model_buffer,
            0,
            bytemuck::bytes_of(&ModelUniform { model: scene.model_to_world.to_cols_array_2d() }),
        );
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform {
                debug_mode: scene.debug_modes.mode,
                time: scene.clock.total_seconds(),
                _pad: [0.0; 2],
            }),
        );
    }

    pub fn draw_frame(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        depth_view: &TextureView,
        is_attract: bool,
    ) {
        let (egui_primitives, egui_full_output) = match (self.egui_primitives.take(), self.egui_full_output.take()) {
            (Some(prim), Some(output)) => (prim, output),
            _ => return, // No UI to render
        };

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.width, self.height],
            pixels_per_point: self.egui_dpr,
        };

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost) => {
                surface.configure(
                    device,
                    &SurfaceConfiguration {
                        usage: TextureUsages::RENDER_ATTACHMENT,
                        format: self.format,
                        width: self.width,
                        height: self.height,
                        present_mode: PresentMode::Fifo,
                        alpha_mode: self.alpha_mode,
                        view_formats: vec![],
                        desired_maximum_frame_latency: 2,
                    },
                );
                surface
                    .get_current_texture()
                    .expect("Failed to acquire frame after reconfigure")
            }
            Err(e) => panic!("Surface error: {e:?}"),
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            // The attract screen only clears to black; the world is drawn
            // once the scene is active.
            let clear = if is_attract { Color::BLACK } else { SCENE_CLEAR };
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(clear),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !is_attract {
                rp.set_pipeline(&self.grid_pipeline);
                rp.set_bind_group(0, &self.grid_bind_group, &[]);
                rp.set_vertex_buffer(0, self.grid_mesh.vertex_buffer.slice(..));
                rp.draw(0..self.grid_mesh.vertex_count, 0..1);

                if self.model_mesh.vertex_count > 0 {
                    rp.set_pipeline(&self.model_pipeline);
                    rp.set_bind_group(0, &self.model_bind_group, &[]);
                    rp.set_bind_group(1, &self.texture_bind_group, &[]);
                    rp.set_vertex_buffer(0, self.model_mesh.vertex_buffer.slice(..));
                    rp.draw(0..self.model_mesh.vertex_count, 0..1);
                }
            }
        }

        // Upload egui textures
        for (id, image_delta) in &egui_full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        // Update egui buffers
        self.egui_renderer
            .update_buffers(device, queue, &mut encoder, &egui_primitives, &screen_descriptor);

        // Render egui overlay
        {
            let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &egui_primitives, &screen_descriptor);
        }

        // Free egui textures
        for id in &egui_full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

//! Headless wgpu backend
//!
//! Renders a [`Frame`] into an offscreen `Rgba8Unorm` target and reads the
//! pixels back. Each draw command gets one slot in a dynamic uniform buffer;
//! wireframe draws use a line-list copy of the index buffer in which triangle
//! index `i` maps to line index `2·i`.

use std::ops::Range;
use std::sync::mpsc;

use image::RgbaImage;
use wgpu::util::DeviceExt;

use super::draw::{line_list_indices, submit, DrawCommand, RenderTarget, Topology};
use crate::error::{Result, SceneError};
use crate::gfx::camera::CameraUniform;
use crate::gfx::frame::{DeskScene, Frame};
use crate::gfx::geometry::IndexRange;
use crate::gfx::lighting::LightUniform;
use crate::gfx::models::ObjectId;
use crate::gfx::resources::TextureResource;
use crate::gfx::scene::vertex::Vertex3D;
use crate::gfx::texture::TextureSlot;
use crate::wgpu_utils::{self, DynamicUniformBuffer, UniformBuffer};

const DEVICE_LABEL: &str = "Desk Headless Device";

/// Device and queue without a surface
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Fails with [`SceneError::UnsupportedContext`] when no adapter exists
    pub async fn request_headless() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SceneError::UnsupportedContext(e.to_string()))?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using adapter {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(DEVICE_LABEL),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            device,
            queue,
            adapter_info,
        })
    }

    pub fn request_headless_blocking() -> Result<Self> {
        pollster::block_on(Self::request_headless())
    }
}

/// Per-frame block. Must match `FrameUniforms` in `desk.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniform {
    camera: CameraUniform,
    light: LightUniform,
}

/// Per-draw block. Must match `DrawUniforms` in `desk.wgsl`; the normal
/// matrix columns are padded to 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniform {
    model_view: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    flags: [f32; 4],
}

impl From<&DrawCommand> for DrawUniform {
    fn from(command: &DrawCommand) -> Self {
        let n = command.normal_matrix;
        let column = |c: cgmath::Vector3<f32>| [c.x, c.y, c.z, 0.0];
        Self {
            model_view: command.model_view.into(),
            normal: [column(n.x), column(n.y), column(n.z)],
            flags: [if command.textured { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

fn padded_bytes_per_row(width: u32) -> u32 {
    wgpu_utils::uniform_buffer::aligned_stride(
        4 * width as u64,
        wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64,
    ) as u32
}

pub struct GpuRenderer {
    context: GpuContext,
    width: u32,
    height: u32,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    line_index_buffer: wgpu::Buffer,

    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    frame_uniform: UniformBuffer<FrameUniform>,
    frame_bind_group: wgpu::BindGroup,
    draw_uniforms: DynamicUniformBuffer<DrawUniform>,
    draw_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    texture_generation: u64,

    color_target: TextureResource,
    depth_target: TextureResource,
}

impl GpuRenderer {
    /// Uploads the scene's packed geometry and builds both pipelines
    pub fn new(context: GpuContext, scene: &DeskScene, width: u32, height: u32) -> Result<Self> {
        let geometry = scene.geometry();
        scene.partitions().validate(geometry.indices.len())?;

        let width = width.max(1);
        let height = height.max(1);
        let device = &context.device;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Desk Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.to_gpu_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Desk Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let line_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Desk Line Index Buffer"),
            contents: bytemuck::cast_slice(&line_list_indices(&geometry.indices)),
            usage: wgpu::BufferUsages::INDEX,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu_utils::rendering_entry(0, wgpu_utils::uniform())],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[wgpu_utils::rendering_entry(
                0,
                wgpu_utils::uniform_dynamic(DynamicUniformBuffer::<DrawUniform>::element_size()),
            )],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Texture Bind Group Layout"),
            entries: &[
                wgpu_utils::rendering_entry(0, wgpu_utils::texture_2d()),
                wgpu_utils::rendering_entry(
                    1,
                    wgpu_utils::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        let frame_uniform = UniformBuffer::<FrameUniform>::new(device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform.binding_resource(),
            }],
        });

        let draw_uniforms = DynamicUniformBuffer::<DrawUniform>::new(device, ObjectId::DRAWABLES.len());
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: draw_uniforms.binding_resource(),
            }],
        });

        let screen = TextureResource::create_from_image(
            device,
            &context.queue,
            scene.texture().image(),
            "Screen Texture",
        );
        let texture_bind_group = create_texture_bind_group(device, &texture_layout, &screen);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Desk Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("desk.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Desk Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let triangle_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            wgpu::PrimitiveTopology::TriangleList,
            "Desk Triangle Pipeline",
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            wgpu::PrimitiveTopology::LineList,
            "Desk Line Pipeline",
        );

        let color_target = TextureResource::create_render_target(device, width, height, "Desk Color Target");
        let depth_target = TextureResource::create_depth_texture(device, width, height, "Desk Depth Target");

        log::info!(
            "GPU renderer ready: {}x{}, {} vertices, {} indices",
            width,
            height,
            geometry.vertex_count(),
            geometry.indices.len()
        );

        Ok(Self {
            width,
            height,
            vertex_buffer,
            index_buffer,
            line_index_buffer,
            triangle_pipeline,
            line_pipeline,
            frame_uniform,
            frame_bind_group,
            draw_uniforms,
            draw_bind_group,
            texture_layout,
            texture_bind_group,
            texture_generation: scene.texture().generation(),
            color_target,
            depth_target,
            context,
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Re-uploads the screen texture when the slot has been swapped since
    /// the last upload
    fn sync_texture(&mut self, texture: &TextureSlot) {
        if texture.generation() == self.texture_generation {
            return;
        }
        let device = &self.context.device;
        let screen = TextureResource::create_from_image(
            device,
            &self.context.queue,
            texture.image(),
            "Screen Texture",
        );
        self.texture_bind_group = create_texture_bind_group(device, &self.texture_layout, &screen);
        self.texture_generation = texture.generation();
        log::debug!("Screen texture re-uploaded (generation {})", self.texture_generation);
    }

    /// Draws the frame and returns the rendered pixels
    pub fn render(&mut self, frame: &Frame, texture: &TextureSlot) -> Result<RgbaImage> {
        self.sync_texture(texture);

        self.frame_uniform.update_content(
            &self.context.queue,
            FrameUniform {
                camera: CameraUniform::new(&frame.projection, self.aspect()),
                light: LightUniform::from(&frame.light),
            },
        );
        let draws: Vec<DrawUniform> = frame.commands.iter().map(DrawUniform::from).collect();
        let written = self.draw_uniforms.write(&self.context.queue, &draws);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Desk Render Encoder"),
            });
        let draw_calls = self.encode(&mut encoder, frame, written);
        log::debug!("GPU pass: {} draw calls", draw_calls);

        self.read_back(encoder)
    }

    fn encode(&self, encoder: &mut wgpu::CommandEncoder, frame: &Frame, written: usize) -> usize {
        let [r, g, b, a] = frame.background;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Desk Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_target.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(2, &self.texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        let mut pass = GpuPass {
            pass: render_pass,
            renderer: self,
            written,
            next_slot: 0,
            skipping: false,
            current: None,
            draw_calls: 0,
        };
        submit(&frame.commands, &mut pass);
        pass.draw_calls
    }

    fn read_back(&self, mut encoder: wgpu::CommandEncoder) -> Result<RgbaImage> {
        let device = &self.context.device;
        let padded = padded_bytes_per_row(self.width);
        let unpadded = 4 * self.width;

        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Desk Readback Buffer"),
            size: padded as u64 * self.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.context.queue.submit(Some(encoder.finish()));

        let slice = output.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver outlives the poll below
            let _ = sender.send(result);
        });
        device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| SceneError::Readback(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| SceneError::Readback(e.to_string()))?
            .map_err(|e| SceneError::Readback(e.to_string()))?;

        let mut pixels = Vec::with_capacity((unpadded * self.height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(padded as usize) {
                pixels.extend_from_slice(&row[..unpadded as usize]);
            }
        }
        output.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| SceneError::Readback("pixel buffer size mismatch".to_string()))
    }
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResource,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Screen Texture Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TextureResource::COLOR_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

struct GpuPass<'p, 'r> {
    pass: wgpu::RenderPass<'p>,
    renderer: &'r GpuRenderer,
    written: usize,
    next_slot: usize,
    /// Set when a command has no uniform slot; its draws are dropped
    skipping: bool,
    current: Option<Topology>,
    draw_calls: usize,
}

impl GpuPass<'_, '_> {
    fn use_topology(&mut self, topology: Topology) {
        if self.current == Some(topology) {
            return;
        }
        let r = self.renderer;
        match topology {
            Topology::TriangleList => {
                self.pass.set_pipeline(&r.triangle_pipeline);
                self.pass
                    .set_index_buffer(r.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            }
            Topology::LineLoop => {
                self.pass.set_pipeline(&r.line_pipeline);
                self.pass
                    .set_index_buffer(r.line_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            }
        }
        self.current = Some(topology);
    }
}

impl RenderTarget for GpuPass<'_, '_> {
    fn bind(&mut self, command: &DrawCommand) {
        if self.next_slot >= self.written {
            log::warn!("No uniform slot left for {}, skipping", command.object);
            self.skipping = true;
            return;
        }
        self.skipping = false;
        let offset = self.renderer.draw_uniforms.offset(self.next_slot);
        self.pass
            .set_bind_group(1, &self.renderer.draw_bind_group, &[offset]);
        self.next_slot += 1;
    }

    /// Line loops are only issued over whole triangles, so they resolve to
    /// the matching span of the line-list buffer.
    fn draw_elements(&mut self, topology: Topology, indices: Range<u32>) {
        if self.skipping || indices.is_empty() {
            return;
        }
        self.use_topology(topology);
        let span = match topology {
            Topology::TriangleList => indices,
            Topology::LineLoop => 2 * indices.start..2 * indices.end,
        };
        self.pass.draw_indexed(span, 0, 0..1);
        self.draw_calls += 1;
    }

    fn draw_wireframe(&mut self, range: IndexRange) {
        self.draw_elements(Topology::LineLoop, range.as_range());
    }
}

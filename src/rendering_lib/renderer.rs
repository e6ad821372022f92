// src/rendering_lib/renderer.rs

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2};
use wgpu::util::DeviceExt;

use rockgen::{HexColor, PolygonShape};

use super::vertex::Vertex;

// Enough for the largest slider value; buffers grow past this on demand.
// Self-crossing outlines add a vertex per crossing.
const INITIAL_MAX_VERTICES: usize = 64;
const INITIAL_MAX_INDICES: usize = INITIAL_MAX_VERTICES * 3;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScreenDimensionsUniform {
    width: f32,
    height: f32,
    _padding1: f32,
    _padding2: f32,
}

/// Where the square drawing canvas lands inside a window of the given size:
/// centered, uniformly scaled to fit.
pub fn canvas_to_screen(canvas_size: f32, screen_width: f32, screen_height: f32) -> Affine2 {
    let scale = (screen_width.min(screen_height) / canvas_size).max(f32::EPSILON);
    let offset = Vec2::new(
        (screen_width - canvas_size * scale) / 2.0,
        (screen_height - canvas_size * scale) / 2.0,
    );
    Affine2::from_scale_angle_translation(Vec2::splat(scale), 0.0, offset)
}

fn clear_color(color: HexColor, srgb_target: bool) -> wgpu::Color {
    let [r, g, b, a] = if srgb_target {
        color.to_linear_rgba()
    } else {
        color.to_unorm_rgba()
    };
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

pub struct Renderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,

    frame_vertices: Vec<Vertex>,
    frame_indices: Vec<u32>,

    screen_uniform_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    srgb_target: bool,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        initial_screen_width: f32,
        initial_screen_height: f32,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Polygon Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let screen_uniform_data = ScreenDimensionsUniform {
            width: initial_screen_width,
            height: initial_screen_height,
            _padding1: 0.0,
            _padding2: 0.0,
        };
        let screen_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Dimensions Uniform Buffer"),
            contents: bytemuck::bytes_of(&screen_uniform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let screen_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("screen_dimensions_bind_group_layout"),
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &screen_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_uniform_buffer.as_entire_binding(),
            }],
            label: Some("screen_dimensions_bind_group"),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Polygon Pipeline Layout"),
            bind_group_layouts: &[&screen_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Polygon Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Winding flips between canvas (y down) and clip space.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let (vertex_buffer, index_buffer) =
            Self::create_geometry_buffers(device, INITIAL_MAX_VERTICES, INITIAL_MAX_INDICES);

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            vertex_capacity: INITIAL_MAX_VERTICES,
            index_capacity: INITIAL_MAX_INDICES,
            frame_vertices: Vec::with_capacity(INITIAL_MAX_VERTICES),
            frame_indices: Vec::with_capacity(INITIAL_MAX_INDICES),
            screen_uniform_buffer,
            screen_bind_group,
            srgb_target: surface_format.is_srgb(),
        }
    }

    fn create_geometry_buffers(
        device: &wgpu::Device,
        max_vertices: usize,
        max_indices: usize,
    ) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Polygon Vertex Buffer"),
            size: (max_vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Polygon Index Buffer"),
            size: (max_indices * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        (vertex_buffer, index_buffer)
    }

    fn add_shape_to_frame(&mut self, shape: &PolygonShape, canvas_to_screen: &Affine2, color: [f32; 4]) {
        let mesh = match shape.tessellate() {
            Ok(mesh) => mesh,
            Err(err) => {
                log::warn!("could not tessellate {}-point shape: {:?}", shape.len(), err);
                return;
            }
        };
        if mesh.is_empty() {
            log::debug!("nothing to fill for {}-point shape", shape.len());
            return;
        }
        for point in &mesh.vertices {
            self.frame_vertices.push(Vertex::from_canvas(point, canvas_to_screen, color));
        }
        self.frame_indices.extend_from_slice(&mesh.indices);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_shape(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        shape: &PolygonShape,
        fill: HexColor,
        background: HexColor,
        canvas_size: f32,
        screen_width: f32,
        screen_height: f32,
    ) {
        let screen_uniform_data = ScreenDimensionsUniform {
            width: screen_width,
            height: screen_height,
            _padding1: 0.0,
            _padding2: 0.0,
        };
        queue.write_buffer(&self.screen_uniform_buffer, 0, bytemuck::bytes_of(&screen_uniform_data));

        self.frame_vertices.clear();
        self.frame_indices.clear();

        let fill_rgba = if self.srgb_target {
            fill.to_linear_rgba()
        } else {
            fill.to_unorm_rgba()
        };
        let transform = canvas_to_screen(canvas_size, screen_width, screen_height);
        self.add_shape_to_frame(shape, &transform, fill_rgba);

        if self.frame_vertices.len() > self.vertex_capacity || self.frame_indices.len() > self.index_capacity {
            let vertex_capacity = self.frame_vertices.len().max(self.vertex_capacity).next_power_of_two();
            let index_capacity = self.frame_indices.len().max(self.index_capacity).next_power_of_two();
            log::debug!(
                "growing polygon buffers to {} vertices, {} indices",
                vertex_capacity,
                index_capacity
            );
            let (vertex_buffer, index_buffer) = Self::create_geometry_buffers(device, vertex_capacity, index_capacity);
            self.vertex_buffer = vertex_buffer;
            self.index_buffer = index_buffer;
            self.vertex_capacity = vertex_capacity;
            self.index_capacity = index_capacity;
        }

        let index_count = self.frame_indices.len();
        if index_count > 0 {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.frame_vertices));
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.frame_indices));
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Polygon Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(background, self.srgb_target)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if index_count > 0 {
            let vertex_bytes = (self.frame_vertices.len() * std::mem::size_of::<Vertex>()) as u64;
            let index_bytes = (index_count * std::mem::size_of::<u32>()) as u64;
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.screen_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes));
            render_pass.set_index_buffer(self.index_buffer.slice(..index_bytes), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..index_count as u32, 0, 0..1);
        }
    }
}

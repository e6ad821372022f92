// src/rendering_lib/vertex.rs

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, DVec2};

use rockgen::Point2;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Maps a canvas-space point into screen pixels.
    pub fn from_canvas(point: &Point2, canvas_to_screen: &Affine2, color: [f32; 4]) -> Self {
        let screen = canvas_to_screen.transform_point2(DVec2::new(point.x, point.y).as_vec2());
        Self {
            position: screen.to_array(),
            color,
        }
    }

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const ASPHALT: [f32; 4] = [0.18, 0.18, 0.2, 1.0];
    pub const SHOULDER: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const LANE_DASH: [f32; 4] = [0.95, 0.85, 0.3, 1.0];
    pub const PLAYER_BODY: [f32; 4] = [0.85, 0.1, 0.12, 1.0];
    pub const OPPONENT_BODY: [f32; 4] = [0.98, 0.8, 0.1, 1.0];
    pub const WINDSHIELD: [f32; 4] = [0.2, 0.3, 0.45, 1.0];
    pub const TIRE: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const HITBOX: [f32; 4] = [0.2, 1.0, 0.4, 0.8];
    pub const GAME_OVER_TINT: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
}

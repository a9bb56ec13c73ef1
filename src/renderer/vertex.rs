//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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
    pub const SKY: [f32; 4] = [0.35, 0.6, 0.95, 1.0];
    pub const GROUND: [f32; 4] = [0.2, 0.55, 0.25, 1.0];
    pub const ROAD: [f32; 4] = [0.22, 0.22, 0.25, 1.0];
    pub const LANE_DASH: [f32; 4] = [0.95, 0.95, 0.9, 1.0];
    pub const CURB_RED: [f32; 4] = [0.85, 0.15, 0.15, 1.0];
    pub const CURB_WHITE: [f32; 4] = [0.95, 0.95, 0.95, 1.0];

    pub const PLAYER_BODY: [f32; 4] = [0.95, 0.8, 0.1, 1.0];
    pub const PLAYER_WINDOW: [f32; 4] = [0.15, 0.2, 0.3, 1.0];
    pub const WHEEL: [f32; 4] = [0.08, 0.08, 0.08, 1.0];
    pub const TAIL_LIGHT: [f32; 4] = [1.0, 0.1, 0.1, 1.0];

    pub const COIN: [f32; 4] = [1.0, 0.82, 0.1, 1.0];
    pub const COIN_GLYPH: [f32; 4] = [0.7, 0.5, 0.0, 1.0];

    pub const WINDOW_LIT: [f32; 4] = [1.0, 0.9, 0.5, 1.0];
    pub const WINDOW_DARK: [f32; 4] = [0.12, 0.12, 0.18, 1.0];

    /// Traffic car body colors
    pub const OBSTACLE_PALETTE: [[f32; 4]; 5] = [
        [0.85, 0.2, 0.2, 1.0],
        [0.2, 0.4, 0.9, 1.0],
        [0.2, 0.75, 0.35, 1.0],
        [0.6, 0.3, 0.8, 1.0],
        [0.95, 0.55, 0.15, 1.0],
    ];

    /// Roadside building colors
    pub const SCENERY_PALETTE: [[f32; 4]; 4] = [
        [0.45, 0.42, 0.4, 1.0],
        [0.55, 0.35, 0.3, 1.0],
        [0.35, 0.38, 0.45, 1.0],
        [0.6, 0.55, 0.45, 1.0],
    ];

    /// Darken (factor < 1) or lighten (factor > 1) a color, keeping alpha
    pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
        [
            (color[0] * factor).clamp(0.0, 1.0),
            (color[1] * factor).clamp(0.0, 1.0),
            (color[2] * factor).clamp(0.0, 1.0),
            color[3],
        ]
    }
}

//! Rendering module
//!
//! The simulation paints through the [`Canvas`] trait. [`ShapeBatch`]
//! tessellates those calls into triangles on the CPU and [`RenderState`]
//! uploads them to WebGPU once per frame.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use pipeline::RenderState;
pub use shapes::ShapeBatch;
pub use vertex::{Vertex, colors};

/// A 2D drawing surface in pixel coordinates (origin top-left, Y down)
pub trait Canvas {
    /// Start a new frame filled with `color`
    fn clear(&mut self, color: [f32; 4]);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]);

    /// Fill a convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]);

    fn fill_ellipse(&mut self, center: Vec2, radius_x: f32, radius_y: f32, color: [f32; 4]);
}

//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::Canvas;
use super::vertex::Vertex;

/// Segments used for ellipses
const ELLIPSE_SEGMENTS: u32 = 24;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (x2, y2) = (x + width, y + height);
    [
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Generate vertices for a filled ellipse
pub fn ellipse(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius_x * theta1.cos(),
            center.y + radius_y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius_x * theta2.cos(),
            center.y + radius_y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Triangle fan over a convex polygon
pub fn convex_polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let anchor = points[0];
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(anchor.x, anchor.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// CPU-side triangle list collected from canvas calls, in pixel space
#[derive(Debug, Clone)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
    clear_color: [f32; 4],
}

impl Default for ShapeBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(4096),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl Canvas for ShapeBatch {
    fn clear(&mut self, color: [f32; 4]) {
        self.vertices.clear();
        self.clear_color = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.vertices.extend_from_slice(&rect(x, y, width, height, color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        self.vertices.extend(convex_polygon(points, color));
    }

    fn fill_ellipse(&mut self, center: Vec2, radius_x: f32, radius_y: f32, color: [f32; 4]) {
        if radius_x <= 0.0 || radius_y <= 0.0 {
            return;
        }
        self.vertices
            .extend(ellipse(center, radius_x, radius_y, color, ELLIPSE_SEGMENTS));
    }
}

//! Vertex types for 2D rendering
//!
//! [`VertexBatch`] is a [`Surface`] that tessellates everything into a flat
//! triangle list, ready to upload to a GPU vertex buffer as raw bytes. Text
//! can't be tessellated here, so it is collected as labels for the host.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{Color, Surface, shapes};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Byte stride of one vertex
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Text the host should draw on top of the triangles
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub pos: Vec2,
    pub font_px: f32,
    pub color: Color,
}

/// Segments per full circle
const CIRCLE_SEGMENTS: u32 = 32;
/// Glow halo opacity
const GLOW_ALPHA: f32 = 0.35;
const STROKE_WIDTH: f32 = 1.0;

/// Triangle-list surface
#[derive(Debug, Clone)]
pub struct VertexBatch {
    pub vertices: Vec<Vertex>,
    pub labels: Vec<TextLabel>,
    fill: Color,
    stroke: Color,
    shadow: Option<(f32, Color)>,
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            labels: Vec::new(),
            fill: Color::BLACK,
            stroke: Color::BLACK,
            shadow: None,
        }
    }
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex data as bytes for a buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    fn fill_rgba(&self) -> [f32; 4] {
        self.fill.to_array()
    }

    /// Halo color while a shadow is set
    fn halo(&self) -> Option<(f32, [f32; 4])> {
        self.shadow
            .map(|(blur, color)| (blur, color.with_alpha(color.a * GLOW_ALPHA).to_array()))
    }
}

impl Surface for VertexBatch {
    fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
        self.shadow = None;
    }

    fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.shadow = (blur > 0.0).then_some((blur, color));
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2) {
        if let Some((blur, halo)) = self.halo() {
            let spread = Vec2::splat(blur / 2.0);
            self.vertices
                .extend(shapes::rect(pos - spread, size + spread * 2.0, halo));
        }
        let color = self.fill_rgba();
        self.vertices.extend(shapes::rect(pos, size, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        if let Some((blur, halo)) = self.halo() {
            self.vertices
                .extend(shapes::circle(center, radius + blur / 2.0, halo, CIRCLE_SEGMENTS));
        }
        let color = self.fill_rgba();
        self.vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    fn fill_path(&mut self, points: &[Vec2]) {
        let color = self.fill_rgba();
        self.vertices.extend(shapes::polygon(points, color));
    }

    fn stroke_path(&mut self, points: &[Vec2]) {
        let color = self.stroke.to_array();
        self.vertices
            .extend(shapes::polyline(points, STROKE_WIDTH, color));
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font_px: f32) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            pos,
            font_px,
            color: self.fill,
        });
    }
}

//! Shape generation for 2D primitives
//!
//! Pixel sprites, brick decorations and the triangle tessellation used by
//! [`super::VertexBatch`].

use glam::Vec2;
use std::f32::consts::PI;

use super::Surface;
use super::vertex::Vertex;
pub use crate::sim::layout::INVADER_MATRIX as BONUS_SPRITE;

/// Falling heart (12 rows x 11 columns)
pub const HEART_SPRITE: [[u8; 11]; 12] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 0, 0, 0, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 0, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Top-left corners of every lit pixel in a sprite
pub fn sprite_pixels<const W: usize>(sprite: &[[u8; W]], origin: Vec2, pixel: f32) -> Vec<Vec2> {
    sprite
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &lit)| lit == 1)
                .map(move |(col, _)| origin + Vec2::new(col as f32, row as f32) * pixel)
        })
        .collect()
}

/// Paint a sprite with the current fill, one square per lit pixel
pub fn fill_sprite<const W: usize>(
    surface: &mut dyn Surface,
    sprite: &[[u8; W]],
    origin: Vec2,
    pixel: f32,
) {
    for pos in sprite_pixels(sprite, origin, pixel) {
        surface.fill_rect(pos, Vec2::splat(pixel));
    }
}

/// Point in a box given as fractions of its size
fn at(pos: Vec2, size: Vec2, fx: f32, fy: f32) -> Vec2 {
    pos + size * Vec2::new(fx, fy)
}

/// Five-point star drawn on golden bricks
pub fn star(pos: Vec2, size: Vec2) -> [Vec2; 5] {
    [
        at(pos, size, 0.5, 0.2),
        at(pos, size, 0.6, 0.8),
        at(pos, size, 0.2, 0.3),
        at(pos, size, 0.8, 0.3),
        at(pos, size, 0.4, 0.8),
    ]
}

/// Horizontal double arrow drawn on moving bricks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleArrow {
    pub shaft: [Vec2; 2],
    pub left: [Vec2; 3],
    pub right: [Vec2; 3],
}

pub fn double_arrow(pos: Vec2, size: Vec2) -> DoubleArrow {
    DoubleArrow {
        shaft: [at(pos, size, 0.3, 0.5), at(pos, size, 0.7, 0.5)],
        left: [
            at(pos, size, 0.3, 0.4),
            at(pos, size, 0.4, 0.5),
            at(pos, size, 0.3, 0.6),
        ],
        right: [
            at(pos, size, 0.7, 0.4),
            at(pos, size, 0.6, 0.5),
            at(pos, size, 0.7, 0.6),
        ],
    }
}

/// Two triangles covering an axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Triangle fan over a polygon, anchored at its first point
///
/// Exact for convex shapes; the star's overlapping fan reproduces a
/// nonzero-winding fill closely enough for a decoration.
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let Some((&anchor, rest)) = points.split_first() else {
        return Vec::new();
    };
    rest.windows(2)
        .flat_map(|pair| {
            [
                Vertex::new(anchor.x, anchor.y, color),
                Vertex::new(pair[0].x, pair[0].y, color),
                Vertex::new(pair[1].x, pair[1].y, color),
            ]
        })
        .collect()
}

/// Quads of the given width along a polyline
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6);

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        vertices.push(Vertex::new(v1a.x, v1a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2a.x, v2a.y, color));

        vertices.push(Vertex::new(v2a.x, v2a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2b.x, v2b.y, color));
    }

    vertices
}

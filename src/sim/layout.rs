//! Brick layout generation
//!
//! Three factories: a random grid, a heart-shaped matrix and an
//! invader-shaped matrix. All randomness comes from the caller's RNG so a
//! seeded game always builds the same layouts.

use glam::Vec2;
use rand::Rng;

use super::entities::{Brick, BrickKind};
use super::state::Bounds;
use crate::tuning::Tuning;

/// Heart formation (8 rows x 10 columns)
pub const HEART_MATRIX: [[u8; 10]; 8] = [
    [0, 0, 1, 1, 0, 0, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 0, 0, 0],
];

/// Invader formation (8 x 8); the bottom row holds the cannons
pub const INVADER_MATRIX: [[u8; 8]; 8] = [
    [0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 0, 1, 1, 0, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 1, 0, 0, 1, 0, 0],
    [0, 1, 0, 1, 1, 0, 1, 0],
    [1, 0, 1, 0, 0, 1, 0, 1],
];

/// Heart cells are this many times smaller than a full-width column
const HEART_CELL_DIVISOR: f32 = 8.0;
/// Invader cells are this many times smaller than a full-width column
const INVADER_CELL_DIVISOR: f32 = 4.0;

/// Weighted variant draw: 50% Plain, 25% Golden, 25% Silver
pub fn random_variant<R: Rng + ?Sized>(rng: &mut R) -> BrickKind {
    let roll: f32 = rng.random();
    if roll < 0.5 {
        BrickKind::Plain
    } else if roll < 0.75 {
        BrickKind::Golden
    } else {
        BrickKind::silver()
    }
}

/// Top-left corner of a grid cell
fn cell_origin(row: usize, col: usize, size: Vec2, tuning: &Tuning) -> Vec2 {
    Vec2::new(
        col as f32 * (size.x + tuning.brick_margin),
        row as f32 * (size.y + tuning.brick_margin) + tuning.brick_top,
    )
}

/// Random grid with one Moving brick hidden in the last row
pub fn build_random_layout<R: Rng + ?Sized>(
    bounds: Bounds,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Brick> {
    let rows = rng.random_range(tuning.rows.min..=tuning.rows.max) as usize;
    let cols = rng.random_range(tuning.cols.min..=tuning.cols.max) as usize;
    let size = Vec2::new(
        bounds.width / cols as f32 - tuning.brick_margin,
        tuning.brick_height,
    );

    let mut bricks = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let kind = random_variant(rng);
            bricks.push(Brick::new(cell_origin(row, col, size, tuning), size, kind));
        }
    }

    let moving_col = rng.random_range(0..cols);
    let index = (rows - 1) * cols + moving_col;
    let pos = bricks[index].pos;
    bricks[index] = Brick::new(pos, size, BrickKind::Moving);

    log::debug!("Random layout: {rows}x{cols}, moving brick at column {moving_col}");
    bricks
}

/// Heart formation; top and bottom rows are Silver
pub fn build_heart_layout<R: Rng + ?Sized>(
    bounds: Bounds,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Brick> {
    let columns = HEART_MATRIX[0].len() as f32;
    let cell = (bounds.width / columns - tuning.brick_margin) / HEART_CELL_DIVISOR;
    let last_row = HEART_MATRIX.len() - 1;

    build_matrix_layout(&HEART_MATRIX, cell, tuning, rng, |row, rng| {
        if row == 0 || row == last_row {
            BrickKind::silver()
        } else {
            random_variant(rng)
        }
    })
}

/// Invader formation; the bottom row is Cannons
pub fn build_invader_layout<R: Rng + ?Sized>(
    bounds: Bounds,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Brick> {
    let columns = INVADER_MATRIX[0].len() as f32;
    let cell = (bounds.width / columns - tuning.brick_margin) / INVADER_CELL_DIVISOR;
    let last_row = INVADER_MATRIX.len() - 1;

    build_matrix_layout(&INVADER_MATRIX, cell, tuning, rng, |row, rng| {
        if row == last_row {
            BrickKind::cannon()
        } else {
            random_variant(rng)
        }
    })
}

/// Square bricks on every filled matrix cell, skipping zeros
fn build_matrix_layout<const W: usize, R, F>(
    matrix: &[[u8; W]],
    cell: f32,
    tuning: &Tuning,
    rng: &mut R,
    mut kind_for_row: F,
) -> Vec<Brick>
where
    R: Rng + ?Sized,
    F: FnMut(usize, &mut R) -> BrickKind,
{
    let size = Vec2::splat(cell);
    let mut bricks = Vec::new();
    for (row, cells) in matrix.iter().enumerate() {
        for (col, &filled) in cells.iter().enumerate() {
            if filled == 0 {
                continue;
            }
            let kind = kind_for_row(row, &mut *rng);
            bricks.push(Brick::new(cell_origin(row, col, size, tuning), size, kind));
        }
    }
    bricks
}

//! Shared helpers for building boards and painted frames in tests.

use std::collections::HashMap;

use image::RgbImage;
use ndarray::Array2;

use crate::*;

pub(crate) fn board_from_rows(rows: &[&[Cell]]) -> Board {
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());
    let mut cells = Array2::from_elem((height, width), Cell::Unknown);
    for (row, row_cells) in rows.iter().enumerate() {
        for (col, &cell) in row_cells.iter().enumerate() {
            cells[[row, col]] = cell;
        }
    }
    Board::new(cells)
}

/// Paints synthetic frames in the classic geometry, one 16 px block per
/// cell, for feeding the classifier without a real capture.
pub(crate) struct FramePainter {
    pub frame: RgbImage,
    geometry: CellGeometry,
    // Next free interior slot per cell, so successive `put_interior` calls
    // never overwrite each other.
    cursors: HashMap<(u32, u32), u32>,
}

impl FramePainter {
    /// Revealed-cell face color of the classic theme; not declared by the
    /// palette, so it never matches any classification rule.
    pub const FACE: Rgb = [192, 192, 192];

    pub fn new(rows: u32, cols: u32) -> Self {
        let geometry = CellGeometry::CLASSIC;
        Self {
            frame: RgbImage::new(cols * geometry.cell_px, rows * geometry.cell_px),
            geometry,
            cursors: HashMap::new(),
        }
    }

    pub fn single_cell() -> Self {
        Self::new(1, 1)
    }

    /// Fills the whole block of a cell, border included.
    pub fn fill_cell(&mut self, row: u32, col: u32, color: Rgb) {
        for y in 0..self.geometry.cell_px {
            for x in 0..self.geometry.cell_px {
                self.set_px(row, col, x, y, color);
            }
        }
        self.cursors.remove(&(row, col));
    }

    /// Paints `n` pixels of `color` into the cell's interior sampling
    /// region, at slots no earlier call used.
    pub fn put_interior(&mut self, row: u32, col: u32, color: Rgb, n: u32) {
        let inner = self.geometry.cell_px - 2 * self.geometry.border_px;
        let cursor = self.cursors.entry((row, col)).or_insert(0);
        for _ in 0..n {
            let x = self.geometry.border_px + *cursor % inner;
            let y = self.geometry.border_px + *cursor / inner;
            assert!(y < self.geometry.cell_px - self.geometry.border_px, "interior is full");
            *cursor += 1;
            let (x0, y0) = (col * self.geometry.cell_px, row * self.geometry.cell_px);
            self.frame.put_pixel(x0 + x, y0 + y, image::Rgb(color));
        }
    }

    /// Sets one pixel at block-relative `(x, y)` of a cell.
    pub fn set_px(&mut self, row: u32, col: u32, x: u32, y: u32, color: Rgb) {
        let x0 = col * self.geometry.cell_px;
        let y0 = row * self.geometry.cell_px;
        self.frame.put_pixel(x0 + x, y0 + y, image::Rgb(color));
    }
}

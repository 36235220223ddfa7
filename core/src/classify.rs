use image::RgbImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Pixel layout of one rendered cell: an outer block of `cell_px` per side
/// with a `border_px` inset on each side excluded from color sampling.
///
/// Theme-specific, supplied by the embedding application alongside the
/// [`Palette`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellGeometry {
    pub cell_px: u32,
    pub border_px: u32,
}

impl CellGeometry {
    /// The classic 16 px cell with a 2 px border.
    pub const CLASSIC: Self = Self {
        cell_px: 16,
        border_px: 2,
    };

    pub fn validate(self) -> Result<()> {
        if self.cell_px == 0 || self.border_px * 2 >= self.cell_px {
            return Err(BotError::DegenerateGeometry {
                cell_px: self.cell_px,
                border_px: self.border_px,
            });
        }
        Ok(())
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Classifies a captured frame into a typed board.
///
/// The frame must measure a whole number of cells in both axes; anything
/// else is a structural mismatch between capture and geometry and comes back
/// as [`BotError::FrameGeometry`] rather than a best-effort board. Pure:
/// the same frame always classifies to the same board.
pub fn classify_frame(
    frame: &RgbImage,
    geometry: CellGeometry,
    palette: &Palette,
) -> Result<Board> {
    geometry.validate()?;

    let (width, height) = frame.dimensions();
    if width % geometry.cell_px != 0 || height % geometry.cell_px != 0 {
        return Err(BotError::FrameGeometry {
            width,
            height,
            cell_px: geometry.cell_px,
        });
    }

    let rows = (height / geometry.cell_px) as usize;
    let cols = (width / geometry.cell_px) as usize;
    if Coord::try_from(rows).is_err() || Coord::try_from(cols).is_err() {
        return Err(BotError::BoardTooLarge { rows, cols });
    }

    let mut counts = ColorCounts::for_palette(palette);
    let mut cells = Array2::from_elem((rows, cols), Cell::Unknown);
    for ((row, col), cell) in cells.indexed_iter_mut() {
        *cell = classify_cell(
            frame,
            row as u32 * geometry.cell_px,
            col as u32 * geometry.cell_px,
            geometry,
            palette,
            &mut counts,
        );
    }

    Ok(Board::new(cells))
}

/// Classifies the cell block whose top-left pixel is `(x0, y0)`.
///
/// Rule order is a contract, not an implementation detail. The classic theme
/// reuses the ink color for digit 7 and the flag color for digit 3, so the
/// flag test must run before anything else, the mine test must run before
/// the digit scan, and the digit scan must go in `1..=8` order.
fn classify_cell(
    frame: &RgbImage,
    y0: u32,
    x0: u32,
    geometry: CellGeometry,
    palette: &Palette,
    counts: &mut ColorCounts,
) -> Cell {
    counts.clear();
    for y in geometry.border_px..geometry.cell_px - geometry.border_px {
        for x in geometry.border_px..geometry.cell_px - geometry.border_px {
            counts.record(frame.get_pixel(x0 + x, y0 + y).0);
        }
    }

    if counts.contains(palette.ink) && counts.contains(palette.flag) {
        return Cell::Flag;
    }

    // The probe pixel sits on the cell's outer border, outside the counted
    // interior: an unrevealed cell renders its background highlight there.
    if frame.get_pixel(x0, y0).0 == palette.background {
        return Cell::Unknown;
    }

    if counts.contains(palette.ink) && counts.contains(palette.background) {
        return Cell::Mine;
    }

    for (index, &digit_color) in palette.digits.iter().enumerate() {
        if counts.contains(digit_color) {
            return Cell::Number(index as u8 + 1);
        }
    }

    // A revealed cell matching no declared color is a plain empty cell.
    Cell::Empty
}

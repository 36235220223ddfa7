use core::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Terminal state of a game, as far as the bot can observe it.
///
/// A board with no `Unknown` cells left reports `Won` even though the
/// observation alone cannot distinguish a genuine win from other fully
/// resolved states; that reporting simplification is deliberate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Fully classified grid for one capture.
///
/// Rebuilt wholesale every iteration from a fresh frame and discarded
/// afterwards; the only mutation it ever sees is [`Board::apply_flags`],
/// which folds the previous iteration's deductions back in, because a fresh
/// classification cannot tell a flagged-but-unrevealed mine from `Unknown`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new(cells: Array2<Cell>) -> Self {
        Self { cells }
    }

    /// `(rows, cols)` of the grid.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().expect("row count fits a coordinate"),
            cols.try_into().expect("column count fits a coordinate"),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    /// Cell at `coords`.
    ///
    /// Panics when `coords` is out of bounds; callers iterate within
    /// [`Board::size`].
    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    /// All cells with their coordinates, row-major.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells.indexed_iter().map(|((row, col), &cell)| {
            (
                (row as Coord, col as Coord),
                cell,
            )
        })
    }

    /// Re-applies flags deduced in earlier iterations onto a freshly
    /// classified grid.
    ///
    /// Only `Unknown` cells accept a carried flag. A flag landing anywhere
    /// else means the fresh observation already resolved that cell, and the
    /// observation wins.
    pub fn apply_flags(&mut self, flags: &[Coord2]) {
        for &coords in flags {
            match self.cells.get_mut(coords.to_nd_index()) {
                Some(cell @ Cell::Unknown) => *cell = Cell::Flag,
                Some(Cell::Flag) => {}
                Some(cell) => {
                    log::warn!("carried flag at {coords:?} lands on {cell:?}, dropping it");
                }
                None => {
                    log::warn!("carried flag at {coords:?} is out of bounds, dropping it");
                }
            }
        }
    }

    /// Terminal check: lost as soon as any `Mine` is visible, won once no
    /// `Unknown` cell remains. A zero-cell board is not over.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.cells.is_empty() {
            return None;
        }
        let mut unknown = 0usize;
        for cell in &self.cells {
            match cell {
                Cell::Mine => return Some(Outcome::Lost),
                Cell::Unknown => unknown += 1,
                _ => {}
            }
        }
        (unknown == 0).then_some(Outcome::Won)
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

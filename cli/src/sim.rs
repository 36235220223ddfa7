//! In-process game for exercising the solver without a real screen.
//!
//! Renders its state as frames in the exact pixel dialect the classifier
//! reads, and consumes moves through the actuator seam, so the solver cannot
//! tell it from a captured window.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use image::RgbImage;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweepbot_core::{
    Actuator, Capture, CellGeometry, Coord2, MoveKind, Palette, Result, Rgb, ToNdIndex, neighbors,
};

/// Revealed-cell face color of the classic theme. Deliberately absent from
/// the palette: it must match no classification rule.
const FACE: Rgb = [192, 192, 192];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SimCell {
    Hidden,
    Revealed(u8),
    Flagged,
    Blasted,
}

pub struct SimGame {
    mines: Array2<bool>,
    state: Array2<SimCell>,
    geometry: CellGeometry,
    palette: Palette,
}

impl SimGame {
    /// A game with `mine_count` mines placed by a seeded generator. The
    /// placement ignores where the first move will land; an unlucky opening
    /// loses, exactly like the classic game.
    pub fn new(rows: u16, cols: u16, mine_count: u32, seed: u64) -> Self {
        let (rows, cols) = (usize::from(rows), usize::from(cols));
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut mines = Array2::from_elem((rows, cols), false);
        for index in rand::seq::index::sample(&mut rng, rows * cols, mine_count as usize) {
            mines[[index / cols, index % cols]] = true;
        }
        Self::from_mines(mines)
    }

    /// A game with an explicit mine layout.
    pub fn from_mines(mines: Array2<bool>) -> Self {
        let state = Array2::from_elem(mines.dim(), SimCell::Hidden);
        Self {
            mines,
            state,
            geometry: CellGeometry::CLASSIC,
            palette: Palette::classic(),
        }
    }

    /// Renders with a non-classic skin. The solver must be handed the same
    /// theme or classification will see garbage.
    ///
    /// Rejects geometry that leaves no interior to paint marks into, before
    /// `render` can underflow on it.
    pub fn themed(mut self, geometry: CellGeometry, palette: Palette) -> Result<Self> {
        geometry.validate()?;
        self.geometry = geometry;
        self.palette = palette;
        Ok(self)
    }

    fn bounds(&self) -> Coord2 {
        let (rows, cols) = self.mines.dim();
        (rows as u16, cols as u16)
    }

    fn adjacent_mines(&self, coords: Coord2) -> u8 {
        neighbors(coords, self.bounds())
            .filter(|&n| self.mines[n.to_nd_index()])
            .count() as u8
    }

    /// Reveals a cell. Flagged and already revealed cells are left alone; a
    /// mine blasts; a zero-adjacency cell flood-opens its neighborhood.
    pub fn reveal(&mut self, coords: Coord2) {
        if self.state[coords.to_nd_index()] != SimCell::Hidden {
            return;
        }
        if self.mines[coords.to_nd_index()] {
            self.state[coords.to_nd_index()] = SimCell::Blasted;
            return;
        }

        let mut queue = VecDeque::from([coords]);
        while let Some(coords) = queue.pop_front() {
            if self.state[coords.to_nd_index()] != SimCell::Hidden {
                continue;
            }
            let adjacent = self.adjacent_mines(coords);
            self.state[coords.to_nd_index()] = SimCell::Revealed(adjacent);
            if adjacent == 0 {
                queue.extend(
                    neighbors(coords, self.bounds()).filter(|&n| !self.mines[n.to_nd_index()]),
                );
            }
        }
    }

    pub fn flag(&mut self, coords: Coord2) {
        if let Some(cell @ SimCell::Hidden) = self.state.get_mut(coords.to_nd_index()) {
            *cell = SimCell::Flagged;
        }
    }

    /// Paints the full board as one frame, one block per cell.
    pub fn render(&self) -> RgbImage {
        let (rows, cols) = self.state.dim();
        let px = self.geometry.cell_px;
        let mut frame = RgbImage::new(cols as u32 * px, rows as u32 * px);

        for ((row, col), &cell) in self.state.indexed_iter() {
            let x0 = col as u32 * px;
            let y0 = row as u32 * px;
            let (fill, marks): (Rgb, &[Rgb]) = match cell {
                SimCell::Hidden => (self.palette.background, &[]),
                SimCell::Flagged => (
                    self.palette.background,
                    &[self.palette.ink, self.palette.flag],
                ),
                SimCell::Revealed(0) => (FACE, &[]),
                SimCell::Revealed(n) => (FACE, &[self.palette.digits[usize::from(n) - 1]]),
                SimCell::Blasted => (FACE, &[self.palette.ink, self.palette.background]),
            };

            for y in 0..px {
                for x in 0..px {
                    frame.put_pixel(x0 + x, y0 + y, image::Rgb(fill));
                }
            }
            // Marks go into the sampled interior, past the border inset.
            let inner = px - 2 * self.geometry.border_px;
            for (slot, &mark) in marks.iter().enumerate() {
                let x = self.geometry.border_px + slot as u32 % inner;
                let y = self.geometry.border_px + slot as u32 / inner;
                frame.put_pixel(x0 + x, y0 + y, image::Rgb(mark));
            }
        }
        frame
    }
}

/// Shared handle to one game, cloned into both collaborator seats of the
/// driver so captures and acts hit the same state.
#[derive(Clone)]
pub struct SharedSim(Rc<RefCell<SimGame>>);

impl SharedSim {
    pub fn new(game: SimGame) -> Self {
        Self(Rc::new(RefCell::new(game)))
    }
}

impl Capture for SharedSim {
    fn capture(&mut self) -> Result<RgbImage> {
        Ok(self.0.borrow().render())
    }
}

impl Actuator for SharedSim {
    fn act(&mut self, coords: Coord2, kind: MoveKind) {
        let mut game = self.0.borrow_mut();
        match kind {
            MoveKind::Reveal => game.reveal(coords),
            MoveKind::Flag => game.flag(coords),
        }
    }
}

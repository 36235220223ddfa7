use rand::{Rng, RngExt};

use crate::*;

/// Picks an unrevealed cell to guess at when deduction has nothing to offer.
///
/// Rejection sampling with a budget of one draw per board cell: the first
/// `Unknown` cell drawn wins. If the budget runs out the final draw is
/// returned as-is, without checking its state, so on boards with very few
/// unknown cells left the guess can land on a resolved cell; acting on a
/// resolved cell is harmless. Only a zero-cell board yields `None`.
pub fn random_unknown<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Coord2> {
    let (rows, cols) = board.size();
    if rows == 0 || cols == 0 {
        return None;
    }

    let mut draw = || (rng.random_range(0..rows), rng.random_range(0..cols));
    let mut coords = draw();
    for _ in 1..mult(rows, cols) {
        if board.cell(coords).is_unknown() {
            break;
        }
        coords = draw();
    }
    Some(coords)
}

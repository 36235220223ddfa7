use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Moves provable from one board snapshot.
///
/// Each set is sorted and deduplicated, but the two are not guaranteed
/// disjoint: distinct numbered cells can pull the same coordinate into both
/// sets on an inconsistent board. The driver resolves that by delivering
/// every reveal before any flag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSets {
    /// Cells certain to be safe to reveal.
    pub reveal: Vec<Coord2>,
    /// Cells certain to be mines.
    pub flag: Vec<Coord2>,
}

impl MoveSets {
    pub fn is_empty(&self) -> bool {
        self.reveal.is_empty() && self.flag.is_empty()
    }
}

/// Single deduction pass over a board snapshot.
///
/// For every `Number(n)` cell the Moore neighborhood is partitioned into
/// unknown and flagged neighbors, then two local rules fire independently:
///
/// - certain-mine: `unknown + flagged == n` means every unknown neighbor is
///   a mine;
/// - certain-safe: `flagged == n` means every unknown neighbor is safe.
///
/// One call is one pass; no fixed point is sought. Chained deductions still
/// happen, but across driver iterations, because flags found here are folded
/// into the next freshly classified board before the next pass.
pub fn deduce(board: &Board) -> MoveSets {
    let bounds = board.size();
    let mut moves = MoveSets::default();

    for (coords, cell) in board.indexed_iter() {
        let Some(n) = cell.number() else {
            continue;
        };

        let mut unknown: SmallVec<[Coord2; 8]> = SmallVec::new();
        let mut flagged = 0usize;
        for neighbor in neighbors(coords, bounds) {
            match board.cell(neighbor) {
                Cell::Unknown => unknown.push(neighbor),
                Cell::Flag => flagged += 1,
                _ => {}
            }
        }

        let n = usize::from(n);
        if unknown.len() + flagged == n {
            moves.flag.extend_from_slice(&unknown);
        }
        if flagged == n {
            moves.reveal.extend_from_slice(&unknown);
        }
    }

    sort_dedup(&mut moves.reveal);
    sort_dedup(&mut moves.flag);
    moves
}

pub(crate) fn sort_dedup(coords: &mut Vec<Coord2>) {
    coords.sort_unstable();
    coords.dedup();
}

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u16;

/// Count type used for cell totals and attempt budgets.
pub type CellCount = u32;

/// Grid coordinates `(row, col)`.
///
/// The derived tuple ordering is lexicographic by `(row, col)`, which is what
/// the move-set deduplication relies on.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    a as CellCount * b as CellCount
}

const DELTAS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Bounds-clipped Moore neighborhood of `center` on a grid of `bounds` size,
/// yielded in row-major order.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    DELTAS.into_iter().filter_map(move |(dr, dc)| {
        let row = center.0.checked_add_signed(dr)?;
        let col = center.1.checked_add_signed(dc)?;
        (row < bounds.0 && col < bounds.1).then_some((row, col))
    })
}

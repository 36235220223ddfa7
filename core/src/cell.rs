use serde::{Deserialize, Serialize};

/// Classified state of one grid position.
///
/// Exactly one state holds per cell per capture. `Number` carries the
/// adjacent-mine count, strictly in `1..=8`; a revealed zero-count cell is
/// `Empty`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Unrevealed and unflagged.
    Unknown,
    /// Revealed with no adjacent mines.
    Empty,
    /// Revealed with `1..=8` adjacent mines.
    Number(u8),
    /// A revealed mine. Observing one means the game is lost.
    Mine,
    /// Marked as a certain mine by an earlier deduction, still unrevealed.
    Flag,
}

impl Cell {
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Adjacent-mine count for `Number` cells, `None` for everything else.
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Console glyph, matching the game's own digit rendering.
    pub const fn glyph(self) -> char {
        match self {
            Self::Unknown => ' ',
            Self::Empty => '0',
            Self::Number(n) => (b'0' + n) as char,
            Self::Mine => '*',
            Self::Flag => 'F',
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Unknown
    }
}

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// 24-bit color as sampled from a captured frame.
pub type Rgb = [u8; 3];

/// Theme-specific mapping from rendered colors to meaning, supplied by the
/// embedding application.
///
/// The set of colors is closed and pre-declared; nothing is learned at
/// runtime. Color reuse across roles is allowed and load-bearing: in the
/// classic theme the digit-7 color equals `ink` and the digit-3 color equals
/// `flag`, which is why the classifier's rule order is a contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Fill of an unrevealed cell; also what the top-left probe pixel of an
    /// unrevealed cell renders as.
    pub background: Rgb,
    /// Glyph and border ink.
    pub ink: Rgb,
    /// Flag pennant color.
    pub flag: Rgb,
    /// One color per digit `1..=8`, scanned in index order.
    pub digits: [Rgb; 8],
}

impl Palette {
    /// The classic Win32 theme.
    pub const fn classic() -> Self {
        const BLACK: Rgb = [0, 0, 0];
        const WHITE: Rgb = [255, 255, 255];
        const RED: Rgb = [255, 0, 0];
        const GREEN: Rgb = [0, 128, 0];
        const BLUE: Rgb = [0, 0, 255];
        const TEAL: Rgb = [0, 128, 128];
        const MAROON: Rgb = [128, 0, 0];
        const NAVY: Rgb = [0, 0, 128];
        const GREY: Rgb = [128, 128, 128];

        Self {
            background: WHITE,
            ink: BLACK,
            flag: RED,
            digits: [BLUE, GREEN, RED, NAVY, MAROON, TEAL, BLACK, GREY],
        }
    }

    /// Every color the palette declares, deduplicated.
    fn distinct_colors(&self) -> SmallVec<[Rgb; 11]> {
        let mut colors: SmallVec<[Rgb; 11]> = SmallVec::new();
        for color in [self.background, self.ink, self.flag]
            .into_iter()
            .chain(self.digits)
        {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
        colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}

/// Occurrence counts for one cell's interior samples.
///
/// Keyed by the closed set of colors its palette declares; samples of any
/// other color are ignored, so the table never grows past the palette size.
#[derive(Clone, Debug)]
pub struct ColorCounts {
    colors: SmallVec<[Rgb; 11]>,
    counts: SmallVec<[u32; 11]>,
}

impl ColorCounts {
    pub fn for_palette(palette: &Palette) -> Self {
        let colors = palette.distinct_colors();
        let counts = smallvec::smallvec![0; colors.len()];
        Self { colors, counts }
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    pub fn record(&mut self, color: Rgb) {
        if let Some(slot) = self.colors.iter().position(|&c| c == color) {
            self.counts[slot] += 1;
        }
    }

    /// Whether at least one sample of `color` was recorded. Always false for
    /// colors the palette does not declare.
    pub fn contains(&self, color: Rgb) -> bool {
        self.count(color) > 0
    }

    pub fn count(&self, color: Rgb) -> u32 {
        self.colors
            .iter()
            .position(|&c| c == color)
            .map_or(0, |slot| self.counts[slot])
    }
}

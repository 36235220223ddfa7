use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    #[error("frame is {width}x{height} px, not a whole number of {cell_px} px cells")]
    FrameGeometry { width: u32, height: u32, cell_px: u32 },
    #[error("cell geometry {cell_px} px with {border_px} px border leaves no interior to sample")]
    DegenerateGeometry { cell_px: u32, border_px: u32 },
    #[error("board of {rows}x{cols} cells exceeds the supported coordinate range")]
    BoardTooLarge { rows: usize, cols: usize },
    #[error("capture failed: {0}")]
    Capture(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

use thiserror::Error;

use crate::types::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("kind=out_of_bounds: ({x}, {y}) is outside the 8x8 board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("kind=illegal_move: {reason}")]
    IllegalMove { reason: &'static str },
    #[error("kind=no_selection: no piece is selected")]
    NoSelection,
    #[error("kind=game_over: {} already won", .winner.label())]
    GameOver { winner: Color },
    #[error("kind=cell_occupied: ({x}, {y}) already holds a piece")]
    CellOccupied { x: u8, y: u8 },
}

impl EngineError {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::OutOfBounds { .. } => "out_of_bounds",
            EngineError::IllegalMove { .. } => "illegal_move",
            EngineError::NoSelection => "no_selection",
            EngineError::GameOver { .. } => "game_over",
            EngineError::CellOccupied { .. } => "cell_occupied",
        }
    }

    pub fn illegal(reason: &'static str) -> Self {
        EngineError::IllegalMove { reason }
    }

    /// Rejections are reported to the caller as `accepted: false`; only
    /// addressing errors escape the engine boundary.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, EngineError::OutOfBounds { .. })
    }
}

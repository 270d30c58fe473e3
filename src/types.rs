use serde::Serialize;

use crate::error::EngineError;

pub const BOARD_WIDTH: u8 = 8;

/// Side owning a piece. White moves first and advances toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward simple step.
    pub fn forward_dy(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Far row where a piece unlocks backward movement.
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => BOARD_WIDTH - 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Color::White => "WHITE",
            Color::Black => "BLACK",
        }
    }
}

/// A board coordinate. `x` is the file (column), `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Result<Self, EngineError> {
        let range = 0..BOARD_WIDTH as i32;
        if !range.contains(&x) || !range.contains(&y) {
            return Err(EngineError::OutOfBounds { x, y });
        }
        Ok(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Returns the square `dx`/`dy` away, or `None` when it falls off the board.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::new(self.x as i32 + dx, self.y as i32 + dy).ok()
    }

    /// Light squares are never playable.
    pub fn is_light(self) -> bool {
        (self.x + self.y) % 2 == 0
    }

    /// Label as printed around the board: file `A`..`H`, rank `1`..`8`.
    pub fn square_name(self) -> String {
        format!("{}{}", (b'A' + self.x) as char, self.y + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub color: Color,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub x: u8,
    pub y: u8,
    pub is_light: bool,
    pub piece: Option<PieceView>,
}

/// Read-only board state handed to the view after every engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// 64 cells, row-major (`y` then `x`).
    pub cells: Vec<CellView>,
    pub active_color: Color,
    pub white_count: u8,
    pub black_count: u8,
    pub selected: Option<Position>,
    pub streak_active: bool,
    pub winner: Option<Color>,
}

impl BoardSnapshot {
    /// CRC32 of piece layout, counts and active color.
    /// Selection and streak flags are not part of the fingerprint.
    pub fn fingerprint(&self) -> u32 {
        let mut bytes = Vec::with_capacity(self.cells.len() + 3);
        for cell in &self.cells {
            bytes.push(match cell.piece {
                None => 0,
                Some(piece) => {
                    let color = match piece.color {
                        Color::White => 1,
                        Color::Black => 2,
                    };
                    if piece.can_go_back { color | 4 } else { color }
                }
            });
        }
        bytes.push(self.white_count);
        bytes.push(self.black_count);
        bytes.push(match self.active_color {
            Color::White => 1,
            Color::Black => 2,
        });
        crc32fast::hash(&bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    pub accepted: bool,
}

/// Outcome of a single `move_to` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoveResult {
    pub accepted: bool,
    pub turn_ended: bool,
    /// Contract:
    /// - `true` only after an accepted capture that leaves another capture
    ///   available to the same piece.
    /// - Always `false` when `turn_ended` is `true`.
    pub streak_continues: bool,
    pub captured: Option<Position>,
    pub promoted: bool,
    pub winner: Option<Color>,
}

impl MoveResult {
    pub fn rejected() -> Self {
        Self::default()
    }
}

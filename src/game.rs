use log::{debug, info};

use crate::board::{Board, PieceId};
use crate::error::EngineError;
use crate::types::{
    BoardSnapshot, CellView, Color, MoveResult, PieceView, Position, SelectionResult,
};

const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Step,
    Capture { victim: PieceId, at: Position },
}

/// Turn and streak state machine around a [`Board`].
///
/// All mutation goes through [`GameInstance::select_piece`] and
/// [`GameInstance::move_to`]; everything else is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInstance {
    board: Board,
    active_color: Color,
    selected: Option<PieceId>,
    streak_active: bool,
    winner: Option<Color>,
}

impl GameInstance {
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    /// Starts play from an arbitrary position with `active_color` to move.
    pub fn from_board(board: Board, active_color: Color) -> Self {
        Self {
            board,
            active_color,
            selected: None,
            streak_active: false,
            winner: None,
        }
    }

    /// Discards the current game and returns the fresh starting position.
    pub fn reset(&mut self) -> BoardSnapshot {
        *self = Self::new();
        info!("game reset");
        self.query_state()
    }

    pub fn select_piece(&mut self, x: i32, y: i32) -> Result<SelectionResult, EngineError> {
        let pos = Position::new(x, y)?;
        match self.try_select(pos) {
            Ok(id) => {
                self.selected = Some(id);
                debug!("{} selected {}", self.active_color.label(), pos.square_name());
                Ok(SelectionResult { accepted: true })
            }
            Err(err) => {
                debug!("selection of {} ignored: {err}", pos.square_name());
                Ok(SelectionResult { accepted: false })
            }
        }
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> Result<MoveResult, EngineError> {
        let dest = Position::new(x, y)?;
        match self.try_move(dest) {
            Ok(result) => Ok(result),
            Err(err) if err.is_rejection() => {
                debug!("move to {} rejected: {err}", dest.square_name());
                Ok(MoveResult::rejected())
            }
            Err(err) => Err(err),
        }
    }

    pub fn query_state(&self) -> BoardSnapshot {
        let (white_count, black_count) = self.board.counts();
        BoardSnapshot {
            cells: self
                .board
                .cells()
                .map(|cell| CellView {
                    x: cell.pos.x,
                    y: cell.pos.y,
                    is_light: cell.is_light,
                    piece: cell.occupant().map(|id| {
                        let piece = self.board.piece(id);
                        PieceView {
                            color: piece.color,
                            can_go_back: piece.can_go_back,
                        }
                    }),
                })
                .collect(),
            active_color: self.active_color,
            white_count,
            black_count,
            selected: self.selected_position(),
            streak_active: self.streak_active,
            winner: self.winner,
        }
    }

    /// Destinations the selected piece may move to right now.
    /// Only captures are listed while a streak is in progress.
    pub fn legal_moves(&self) -> Vec<Position> {
        let Some(id) = self.selected.filter(|_| self.winner.is_none()) else {
            return Vec::new();
        };
        let Some(from) = self.board.piece(id).position() else {
            return Vec::new();
        };

        DIAGONALS
            .iter()
            .flat_map(|&(dx, dy)| [from.offset(dx, dy), from.offset(2 * dx, 2 * dy)])
            .flatten()
            .filter(|&dest| match self.classify(id, dest) {
                Ok(MoveKind::Capture { .. }) => true,
                Ok(MoveKind::Step) => !self.streak_active,
                Err(_) => false,
            })
            .collect()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn streak_active(&self) -> bool {
        self.streak_active
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn selected_position(&self) -> Option<Position> {
        self.selected.and_then(|id| self.board.piece(id).position())
    }

    pub fn turn_banner(&self) -> String {
        format!("{} MOVES!", self.active_color.label())
    }

    pub fn victory_message(&self) -> Option<String> {
        self.winner.map(|color| format!("{} WON!", color.label()))
    }

    fn try_select(&self, pos: Position) -> Result<PieceId, EngineError> {
        if let Some(winner) = self.winner {
            return Err(EngineError::GameOver { winner });
        }
        if self.streak_active {
            return Err(EngineError::illegal("capture streak in progress"));
        }
        let id = self
            .board
            .occupant_of(pos)
            .ok_or(EngineError::illegal("no piece on this square"))?;
        if self.board.piece(id).color != self.active_color {
            return Err(EngineError::illegal("piece belongs to the other side"));
        }
        Ok(id)
    }

    fn try_move(&mut self, dest: Position) -> Result<MoveResult, EngineError> {
        if let Some(winner) = self.winner {
            return Err(EngineError::GameOver { winner });
        }
        let id = self.selected.ok_or(EngineError::NoSelection)?;
        let kind = self.classify(id, dest)?;
        if self.streak_active && kind == MoveKind::Step {
            return Err(EngineError::illegal("capture streak must continue"));
        }
        self.apply_move(id, dest, kind)
    }

    /// Applies an already validated move. Nothing changes when relocation fails.
    fn apply_move(
        &mut self,
        id: PieceId,
        dest: Position,
        kind: MoveKind,
    ) -> Result<MoveResult, EngineError> {
        let color = self.active_color;
        let mut result = MoveResult {
            accepted: true,
            ..MoveResult::default()
        };

        self.board.move_piece(id, dest)?;

        if let MoveKind::Capture { victim, at } = kind {
            if let Some(loser) = self.board.remove_piece(victim) {
                self.winner = Some(loser.opponent());
            }
            self.streak_active = true;
            result.captured = Some(at);
        }

        result.promoted = dest.y == color.promotion_row() && self.board.promote(id);
        debug!(
            "{} moved to {}{}\n{}",
            color.label(),
            dest.square_name(),
            if result.promoted { " and can now go back" } else { "" },
            self.board
        );

        if let Some(winner) = self.winner {
            info!("{} won", winner.label());
            result.winner = Some(winner);
        } else if result.captured.is_some() && self.has_available_captures(id) {
            result.streak_continues = true;
            return Ok(result);
        }

        self.streak_active = false;
        self.selected = None;
        self.active_color = color.opponent();
        result.turn_ended = true;
        Ok(result)
    }

    /// Validates moving piece `id` to `dest` without touching any state.
    fn classify(&self, id: PieceId, dest: Position) -> Result<MoveKind, EngineError> {
        let piece = self.board.piece(id);
        let from = piece
            .position()
            .ok_or(EngineError::illegal("captured pieces cannot move"))?;

        if !self.board.cell(dest).is_empty() {
            return Err(EngineError::illegal("destination is occupied"));
        }
        if self.board.cell(dest).is_light {
            return Err(EngineError::illegal("destination is a light square"));
        }

        let dx = dest.x as i32 - from.x as i32;
        let dy = dest.y as i32 - from.y as i32;

        match (dx.abs(), dy.abs()) {
            // Jumps are legal in every direction, promoted or not.
            (2, 2) => {
                let at = Position {
                    x: (from.x + dest.x) / 2,
                    y: (from.y + dest.y) / 2,
                };
                match self.board.occupant_of(at) {
                    Some(victim) if self.board.piece(victim).color != piece.color => {
                        Ok(MoveKind::Capture { victim, at })
                    }
                    _ => Err(EngineError::illegal("no opposing piece to jump")),
                }
            }
            (1, 1) => {
                if piece.can_go_back || dy == piece.color.forward_dy() {
                    Ok(MoveKind::Step)
                } else {
                    Err(EngineError::illegal("backward step before promotion"))
                }
            }
            _ => Err(EngineError::illegal("not a diagonal step or jump")),
        }
    }

    fn has_available_captures(&self, id: PieceId) -> bool {
        let Some(from) = self.board.piece(id).position() else {
            return false;
        };
        DIAGONALS
            .iter()
            .filter_map(|&(dx, dy)| from.offset(2 * dx, 2 * dy))
            .any(|dest| matches!(self.classify(id, dest), Ok(MoveKind::Capture { .. })))
    }
}

impl Default for GameInstance {
    fn default() -> Self {
        Self::new()
    }
}

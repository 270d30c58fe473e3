use std::fmt;

use crate::error::EngineError;
use crate::types::{BOARD_WIDTH, Color, Position};

const BOARD_SIZE: usize = BOARD_WIDTH as usize;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const STARTING_ROWS: usize = 3;

/// Index of a piece inside the board's piece arena.
/// Ids stay valid for the lifetime of the board; a captured piece keeps its
/// id but is detached from every cell. Methods taking an id from another
/// board panic, except [`Board::get_piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub can_go_back: bool,
    pub is_killed: bool,
    position: Option<Position>,
}

impl Piece {
    /// Square currently holding this piece; `None` once captured.
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub pos: Position,
    pub is_light: bool,
    occupant: Option<PieceId>,
}

impl Cell {
    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// 8x8 checkers board: a grid of cells, each optionally owning one piece,
/// plus live piece counts per color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
    pieces: Vec<Piece>,
    white_count: u8,
    black_count: u8,
}

impl Board {
    /// Creates the standard starting position, 12 pieces per side.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.place_starting_pieces();
        board
    }

    /// Creates an initialized board without any pieces.
    pub fn empty() -> Self {
        let mut board = Self {
            cells: Vec::with_capacity(NUM_SQUARES),
            pieces: Vec::new(),
            white_count: 0,
            black_count: 0,
        };
        board.initialize();
        board
    }

    /// Rebuilds the grid and drops every piece. Safe to call repeatedly.
    pub fn initialize(&mut self) {
        self.cells.clear();
        self.pieces.clear();
        self.white_count = 0;
        self.black_count = 0;

        for idx in 0..NUM_SQUARES {
            let pos = idx_to_pos(idx);
            self.cells.push(Cell {
                pos,
                is_light: pos.is_light(),
                occupant: None,
            });
        }
    }

    /// Fills rows 0-2 with black and rows 5-7 with white on the dark squares.
    /// Caller contract: the board was just initialized.
    pub fn place_starting_pieces(&mut self) {
        debug_assert!(self.pieces.is_empty(), "board must be freshly initialized");

        let black_rows = 0..STARTING_ROWS;
        let white_rows = BOARD_SIZE - STARTING_ROWS..BOARD_SIZE;

        for idx in 0..NUM_SQUARES {
            let pos = idx_to_pos(idx);
            if pos.is_light() {
                continue;
            }
            let color = if black_rows.contains(&(pos.y as usize)) {
                Color::Black
            } else if white_rows.contains(&(pos.y as usize)) {
                Color::White
            } else {
                continue;
            };
            self.attach_new_piece(color, pos);
        }
    }

    /// Puts a fresh piece of `color` on `pos`.
    /// Fails on light squares and on occupied squares.
    pub fn place_piece(&mut self, color: Color, pos: Position) -> Result<PieceId, EngineError> {
        if pos.is_light() {
            return Err(EngineError::illegal("pieces only stand on dark squares"));
        }
        if !self.cell(pos).is_empty() {
            return Err(EngineError::CellOccupied { x: pos.x, y: pos.y });
        }
        Ok(self.attach_new_piece(color, pos))
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Result<&Cell, EngineError> {
        let pos = Position::new(x, y)?;
        Ok(self.cell(pos))
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos_to_idx(pos)]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn occupant_of(&self, pos: Position) -> Option<PieceId> {
        self.cell(pos).occupant
    }

    /// # Panics
    /// Panics if `id` was not issued by this board.
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// Like [`Board::piece`], but returns `None` for ids this board never issued.
    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.occupant_of(pos).map(|id| self.piece(id))
    }

    /// Detaches `id` from its square and attaches it to `dest`.
    pub fn move_piece(&mut self, id: PieceId, dest: Position) -> Result<(), EngineError> {
        if !self.cell(dest).is_empty() {
            return Err(EngineError::CellOccupied {
                x: dest.x,
                y: dest.y,
            });
        }
        let from = self.pieces[id.0]
            .position
            .ok_or(EngineError::illegal("captured pieces cannot move"))?;

        self.cells[pos_to_idx(from)].occupant = None;
        self.cells[pos_to_idx(dest)].occupant = Some(id);
        self.pieces[id.0].position = Some(dest);
        Ok(())
    }

    /// Captures `id`: marks it killed, frees its square and decrements its
    /// color's count. Returns the color that just ran out of pieces, if any.
    pub fn remove_piece(&mut self, id: PieceId) -> Option<Color> {
        let piece = &mut self.pieces[id.0];
        let pos = piece.position.take()?;
        piece.is_killed = true;
        let color = piece.color;
        self.cells[pos_to_idx(pos)].occupant = None;

        let count = match color {
            Color::White => &mut self.white_count,
            Color::Black => &mut self.black_count,
        };
        *count -= 1;

        (*count == 0).then_some(color)
    }

    /// Unlocks backward movement. Returns `true` only on the first unlock.
    pub fn promote(&mut self, id: PieceId) -> bool {
        let piece = &mut self.pieces[id.0];
        if piece.can_go_back {
            return false;
        }
        piece.can_go_back = true;
        true
    }

    pub fn count(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_count,
            Color::Black => self.black_count,
        }
    }

    /// Returns `(white_count, black_count)`.
    pub fn counts(&self) -> (u8, u8) {
        (self.white_count, self.black_count)
    }

    fn attach_new_piece(&mut self, color: Color, pos: Position) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece {
            color,
            can_go_back: false,
            is_killed: false,
            position: Some(pos),
        });
        self.cells[pos_to_idx(pos)].occupant = Some(id);
        match color {
            Color::White => self.white_count += 1,
            Color::Black => self.black_count += 1,
        }
        id
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the grid with the same file/rank labels the GUI draws:
/// `w`/`b` for pieces, upper case once they can move backward,
/// `.` for empty dark squares and a blank for light squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for x in 0..BOARD_WIDTH {
            write!(f, "{}", (b'A' + x) as char)?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.chunks(BOARD_SIZE).enumerate() {
            write!(f, "{}", row + 1)?;
            for cell in cells {
                let symbol = match cell.occupant.map(|id| self.piece(id)) {
                    Some(piece) => match (piece.color, piece.can_go_back) {
                        (Color::White, false) => 'w',
                        (Color::White, true) => 'W',
                        (Color::Black, false) => 'b',
                        (Color::Black, true) => 'B',
                    },
                    None if cell.is_light => ' ',
                    None => '.',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn idx_to_pos(idx: usize) -> Position {
    Position {
        x: (idx % BOARD_SIZE) as u8,
        y: (idx / BOARD_SIZE) as u8,
    }
}

fn pos_to_idx(pos: Position) -> usize {
    (pos.y as usize) * BOARD_SIZE + pos.x as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> Position {
        Position { x, y }
    }

    #[test]
    fn t01_starting_position_has_twelve_pieces_per_side_on_dark_squares() {
        let board = Board::new();

        assert_eq!(board.counts(), (12, 12));
        for cell in board.cells() {
            let Some(id) = cell.occupant() else {
                continue;
            };
            let piece = board.piece(id);
            assert!(!cell.is_light, "piece on light square {:?}", cell.pos);
            assert_eq!(piece.position(), Some(cell.pos));
            match piece.color {
                Color::Black => assert!(cell.pos.y <= 2),
                Color::White => assert!(cell.pos.y >= 5),
            }
        }
    }

    #[test]
    fn initialize_clears_pieces_and_counts() {
        let mut board = Board::new();

        board.initialize();

        assert_eq!(board.counts(), (0, 0));
        assert!(board.cells().all(Cell::is_empty));
        assert_eq!(board.cells().count(), 64);
        assert_eq!(board, Board::empty());
    }

    #[test]
    fn cell_at_rejects_out_of_range_coordinates() {
        let board = Board::new();

        assert_eq!(
            board.cell_at(8, 3).unwrap_err(),
            EngineError::OutOfBounds { x: 8, y: 3 }
        );
        assert_eq!(
            board.cell_at(-1, 0).unwrap_err(),
            EngineError::OutOfBounds { x: -1, y: 0 }
        );
        assert!(board.cell_at(1, 0).unwrap().occupant().is_some());
    }

    #[test]
    fn move_piece_transfers_ownership_between_cells() {
        let mut board = Board::empty();
        let id = board.place_piece(Color::White, pos(2, 5)).unwrap();

        board.move_piece(id, pos(3, 4)).unwrap();

        assert!(board.cell(pos(2, 5)).is_empty());
        assert_eq!(board.occupant_of(pos(3, 4)), Some(id));
        assert_eq!(board.piece(id).position(), Some(pos(3, 4)));
    }

    #[test]
    fn move_piece_onto_occupied_cell_fails_and_keeps_board_unchanged() {
        let mut board = Board::empty();
        let id = board.place_piece(Color::White, pos(2, 5)).unwrap();
        board.place_piece(Color::Black, pos(3, 4)).unwrap();
        let before = board.clone();

        let err = board.move_piece(id, pos(3, 4)).unwrap_err();

        assert_eq!(err, EngineError::CellOccupied { x: 3, y: 4 });
        assert_eq!(board, before);
    }

    #[test]
    fn place_piece_rejects_light_and_occupied_squares() {
        let mut board = Board::empty();

        assert_eq!(
            board.place_piece(Color::Black, pos(0, 0)).unwrap_err().kind(),
            "illegal_move"
        );
        board.place_piece(Color::Black, pos(1, 0)).unwrap();
        assert_eq!(
            board.place_piece(Color::White, pos(1, 0)).unwrap_err(),
            EngineError::CellOccupied { x: 1, y: 0 }
        );
        assert_eq!(board.counts(), (0, 1));
    }

    #[test]
    fn remove_piece_kills_detaches_and_reports_last_piece() {
        let mut board = Board::empty();
        let first = board.place_piece(Color::Black, pos(1, 0)).unwrap();
        let second = board.place_piece(Color::Black, pos(3, 0)).unwrap();

        assert_eq!(board.remove_piece(first), None);
        assert!(board.piece(first).is_killed);
        assert_eq!(board.piece(first).position(), None);
        assert!(board.cell(pos(1, 0)).is_empty());
        assert_eq!(board.count(Color::Black), 1);

        assert_eq!(board.remove_piece(second), Some(Color::Black));
        assert_eq!(board.count(Color::Black), 0);
    }

    #[test]
    fn removing_a_killed_piece_again_is_a_no_op() {
        let mut board = Board::empty();
        let id = board.place_piece(Color::White, pos(0, 5)).unwrap();
        board.place_piece(Color::White, pos(2, 5)).unwrap();

        board.remove_piece(id);
        assert_eq!(board.remove_piece(id), None);
        assert_eq!(board.count(Color::White), 1);
        assert!(board.move_piece(id, pos(1, 4)).is_err());
    }

    #[test]
    fn get_piece_rejects_ids_from_another_board() {
        let mut big = Board::empty();
        big.place_piece(Color::White, pos(0, 5)).unwrap();
        let foreign = big.place_piece(Color::White, pos(2, 5)).unwrap();
        let mut small = Board::empty();
        let own = small.place_piece(Color::Black, pos(1, 0)).unwrap();

        assert_eq!(small.get_piece(foreign), None);
        assert_eq!(small.get_piece(own).map(|p| p.color), Some(Color::Black));
    }

    #[test]
    fn promote_is_one_shot() {
        let mut board = Board::empty();
        let id = board.place_piece(Color::White, pos(1, 0)).unwrap();

        assert!(board.promote(id));
        assert!(!board.promote(id));
        assert!(board.piece(id).can_go_back);
    }

    #[test]
    fn display_renders_labels_and_pieces() {
        let mut board = Board::empty();
        board.place_piece(Color::Black, pos(1, 0)).unwrap();
        let king = board.place_piece(Color::White, pos(0, 7)).unwrap();
        board.promote(king);

        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], " ABCDEFGH");
        assert_eq!(lines[1], "1 b . . .");
        assert_eq!(lines[8], "8W . . . ");
    }
}

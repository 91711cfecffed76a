//! Mailbox board and position representation.
//!
//! `Board` is an 8×8 grid of optional pieces, row 0 being rank 8. `Position`
//! adds the side to move, castling rights and the en-passant target, and
//! knows how to make and unmake a single move in place.

use crate::engine::attacks;
use crate::engine::types::{
    CastlingRights, ChessError, Color, Move, MoveKind, Piece, PieceKind, Square,
};

const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Piece placement: at most one piece per square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard starting placement.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for (row, rank) in START_PLACEMENT.split('/').enumerate() {
            for (col, ch) in rank.chars().filter(|c| c.is_alphabetic()).enumerate() {
                board.squares[row][col] = Piece::from_char(ch);
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Remove and return whatever stands on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    /// Iterate over occupied squares of one colour.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /// Find the king of the given colour, if it is on the board.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Parse the piece-placement field of a FEN string (rank 8 first).
    ///
    /// Rejects more than one king per colour; a missing king is allowed so
    /// that finished or contrived positions can be described.
    pub fn from_placement(placement: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidPlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 8 - row;
            let mut col: u8 = 0;
            for ch in rank_str.chars() {
                if col > 7 {
                    return Err(ChessError::InvalidPlacement(format!(
                        "too many squares in rank {rank}"
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidPlacement(format!(
                            "invalid empty count '{ch}' in rank {rank}"
                        )));
                    }
                    col += digit as u8;
                } else if let Some(piece) = Piece::from_char(ch) {
                    board.set(Square::at(row as u8, col), Some(piece));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidPlacement(format!(
                        "invalid character '{ch}'"
                    )));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidPlacement(format!(
                    "rank {rank} has {col} squares instead of 8"
                )));
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces(color)
                .filter(|(_, p)| p.kind == PieceKind::King)
                .count();
            if kings > 1 {
                return Err(ChessError::InvalidPlacement(format!(
                    "{color} has {kings} kings"
                )));
            }
        }

        Ok(board)
    }

    /// Export the placement as the first field of a FEN string.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in 0..8u8 {
            let mut empty_count = 0u8;
            for col in 0..8u8 {
                match self.get(Square::at(row, col)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            out.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                out.push((b'0' + empty_count) as char);
            }
            if row < 7 {
                out.push('/');
            }
        }
        out
    }

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = self
                    .get(Square::at(row, col))
                    .map_or('.', |p| p.to_char());
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// UndoInfo: saved state for reversing a move
// ---------------------------------------------------------------------------

/// State that must be saved before making a move so it can be restored on undo.
#[derive(Clone, Copy, Debug)]
pub struct UndoInfo {
    /// The moving piece as it stood on the origin square.
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Everything needed to generate moves: placement, side to move, castling
/// rights and en-passant target. Copies are fully independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// The square a pawn skipped over on the previous ply, if any.
    pub en_passant: Option<Square>,
}

impl Position {
    /// Standard starting position.
    pub fn starting() -> Self {
        Position {
            board: Board::starting(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant: None,
        }
    }

    /// A position from a placement diagram with no castling rights and no
    /// en-passant target.
    pub fn from_placement(placement: &str, side_to_move: Color) -> Result<Self, ChessError> {
        Ok(Position {
            board: Board::from_placement(placement)?,
            side_to_move,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
        })
    }

    /// Builder-style override of the castling rights.
    pub fn with_castling(mut self, rights: CastlingRights) -> Self {
        self.castling_rights = rights;
        self
    }

    /// Builder-style override of the en-passant target.
    pub fn with_en_passant(mut self, target: Option<Square>) -> Self {
        self.en_passant = target;
        self
    }

    /// Is `sq` attacked by any piece of colour `by`?
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        attacks::is_square_attacked(&self.board, sq, by)
    }

    /// Is `color`'s king attacked? A missing king counts as not attacked.
    pub fn king_attacked(&self, color: Color) -> bool {
        self.board
            .find_king(color)
            .is_some_and(|k| self.is_square_attacked(k, !color))
    }

    /// Is the side-to-move's king currently in check?
    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.king_attacked(self.side_to_move)
    }

    // -----------------------------------------------------------------------
    // Make / Undo move
    // -----------------------------------------------------------------------

    /// Apply a move to the position. Returns `UndoInfo` for reversal.
    ///
    /// The caller is responsible for passing a move generated for this
    /// position; legality is not re-checked here.
    pub fn make_move(&mut self, mv: Move) -> UndoInfo {
        let us = self.side_to_move;
        let moved = self
            .board
            .take(mv.from)
            .unwrap_or_else(|| panic!("no piece on {} (board:\n{})", mv.from, self.board));

        let undo = UndoInfo {
            moved,
            captured: None,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
        };

        // ---- Handle capture ----
        let captured = if mv.is_en_passant() {
            self.board.take(en_passant_victim(mv.to, us))
        } else {
            self.board.get(mv.to)
        };

        // ---- Move the piece (promoting if asked) ----
        let landing = match mv.promotion() {
            Some(kind) => Piece::new(us, kind),
            None => moved,
        };
        self.board.set(mv.to, Some(landing));

        // ---- Castling: move the rook ----
        if mv.is_castle() {
            let (rook_from, rook_to) = castling_rook_squares(mv.kind, us);
            let rook = self.board.take(rook_from);
            self.board.set(rook_to, rook);
        }

        // ---- En passant target ----
        self.en_passant = None;
        if moved.kind == PieceKind::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2 {
            self.en_passant = Some(Square::at(
                (mv.from.row() + mv.to.row()) / 2,
                mv.from.col(),
            ));
        }

        // ---- Update castling rights ----
        // Moving king or rook, or landing on a rook's home square.
        self.castling_rights.0 &= CASTLING_MASK[mv.from.index()];
        self.castling_rights.0 &= CASTLING_MASK[mv.to.index()];

        // ---- Switch side ----
        self.side_to_move = !us;

        UndoInfo { captured, ..undo }
    }

    /// Reverse a move previously applied with `make_move`.
    pub fn undo_move(&mut self, mv: Move, undo: &UndoInfo) {
        let us = !self.side_to_move;
        self.side_to_move = us;

        self.board.set(mv.from, Some(undo.moved));
        if mv.is_en_passant() {
            self.board.set(mv.to, None);
            self.board.set(en_passant_victim(mv.to, us), undo.captured);
        } else {
            self.board.set(mv.to, undo.captured);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castling_rook_squares(mv.kind, us);
            let rook = self.board.take(rook_to);
            self.board.set(rook_from, rook);
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

// ---------------------------------------------------------------------------
// Special-move helpers (free functions)
// ---------------------------------------------------------------------------

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
pub fn en_passant_victim(to: Square, mover: Color) -> Square {
    Square::at((to.row() as i8 - mover.forward()) as u8, to.col())
}

/// For a castling move, return (rook_from, rook_to).
pub fn castling_rook_squares(kind: MoveKind, color: Color) -> (Square, Square) {
    let row = color.back_row();
    match kind {
        MoveKind::CastleKingside => (Square::at(row, 7), Square::at(row, 5)),
        MoveKind::CastleQueenside => (Square::at(row, 0), Square::at(row, 3)),
        other => panic!("not a castling move: {other:?}"),
    }
}

/// Mask table indexed by square index. When a move touches a square, AND the
/// castling rights with this mask. E.g. if a rook on a1 moves (or is captured),
/// remove White-queenside. The king's home square removes both that side's rights.
#[rustfmt::skip]
const CASTLING_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    // a8 (0): remove black-queenside
    mask[0]  = 0b1111 & !CastlingRights::BLACK_QUEENSIDE;
    // e8 (4): remove both black rights
    mask[4]  = 0b1111 & !(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE);
    // h8 (7): remove black-kingside
    mask[7]  = 0b1111 & !CastlingRights::BLACK_KINGSIDE;
    // a1 (56): remove white-queenside
    mask[56] = 0b1111 & !CastlingRights::WHITE_QUEENSIDE;
    // e1 (60): remove both white rights
    mask[60] = 0b1111 & !(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE);
    // h1 (63): remove white-kingside
    mask[63] = 0b1111 & !CastlingRights::WHITE_KINGSIDE;
    mask
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves for one origin square (ignoring whether
//!      the mover's king is left attacked). Castling is the exception: its
//!      safety conditions are checked while generating.
//!   2. Filter: make the move on a scratch position, verify the mover's king
//!      is not attacked, undo.

use crate::engine::attacks::{self, DIAGONAL, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL};
use crate::engine::board::Position;
use crate::engine::types::{Color, Move, MoveKind, Piece, PieceKind, Square};

// =========================================================================
// Public API
// =========================================================================

/// Legal moves for the piece on `from`.
///
/// Empty if the square is empty or holds a piece of the side not to move.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    let Some(piece) = pos.board.get(from) else {
        return Vec::new();
    };
    if piece.color != pos.side_to_move {
        return Vec::new();
    }

    let pseudo = pseudo_legal_from(pos, from);
    let mut scratch = *pos;
    pseudo
        .into_iter()
        .filter(|&mv| leaves_king_safe(&mut scratch, mv))
        .collect()
}

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut legal = Vec::with_capacity(64);
    for (from, _) in pos.board.pieces(pos.side_to_move) {
        legal.extend(legal_moves_from(pos, from));
    }
    legal
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(pos: &Position) -> bool {
    let mut scratch = *pos;
    pos.board.pieces(pos.side_to_move).any(|(from, _)| {
        pseudo_legal_from(pos, from)
            .into_iter()
            .any(|mv| leaves_king_safe(&mut scratch, mv))
    })
}

/// Pseudo-legal moves for the piece on `from`, whichever side it belongs to.
pub fn pseudo_legal_from(pos: &Position, from: Square) -> Vec<Move> {
    let Some(piece) = pos.board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(pos, from, piece.color, &mut moves),
        PieceKind::Knight => generate_leaper_moves(pos, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => generate_slider_moves(pos, from, piece.color, &DIAGONAL, &mut moves),
        PieceKind::Rook => generate_slider_moves(pos, from, piece.color, &ORTHOGONAL, &mut moves),
        PieceKind::Queen => {
            generate_slider_moves(pos, from, piece.color, &ORTHOGONAL, &mut moves);
            generate_slider_moves(pos, from, piece.color, &DIAGONAL, &mut moves);
        }
        PieceKind::King => {
            generate_leaper_moves(pos, from, piece.color, &KING_OFFSETS, &mut moves);
            generate_castling_moves(pos, from, piece.color, &mut moves);
        }
    }
    moves
}

// =========================================================================
// Legality filter
// =========================================================================

/// Make `mv` on `scratch`, test the mover's king, and undo. `scratch` is
/// returned to its prior state on every path.
fn leaves_king_safe(scratch: &mut Position, mv: Move) -> bool {
    let us = scratch.side_to_move;
    let undo = scratch.make_move(mv);
    let safe = match scratch.board.find_king(us) {
        Some(king) => !scratch.is_square_attacked(king, !us),
        None => false,
    };
    scratch.undo_move(mv, &undo);
    safe
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(pos: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let board = &pos.board;
    let dir = us.forward();

    // --- Single push ---
    if let Some(one) = from.offset(dir, 0)
        && board.get(one).is_none()
    {
        push_pawn_move(from, one, us, MoveKind::Normal, moves);

        // --- Double push ---
        if from.row() == us.pawn_row()
            && let Some(two) = one.offset(dir, 0)
            && board.get(two).is_none()
        {
            moves.push(Move::normal(from, two));
        }
    }

    // --- Captures (including promotion captures) and en passant ---
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        match board.get(to) {
            Some(target) if target.color != us => {
                push_pawn_move(from, to, us, MoveKind::Capture, moves);
            }
            None if pos.en_passant == Some(to) => {
                moves.push(Move::new(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

/// Push a pawn move, expanding it into all four promotions on the last rank.
fn push_pawn_move(from: Square, to: Square, us: Color, kind: MoveKind, moves: &mut Vec<Move>) {
    if to.row() == us.promotion_row() {
        for promo in PieceKind::PROMOTIONS {
            moves.push(Move::new(from, to, MoveKind::Promotion(promo)));
        }
    } else {
        moves.push(Move::new(from, to, kind));
    }
}

// =========================================================================
// Knight / king steps
// =========================================================================

fn generate_leaper_moves(
    pos: &Position,
    from: Square,
    us: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match pos.board.get(to) {
            None => moves.push(Move::normal(from, to)),
            Some(target) if target.color != us => {
                moves.push(Move::new(from, to, MoveKind::Capture));
            }
            Some(_) => {}
        }
    }
}

// =========================================================================
// Slider moves (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(
    pos: &Position,
    from: Square,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in directions {
        let mut cur = from.offset(dr, dc);
        while let Some(to) = cur {
            match pos.board.get(to) {
                None => moves.push(Move::normal(from, to)),
                Some(target) => {
                    if target.color != us {
                        moves.push(Move::new(from, to, MoveKind::Capture));
                    }
                    break;
                }
            }
            cur = to.offset(dr, dc);
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn generate_castling_moves(pos: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let them = !us;
    let row = us.back_row();
    if from != Square::at(row, 4) {
        return;
    }

    // Can't castle while in check.
    if attacks::is_square_attacked(&pos.board, from, them) {
        return;
    }

    let rook = Some(Piece::new(us, PieceKind::Rook));
    let empty = |cols: &[u8]| cols.iter().all(|&c| pos.board.get(Square::at(row, c)).is_none());
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&c| !attacks::is_square_attacked(&pos.board, Square::at(row, c), them))
    };

    // Kingside: king moves e→g, path through f and g must be clear and not attacked.
    if pos.castling_rights.can_castle_kingside(us)
        && pos.board.get(Square::at(row, 7)) == rook
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        moves.push(Move::new(from, Square::at(row, 6), MoveKind::CastleKingside));
    }

    // Queenside: king moves e→c, path through b, c, d must be clear; c and d not attacked.
    if pos.castling_rights.can_castle_queenside(us)
        && pos.board.get(Square::at(row, 0)) == rook
        && empty(&[1, 2, 3])
        && safe(&[2, 3])
    {
        moves.push(Move::new(from, Square::at(row, 2), MoveKind::CastleQueenside));
    }
}

// =========================================================================
// Tests
// =========================================================================

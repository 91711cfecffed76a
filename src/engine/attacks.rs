//! Movement offset tables and attack detection.
//!
//! Attacks are found by probing outward from the target square: a piece of
//! the attacking side that could reach the target along its own movement
//! pattern attacks it. Nothing here mutates the board, so the detector is
//! safe on scratch copies and on the live board alike.

use crate::engine::board::Board;
use crate::engine::types::{Color, PieceKind, Square};

// =========================================================================
// Offset tables (row delta, col delta)
// =========================================================================

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// =========================================================================
// Ray walking
// =========================================================================

/// First occupied square along a ray from `from` (exclusive), if any.
pub fn first_blocker(board: &Board, from: Square, (dr, dc): (i8, i8)) -> Option<Square> {
    let mut cur = from.offset(dr, dc);
    while let Some(sq) = cur {
        if board.get(sq).is_some() {
            return Some(sq);
        }
        cur = sq.offset(dr, dc);
    }
    None
}

// =========================================================================
// Attack detection
// =========================================================================

/// Is `sq` attacked by any piece of colour `by`?
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let holds = |s: Option<Square>, kinds: &[PieceKind]| {
        s.and_then(|s| board.get(s))
            .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
    };

    // Pawns of `by` sit one row behind the target relative to their own
    // direction of travel.
    let pawn_dr = -by.forward();
    if holds(sq.offset(pawn_dr, -1), &[PieceKind::Pawn])
        || holds(sq.offset(pawn_dr, 1), &[PieceKind::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[PieceKind::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[PieceKind::King]))
    {
        return true;
    }

    // Rook / Queen (straight lines).
    if ORTHOGONAL.iter().any(|&dir| {
        holds(
            first_blocker(board, sq, dir),
            &[PieceKind::Rook, PieceKind::Queen],
        )
    }) {
        return true;
    }

    // Bishop / Queen (diagonals).
    DIAGONAL.iter().any(|&dir| {
        holds(
            first_blocker(board, sq, dir),
            &[PieceKind::Bishop, PieceKind::Queen],
        )
    })
}

// =========================================================================
// Tests
// =========================================================================

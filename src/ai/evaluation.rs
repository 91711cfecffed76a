//! Static position evaluation.
//!
//! Returns a score from White's perspective.
//! Positive = White advantage, negative = Black advantage.
//!
//! Components:
//!   1. Material (pawn 10, minor 30, rook 50, queen 90, king 900)
//!   2. A small bonus for occupying one of the four central squares

use crate::engine::board::Board;
use crate::engine::types::{Color, Square};

/// Infinity sentinel. Larger than any realistic eval.
pub const INF: i32 = 100_000;

/// Checkmate score base. Actual mate scores are `MATE - ply` so closer mates
/// score higher.
pub const MATE: i32 = 90_000;

/// Bonus for a piece standing on d4, e4, d5 or e5.
pub const CENTER_BONUS: i32 = 2;

/// Is this score a forced-mate score?
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE - 500
}

#[inline]
fn is_center(sq: Square) -> bool {
    (3..=4).contains(&sq.row()) && (3..=4).contains(&sq.col())
}

/// Evaluate the board from White's perspective.
pub fn evaluate(board: &Board) -> i32 {
    Square::all()
        .filter_map(|sq| board.get(sq).map(|p| (sq, p)))
        .map(|(sq, piece)| {
            let mut score = piece.kind.value();
            if is_center(sq) {
                score += CENTER_BONUS;
            }
            match piece.color {
                Color::White => score,
                Color::Black => -score,
            }
        })
        .sum()
}

// =========================================================================
// Tests
// =========================================================================

pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod types;

pub use board::{Board, Position};
pub use game::{GameState, MoveRecord, evaluate_status};
pub use movegen::{has_legal_move, legal_moves, legal_moves_from};
pub use types::*;

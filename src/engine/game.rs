//! Stateful game controller wrapping Position.
//!
//! `GameState` owns the live position, the undo history (full position
//! snapshots), the move log and the game status. Every mutation goes
//! through `apply_move` or `undo`; a rejected call leaves the state exactly
//! as it was.

use std::fmt;

use tracing::{debug, info};

use crate::engine::board::{Board, Position};
use crate::engine::movegen;
use crate::engine::types::{
    CastlingRights, ChessError, Color, EndReason, GameStatus, Move, Outcome, Piece, PieceKind,
    Square,
};

// =========================================================================
// MoveRecord
// =========================================================================

/// A recorded move in the game log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// The piece that moved, as it stood before moving.
    pub piece: Piece,
    /// The move that was played.
    pub mv: Move,
    /// The piece removed from the board, if any.
    pub captured: Option<Piece>,
    /// What game status resulted from this move.
    pub status_after: GameStatus,
}

impl fmt::Display for MoveRecord {
    /// `P e2e4`, `N g1xf3`, `P e5xd6 e.p.`, `P e7e8=Q`, `K e1g1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.piece.kind.to_char(Color::White);
        let x = if self.captured.is_some() { "x" } else { "" };
        write!(f, "{letter} {}{x}{}", self.mv.from, self.mv.to)?;
        if self.mv.is_en_passant() {
            write!(f, " e.p.")?;
        }
        if let Some(promo) = self.mv.promotion() {
            write!(f, "={}", promo.to_char(Color::White))?;
        }
        Ok(())
    }
}

// =========================================================================
// GameState
// =========================================================================

/// A complete chess game with history, undo, and status tracking.
#[derive(Clone, Debug)]
pub struct GameState {
    position: Position,
    move_log: Vec<MoveRecord>,
    /// One snapshot per executed move, taken before the move.
    history: Vec<Position>,
    status: GameStatus,
    /// Side played by the computer, if any.
    automated_side: Option<Color>,
}

impl GameState {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self {
            position: Position::starting(),
            move_log: Vec::new(),
            history: Vec::new(),
            status: GameStatus::Ongoing,
            automated_side: None,
        }
    }

    /// Create a game from an arbitrary position. Its status is evaluated
    /// immediately, so a finished position starts out terminal.
    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            move_log: Vec::new(),
            history: Vec::new(),
            status: evaluate_status(&position),
            automated_side: None,
        }
    }

    /// Set which side the computer plays. `None` is human-vs-human.
    pub fn with_automated_side(mut self, side: Option<Color>) -> Self {
        self.automated_side = side;
        self
    }

    /// Throw the current game away and start over, keeping the game mode.
    pub fn reset(&mut self) {
        *self = Self::new().with_automated_side(self.automated_side);
        debug!("game reset");
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Current piece placement.
    pub fn board(&self) -> &Board {
        &self.position.board
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.position.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.position.en_passant
    }

    /// Completed moves, oldest first.
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    /// Number of snapshots available to undo.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The final result, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.status.outcome()
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    pub fn automated_side(&self) -> Option<Color> {
        self.automated_side
    }

    /// Whether the side to move is the one played by the computer.
    pub fn is_automated_turn(&self) -> bool {
        self.automated_side == Some(self.side_to_move())
    }

    /// Legal moves of the piece on `sq`; empty if the square is empty or the
    /// piece's side is not to move.
    pub fn legal_moves(&self, sq: Square) -> Vec<Move> {
        movegen::legal_moves_from(&self.position, sq)
    }

    /// All legal moves in the current position.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.position)
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Play a move and return the resulting status.
    ///
    /// The move is matched against the legal moves from `mv.from` by its
    /// destination; the generated kind is authoritative. A pawn reaching
    /// the last rank takes its piece from `promotion`, or from `mv.kind`
    /// when that is already a promotion.
    pub fn apply_move(
        &mut self,
        mv: Move,
        promotion: Option<PieceKind>,
    ) -> Result<GameStatus, ChessError> {
        if let Some(outcome) = self.status.outcome() {
            return Err(ChessError::GameIsTerminal(outcome));
        }

        let illegal = || ChessError::IllegalMove {
            from: mv.from,
            to: mv.to,
        };

        let piece = self.position.board.get(mv.from).ok_or_else(illegal)?;
        if piece.color != self.side_to_move() {
            return Err(ChessError::WrongSideToMove(piece.color));
        }

        let chosen = self.resolve(mv, promotion)?;

        // Snapshot first, then mutate.
        self.history.push(self.position);
        let undo = self.position.make_move(chosen);
        self.status = evaluate_status(&self.position);

        let record = MoveRecord {
            piece: undo.moved,
            mv: chosen,
            captured: undo.captured,
            status_after: self.status,
        };
        debug!(
            ply = self.move_log.len() + 1,
            mv = %record,
            status = %self.status,
            "move applied"
        );
        self.move_log.push(record);

        if let Some(outcome) = self.status.outcome() {
            info!(plies = self.move_log.len(), %outcome, "game over");
        }

        Ok(self.status)
    }

    /// Play a move on behalf of the human side. Rejected while the computer
    /// is to move.
    pub fn apply_player_move(
        &mut self,
        mv: Move,
        promotion: Option<PieceKind>,
    ) -> Result<GameStatus, ChessError> {
        if !self.is_game_over() && self.is_automated_turn() {
            return Err(ChessError::WrongSideToMove(self.side_to_move()));
        }
        self.apply_move(mv, promotion)
    }

    /// Find the legal move matching `mv`'s squares and the promotion choice.
    fn resolve(&self, mv: Move, promotion: Option<PieceKind>) -> Result<Move, ChessError> {
        let illegal = ChessError::IllegalMove {
            from: mv.from,
            to: mv.to,
        };

        let candidates: Vec<Move> = self
            .legal_moves(mv.from)
            .into_iter()
            .filter(|m| m.to == mv.to)
            .collect();

        let Some(&first) = candidates.first() else {
            return Err(illegal);
        };

        if first.promotion().is_none() {
            return Ok(first);
        }

        let kind = promotion
            .or(mv.promotion())
            .ok_or(ChessError::PromotionRequired {
                from: mv.from,
                to: mv.to,
            })?;
        candidates
            .into_iter()
            .find(|m| m.promotion() == Some(kind))
            .ok_or(illegal)
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Undo the last turn. Returns the number of plies taken back.
    ///
    /// Against the computer this also takes back the computer's reply, so
    /// the human side is to move afterwards. Clears any game-over state.
    pub fn undo(&mut self) -> Result<usize, ChessError> {
        if self.history.is_empty() {
            return Err(ChessError::EmptyHistory);
        }

        let mut plies = 0;
        while let Some(snapshot) = self.history.pop() {
            self.position = snapshot;
            self.move_log.pop();
            plies += 1;
            if plies == 2 || !self.is_automated_turn() {
                break;
            }
        }

        self.status = evaluate_status(&self.position);
        debug!(plies, remaining = self.history.len(), "undo");
        Ok(plies)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Status detection
// =========================================================================

/// Classify `pos` from the point of view of its side to move.
pub fn evaluate_status(pos: &Position) -> GameStatus {
    let white_king = pos.board.find_king(Color::White);
    let black_king = pos.board.find_king(Color::Black);
    match (white_king, black_king) {
        (Some(_), Some(_)) => {}
        (Some(_), None) => return GameStatus::Over(Outcome::WhiteWins(EndReason::KingCaptured)),
        (None, Some(_)) => return GameStatus::Over(Outcome::BlackWins(EndReason::KingCaptured)),
        (None, None) => return GameStatus::Over(Outcome::Draw(EndReason::KingCaptured)),
    }

    let in_check = pos.is_in_check();
    if movegen::has_legal_move(pos) {
        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    } else if in_check {
        GameStatus::Over(Outcome::win_for(!pos.side_to_move, EndReason::Checkmate))
    } else {
        GameStatus::Over(Outcome::Draw(EndReason::Stalemate))
    }
}

// =========================================================================
// Tests
// =========================================================================

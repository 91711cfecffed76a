//! AI engine: trait definition and MinimaxAi.
//!
//! The `AiEngine` trait defines the interface the game loop calls when the
//! computer is to move. `MinimaxAi` runs a fixed-depth minimax search with
//! alpha-beta pruning: White maximizes the static score, Black minimizes it.
//! Root moves are shuffled with an injected RNG so equal-scoring moves are
//! not always chosen in generation order.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::engine::board::Position;
use crate::engine::game::GameState;
use crate::engine::movegen::{has_legal_move, legal_moves};
use crate::engine::types::{ChessError, Color, Difficulty, Move, PieceKind};

use super::evaluation::{INF, MATE, evaluate};

// =========================================================================
// AiEngine trait
// =========================================================================

/// The AI engine interface.
pub trait AiEngine {
    /// Select a move for the side to move at the given difficulty.
    ///
    /// `Ok(None)` means the side to move has no legal move.
    fn best_move(
        &mut self,
        game: &GameState,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, ChessError>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

// =========================================================================
// Search depths
// =========================================================================

/// Search depth in plies for each difficulty. Every depth is at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchDepths {
    easy: u32,
    medium: u32,
    hard: u32,
}

impl SearchDepths {
    /// Build a depth table; zero depths are raised to 1.
    pub fn new(easy: u32, medium: u32, hard: u32) -> Self {
        Self {
            easy: easy.max(1),
            medium: medium.max(1),
            hard: hard.max(1),
        }
    }

    pub fn depth(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

impl Default for SearchDepths {
    fn default() -> Self {
        Self::new(
            Difficulty::Easy.depth(),
            Difficulty::Medium.depth(),
            Difficulty::Hard.depth(),
        )
    }
}

// =========================================================================
// MinimaxAi: minimax with alpha-beta pruning
// =========================================================================

/// Search statistics.
#[derive(Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth: u32,
    /// Score of the chosen move from White's perspective.
    pub score: i32,
    pub time_ms: u64,
}

/// Candidate moves for the search. Promotions are only tried as queens.
fn search_moves(pos: &Position) -> Vec<Move> {
    let mut moves = legal_moves(pos);
    moves.retain(|m| matches!(m.promotion(), None | Some(PieceKind::Queen)));
    moves
}

/// Score for a side to move that has no legal move: mate or stalemate.
fn terminal_score(pos: &Position, ply: u32) -> i32 {
    if !pos.is_in_check() {
        return 0;
    }
    let mate = MATE - ply as i32;
    match pos.side_to_move {
        Color::White => -mate,
        Color::Black => mate,
    }
}

/// Minimax with alpha-beta pruning.
///
/// Returns the score from White's perspective. Every move made on `pos` is
/// undone before returning, including on cutoffs.
fn minimax(
    pos: &mut Position,
    depth: u32,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    // Leaf node: only existence of a reply matters for mate/stalemate.
    if depth == 0 {
        if !has_legal_move(pos) {
            return terminal_score(pos, ply);
        }
        return evaluate(&pos.board);
    }

    let moves = search_moves(pos);
    if moves.is_empty() {
        return terminal_score(pos, ply);
    }

    let maximizing = pos.side_to_move == Color::White;
    let mut best = if maximizing { -INF } else { INF };

    for mv in moves {
        let undo = pos.make_move(mv);
        let score = minimax(pos, depth - 1, ply + 1, alpha, beta, nodes);
        pos.undo_move(mv, &undo);

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Minimax AI engine with a seedable shuffle RNG.
pub struct MinimaxAi<R = SmallRng> {
    depths: SearchDepths,
    rng: R,
}

impl MinimaxAi<SmallRng> {
    /// Engine with default depths and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Engine with default depths and a fixed seed, for reproducible play.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for MinimaxAi<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MinimaxAi<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            depths: SearchDepths::default(),
            rng,
        }
    }

    /// Replace the difficulty → depth table.
    pub fn with_depths(mut self, depths: SearchDepths) -> Self {
        self.depths = depths;
        self
    }

    pub fn depths(&self) -> SearchDepths {
        self.depths
    }

    /// Run a fixed-depth search. Returns (best_move, stats).
    ///
    /// `pos` itself is never modified; the search works on a copy.
    pub fn search_fixed_depth(&mut self, pos: &Position, depth: u32) -> (Option<Move>, SearchStats) {
        let depth = depth.max(1);
        let start = Instant::now();

        let mut moves = search_moves(pos);
        if moves.is_empty() {
            return (
                None,
                SearchStats {
                    nodes: 1,
                    depth,
                    ..SearchStats::default()
                },
            );
        }
        moves.shuffle(&mut self.rng);

        let mut scratch = *pos;
        let mut nodes = 1u64;
        let maximizing = pos.side_to_move == Color::White;
        let mut best_move = None;
        let mut best_score = if maximizing { -INF } else { INF };
        let (mut alpha, mut beta) = (-INF, INF);

        for mv in moves {
            let undo = scratch.make_move(mv);
            let score = minimax(&mut scratch, depth - 1, 1, alpha, beta, &mut nodes);
            scratch.undo_move(mv, &undo);

            // Strict comparison: ties keep the first move after shuffling.
            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                best_move = Some(mv);
                if maximizing {
                    alpha = score;
                } else {
                    beta = score;
                }
            }
        }

        let stats = SearchStats {
            nodes,
            depth,
            score: best_score,
            time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            depth,
            nodes = stats.nodes,
            score = stats.score,
            time_ms = stats.time_ms,
            best = ?best_move.map(|m| m.to_string()),
            "search finished"
        );
        (best_move, stats)
    }
}

impl<R: Rng> AiEngine for MinimaxAi<R> {
    fn best_move(
        &mut self,
        game: &GameState,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, ChessError> {
        if let Some(outcome) = game.outcome() {
            return Err(ChessError::GameIsTerminal(outcome));
        }
        if let Some(side) = game.automated_side()
            && side != game.side_to_move()
        {
            return Err(ChessError::WrongSideToMove(side));
        }

        let depth = self.depths.depth(difficulty);
        let (best, _stats) = self.search_fixed_depth(game.position(), depth);
        Ok(best)
    }

    fn name(&self) -> &str {
        "MinimaxAi"
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::evaluation::is_mate_score;
    use crate::engine::types::{GameStatus, MoveKind, Square};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn game(placement: &str, side: Color) -> GameState {
        GameState::from_position(Position::from_placement(placement, side).unwrap())
    }

    fn play(g: &mut GameState, from: &str, to: &str) {
        g.apply_move(Move::normal(sq(from), sq(to)), None).unwrap();
    }

    #[test]
    fn depths_never_below_one() {
        let d = SearchDepths::new(0, 2, 5);
        assert_eq!(d.depth(Difficulty::Easy), 1);
        assert_eq!(d.depth(Difficulty::Medium), 2);
        assert_eq!(d.depth(Difficulty::Hard), 5);
        assert_eq!(SearchDepths::default().depth(Difficulty::Hard), 3);
    }

    #[test]
    fn takes_the_only_winning_capture_at_depth_one() {
        // Black rook on e8 can take the knight on e4; nothing else captures.
        let g = game("k3r3/8/8/8/4N3/8/8/7K", Color::Black);
        let mut ai = MinimaxAi::with_seed(7);
        let mv = ai.best_move(&g, Difficulty::Easy).unwrap().unwrap();
        assert_eq!((mv.from, mv.to), (sq("e8"), sq("e4")));
        assert_eq!(mv.kind, MoveKind::Capture);
    }

    #[test]
    fn white_captures_hanging_rook() {
        let g = game("4k3/8/8/3r4/8/8/3Q4/4K3", Color::White);
        let mut ai = MinimaxAi::with_seed(1);
        let mv = ai.best_move(&g, Difficulty::Medium).unwrap().unwrap();
        assert_eq!(mv.to, sq("d5"), "should capture hanging rook on d5");
    }

    #[test]
    fn finds_mate_in_one_for_black() {
        // 1.f3 e5 2.g4: Qh4 is mate.
        let mut g = GameState::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        let mut ai = MinimaxAi::with_seed(3);
        let mv = ai.best_move(&g, Difficulty::Easy).unwrap().unwrap();
        let status = g.apply_move(mv, None).unwrap();
        assert_eq!(status.outcome().map(|o| o.winner()), Some(Some(Color::Black)));
    }

    #[test]
    fn mate_score_reported() {
        let mut g = GameState::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        let mut ai = MinimaxAi::with_seed(3);
        let (_mv, stats) = ai.search_fixed_depth(g.position(), 2);
        assert!(is_mate_score(stats.score), "score: {}", stats.score);
        assert!(stats.score < 0);
        assert!(stats.nodes > 1);
    }

    #[test]
    fn same_seed_same_choice() {
        let g = GameState::new();
        let a = MinimaxAi::with_seed(42).best_move(&g, Difficulty::Easy).unwrap();
        let b = MinimaxAi::with_seed(42).best_move(&g, Difficulty::Easy).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ties_broken_by_shuffle() {
        // From the start, e4 and d4 are the only moves reaching the centre.
        let g = GameState::new();
        let mut seen = Vec::new();
        for seed in 0..32 {
            let mv = MinimaxAi::with_seed(seed)
                .best_move(&g, Difficulty::Easy)
                .unwrap()
                .unwrap();
            assert!(
                mv.to == sq("e4") || mv.to == sq("d4"),
                "unexpected choice {mv}"
            );
            if !seen.contains(&mv.to) {
                seen.push(mv.to);
            }
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn search_does_not_touch_the_game() {
        let g = GameState::new();
        let before = *g.position();
        let mut ai = MinimaxAi::with_seed(9);
        ai.best_move(&g, Difficulty::Hard).unwrap();
        assert_eq!(*g.position(), before);
    }

    #[test]
    fn promotes_to_queen() {
        let g = game("7k/P7/8/8/8/8/8/K7", Color::White);
        let mut ai = MinimaxAi::with_seed(5);
        let mv = ai.best_move(&g, Difficulty::Easy).unwrap().unwrap();
        assert_eq!(mv.kind, MoveKind::Promotion(PieceKind::Queen));
    }

    #[test]
    fn no_moves_returns_none() {
        let g = game("k7/2K5/1Q6/8/8/8/8/8", Color::Black);
        let mut ai = MinimaxAi::with_seed(0);
        let (mv, _) = ai.search_fixed_depth(g.position(), 2);
        assert_eq!(mv, None);
    }

    #[test]
    fn terminal_game_rejected() {
        let g = game("k7/2K5/1Q6/8/8/8/8/8", Color::Black);
        assert!(matches!(g.status(), GameStatus::Over(_)));
        let mut ai = MinimaxAi::with_seed(0);
        assert!(matches!(
            ai.best_move(&g, Difficulty::Easy),
            Err(ChessError::GameIsTerminal(_))
        ));
    }

    #[test]
    fn wrong_side_rejected() {
        let g = GameState::new().with_automated_side(Some(Color::Black));
        let mut ai = MinimaxAi::with_seed(0);
        assert_eq!(
            ai.best_move(&g, Difficulty::Easy),
            Err(ChessError::WrongSideToMove(Color::Black))
        );
    }

    #[test]
    fn engine_name() {
        assert_eq!(MinimaxAi::with_seed(0).name(), "MinimaxAi");
    }
}

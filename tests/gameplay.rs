//! Whole-game behaviour through the public `GameState` / AI surface.

use chess_core::ai::{AiEngine, MinimaxAi};
use chess_core::engine::board::Position;
use chess_core::engine::game::GameState;
use chess_core::engine::types::{
    ChessError, Color, Difficulty, EndReason, GameStatus, Move, MoveKind, Outcome, PieceKind,
    Square,
};

fn at(row: u8, col: u8) -> Square {
    Square::new(row, col).unwrap()
}

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn play(game: &mut GameState, from: &str, to: &str) -> GameStatus {
    game.apply_move(Move::normal(sq(from), sq(to)), None)
        .unwrap_or_else(|e| panic!("{from}{to} rejected: {e}"))
}

#[test]
fn scholars_mate_by_engine_coordinates() {
    let mut game = GameState::new();
    let plies = [
        ((6, 4), (4, 4)),
        ((1, 4), (3, 4)),
        ((7, 5), (4, 2)),
        ((0, 1), (2, 0)),
        ((7, 3), (3, 7)),
        ((0, 6), (2, 5)),
        ((3, 7), (1, 5)),
    ];
    let mut status = GameStatus::Ongoing;
    for ((fr, fc), (tr, tc)) in plies {
        status = game
            .apply_move(Move::normal(at(fr, fc), at(tr, tc)), None)
            .unwrap();
    }
    assert_eq!(
        status,
        GameStatus::Over(Outcome::WhiteWins(EndReason::Checkmate))
    );
    assert!(game.is_game_over());
    assert_eq!(game.move_log().len(), 7);

    // Nothing more can be played.
    assert!(matches!(
        game.apply_move(Move::normal(sq("a7"), sq("a6")), None),
        Err(ChessError::GameIsTerminal(_))
    ));
}

#[test]
fn apply_then_undo_restores_everything() {
    let mut game = GameState::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "d7", "d5");
    let before = *game.position();
    let log_len = game.move_log().len();

    play(&mut game, "e4", "d5");
    assert_eq!(game.undo(), Ok(1));

    assert_eq!(*game.position(), before);
    assert_eq!(game.move_log().len(), log_len);
    assert_eq!(game.status(), GameStatus::Ongoing);
}

#[test]
fn undo_all_the_way_back() {
    let mut game = GameState::new();
    for (from, to) in [("g1", "f3"), ("g8", "f6"), ("e2", "e4"), ("e7", "e5")] {
        play(&mut game, from, to);
    }
    while game.undo().is_ok() {}
    assert_eq!(*game.position(), Position::starting());
    assert_eq!(game.undo(), Err(ChessError::EmptyHistory));
}

#[test]
fn en_passant_only_on_the_next_ply() {
    let mut game = GameState::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "a7", "a6");
    play(&mut game, "e4", "e5");
    play(&mut game, "d7", "d5");
    assert_eq!(game.en_passant(), Some(sq("d6")));

    let ep = game
        .legal_moves(sq("e5"))
        .into_iter()
        .find(|m| m.to == sq("d6"));
    assert_eq!(ep.map(|m| m.kind), Some(MoveKind::EnPassant));

    // Decline it, and the chance is gone.
    play(&mut game, "h2", "h3");
    play(&mut game, "h7", "h6");
    assert_eq!(game.en_passant(), None);
    assert!(!game.legal_moves(sq("e5")).iter().any(|m| m.to == sq("d6")));
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut game = GameState::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "a7", "a6");
    play(&mut game, "e4", "e5");
    play(&mut game, "f7", "f5");
    play(&mut game, "e5", "f6");
    assert!(game.board().get(sq("f5")).is_none());
    assert!(game.board().get(sq("f6")).is_some());
    assert_eq!(
        game.move_log().last().map(|r| r.mv.kind),
        Some(MoveKind::EnPassant)
    );
}

#[test]
fn promotion_required_leaves_state_untouched() {
    let pos = Position::from_placement("7k/P7/8/8/8/8/8/K7", Color::White).unwrap();
    let mut game = GameState::from_position(pos);
    let before = *game.position();

    let err = game
        .apply_move(Move::normal(sq("a7"), sq("a8")), None)
        .unwrap_err();
    assert_eq!(
        err,
        ChessError::PromotionRequired {
            from: sq("a7"),
            to: sq("a8")
        }
    );
    assert_eq!(*game.position(), before);
    assert_eq!(game.history_len(), 0);

    game.apply_move(Move::normal(sq("a7"), sq("a8")), Some(PieceKind::Knight))
        .unwrap();
    assert_eq!(
        game.board().get(sq("a8")).map(|p| p.kind),
        Some(PieceKind::Knight)
    );
}

#[test]
fn castling_through_the_game() {
    let mut game = GameState::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("g8", "f6"),
    ] {
        play(&mut game, from, to);
    }
    play(&mut game, "e1", "g1");
    assert_eq!(
        game.move_log().last().map(|r| r.mv.kind),
        Some(MoveKind::CastleKingside)
    );
    assert!(game.board().get(sq("f1")).is_some());
    assert!(game.board().get(sq("h1")).is_none());
    assert!(!game.castling_rights().can_castle_kingside(Color::White));
    assert!(!game.castling_rights().can_castle_queenside(Color::White));
}

#[test]
fn stalemate_is_a_draw() {
    let pos = Position::from_placement("k7/2K5/1Q6/8/8/8/8/8", Color::Black).unwrap();
    let game = GameState::from_position(pos);
    assert_eq!(
        game.status(),
        GameStatus::Over(Outcome::Draw(EndReason::Stalemate))
    );
    assert!(game.all_legal_moves().is_empty());
}

#[test]
fn wrong_side_and_empty_square_rejected() {
    let mut game = GameState::new();
    assert_eq!(
        game.apply_move(Move::normal(sq("e7"), sq("e5")), None),
        Err(ChessError::WrongSideToMove(Color::Black))
    );
    assert_eq!(
        game.apply_move(Move::normal(sq("e4"), sq("e5")), None),
        Err(ChessError::IllegalMove {
            from: sq("e4"),
            to: sq("e5")
        })
    );
    assert_eq!(game.history_len(), 0);
}

#[test]
fn computer_reply_and_two_ply_undo() {
    let mut game = GameState::new().with_automated_side(Some(Color::Black));
    let mut ai = MinimaxAi::with_seed(11);

    game.apply_player_move(Move::normal(sq("e2"), sq("e4")), None)
        .unwrap();
    assert!(game.is_automated_turn());
    assert!(matches!(
        game.apply_player_move(Move::normal(sq("e7"), sq("e5")), None),
        Err(ChessError::WrongSideToMove(Color::Black))
    ));

    let reply = ai
        .best_move(&game, Difficulty::Medium)
        .unwrap()
        .expect("black has moves");
    game.apply_move(reply, None).unwrap();
    assert_eq!(game.side_to_move(), Color::White);

    assert_eq!(game.undo(), Ok(2));
    assert_eq!(*game.position(), Position::starting());
}

#[test]
fn computer_takes_material_at_depth_one() {
    let pos = Position::from_placement("k3r3/8/8/8/4N3/8/8/7K", Color::Black).unwrap();
    let game = GameState::from_position(pos);
    let mv = MinimaxAi::with_seed(0)
        .best_move(&game, Difficulty::Easy)
        .unwrap()
        .unwrap();
    assert_eq!((mv.from, mv.to), (sq("e8"), sq("e4")));
}

#[test]
fn self_play_ends_or_hits_the_cap() {
    let mut game = GameState::new();
    let mut ai = MinimaxAi::with_seed(2024);
    while !game.is_game_over() && game.history_len() < 40 {
        let mv = ai.best_move(&game, Difficulty::Easy).unwrap().unwrap();
        game.apply_move(mv, None).unwrap();
    }
    assert_eq!(game.move_log().len(), game.history_len());
}

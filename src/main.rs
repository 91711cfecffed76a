use chess_core::ai::{AiEngine, MinimaxAi};
use chess_core::config::AppConfig;
use chess_core::engine::GameState;

fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_core=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        difficulty = %config.default_difficulty,
        depth = config.default_depth(),
        seed = ?config.seed,
        max_plies = config.max_plies,
        "chess-core v{} self-play starting",
        env!("CARGO_PKG_VERSION")
    );

    let mut ai = match config.seed {
        Some(seed) => MinimaxAi::with_seed(seed),
        None => MinimaxAi::new(),
    }
    .with_depths(config.depths);

    let mut game = GameState::new();
    while !game.is_game_over() && (game.history_len() as u32) < config.max_plies {
        let mv = match ai.best_move(&game, config.default_difficulty) {
            Ok(Some(mv)) => mv,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "engine failed to pick a move");
                std::process::exit(1);
            }
        };
        let side = game.side_to_move();
        match game.apply_move(mv, None) {
            Ok(status) => {
                tracing::info!(ply = game.history_len(), %side, mv = %mv, %status, "move")
            }
            Err(e) => {
                tracing::error!(error = %e, mv = %mv, "engine move rejected");
                std::process::exit(1);
            }
        }
    }

    println!("{}", game.board());
    match game.outcome() {
        Some(outcome) => println!("Result: {outcome}"),
        None => println!("Result: unfinished after {} plies", game.history_len()),
    }
}

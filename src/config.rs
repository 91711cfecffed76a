use tracing::warn;

use crate::ai::SearchDepths;
use crate::engine::types::Difficulty;

/// Default ply cap for the self-play demo.
pub const DEFAULT_MAX_PLIES: u32 = 200;

/// Engine configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Difficulty used when the caller does not pick one.
    pub default_difficulty: Difficulty,
    /// Search depth for each difficulty.
    pub depths: SearchDepths,
    /// Fixed RNG seed for reproducible play. Entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Ply cap for the self-play demo.
    pub max_plies: u32,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unparseable values
    /// are logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let default_difficulty = match lookup("CHESS_AI_DEFAULT_DIFFICULTY") {
            Some(v) => Difficulty::from_str_loose(&v).unwrap_or_else(|| {
                warn!(value = %v, "unknown CHESS_AI_DEFAULT_DIFFICULTY, using default");
                defaults.default_difficulty
            }),
            None => defaults.default_difficulty,
        };

        let depth = |key: &str, difficulty: Difficulty| -> u32 {
            let fallback = defaults.depths.depth(difficulty);
            let Some(v) = lookup(key) else {
                return fallback;
            };
            match v.trim().parse::<u32>() {
                Ok(d) if d >= 1 => d,
                _ => {
                    warn!(key, value = %v, fallback, "invalid search depth, using default");
                    fallback
                }
            }
        };
        let depths = SearchDepths::new(
            depth("CHESS_DEPTH_EASY", Difficulty::Easy),
            depth("CHESS_DEPTH_MEDIUM", Difficulty::Medium),
            depth("CHESS_DEPTH_HARD", Difficulty::Hard),
        );

        let seed = lookup("CHESS_AI_SEED").and_then(|v| match v.trim().parse() {
            Ok(s) => Some(s),
            Err(_) => {
                warn!(value = %v, "invalid CHESS_AI_SEED, using entropy");
                None
            }
        });

        let max_plies = match lookup("CHESS_MAX_PLIES") {
            Some(v) => v.trim().parse().unwrap_or_else(|_| {
                warn!(value = %v, "invalid CHESS_MAX_PLIES, using default");
                defaults.max_plies
            }),
            None => defaults.max_plies,
        };

        AppConfig {
            default_difficulty,
            depths,
            seed,
            max_plies,
        }
    }

    /// Search depth for the configured default difficulty.
    pub fn default_depth(&self) -> u32 {
        self.depths.depth(self.default_difficulty)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_difficulty: Difficulty::Medium,
            depths: SearchDepths::default(),
            seed: None,
            max_plies: DEFAULT_MAX_PLIES,
        }
    }
}

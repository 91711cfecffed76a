pub mod engine;
pub mod evaluation;

pub use engine::{AiEngine, MinimaxAi, SearchDepths, SearchStats};

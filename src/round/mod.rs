//! Round engine: difficulty tiers, palette generation and scoring.

pub mod difficulty;
pub mod engine;

pub use difficulty::Difficulty;
pub use engine::{GuessOutcome, InvalidGuess, Palette, Round};

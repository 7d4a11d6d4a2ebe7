//! Room coordinator for the multiplayer color guessing game.
//!
//! A host creates a room and gets a short join code; guessers join with
//! it. The host sees the palette, guessers see the answer, and every guess
//! is relayed to the whole room until the lives run out.

pub mod color;
pub mod config;
pub mod http;
pub mod room;
pub mod round;
pub mod telemetry;
pub mod util;
pub mod ws;

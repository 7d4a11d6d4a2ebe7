//! JSON frames exchanged over the multiplayer socket.
//!
//! Inbound frames are validated here into [`ClientMessage`] before any
//! session logic runs; outbound frames are the [`ServerMessage`] enum,
//! tagged by `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgb;
use crate::room::Role;
use crate::round::{Difficulty, Round};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Create { difficulty: Difficulty },
    /// `room_code` is already upper-cased.
    Join { room_code: String },
    Start,
    /// Numbers that cannot name an option (negative, fractional, huge) are
    /// carried as `usize::MAX` and refused by the round engine.
    Guess { index: usize },
}

/// A frame with a recognised `type` whose fields are missing or wrong.
/// `Display` is the text sent back to the client.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("No difficulty specified.")]
    MissingDifficulty,
    #[error("Invalid difficulty.")]
    InvalidDifficulty,
    #[error("No game code specified.")]
    MissingRoomCode,
    #[error("No guess specified.")]
    MissingGuess,
    #[error("Invalid message type.")]
    UnknownType,
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl ClientMessage {
    /// Parse a text frame. `Ok(None)` means the frame is not worth answering:
    /// it is not JSON, or it has no usable `type`.
    pub fn parse(text: &str) -> Result<Option<Self>, ProtocolError> {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Ok(None);
        };
        let Some(kind) = non_empty_str(&value, "type") else {
            return Ok(None);
        };

        let message = match kind {
            "create" => {
                let difficulty = non_empty_str(&value, "difficulty")
                    .ok_or(ProtocolError::MissingDifficulty)?
                    .parse()
                    .map_err(|_| ProtocolError::InvalidDifficulty)?;
                ClientMessage::Create { difficulty }
            }
            "join" => {
                let code = non_empty_str(&value, "roomCode").ok_or(ProtocolError::MissingRoomCode)?;
                ClientMessage::Join { room_code: code.to_uppercase() }
            }
            "start" => ClientMessage::Start,
            "guess" => {
                let index = value
                    .get("index")
                    .filter(|v| v.is_number())
                    .ok_or(ProtocolError::MissingGuess)?;
                // `2.0` names option 2 just like `2`.
                let index = index
                    .as_u64()
                    .or_else(|| {
                        index
                            .as_f64()
                            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                            .map(|f| f as u64)
                    })
                    .and_then(|i| usize::try_from(i).ok())
                    .unwrap_or(usize::MAX);
                ClientMessage::Guess { index }
            }
            _ => return Err(ProtocolError::UnknownType),
        };
        Ok(Some(message))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Error {
        message: String,
    },
    Connect {
        code: String,
    },
    Join,
    Leave,
    /// Exactly one of `answer` / `colors` is set, depending on who receives
    /// it.
    State {
        score: u32,
        lives: u32,
        difficulty: Difficulty,
        answer: Option<Rgb>,
        colors: Option<Vec<Rgb>>,
    },
    Guess {
        correct: bool,
        index: usize,
        color: Rgb,
        answer: Option<Rgb>,
        score: u32,
        lives: u32,
    },
    GameOver {
        score: u32,
    },
    NotFound,
}

impl ServerMessage {
    pub fn error(message: impl ToString) -> Self {
        ServerMessage::Error { message: message.to_string() }
    }

    /// The round as `role` gets to see it: the host is dealt the palette to
    /// pick from, guessers are shown the answer.
    pub fn state(round: &Round, role: Role) -> Self {
        let palette = round.palette();
        let (answer, colors) = match role {
            Role::Host => (None, Some(palette.colors().to_vec())),
            Role::Guesser => (Some(palette.answer()), None),
        };
        ServerMessage::State {
            score: round.score(),
            lives: round.lives(),
            difficulty: round.difficulty(),
            answer,
            colors,
        }
    }
}

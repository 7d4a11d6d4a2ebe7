//! ID utilities (session handles, room codes).

use std::{fmt, str::FromStr};

use rand::Rng;
use ulid::Ulid;

use crate::color::Rgb;

/// Opaque per-connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Ulid);

impl SessionId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How room codes are drawn. Both produce six characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeStyle {
    /// Hex digits of a random color, e.g. `3FA0C2`.
    #[default]
    Hex,
    /// Zero-padded decimal, e.g. `004217`.
    Decimal,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown room code style {0:?} (expected \"hex\" or \"decimal\")")]
pub struct UnknownCodeStyle(pub String);

impl FromStr for CodeStyle {
    type Err = UnknownCodeStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(CodeStyle::Hex),
            "decimal" => Ok(CodeStyle::Decimal),
            _ => Err(UnknownCodeStyle(s.to_string())),
        }
    }
}

/// Draw a room code. Uniqueness is the registry's job.
pub fn new_room_code<R: Rng + ?Sized>(style: CodeStyle, rng: &mut R) -> String {
    match style {
        CodeStyle::Hex => Rgb::random(rng).hex_digits(),
        CodeStyle::Decimal => format!("{:06}", rng.gen_range(0..1_000_000u32)),
    }
}

//! sRGB colors as they travel over the wire.

pub mod delta_e;

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use self::delta_e::Lab;

/// An sRGB color. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Uniformly sample a color from the full sRGB cube.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self([
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        ])
    }

    /// Uppercase hex digits without the leading `#`.
    pub fn hex_digits(&self) -> String {
        let [r, g, b] = self.0;
        format!("{r:02X}{g:02X}{b:02X}")
    }

    pub fn to_lab(self) -> Lab {
        Lab::from(self)
    }

    /// Perceptual distance to `other`, see [`delta_e::distance`].
    pub fn difference(self, other: Rgb) -> f64 {
        delta_e::distance(self.to_lab(), other.to_lab())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_digits())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a color like #1A2B3C, got {0:?}")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

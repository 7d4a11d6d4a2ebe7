use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Difficulty tiers. Each one fixes how far every decoy may sit from the
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Exclusive `(min, max)` bounds on the answer-to-decoy distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub fn contains(&self, distance: f64) -> bool {
        distance > self.min && distance < self.max
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn band(self) -> Band {
        match self {
            Difficulty::Easy => Band { min: 40.0, max: 60.0 },
            Difficulty::Medium => Band { min: 20.0, max: 40.0 },
            Difficulty::Hard => Band { min: 10.0, max: 20.0 },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty {0:?}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tiers_only() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("Hard".parse::<Difficulty>().is_err());
        assert!("insane".parse::<Difficulty>().is_err());
    }

    #[test]
    fn harder_tiers_have_tighter_bands() {
        let [easy, medium, hard] = Difficulty::ALL.map(Difficulty::band);
        assert!(easy.min > medium.min && medium.min > hard.min);
        assert!(easy.max - easy.min >= hard.max - hard.min);
    }

    #[test]
    fn band_bounds_are_exclusive() {
        let band = Difficulty::Medium.band();
        assert!(!band.contains(20.0));
        assert!(band.contains(20.01));
        assert!(!band.contains(40.0));
    }
}

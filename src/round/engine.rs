//! Palette generation and guess scoring.

use rand::{Rng, seq::SliceRandom};

use crate::color::{
    Rgb,
    delta_e::{self, Lab},
};

use super::difficulty::Difficulty;

/// Number of colors offered each round.
pub const OPTION_COUNT: usize = 6;
/// Lives at the start of a game.
pub const MAX_LIVES: u32 = 7;
/// Every pair of palette colors (and each color against the background) must
/// be strictly further apart than this.
pub const MIN_SEPARATION: f64 = 10.0;
/// Candidate samples allowed before a palette attempt is thrown away.
pub const MAX_ATTEMPTS: usize = 10_000;

/// One set of options: the answer plus its decoys, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    answer: Rgb,
    colors: Vec<Rgb>,
    eliminated: Vec<bool>,
}

impl Palette {
    /// Build a palette for `difficulty`. Attempts that exhaust
    /// [`MAX_ATTEMPTS`] are discarded and generation restarts with a new
    /// answer.
    pub fn generate<R: Rng + ?Sized>(
        difficulty: Difficulty,
        background: Option<Rgb>,
        rng: &mut R,
    ) -> Self {
        Self::generate_within(difficulty, background, MAX_ATTEMPTS, rng).0
    }

    /// Returns the palette and how many attempts were thrown away first.
    fn generate_within<R: Rng + ?Sized>(
        difficulty: Difficulty,
        background: Option<Rgb>,
        max_attempts: usize,
        rng: &mut R,
    ) -> (Self, usize) {
        let mut discarded = 0;
        loop {
            if let Some(palette) = Self::try_generate(difficulty, background, max_attempts, rng) {
                return (palette, discarded);
            }
            discarded += 1;
            tracing::debug!(%difficulty, discarded, "palette attempt exhausted, starting over");
        }
    }

    fn try_generate<R: Rng + ?Sized>(
        difficulty: Difficulty,
        background: Option<Rgb>,
        max_attempts: usize,
        rng: &mut R,
    ) -> Option<Self> {
        let band = difficulty.band();
        let background = background.map(Rgb::to_lab);
        let far_from_background =
            |lab: Lab| background.is_none_or(|bg| delta_e::distance(lab, bg) > MIN_SEPARATION);

        let answer = Rgb::random(rng);
        let answer_lab = answer.to_lab();
        if !far_from_background(answer_lab) {
            return None;
        }

        let mut accepted = Vec::with_capacity(OPTION_COUNT);
        accepted.push((answer, answer_lab));

        for _ in 0..max_attempts {
            let candidate = Rgb::random(rng);
            let lab = candidate.to_lab();

            let in_band = band.contains(delta_e::distance(lab, answer_lab));
            if in_band
                && far_from_background(lab)
                && accepted
                    .iter()
                    .all(|&(_, other)| delta_e::distance(lab, other) > MIN_SEPARATION)
            {
                accepted.push((candidate, lab));
                if accepted.len() == OPTION_COUNT {
                    let mut colors: Vec<Rgb> = accepted.into_iter().map(|(c, _)| c).collect();
                    colors.shuffle(rng);
                    return Some(Self {
                        answer,
                        colors,
                        eliminated: vec![false; OPTION_COUNT],
                    });
                }
            }
        }
        None
    }

    pub fn answer(&self) -> Rgb {
        self.answer
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn answer_index(&self) -> usize {
        // The answer is always one of the colors.
        self.colors
            .iter()
            .position(|c| *c == self.answer)
            .unwrap_or_default()
    }

    pub fn is_eliminated(&self, index: usize) -> bool {
        self.eliminated.get(index).copied().unwrap_or(false)
    }
}

/// Why a guess was refused. Refused guesses never touch score or lives.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidGuess {
    #[error("option {index} does not exist (only {len} options)")]
    OutOfRange { index: usize, len: usize },
    #[error("option {index} was already eliminated")]
    AlreadyEliminated { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The answer was picked. `color` is the answer of the palette that was
    /// just replaced.
    Correct { color: Rgb },
    /// A decoy was picked and is now eliminated.
    Incorrect { color: Rgb, answer: Rgb },
}

impl GuessOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, GuessOutcome::Correct { .. })
    }
}

/// A game in progress: the current palette plus the counters that carry over
/// from one palette to the next.
#[derive(Debug, Clone)]
pub struct Round {
    difficulty: Difficulty,
    background: Option<Rgb>,
    palette: Palette,
    score: u32,
    lives: u32,
}

impl Round {
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, background: Option<Rgb>, rng: &mut R) -> Self {
        Self {
            difficulty,
            background,
            palette: Palette::generate(difficulty, background, rng),
            score: 0,
            lives: MAX_LIVES,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_over(&self) -> bool {
        self.lives == 0
    }

    /// Score a guess at `index`. A correct guess bumps the score and deals a
    /// fresh palette; a wrong one costs a life and eliminates the option.
    pub fn guess<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
    ) -> Result<GuessOutcome, InvalidGuess> {
        let len = self.palette.colors.len();
        let Some(&color) = self.palette.colors.get(index) else {
            return Err(InvalidGuess::OutOfRange { index, len });
        };
        if self.palette.eliminated[index] {
            return Err(InvalidGuess::AlreadyEliminated { index });
        }

        if color == self.palette.answer {
            self.score += 1;
            self.palette = Palette::generate(self.difficulty, self.background, rng);
            Ok(GuessOutcome::Correct { color })
        } else {
            self.palette.eliminated[index] = true;
            self.lives = self.lives.saturating_sub(1);
            Ok(GuessOutcome::Incorrect {
                color,
                answer: self.palette.answer,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn wrong_index(palette: &Palette) -> usize {
        (0..OPTION_COUNT)
            .find(|&i| i != palette.answer_index() && !palette.is_eliminated(i))
            .expect("a decoy is still available")
    }

    fn assert_palette_invariants(palette: &Palette, difficulty: Difficulty, background: Option<Rgb>) {
        let colors = palette.colors();
        assert_eq!(colors.len(), OPTION_COUNT);
        assert_eq!(colors.iter().filter(|c| **c == palette.answer()).count(), 1);

        let band = difficulty.band();
        for (i, a) in colors.iter().enumerate() {
            if *a != palette.answer() {
                let d = a.difference(palette.answer());
                assert!(band.contains(d), "{difficulty}: decoy {a} at {d}");
            }
            for b in &colors[i + 1..] {
                assert!(a.difference(*b) > MIN_SEPARATION, "{a} and {b} too close");
            }
            if let Some(bg) = background {
                assert!(a.difference(bg) > MIN_SEPARATION, "{a} too close to background");
            }
        }
    }

    #[test]
    fn palettes_respect_difficulty_bands() {
        let mut rng = rng();
        for difficulty in Difficulty::ALL {
            for _ in 0..10 {
                let palette = Palette::generate(difficulty, None, &mut rng);
                assert_palette_invariants(&palette, difficulty, None);
                assert!((0..OPTION_COUNT).all(|i| !palette.is_eliminated(i)));
            }
        }
    }

    #[test]
    fn attempt_without_samples_is_discarded() {
        let mut rng = rng();
        assert_eq!(Palette::try_generate(Difficulty::Medium, None, 0, &mut rng), None);
    }

    #[test]
    fn exhausted_attempts_restart_generation() {
        let mut rng = rng();
        // Five samples per attempt rarely yield five decoys, so most
        // attempts are thrown away before one completes.
        let mut discarded = 0;
        for _ in 0..5 {
            let (palette, thrown_away) =
                Palette::generate_within(Difficulty::Medium, None, OPTION_COUNT - 1, &mut rng);
            assert_palette_invariants(&palette, Difficulty::Medium, None);
            discarded += thrown_away;
        }
        assert!(discarded > 0);
    }

    #[test]
    fn palettes_keep_clear_of_the_background() {
        let mut rng = rng();
        let background = Some(Rgb::new(0x20, 0x20, 0x28));
        for _ in 0..10 {
            let palette = Palette::generate(Difficulty::Medium, background, &mut rng);
            assert_palette_invariants(&palette, Difficulty::Medium, background);
        }
    }

    #[test]
    fn new_round_starts_with_full_lives() {
        let round = Round::new(Difficulty::Easy, None, &mut rng());
        assert_eq!(round.score(), 0);
        assert_eq!(round.lives(), MAX_LIVES);
        assert_eq!(round.difficulty(), Difficulty::Easy);
        assert!(!round.is_over());
    }

    #[test]
    fn correct_guess_scores_and_deals_new_palette() {
        let mut rng = rng();
        let mut round = Round::new(Difficulty::Medium, None, &mut rng);
        let before = round.palette().clone();

        let outcome = round.guess(before.answer_index(), &mut rng).unwrap();

        assert_eq!(outcome, GuessOutcome::Correct { color: before.answer() });
        assert_eq!(round.score(), 1);
        assert_eq!(round.lives(), MAX_LIVES);
        assert_ne!(round.palette(), &before);
    }

    #[test]
    fn incorrect_guess_costs_a_life_and_eliminates() {
        let mut rng = rng();
        let mut round = Round::new(Difficulty::Hard, None, &mut rng);
        let index = wrong_index(round.palette());
        let color = round.palette().colors()[index];

        let outcome = round.guess(index, &mut rng).unwrap();

        assert_eq!(
            outcome,
            GuessOutcome::Incorrect { color, answer: round.palette().answer() }
        );
        assert_eq!(round.lives(), MAX_LIVES - 1);
        assert_eq!(round.score(), 0);
        assert!(round.palette().is_eliminated(index));
    }

    #[test]
    fn eliminated_option_cannot_be_guessed_again() {
        let mut rng = rng();
        let mut round = Round::new(Difficulty::Easy, None, &mut rng);
        let index = wrong_index(round.palette());
        round.guess(index, &mut rng).unwrap();

        let err = round.guess(index, &mut rng).unwrap_err();

        assert_eq!(err, InvalidGuess::AlreadyEliminated { index });
        assert_eq!(round.lives(), MAX_LIVES - 1);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn out_of_range_guess_is_refused() {
        let mut rng = rng();
        let mut round = Round::new(Difficulty::Easy, None, &mut rng);

        let err = round.guess(OPTION_COUNT, &mut rng).unwrap_err();

        assert_eq!(err, InvalidGuess::OutOfRange { index: OPTION_COUNT, len: OPTION_COUNT });
        assert_eq!(round.lives(), MAX_LIVES);
    }

    #[test]
    fn game_ends_when_lives_run_out() {
        let mut rng = rng();
        let mut round = Round::new(Difficulty::Medium, None, &mut rng);

        let mut misses = 0;
        while !round.is_over() {
            let palette = round.palette();
            let decoys_left = (0..OPTION_COUNT)
                .filter(|&i| i != palette.answer_index() && !palette.is_eliminated(i))
                .count();
            let index = if decoys_left == 0 {
                palette.answer_index()
            } else {
                misses += 1;
                wrong_index(palette)
            };
            round.guess(index, &mut rng).unwrap();
        }

        assert_eq!(misses, MAX_LIVES);
        assert_eq!(round.lives(), 0);
        assert_eq!(round.score(), 1);
    }
}

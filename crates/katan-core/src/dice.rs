//! Dice used to drive resource production and the robber.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of faces on each die
pub const FACES: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("a loaded die needs at least one face")]
    NoFaces,

    #[error("face {0} is outside 1..=6")]
    FaceOutOfRange(u8),
}

/// A single six-sided die
#[derive(Debug, Clone)]
pub enum Die {
    /// Draws from the thread-local shared source
    Fair,
    /// Deterministic sequence from its own seed
    Seeded(StdRng),
    /// Cycles through a fixed sequence of faces
    Loaded { faces: Vec<u8>, next: usize },
}

impl Die {
    /// A die with its own reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Die::Seeded(StdRng::seed_from_u64(seed))
    }

    /// A die that repeats `faces` in order
    pub fn loaded(faces: impl Into<Vec<u8>>) -> Result<Self, DiceError> {
        let faces = faces.into();
        if faces.is_empty() {
            return Err(DiceError::NoFaces);
        }
        if let Some(&face) = faces.iter().find(|f| !(1..=FACES).contains(*f)) {
            return Err(DiceError::FaceOutOfRange(face));
        }
        Ok(Die::Loaded { faces, next: 0 })
    }

    /// Roll the die (1..=6)
    pub fn roll(&mut self) -> u8 {
        match self {
            Die::Fair => rand::thread_rng().gen_range(1..=FACES),
            Die::Seeded(rng) => rng.gen_range(1..=FACES),
            Die::Loaded { faces, next } => {
                let face = faces[*next % faces.len()];
                *next = (*next + 1) % faces.len();
                face
            }
        }
    }
}

/// The result of rolling both dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub first: u8,
    pub second: u8,
}

impl DiceRoll {
    pub fn total(&self) -> u8 {
        self.first + self.second
    }
}

/// The pair of dice a game rolls each turn
#[derive(Debug, Clone)]
pub struct Dice {
    first: Die,
    second: Die,
}

impl Dice {
    /// Two independent dice
    pub fn new(first: Die, second: Die) -> Self {
        Self { first, second }
    }

    /// Unseeded dice drawing from the shared random source
    pub fn fair() -> Self {
        Self::new(Die::Fair, Die::Fair)
    }

    /// Reproducible dice, one seed per die
    pub fn seeded(first: u64, second: u64) -> Self {
        Self::new(Die::seeded(first), Die::seeded(second))
    }

    /// Dice that replay fixed sequences
    pub fn loaded(
        first: impl Into<Vec<u8>>,
        second: impl Into<Vec<u8>>,
    ) -> Result<Self, DiceError> {
        Ok(Self::new(Die::loaded(first)?, Die::loaded(second)?))
    }

    /// Loaded dice producing the given rolls in order, then repeating
    pub fn scripted(rolls: &[(u8, u8)]) -> Result<Self, DiceError> {
        let first: Vec<u8> = rolls.iter().map(|r| r.0).collect();
        let second: Vec<u8> = rolls.iter().map(|r| r.1).collect();
        Self::loaded(first, second)
    }

    pub fn roll(&mut self) -> DiceRoll {
        DiceRoll {
            first: self.first.roll(),
            second: self.second.roll(),
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::fair()
    }
}

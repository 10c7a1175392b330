//! Tunable rule parameters.

use serde::{Deserialize, Serialize};

/// Rule parameters a game is created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Players holding more than this many resources discard half on a robber roll
    pub robber_resource_limit: u32,
    /// Dice total that activates the robber
    pub robber_trigger: u8,
    /// Winning points needed to win
    pub points_to_win: u32,
    /// Seed for deck shuffling, discards and steals; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            robber_resource_limit: 7,
            robber_trigger: 7,
            points_to_win: 10,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::PLAYER_COUNT;
use crate::DECK_SIZE;

pub const WINNING_SCORE: u32 = 10;
pub const HAND_SIZE: usize = 4;
/// How often a computer player goes for a score when it could
pub const SCORE_CHANCE: f64 = 0.80;
pub const THINK_DELAY_MS: u64 = 2000;
pub const REVEAL_DELAY_MS: u64 = 1000;

/// Milliseconds as a JS timer value, saturating at `u32::MAX`.
pub fn saturating_millis(ms: u64) -> u32 {
    u32::try_from(ms).unwrap_or(u32::MAX)
}

/// Settings for one game. Missing fields fall back to the defaults, so a
/// front end can pass a partial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seats taken by humans, counted from seat 0
    pub human_players: usize,
    pub winning_score: u32,
    pub hand_size: usize,
    pub score_chance: f64,
    /// Pause before a computer player decides
    pub think_delay_ms: u64,
    /// Pause between revealing a card and applying the action
    pub reveal_delay_ms: u64,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_players: 1,
            winning_score: WINNING_SCORE,
            hand_size: HAND_SIZE,
            score_chance: SCORE_CHANCE,
            think_delay_ms: THINK_DELAY_MS,
            reveal_delay_ms: REVEAL_DELAY_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// All four seats played by the computer.
    pub fn computer_only() -> Self {
        Self {
            human_players: 0,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.score_chance) {
            return Err(ConfigError::ScoreChance(self.score_chance));
        }
        if self.human_players > PLAYER_COUNT {
            return Err(ConfigError::TooManyHumans {
                got: self.human_players,
                max: PLAYER_COUNT,
            });
        }
        if self.winning_score == 0 {
            return Err(ConfigError::ZeroWinningScore);
        }
        let dealt = self.hand_size.checked_mul(PLAYER_COUNT);
        if dealt.map_or(true, |n| n >= DECK_SIZE) {
            return Err(ConfigError::HandTooLarge {
                hand_size: self.hand_size,
                deck: DECK_SIZE,
            });
        }
        Ok(())
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::PLAYER_COUNT;
use crate::Color;

/// Cards a player holds, counted per color. A color with no cards has no
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Color, u32>", into = "BTreeMap<Color, u32>")]
pub struct Tank {
    counts: BTreeMap<Color, u32>,
}

impl Tank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, color: Color) -> u32 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.counts.contains_key(&color)
    }

    pub fn add(&mut self, color: Color, n: u32) {
        if n > 0 {
            *self.counts.entry(color).or_insert(0) += n;
        }
    }

    /// Remove every card of `color`, returning how many there were.
    pub fn take(&mut self, color: Color) -> u32 {
        self.counts.remove(&color).unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }
}

impl From<BTreeMap<Color, u32>> for Tank {
    fn from(counts: BTreeMap<Color, u32>) -> Self {
        let mut tank = Tank::new();
        for (color, n) in counts {
            tank.add(color, n);
        }
        tank
    }
}

impl From<Tank> for BTreeMap<Color, u32> {
    fn from(tank: Tank) -> Self {
        tank.counts
    }
}

impl<const N: usize> From<[(Color, u32); N]> for Tank {
    fn from(entries: [(Color, u32); N]) -> Self {
        let mut tank = Tank::new();
        for (color, n) in entries {
            tank.add(color, n);
        }
        tank
    }
}

impl std::fmt::Display for Tank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        let parts: Vec<String> = self.iter().map(|(c, n)| format!("{} x{}", c, n)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub human: bool,
    pub tank: Tank,
    pub score: u32,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, human: bool) -> Self {
        Self {
            id,
            name: name.into(),
            human,
            tank: Tank::new(),
            score: 0,
        }
    }

    /// Four seats, humans first: "Player 1", ..., then "CPU 1", ...
    pub fn seats(human_players: usize) -> [Player; PLAYER_COUNT] {
        let mut cpu = 0;
        std::array::from_fn(|i| {
            if i < human_players {
                Player::new(i as u32 + 1, format!("Player {}", i + 1), true)
            } else {
                cpu += 1;
                Player::new(i as u32 + 1, format!("CPU {}", cpu), false)
            }
        })
    }

    pub fn is_computer(&self) -> bool {
        !self.human
    }

    /// Empty the tank and zero the score.
    pub fn reset(&mut self) {
        self.tank.clear();
        self.score = 0;
    }
}

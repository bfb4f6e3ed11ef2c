use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Pink,
    Orange,
    Blue,
    Purple,
    Red,
    Green,
    Yellow,
}

/// All card colors, in dealing order.
pub const PALETTE: [Color; 7] = [
    Color::Pink,
    Color::Orange,
    Color::Blue,
    Color::Purple,
    Color::Red,
    Color::Green,
    Color::Yellow,
];

pub const CARDS_PER_COLOR: usize = 15;
pub const DECK_SIZE: usize = CARDS_PER_COLOR * PALETTE.len(); // 105
pub const BACK_COLORS: usize = 3;

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Color::Pink => "pink",
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    /// Color shown once the card is drawn
    pub front: Color,
    /// Colors shown while the card is face down, `front` among them
    pub back: [Color; BACK_COLORS],
}

impl Card {
    pub fn new(id: u32, front: Color, back: [Color; BACK_COLORS]) -> Self {
        Self { id, front, back }
    }

    pub fn shows_on_back(&self, color: Color) -> bool {
        self.back.contains(&color)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} [{}/{}/{}]",
            self.id, self.front, self.back[0], self.back[1], self.back[2]
        )
    }
}

/// Draw pile. The top of the deck is the end of `cards`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look at the top card without removing it
    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

/// Build the full 105 card deck and shuffle it.
///
/// Every color is the front of exactly 15 cards. The back of each card shows
/// its front plus two other colors picked without replacement.
pub fn build_deck<R: RandomSource>(rng: &mut R) -> Deck {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for i in 0..DECK_SIZE {
        let front = PALETTE[i % PALETTE.len()];
        let mut others: Vec<Color> = PALETTE.iter().copied().filter(|&c| c != front).collect();
        rng.shuffle(&mut others);
        let mut back = [front, others[0], others[1]];
        rng.shuffle(&mut back);
        cards.push(Card::new(i as u32, front, back));
    }
    rng.shuffle(&mut cards);
    Deck { cards }
}

/// Deal `hand_size` cards from the top of the deck to each player in seat
/// order. Stops early if the deck runs out.
pub fn deal(deck: &mut Deck, players: &mut [Player], hand_size: usize) {
    for p in players.iter_mut() {
        for _ in 0..hand_size {
            match deck.draw() {
                Some(card) => p.tank.add(card.front, 1),
                None => return,
            }
        }
    }
}


pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod policy;
pub mod rng;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

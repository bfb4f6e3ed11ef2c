use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ActionError;
use crate::player::Player;
use crate::rng::RandomSource;
use crate::{build_deck, deal, Card, Color, Deck};

pub const PLAYER_COUNT: usize = 4;

/// A move a player can make on their turn. Both draw the top card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Score { player: usize },
    Steal { thief: usize, target: usize },
}

impl Action {
    pub fn actor(&self) -> usize {
        match *self {
            Action::Score { player } => player,
            Action::Steal { thief, .. } => thief,
        }
    }
}

/// What a resolved action did. `Display` gives the line shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Scored {
        player: usize,
        name: String,
        color: Color,
        points: u32,
    },
    Missed {
        player: usize,
        name: String,
        color: Color,
    },
    Stole {
        thief: usize,
        thief_name: String,
        target: usize,
        target_name: String,
        color: Color,
        /// Cards taken from the target, not counting the drawn one
        count: u32,
    },
    StealFailed {
        thief: usize,
        thief_name: String,
        target: usize,
        target_name: String,
        color: Color,
    },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Scored {
                name, color, points, ..
            } => write!(f, "{} scored {} {} cards!", name, points, color),
            Outcome::Missed { name, color, .. } => {
                write!(f, "{} missed and added a {} card.", name, color)
            }
            Outcome::Stole {
                thief_name,
                target_name,
                color,
                count,
                ..
            } => write!(f, "{} stole {} {} cards from {}!", thief_name, count, color, target_name),
            Outcome::StealFailed {
                thief_name,
                target_name,
                color,
                ..
            } => write!(
                f,
                "{} failed to steal. {} drew a {} card instead.",
                thief_name, target_name, color
            ),
        }
    }
}

pub fn is_winning_score(score: u32, threshold: u32) -> bool {
    score >= threshold
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub deck: Deck,
    pub players: [Player; PLAYER_COUNT],
    /// Seat whose turn it is
    pub current: usize,
    pub winner: Option<usize>,
    pub winning_score: u32,
}

impl GameState {
    /// Fresh game: new shuffled deck, starting hands dealt, seat 0 to move.
    pub fn new<R: RandomSource>(config: &GameConfig, rng: &mut R) -> Self {
        let mut deck = build_deck(rng);
        let mut players = Player::seats(config.human_players);
        deal(&mut deck, &mut players, config.hand_size);
        Self {
            deck,
            players,
            current: 0,
            winner: None,
            winning_score: config.winning_score,
        }
    }

    /// Game with the given seats and deck, nothing dealt.
    pub fn from_parts(players: [Player; PLAYER_COUNT], deck: Deck, winning_score: u32) -> Self {
        Self {
            deck,
            players,
            current: 0,
            winner: None,
            winning_score,
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.deck.peek()
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.players[i])
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|p| p.name.as_str())
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// No winner and nothing left to draw: no action can be taken any more.
    pub fn is_stalled(&self) -> bool {
        self.winner.is_none() && self.deck.is_empty()
    }

    /// Cards still in tanks or the deck. Scored cards are out of play.
    pub fn cards_in_play(&self) -> usize {
        let held: u32 = self.players.iter().map(|p| p.tank.total()).sum();
        held as usize + self.deck.len()
    }

    /// Check that `action` may be applied now, without changing anything.
    pub fn validate(&self, action: &Action) -> Result<(), ActionError> {
        if self.winner.is_some() {
            return Err(ActionError::GameOver);
        }
        let actor = action.actor();
        if actor >= PLAYER_COUNT {
            return Err(ActionError::UnknownPlayer(actor));
        }
        if actor != self.current {
            return Err(ActionError::NotYourTurn {
                player: actor,
                current: self.current,
            });
        }
        if let Action::Steal { thief, target } = *action {
            if target >= PLAYER_COUNT {
                return Err(ActionError::UnknownPlayer(target));
            }
            if target == thief {
                return Err(ActionError::SelfSteal(thief));
            }
        }
        if self.deck.is_empty() {
            return Err(ActionError::DeckEmpty);
        }
        Ok(())
    }

    /// Draw the top card, resolve `action`, then either record a winner or
    /// pass the turn on. On error nothing changes.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, ActionError> {
        self.validate(&action)?;
        let card = self.deck.draw().ok_or(ActionError::DeckEmpty)?;
        debug!("{:?} draws {}", action, card);
        let outcome = match action {
            Action::Score { player } => self.resolve_score(player, card.front),
            Action::Steal { thief, target } => self.resolve_steal(thief, target, card.front),
        };
        info!("{}", outcome);

        let actor = action.actor();
        if self.check_win(actor) {
            info!("{} wins with {} points", self.players[actor].name, self.players[actor].score);
        } else {
            self.current = (self.current + 1) % PLAYER_COUNT;
        }
        Ok(outcome)
    }

    pub fn score(&mut self, player: usize) -> Result<Outcome, ActionError> {
        self.apply(Action::Score { player })
    }

    pub fn steal(&mut self, thief: usize, target: usize) -> Result<Outcome, ActionError> {
        self.apply(Action::Steal { thief, target })
    }

    /// Record `player` as the winner if their score reached the threshold.
    pub fn check_win(&mut self, player: usize) -> bool {
        if is_winning_score(self.players[player].score, self.winning_score) {
            self.winner = Some(player);
            true
        } else {
            false
        }
    }

    fn resolve_score(&mut self, player: usize, color: Color) -> Outcome {
        let p = &mut self.players[player];
        let held = p.tank.take(color);
        if held > 0 {
            let points = held + 1;
            p.score += points;
            Outcome::Scored {
                player,
                name: p.name.clone(),
                color,
                points,
            }
        } else {
            p.tank.add(color, 1);
            Outcome::Missed {
                player,
                name: p.name.clone(),
                color,
            }
        }
    }

    fn resolve_steal(&mut self, thief: usize, target: usize, color: Color) -> Outcome {
        let taken = self.players[target].tank.take(color);
        let thief_name = self.players[thief].name.clone();
        let target_name = self.players[target].name.clone();
        if taken > 0 {
            self.players[thief].tank.add(color, taken + 1);
            Outcome::Stole {
                thief,
                thief_name,
                target,
                target_name,
                color,
                count: taken,
            }
        } else {
            // a failed steal hands the drawn card to the target
            self.players[target].tank.add(color, 1);
            Outcome::StealFailed {
                thief,
                thief_name,
                target,
                target_name,
                color,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Tank;
    use crate::rng::GameRng;
    use crate::DECK_SIZE;

    fn card(id: u32, front: Color) -> Card {
        let others: Vec<Color> = crate::PALETTE.iter().copied().filter(|&c| c != front).collect();
        Card::new(id, front, [front, others[0], others[1]])
    }

    fn game_with_top(front: Color) -> GameState {
        GameState::from_parts(
            Player::seats(1),
            Deck::from_cards(vec![card(1, Color::Pink), card(0, front)]),
            10,
        )
    }

    #[test]
    fn new_game_is_dealt() {
        let g = GameState::new(&GameConfig::default(), &mut GameRng::new(1));
        assert_eq!(g.deck.len(), DECK_SIZE - 16);
        for p in &g.players {
            assert_eq!(p.tank.total(), 4);
            assert_eq!(p.score, 0);
        }
        assert_eq!(g.current, 0);
        assert!(g.winner.is_none());
        assert_eq!(g.cards_in_play(), DECK_SIZE);
    }

    #[test]
    fn score_hit_empties_color() {
        let mut g = game_with_top(Color::Red);
        g.players[0].tank = Tank::from([(Color::Red, 2)]);
        let out = g.score(0).unwrap();
        assert!(!g.players[0].tank.contains(Color::Red));
        assert_eq!(g.players[0].score, 3);
        assert_eq!(out.to_string(), "Player 1 scored 3 red cards!");
        assert_eq!(g.current, 1);
    }

    #[test]
    fn score_miss_adds_card() {
        let mut g = game_with_top(Color::Blue);
        g.players[0].tank = Tank::new();
        let out = g.score(0).unwrap();
        assert_eq!(g.players[0].tank, Tank::from([(Color::Blue, 1)]));
        assert_eq!(g.players[0].score, 0);
        assert_eq!(out.to_string(), "Player 1 missed and added a blue card.");
    }

    #[test]
    fn steal_moves_cards_plus_drawn_one() {
        let mut g = game_with_top(Color::Green);
        g.players[0].tank = Tank::new();
        g.players[2].tank = Tank::from([(Color::Green, 4)]);
        let out = g.steal(0, 2).unwrap();
        assert!(!g.players[2].tank.contains(Color::Green));
        assert_eq!(g.players[0].tank, Tank::from([(Color::Green, 5)]));
        assert_eq!(out.to_string(), "Player 1 stole 4 green cards from CPU 2!");
    }

    #[test]
    fn steal_adds_to_existing_holdings() {
        let mut g = game_with_top(Color::Green);
        g.players[0].tank = Tank::from([(Color::Green, 2)]);
        g.players[1].tank = Tank::from([(Color::Green, 1)]);
        g.steal(0, 1).unwrap();
        assert_eq!(g.players[0].tank.count(Color::Green), 4);
        assert_eq!(g.players[0].score, 0);
    }

    #[test]
    fn failed_steal_feeds_the_target() {
        let mut g = game_with_top(Color::Yellow);
        g.players[0].tank = Tank::from([(Color::Red, 1)]);
        g.players[3].tank = Tank::new();
        let out = g.steal(0, 3).unwrap();
        assert_eq!(g.players[3].tank, Tank::from([(Color::Yellow, 1)]));
        assert_eq!(g.players[0].tank, Tank::from([(Color::Red, 1)]));
        assert_eq!(
            out.to_string(),
            "Player 1 failed to steal. CPU 3 drew a yellow card instead."
        );
    }

    #[test]
    fn reaching_ten_wins_and_freezes_turn() {
        let mut g = game_with_top(Color::Red);
        g.players[0].score = 8;
        g.players[0].tank = Tank::from([(Color::Red, 1)]);
        g.score(0).unwrap();
        assert_eq!(g.winner, Some(0));
        assert_eq!(g.winner_name(), Some("Player 1"));
        assert_eq!(g.current, 0);
        assert_eq!(g.score(0), Err(ActionError::GameOver));
        assert_eq!(g.deck.len(), 1);
    }

    #[test]
    fn wrong_turn_is_rejected_without_change() {
        let mut g = game_with_top(Color::Red);
        let before = g.clone();
        assert_eq!(g.score(2), Err(ActionError::NotYourTurn { player: 2, current: 0 }));
        assert_eq!(g, before);
    }

    #[test]
    fn bad_steal_targets() {
        let mut g = game_with_top(Color::Red);
        assert_eq!(g.steal(0, 0), Err(ActionError::SelfSteal(0)));
        assert_eq!(g.steal(0, 9), Err(ActionError::UnknownPlayer(9)));
        assert_eq!(g.score(4), Err(ActionError::UnknownPlayer(4)));
    }

    #[test]
    fn empty_deck_is_a_no_op() {
        let mut g = GameState::from_parts(Player::seats(0), Deck::default(), 10);
        g.players[0].tank = Tank::from([(Color::Red, 1)]);
        let before = g.clone();
        assert_eq!(g.score(0), Err(ActionError::DeckEmpty));
        assert_eq!(g.steal(0, 1), Err(ActionError::DeckEmpty));
        assert_eq!(g, before);
        assert!(g.is_stalled());
    }

    #[test]
    fn turn_wraps_around() {
        let mut g = GameState::from_parts(
            Player::seats(0),
            Deck::from_cards((0..5).map(|i| card(i, Color::Orange)).collect()),
            10,
        );
        for expected in [1, 2, 3, 0] {
            let cur = g.current;
            g.score(cur).unwrap();
            assert_eq!(g.current, expected);
        }
    }

    #[test]
    fn winning_score_predicate() {
        assert!(!is_winning_score(9, 10));
        assert!(is_winning_score(10, 10));
        assert!(is_winning_score(13, 10));
    }
}

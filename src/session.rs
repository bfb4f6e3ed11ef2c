//! Turn controller sitting between the rules and a front end.
//!
//! A front end never mutates the [`GameState`] itself. It submits requests,
//! waits out the delays from the config, and hands back the [`Ticket`] it was
//! given. Tickets from before a reset no longer match anything, so a timer
//! that fires late cannot touch the new game.

use log::{debug, trace};
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{ActionError, ConfigError};
use crate::game::{Action, GameState, Outcome, PLAYER_COUNT};
use crate::player::Player;
use crate::policy::computer_action;
use crate::rng::{GameRng, RandomSource};
use crate::{Card, Color};

/// Handle for one pending step of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket(u32);

impl Ticket {
    pub fn id(self) -> u32 {
        self.0
    }

    pub fn from_id(id: u32) -> Self {
        Ticket(id)
    }
}

/// An action whose card has been revealed but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub action: Action,
    pub card: Card,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingAction,
    /// A computer player is pausing before it decides
    Thinking(Ticket),
    ActionResolving(Pending),
    GameOver { winner: usize },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingAction => "awaiting_action",
            Phase::Thinking(_) => "thinking",
            Phase::ActionResolving(_) => "action_resolving",
            Phase::GameOver { .. } => "game_over",
        }
    }
}

/// Read-only view of a session handed to observers and front ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub current: usize,
    pub deck_size: usize,
    /// Back of the top card, what everyone can see
    pub top_back: Option<[Color; 3]>,
    /// Card being revealed while an action resolves
    pub revealed: Option<Card>,
    pub winner: Option<String>,
    pub phase: &'static str,
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    CardRevealed(Card),
    Log(String),
    StateChanged(Snapshot),
    Winner(String),
}

type Listener = Box<dyn FnMut(&Event)>;

pub struct Session<R: RandomSource = GameRng> {
    state: GameState,
    rng: R,
    config: GameConfig,
    phase: Phase,
    next_ticket: u32,
    last_log: Option<String>,
    listeners: Vec<Listener>,
}

impl Session<GameRng> {
    /// Start a game, seeded from `config.seed` if set.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = GameRng::from_seed(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(&config, &mut rng);
        Self::resume(config, state, rng)
    }

    /// Take over an existing game state as is.
    pub fn resume(config: GameConfig, state: GameState, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        if state.current >= PLAYER_COUNT {
            return Err(ConfigError::SeatOutOfRange(state.current));
        }
        if let Some(winner) = state.winner.filter(|&w| w >= PLAYER_COUNT) {
            return Err(ConfigError::SeatOutOfRange(winner));
        }
        let phase = match state.winner {
            Some(winner) => Phase::GameOver { winner },
            None => Phase::AwaitingAction,
        };
        Ok(Self {
            state,
            rng,
            config,
            phase,
            next_ticket: 0,
            last_log: None,
            listeners: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn last_log(&self) -> Option<&str> {
        self.last_log.as_deref()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn snapshot(&self) -> Snapshot {
        let revealed = match self.phase {
            Phase::ActionResolving(p) => Some(p.card),
            _ => None,
        };
        Snapshot {
            players: self.state.players.to_vec(),
            current: self.state.current,
            deck_size: self.state.deck.len(),
            top_back: self.state.top_card().map(|c| c.back),
            revealed,
            winner: self.state.winner_name().map(str::to_owned),
            phase: self.phase.name(),
            log: self.last_log.clone(),
        }
    }

    /// Is the seat to move a computer that can act right now?
    pub fn computer_to_move(&self) -> bool {
        self.phase == Phase::AwaitingAction
            && !self.state.is_over()
            && !self.state.deck.is_empty()
            && self.state.current_player().is_computer()
    }

    pub fn request_score(&mut self, player: usize) -> Option<Ticket> {
        self.request(Action::Score { player })
    }

    pub fn request_steal(&mut self, thief: usize, target: usize) -> Option<Ticket> {
        self.request(Action::Steal { thief, target })
    }

    /// Always accepted. Deals a new game and invalidates every ticket.
    pub fn request_reset(&mut self) {
        self.reset();
    }

    /// Reveal the top card for `action`. Rejected requests change nothing.
    pub fn request(&mut self, action: Action) -> Option<Ticket> {
        match self.begin(action) {
            Ok(ticket) => Some(ticket),
            Err(e) => {
                debug!("ignoring {:?}: {}", action, e);
                None
            }
        }
    }

    fn begin(&mut self, action: Action) -> Result<Ticket, ActionError> {
        match self.phase {
            Phase::AwaitingAction => {}
            Phase::GameOver { .. } => return Err(ActionError::GameOver),
            Phase::Thinking(_) | Phase::ActionResolving(_) => {
                return Err(ActionError::ResolutionPending)
            }
        }
        self.state.validate(&action)?;
        let card = *self.state.top_card().ok_or(ActionError::DeckEmpty)?;
        let ticket = self.issue();
        self.set_phase(Phase::ActionResolving(Pending {
            action,
            card,
            ticket,
        }));
        self.emit(Event::CardRevealed(card));
        self.emit_state();
        Ok(ticket)
    }

    /// Apply the revealed action. Returns `None` for a ticket that does not
    /// match the pending action.
    pub fn resolve(&mut self, ticket: Ticket) -> Option<Outcome> {
        let pending = match self.phase {
            Phase::ActionResolving(p) if p.ticket == ticket => p,
            _ => {
                debug!("ignoring ticket {}: {}", ticket.id(), ActionError::StaleTicket);
                return None;
            }
        };
        match self.state.apply(pending.action) {
            Ok(outcome) => {
                let line = outcome.to_string();
                self.last_log = Some(line.clone());
                self.emit(Event::Log(line));
                match self.state.winner {
                    Some(winner) => {
                        self.set_phase(Phase::GameOver { winner });
                        let name = self.state.players[winner].name.clone();
                        self.emit(Event::Winner(name));
                    }
                    None => self.set_phase(Phase::AwaitingAction),
                }
                self.emit_state();
                Some(outcome)
            }
            Err(e) => {
                debug!("dropping {:?}: {}", pending.action, e);
                self.set_phase(Phase::AwaitingAction);
                None
            }
        }
    }

    /// Start the pause before a computer player decides.
    pub fn begin_computer_turn(&mut self) -> Option<Ticket> {
        if !self.computer_to_move() {
            return None;
        }
        let ticket = self.issue();
        self.set_phase(Phase::Thinking(ticket));
        Some(ticket)
    }

    /// End the pause: pick the computer's action and reveal its card.
    pub fn computer_decide(&mut self, ticket: Ticket) -> Option<Ticket> {
        match self.phase {
            Phase::Thinking(t) if t == ticket => {}
            _ => {
                debug!("ignoring ticket {}: {}", ticket.id(), ActionError::StaleTicket);
                return None;
            }
        }
        self.set_phase(Phase::AwaitingAction);
        let action = computer_action(&self.state, &mut self.rng, self.config.score_chance)?;
        self.request(action)
    }

    /// Play one computer turn with no pauses.
    pub fn step(&mut self) -> Option<Outcome> {
        let thinking = self.begin_computer_turn()?;
        let revealed = self.computer_decide(thinking)?;
        self.resolve(revealed)
    }

    /// Play computer turns until a human is to move, someone wins or the
    /// deck runs out. Returns the number of turns played.
    pub fn run_to_end(&mut self) -> usize {
        let mut turns = 0;
        while self.step().is_some() {
            turns += 1;
        }
        turns
    }

    pub fn reset(&mut self) {
        self.state = GameState::new(&self.config, &mut self.rng);
        self.set_phase(Phase::AwaitingAction);
        self.last_log = None;
        self.emit_state();
    }

    fn issue(&mut self) -> Ticket {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        Ticket(self.next_ticket)
    }

    fn set_phase(&mut self, phase: Phase) {
        trace!("{} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
    }

    fn emit_state(&mut self) {
        let snapshot = self.snapshot();
        self.emit(Event::StateChanged(snapshot));
    }

    fn emit(&mut self, event: Event) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(seed: u64) -> Session {
        Session::new(GameConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn human_score_reveals_then_applies() {
        let mut s = session(1);
        let deck_before = s.state().deck.len();
        let t = s.request_score(0).unwrap();
        assert!(matches!(s.phase(), Phase::ActionResolving(_)));
        assert_eq!(s.state().deck.len(), deck_before);
        assert_eq!(s.state().current, 0);
        assert!(s.resolve(t).is_some());
        assert_eq!(s.state().deck.len(), deck_before - 1);
        assert_eq!(s.state().current, 1);
        assert_eq!(s.phase(), Phase::AwaitingAction);
        assert!(s.last_log().is_some());
    }

    #[test]
    fn second_request_while_resolving_is_ignored() {
        let mut s = session(2);
        let t = s.request_score(0).unwrap();
        assert_eq!(s.request_steal(0, 1), None);
        assert!(s.resolve(t).is_some());
        assert_eq!(s.resolve(t), None);
    }

    #[test]
    fn reset_cancels_pending_resolution() {
        let mut s = session(3);
        let t = s.request_score(0).unwrap();
        s.request_reset();
        assert_eq!(s.resolve(t), None);
        assert_eq!(s.state().deck.len(), 89);
        assert_eq!(s.phase(), Phase::AwaitingAction);
    }

    #[test]
    fn reset_cancels_thinking_computer() {
        let mut s = session(4);
        let t = s.request_score(0).unwrap();
        s.resolve(t).unwrap();
        let thinking = s.begin_computer_turn().unwrap();
        s.reset();
        assert_eq!(s.computer_decide(thinking), None);
        assert_eq!(s.state().current, 0);
    }

    #[test]
    fn computer_does_not_move_for_humans() {
        let mut s = session(5);
        assert_eq!(s.begin_computer_turn(), None);
        assert_eq!(s.step(), None);
    }

    #[test]
    fn observers_see_reveal_log_and_state() {
        let mut s = session(6);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        s.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let t = s.request_score(0).unwrap();
        s.resolve(t).unwrap();

        let events = seen.borrow();
        assert!(matches!(events[0], Event::CardRevealed(_)));
        assert!(matches!(&events[1], Event::StateChanged(snap) if snap.revealed.is_some()));
        assert!(matches!(events[2], Event::Log(_)));
        assert!(matches!(&events[3], Event::StateChanged(snap) if snap.current == 1));
    }

    fn dealt_state() -> GameState {
        GameState::new(&GameConfig::default(), &mut GameRng::new(8))
    }

    #[test]
    fn resume_rejects_bad_score_chance() {
        let config = GameConfig {
            score_chance: 1.5,
            ..GameConfig::computer_only()
        };
        let res = Session::resume(config, dealt_state(), GameRng::new(1));
        assert!(matches!(res, Err(ConfigError::ScoreChance(_))));
    }

    #[test]
    fn resume_rejects_current_outside_the_table() {
        let mut state = dealt_state();
        state.current = 4;
        let res = Session::resume(GameConfig::default(), state, GameRng::new(1));
        assert!(matches!(res, Err(ConfigError::SeatOutOfRange(4))));
    }

    #[test]
    fn resume_rejects_winner_outside_the_table() {
        let mut state = dealt_state();
        state.winner = Some(7);
        let res = Session::resume(GameConfig::default(), state, GameRng::new(1));
        assert!(matches!(res, Err(ConfigError::SeatOutOfRange(7))));
    }

    #[test]
    fn resume_keeps_a_finished_game_over() {
        let mut state = dealt_state();
        state.winner = Some(2);
        let s = Session::resume(GameConfig::default(), state, GameRng::new(1)).unwrap();
        assert_eq!(s.phase(), Phase::GameOver { winner: 2 });
    }

    #[test]
    fn snapshot_serializes() {
        let s = session(7);
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["deck_size"], 89);
        assert_eq!(json["phase"], "awaiting_action");
        assert_eq!(json["players"][1]["name"], "CPU 1");
    }
}

//! Decision rule for computer-controlled seats.
//!
//! The computer only sees what a human would: its own tank, the other tanks
//! and the back of the top card.

use crate::game::{Action, GameState, PLAYER_COUNT};
use crate::player::Player;
use crate::rng::RandomSource;
use crate::{Card, Color};

/// Whether any color on the back of `card` is already in `player`'s tank.
pub fn can_score(player: &Player, card: &Card) -> bool {
    card.back.iter().any(|&c| player.tank.contains(c))
}

/// The other seat holding the most cards of `color`. Ties go to the lowest
/// index. `None` if nobody else holds any.
pub fn richest_target(state: &GameState, thief: usize, color: Color) -> Option<usize> {
    let mut best = None;
    let mut max_count = 0;
    for (i, p) in state.players.iter().enumerate() {
        if i == thief {
            continue;
        }
        let count = p.tank.count(color);
        if count > max_count {
            best = Some(i);
            max_count = count;
        }
    }
    best
}

/// Pick the current computer player's action.
///
/// Returns `None` when it is a human's turn, the game is over or the deck is
/// empty.
pub fn computer_action<R: RandomSource>(
    state: &GameState,
    rng: &mut R,
    score_chance: f64,
) -> Option<Action> {
    if state.is_over() {
        return None;
    }
    let me = state.current;
    let player = state.current_player();
    if !player.is_computer() {
        return None;
    }
    let top = state.top_card()?;

    let scorable = can_score(player, top);
    // always drawn, even when scoring is impossible
    let wants_score = rng.gen_bool(score_chance);
    if scorable && wants_score {
        return Some(Action::Score { player: me });
    }

    let target = richest_target(state, me, top.front).unwrap_or_else(|| {
        let others: Vec<usize> = (0..PLAYER_COUNT).filter(|&i| i != me).collect();
        others[rng.gen_index(others.len())]
    });
    Some(Action::Steal { thief: me, target })
}

use thiserror::Error;

/// Why an action was not carried out.
///
/// None of these are fatal: the session drops the request and the game state
/// stays exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("there is no player {0}")]
    UnknownPlayer(usize),

    #[error("it is player {current}'s turn, not player {player}'s")]
    NotYourTurn { player: usize, current: usize },

    #[error("player {0} cannot steal from themselves")]
    SelfSteal(usize),

    #[error("the deck is empty")]
    DeckEmpty,

    #[error("another action is still resolving")]
    ResolutionPending,

    #[error("ticket does not match the pending action")]
    StaleTicket,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("score chance must be within 0..=1, got {0}")]
    ScoreChance(f64),

    #[error("at most {max} human players, got {got}")]
    TooManyHumans { got: usize, max: usize },

    #[error("winning score must be at least 1")]
    ZeroWinningScore,

    #[error("seat {0} is not at the table")]
    SeatOutOfRange(usize),

    #[error("dealing {hand_size} cards to each player needs more than {deck} cards")]
    HandTooLarge { hand_size: usize, deck: usize },
}

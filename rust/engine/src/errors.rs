use thiserror::Error;

use crate::player::Party;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Deck is empty")]
    EmptyDeck,
    #[error("Card {value} not found in deck")]
    CardNotFoundInDeck { value: u8 },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid card value: {0} (expected 1..=11)")]
    InvalidCardValue(u8),
    #[error("It's not {actual}'s turn (expected {expected})")]
    NotPartysTurn { expected: Party, actual: Party },
    #[error("No round in progress")]
    NoRoundInProgress,
    #[error("Round {0} is still in progress")]
    RoundInProgress(u32),
    #[error("Round already over")]
    RoundAlreadyOver,
    #[error("Match is over")]
    MatchOver,
    #[error("Turn cancelled")]
    TurnCancelled,
}

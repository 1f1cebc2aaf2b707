use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GameError;

/// Total every party is racing towards. Anything above it is a bust.
pub const TARGET_TOTAL: u32 = 21;

/// Lowest card value in the deck.
pub const MIN_CARD_VALUE: u8 = 1;

/// Highest card value in the deck.
pub const MAX_CARD_VALUE: u8 = 11;

/// Number of distinct values (1 through 11).
pub const DISTINCT_VALUES: usize = (MAX_CARD_VALUE - MIN_CARD_VALUE + 1) as usize;

/// Default number of copies of each value in a freshly built deck.
pub const DEFAULT_COPIES_PER_VALUE: u8 = 4;

/// A single card. Only its numeric value matters to the rules.
///
/// Construction goes through [`CardValue::new`], so a `CardValue` is always
/// within `1..=11`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardValue(u8);

impl CardValue {
    pub fn new(value: u8) -> Result<Self, GameError> {
        if (MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GameError::InvalidCardValue(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Value widened for total arithmetic.
    pub fn points(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u8> for CardValue {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CardValue::new(value)
    }
}

impl From<CardValue> for u8 {
    fn from(card: CardValue) -> Self {
        card.0
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn all_values() -> impl Iterator<Item = CardValue> {
    (MIN_CARD_VALUE..=MAX_CARD_VALUE).map(CardValue)
}

/// Unshuffled deck holding `copies_per_value` copies of every value, grouped
/// copy by copy (1..11, 1..11, ...).
pub fn full_deck(copies_per_value: u8) -> Vec<CardValue> {
    let mut v = Vec::with_capacity(DISTINCT_VALUES * usize::from(copies_per_value));
    for _ in 0..copies_per_value {
        v.extend(all_values());
    }
    v
}

/// Sum of a sequence of cards.
pub fn total_of(cards: &[CardValue]) -> u32 {
    cards.iter().map(|c| c.points()).sum()
}

/// Distance between a total and 21, regardless of side.
pub fn distance_to_target(total: u32) -> u32 {
    total.abs_diff(TARGET_TOTAL)
}

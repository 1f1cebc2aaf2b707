use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, CardValue};
use crate::errors::GameError;

/// Ordered multiset of the card values still available for dealing.
///
/// The top of the deck is the end of the internal vector, so `draw` and
/// `peek` are O(1). Multiplicity of a value only decreases between builds.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<CardValue>,
    copies_per_value: u8,
    rng: ChaCha20Rng,
}

impl Deck {
    /// Builds a full deck with `copies_per_value` copies of 1..=11.
    /// Keeps build order until [`Deck::shuffle`] is called explicitly.
    pub fn new_with_seed(seed: u64, copies_per_value: u8) -> Result<Self, GameError> {
        let mut deck = Self {
            cards: Vec::new(),
            copies_per_value,
            rng: ChaCha20Rng::seed_from_u64(seed),
        };
        deck.build(copies_per_value)?;
        Ok(deck)
    }

    /// Repopulates the deck from scratch. Fails only when `copies_per_value`
    /// is zero, in which case the current contents are left untouched.
    pub fn build(&mut self, copies_per_value: u8) -> Result<(), GameError> {
        if copies_per_value < 1 {
            return Err(GameError::InvalidConfiguration(
                "copies_per_value must be >= 1".into(),
            ));
        }
        self.copies_per_value = copies_per_value;
        self.cards = full_deck(copies_per_value);
        Ok(())
    }

    /// Uniform permutation of the current contents.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// Build with the configured copy count, then shuffle.
    pub fn rebuild(&mut self) {
        self.cards = full_deck(self.copies_per_value);
        self.shuffle();
    }

    pub fn draw(&mut self) -> Result<CardValue, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn peek(&self) -> Result<CardValue, GameError> {
        self.cards.last().copied().ok_or(GameError::EmptyDeck)
    }

    /// Removes one physical instance of `value`. Returns `false` if none is left.
    pub fn remove_first_occurrence(&mut self, value: CardValue) -> bool {
        match self.cards.iter().position(|&c| c == value) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub fn count_of(&self, value: CardValue) -> usize {
        self.cards.iter().filter(|&&c| c == value).count()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

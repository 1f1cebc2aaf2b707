use crate::cards::{CardValue, TARGET_TOTAL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two competitors at the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    /// Human-controlled gambler
    Player,
    /// Scripted opponent
    Wizard,
}

impl Party {
    pub fn other(self) -> Party {
        match self {
            Party::Player => Party::Wizard,
            Party::Wizard => Party::Player,
        }
    }

    /// Slot in per-party arrays.
    pub fn index(self) -> usize {
        match self {
            Party::Player => 0,
            Party::Wizard => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Party::Player => "player",
            Party::Wizard => "wizard",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A party's choice on its turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Take another card
    Hit,
    /// Keep the current total
    Stand,
}

/// Most recent action of a party within the current mini-cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastAction {
    #[default]
    None,
    Stand,
    Hit,
}

impl From<Action> for LastAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Hit => LastAction::Hit,
            Action::Stand => LastAction::Stand,
        }
    }
}

/// Whether the player's cards are visible to the wizard this turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eyes {
    #[default]
    Open,
    Closed,
}

impl Eyes {
    pub fn is_open(self) -> bool {
        matches!(self, Eyes::Open)
    }
}

/// Per-party round state: hand, running total and last action.
///
/// The running total is only ever changed together with the hand inside
/// [`PartyState::receive_card`], so it always equals the sum of the cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyState {
    cards: Vec<CardValue>,
    total: u32,
    last_action: LastAction,
    eyes: Eyes,
    /// Betting placeholder; no rule reads or writes it.
    money: u32,
}

impl PartyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn last_action(&self) -> LastAction {
        self.last_action
    }

    pub fn eyes(&self) -> Eyes {
        self.eyes
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn is_bust(&self) -> bool {
        self.total > TARGET_TOTAL
    }

    pub fn receive_card(&mut self, card: CardValue) {
        self.cards.push(card);
        self.total += card.points();
    }

    pub fn set_last_action(&mut self, action: LastAction) {
        self.last_action = action;
    }

    pub fn set_eyes(&mut self, eyes: Eyes) {
        self.eyes = eyes;
    }

    /// Empties the hand and forgets the last action. Eyes reopen.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.total = 0;
        self.last_action = LastAction::None;
        self.eyes = Eyes::Open;
    }
}

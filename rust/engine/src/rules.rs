use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{distance_to_target, TARGET_TOTAL};
use crate::player::Party;

/// Winner of a round or of a whole match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerWins,
    WizardWins,
    Tie,
}

impl Outcome {
    pub fn winner(self) -> Option<Party> {
        match self {
            Outcome::PlayerWins => Some(Party::Player),
            Outcome::WizardWins => Some(Party::Wizard),
            Outcome::Tie => None,
        }
    }

    pub fn for_party(party: Party) -> Self {
        match party {
            Party::Player => Outcome::PlayerWins,
            Party::Wizard => Outcome::WizardWins,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::PlayerWins => "player",
            Outcome::WizardWins => "wizard",
            Outcome::Tie => "tie",
        })
    }
}

/// Why a round went the way it did.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    PlayerBust,
    WizardBust,
    BothBust,
    PlayerCloser,
    WizardCloser,
    EqualDistance,
}

impl Reason {
    pub fn describe(self) -> &'static str {
        match self {
            Reason::PlayerBust => "the player went over 21",
            Reason::WizardBust => "the wizard went over 21",
            Reason::BothBust => "both went over 21",
            Reason::PlayerCloser => "the player is closer to 21",
            Reason::WizardCloser => "the wizard is closer to 21",
            Reason::EqualDistance => "both are equally close to 21",
        }
    }
}

/// Decides a round from the two final totals.
///
/// A bust party loses to a non-bust one, two busts tie, and otherwise the
/// smaller distance to 21 wins.
///
/// # Examples
///
/// ```
/// use blindjack_engine::rules::{resolve_winner, Outcome};
///
/// assert_eq!(resolve_winner(22, 19), Outcome::WizardWins);
/// assert_eq!(resolve_winner(19, 22), Outcome::PlayerWins);
/// assert_eq!(resolve_winner(22, 22), Outcome::Tie);
/// assert_eq!(resolve_winner(18, 20), Outcome::WizardWins);
/// assert_eq!(resolve_winner(19, 19), Outcome::Tie);
/// ```
pub fn resolve_winner(player_total: u32, wizard_total: u32) -> Outcome {
    resolve_with_reason(player_total, wizard_total).0
}

pub fn resolve_with_reason(player_total: u32, wizard_total: u32) -> (Outcome, Reason) {
    let player_bust = player_total > TARGET_TOTAL;
    let wizard_bust = wizard_total > TARGET_TOTAL;
    match (player_bust, wizard_bust) {
        (true, true) => (Outcome::Tie, Reason::BothBust),
        (true, false) => (Outcome::WizardWins, Reason::PlayerBust),
        (false, true) => (Outcome::PlayerWins, Reason::WizardBust),
        (false, false) => {
            let p = distance_to_target(player_total);
            let w = distance_to_target(wizard_total);
            match p.cmp(&w) {
                std::cmp::Ordering::Less => (Outcome::PlayerWins, Reason::PlayerCloser),
                std::cmp::Ordering::Greater => (Outcome::WizardWins, Reason::WizardCloser),
                std::cmp::Ordering::Equal => (Outcome::Tie, Reason::EqualDistance),
            }
        }
    }
}

/// Match winner from the count of rounds each side took.
pub fn match_outcome(player_rounds: u32, wizard_rounds: u32) -> Outcome {
    match player_rounds.cmp(&wizard_rounds) {
        std::cmp::Ordering::Greater => Outcome::PlayerWins,
        std::cmp::Ordering::Less => Outcome::WizardWins,
        std::cmp::Ordering::Equal => Outcome::Tie,
    }
}

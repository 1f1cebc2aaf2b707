use serde::{Deserialize, Serialize};

use crate::player::{Action, LastAction, Party};
use crate::rules::Outcome;

/// Where the engine's state machine currently sits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the next round to be dealt
    RoundSetup,
    /// `party` owes an action
    TurnInProgress(Party),
    /// Round ended, waiting for resolution
    RoundOver,
    /// All configured rounds were played
    MatchOver,
}

/// What brought a round to an end.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEnd {
    /// `party` went over 21 on a hit
    Bust(Party),
    /// Both parties stood within one mini-cycle
    BothStood,
    /// A hit found no card to draw
    DeckExhausted,
    /// A turn was cancelled from outside
    Aborted,
}

/// Turn bookkeeping for a single round.
///
/// A mini-cycle is one action from each party. Round end from standing is
/// only evaluated once both parties have acted in the current cycle, so a
/// stand followed by the other party's first action never ends the round
/// early. A bust ends the round immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    round_index: u32,
    turn: Party,
    cycle: [LastAction; 2],
    acted: [bool; 2],
    end: Option<RoundEnd>,
}

impl RoundState {
    pub fn new(round_index: u32, starting_party: Party) -> Self {
        Self {
            round_index,
            turn: starting_party,
            cycle: [LastAction::None; 2],
            acted: [false; 2],
            end: None,
        }
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn turn(&self) -> Party {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.end.is_some()
    }

    pub fn end(&self) -> Option<RoundEnd> {
        self.end
    }

    pub fn cycle_action(&self, party: Party) -> LastAction {
        self.cycle[party.index()]
    }

    pub fn has_acted(&self, party: Party) -> bool {
        self.acted[party.index()]
    }

    /// Ends the round immediately. The first recorded cause wins.
    pub fn finish(&mut self, cause: RoundEnd) {
        if self.end.is_none() {
            self.end = Some(cause);
        }
    }

    /// Records `party`'s action, passes the turn, and closes the mini-cycle
    /// when both parties have acted. Returns the end cause if the round is over.
    pub fn record_action(&mut self, party: Party, action: Action) -> Option<RoundEnd> {
        self.cycle[party.index()] = action.into();
        self.acted[party.index()] = true;
        self.turn = party.other();

        if self.acted.iter().all(|&a| a) {
            if self.cycle.iter().all(|&a| a == LastAction::Stand) {
                self.finish(RoundEnd::BothStood);
            } else {
                self.acted = [false; 2];
                for slot in &mut self.cycle {
                    if *slot == LastAction::Hit {
                        *slot = LastAction::None;
                    }
                }
            }
        }
        self.end
    }
}

/// Running count of round results across a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    pub player: u32,
    pub wizard: u32,
    pub ties: u32,
}

impl MatchTally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWins => self.player += 1,
            Outcome::WizardWins => self.wizard += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.player + self.wizard + self.ties
    }

    pub fn leader(&self) -> Outcome {
        crate::rules::match_outcome(self.player, self.wizard)
    }
}

//! Fixed-threshold policy used to sit in the player's chair.

use blindjack_engine::engine::{SeatView, WizardDecision};
use blindjack_engine::player::{Action, Eyes};
use rand::RngCore;

use crate::AIOpponent;

/// Classic house rule: hit below the threshold, stand at or above it.
pub const DEALER_STAND_AT: u32 = 17;

/// Total from which the dealer starts hiding its hand.
const CLOSE_EYES_FROM: u32 = 12;

#[derive(Debug, Clone)]
pub struct DealerAI {
    stand_at: u32,
}

impl DealerAI {
    pub fn new() -> Self {
        Self::with_threshold(DEALER_STAND_AT)
    }

    pub fn with_threshold(stand_at: u32) -> Self {
        Self { stand_at }
    }
}

impl Default for DealerAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AIOpponent for DealerAI {
    fn get_decision(&self, view: &SeatView, _rng: &mut dyn RngCore) -> WizardDecision {
        let action = if view.own_total < self.stand_at {
            Action::Hit
        } else {
            Action::Stand
        };
        WizardDecision::seen(action, view.rival_total.unwrap_or(0))
    }

    fn choose_eyes(&self, own_total: u32, _rng: &mut dyn RngCore) -> Eyes {
        if own_total >= CLOSE_EYES_FROM {
            Eyes::Closed
        } else {
            Eyes::Open
        }
    }

    fn name(&self) -> &str {
        "DealerAI"
    }
}

//! The wizard's hit/stand policy.
//!
//! Rules, first match wins:
//!
//! 1. At 21 or more, stand.
//! 2. At exactly 20, stand, unless the player's 21 is in plain sight. Then a
//!    bold wizard occasionally hits anyway.
//! 3. With the player's eyes open, compare against the visible total: hit
//!    often when trailing by `behind_gap`, rarely when leading by
//!    `-ahead_gap`, and otherwise hit below `hit_below`.
//! 4. With closed eyes, hit for sure at low totals, stand for sure at high
//!    ones, and in between hit with a chance that falls linearly across the
//!    band and scales with boldness.
//! 5. Closed-eyes decisions flip with the profile's mistake chance.

use blindjack_engine::cards::TARGET_TOTAL;
use blindjack_engine::engine::{SeatView, WizardDecision};
use blindjack_engine::player::Action;
use blindjack_engine::profile::DifficultyProfile;
use rand::{Rng, RngCore};

use crate::estimator::estimate_rival_total;
use crate::AIOpponent;

const TWENTY: u32 = TARGET_TOTAL - 1;

#[derive(Debug, Clone)]
pub struct WizardAI {
    profile: DifficultyProfile,
}

impl WizardAI {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Hit probability when trailing a visible total by `behind_gap` or more.
    pub fn hit_when_behind(&self) -> f64 {
        let t = &self.profile.tuning;
        (t.hit_when_behind + self.profile.boldness * t.behind_boldness_gain).clamp(0.0, 1.0)
    }

    /// Closed-eyes hit probability for `own_total` before any mistake flip.
    pub fn closed_eyes_hit_chance(&self, own_total: u32) -> f64 {
        let t = &self.profile.tuning;
        if own_total <= t.sure_hit_at_or_below {
            return 1.0;
        }
        if own_total >= t.sure_stand_at_or_above {
            return 0.0;
        }
        let lo = f64::from(t.sure_hit_at_or_below + 1);
        let hi = f64::from(t.sure_stand_at_or_above - 1);
        let frac = if hi > lo {
            ((f64::from(own_total) - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((1.0 - frac) * (t.boldness_base + self.profile.boldness)).clamp(0.0, 1.0)
    }

    /// Hit or stand given the wizard's total and the player's total, seen or
    /// estimated. The flag is set when a mistake flipped the choice.
    pub fn decide(
        &self,
        own_total: u32,
        rival_value: u32,
        rival_open: bool,
        rng: &mut dyn RngCore,
    ) -> (Action, bool) {
        let t = &self.profile.tuning;

        if own_total >= TARGET_TOTAL {
            return (Action::Stand, false);
        }

        if own_total == TWENTY {
            if rival_open && rival_value == TARGET_TOTAL {
                let p = (t.bold_twenty_chance * self.profile.boldness).clamp(0.0, 1.0);
                return (hit_if(rng.random::<f64>() < p), false);
            }
            return (Action::Stand, false);
        }

        if rival_open {
            let diff = i64::from(rival_value) - i64::from(own_total);
            let hit = if diff >= i64::from(t.behind_gap) {
                rng.random::<f64>() < self.hit_when_behind()
            } else if diff <= i64::from(t.ahead_gap) {
                rng.random::<f64>() < t.hit_when_ahead
            } else {
                own_total < t.hit_below
            };
            return (hit_if(hit), false);
        }

        let p = self.closed_eyes_hit_chance(own_total);
        let base = p >= 1.0 || (p > 0.0 && rng.random::<f64>() < p);
        let mistake = rng.random::<f64>() < self.profile.mistake_chance_closed_eyes;
        if mistake {
            tracing::debug!(own_total, rival_value, "wizard mistake flip");
        }
        (hit_if(base != mistake), mistake)
    }
}

fn hit_if(hit: bool) -> Action {
    if hit {
        Action::Hit
    } else {
        Action::Stand
    }
}

impl AIOpponent for WizardAI {
    fn get_decision(&self, view: &SeatView, rng: &mut dyn RngCore) -> WizardDecision {
        let (rival_value, estimated) = match view.rival_total {
            Some(total) => (total, false),
            None => (
                estimate_rival_total(view.rival_card_count, &self.profile.tuning, rng),
                true,
            ),
        };
        let (action, mistake) = self.decide(view.own_total, rival_value, !estimated, rng);
        WizardDecision {
            action,
            rival_value,
            estimated,
            mistake,
        }
    }

    fn name(&self) -> &str {
        "WizardAI"
    }
}

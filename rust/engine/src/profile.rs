//! Difficulty profiles.
//!
//! A [`DifficultyProfile`] bundles every knob that shapes how hard a match
//! is: the wizard's boldness and error rate, the house bias applied by the
//! weighted draw, and the thresholds of the wizard's decision policy. Profiles
//! are supplied at match start and never change during the match.

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{Eyes, Party};

/// Probability that the weighted draw hands out a "good" card, keyed by who
/// draws and whether the player's eyes are open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodCardOdds {
    pub player_open: f64,
    pub player_closed: f64,
    pub wizard_open: f64,
    pub wizard_closed: f64,
}

impl GoodCardOdds {
    pub fn for_draw(&self, target: Party, eyes: Eyes) -> f64 {
        match (target, eyes) {
            (Party::Player, Eyes::Open) => self.player_open,
            (Party::Player, Eyes::Closed) => self.player_closed,
            (Party::Wizard, Eyes::Open) => self.wizard_open,
            (Party::Wizard, Eyes::Closed) => self.wizard_closed,
        }
    }
}

/// Thresholds and probabilities of the wizard's hit/stand policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionTuning {
    /// Rival lead (rival - own) at which the wizard leans towards hitting.
    pub behind_gap: i32,
    /// Hit probability when trailing by at least `behind_gap`, before boldness.
    pub hit_when_behind: f64,
    /// Added to `hit_when_behind` per unit of boldness.
    pub behind_boldness_gain: f64,
    /// Rival lead at or below which the wizard leans towards standing.
    pub ahead_gap: i32,
    /// Hit probability when leading by at least `-ahead_gap`.
    pub hit_when_ahead: f64,
    /// Otherwise hit while own total is below this.
    pub hit_below: u32,
    /// Closed eyes: always hit at or below this total.
    pub sure_hit_at_or_below: u32,
    /// Closed eyes: always stand at or above this total.
    pub sure_stand_at_or_above: u32,
    /// Closed eyes: interpolated hit chance is multiplied by `boldness_base + boldness`.
    pub boldness_base: f64,
    /// Chance, scaled by boldness, of hitting on 20 against a visible 21.
    pub bold_twenty_chance: f64,
    pub estimate_floor: u32,
    pub estimate_ceiling: u32,
}

impl Default for DecisionTuning {
    fn default() -> Self {
        Self {
            behind_gap: 3,
            hit_when_behind: 0.8,
            behind_boldness_gain: 0.2,
            ahead_gap: -2,
            hit_when_ahead: 0.2,
            hit_below: 17,
            sure_hit_at_or_below: 11,
            sure_stand_at_or_above: 19,
            boldness_base: 0.5,
            bold_twenty_chance: 0.25,
            estimate_floor: 4,
            estimate_ceiling: 21,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub name: String,
    pub boldness: f64,
    pub mistake_chance_closed_eyes: f64,
    pub good_card: GoodCardOdds,
    #[serde(default)]
    pub tuning: DecisionTuning,
}

/// Names accepted by [`DifficultyProfile::preset`].
pub const PRESET_NAMES: &[&str] = &["easy", "normal", "hard"];

impl DifficultyProfile {
    pub fn easy() -> Self {
        Self {
            name: "easy".into(),
            boldness: 0.1,
            mistake_chance_closed_eyes: 0.35,
            good_card: GoodCardOdds {
                player_open: 0.7,
                player_closed: 0.65,
                wizard_open: 0.4,
                wizard_closed: 0.35,
            },
            tuning: DecisionTuning::default(),
        }
    }

    pub fn normal() -> Self {
        Self {
            name: "normal".into(),
            boldness: 0.3,
            mistake_chance_closed_eyes: 0.2,
            good_card: GoodCardOdds {
                player_open: 0.5,
                player_closed: 0.5,
                wizard_open: 0.5,
                wizard_closed: 0.5,
            },
            tuning: DecisionTuning::default(),
        }
    }

    pub fn hard() -> Self {
        Self {
            name: "hard".into(),
            boldness: 0.5,
            mistake_chance_closed_eyes: 0.05,
            good_card: GoodCardOdds {
                player_open: 0.4,
                player_closed: 0.3,
                wizard_open: 0.65,
                wizard_closed: 0.75,
            },
            tuning: DecisionTuning::default(),
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::easy()),
            "normal" => Some(Self::normal()),
            "hard" => Some(Self::hard()),
            _ => None,
        }
    }

    pub fn good_card_probability(&self, target: Party, eyes: Eyes) -> f64 {
        self.good_card.for_draw(target, eyes)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let probabilities = [
            ("boldness", self.boldness),
            ("mistake_chance_closed_eyes", self.mistake_chance_closed_eyes),
            ("good_card.player_open", self.good_card.player_open),
            ("good_card.player_closed", self.good_card.player_closed),
            ("good_card.wizard_open", self.good_card.wizard_open),
            ("good_card.wizard_closed", self.good_card.wizard_closed),
            ("tuning.hit_when_behind", self.tuning.hit_when_behind),
            ("tuning.hit_when_ahead", self.tuning.hit_when_ahead),
            ("tuning.bold_twenty_chance", self.tuning.bold_twenty_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidConfiguration(format!(
                    "{} must be within [0, 1], got {}",
                    field, value
                )));
            }
        }
        let t = &self.tuning;
        if t.behind_boldness_gain < 0.0 || t.boldness_base < 0.0 {
            return Err(GameError::InvalidConfiguration(
                "boldness scaling factors must be non-negative".into(),
            ));
        }
        if t.sure_hit_at_or_below >= t.sure_stand_at_or_above {
            return Err(GameError::InvalidConfiguration(
                "sure_hit_at_or_below must be below sure_stand_at_or_above".into(),
            ));
        }
        if t.ahead_gap >= t.behind_gap {
            return Err(GameError::InvalidConfiguration(
                "ahead_gap must be below behind_gap".into(),
            ));
        }
        if t.estimate_floor > t.estimate_ceiling {
            return Err(GameError::InvalidConfiguration(
                "estimate_floor must not exceed estimate_ceiling".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::normal()
    }
}

//! # blindjack-ai: Scripted Opponents
//!
//! Decision policies for both seats at the blindjack table, behind a common
//! interface.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`wizard`] - The wizard's difficulty-driven hit/stand policy
//! - [`estimator`] - Rival total estimation when the player's eyes are closed
//! - [`dealer`] - Fixed-threshold policy for the player's chair in simulations
//! - [`create_ai`] - Factory function for creating AI opponents
//! - [`AiSeat`] - Adapter that lets an opponent play the engine's wizard seat
//!
//! ## Quick Start
//!
//! ```rust
//! use blindjack_ai::{create_ai, AiSeat};
//! use blindjack_engine::engine::{Engine, MatchConfig};
//! use blindjack_engine::player::{Action, Party};
//! use blindjack_engine::profile::DifficultyProfile;
//!
//! let ai = create_ai("wizard", &DifficultyProfile::hard()).unwrap();
//! let mut seat = AiSeat::new(ai, 42);
//!
//! let mut engine = Engine::new(MatchConfig { seed: Some(42), ..MatchConfig::default() }).unwrap();
//! engine.start_round().unwrap();
//! engine.apply_action(Party::Player, Action::Stand).unwrap();
//! let (_outcome, record) = engine.wizard_turn(&mut seat).unwrap();
//! println!("wizard chose {:?}", record.action);
//! ```
//!
//! ## AI Types
//!
//! - `"wizard"` - The scripted wizard, tuned by a difficulty profile
//! - `"dealer"` - Hits below 17, stands otherwise

use blindjack_engine::engine::{SeatView, WizardBrain, WizardDecision};
use blindjack_engine::player::{Action, Eyes};
use blindjack_engine::profile::DifficultyProfile;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

pub mod dealer;
pub mod estimator;
pub mod wizard;

/// Names accepted by [`create_ai`].
pub const AI_KINDS: &[&str] = &["wizard", "dealer"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("Unknown AI type: {0} (expected one of: wizard, dealer)")]
    UnknownKind(String),
}

/// Interface for scripted decision-makers.
///
/// Randomness always comes from the caller so that a seeded match replays
/// the same way.
///
/// # Example Implementation
///
/// ```rust
/// use blindjack_ai::AIOpponent;
/// use blindjack_engine::engine::{SeatView, WizardDecision};
/// use blindjack_engine::player::Action;
/// use rand::RngCore;
///
/// struct AlwaysStand;
///
/// impl AIOpponent for AlwaysStand {
///     fn get_decision(&self, view: &SeatView, _rng: &mut dyn RngCore) -> WizardDecision {
///         WizardDecision::seen(Action::Stand, view.rival_total.unwrap_or(0))
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysStand"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Decide the next action from `view`, along with what was seen or estimated.
    fn get_decision(&self, view: &SeatView, rng: &mut dyn RngCore) -> WizardDecision;

    fn get_action(&self, view: &SeatView, rng: &mut dyn RngCore) -> Action {
        self.get_decision(view, rng).action
    }

    /// Eyes to play the turn with when sitting in the player's chair.
    fn choose_eyes(&self, _own_total: u32, _rng: &mut dyn RngCore) -> Eyes {
        Eyes::Open
    }

    fn name(&self) -> &str;
}

/// Creates an opponent by kind name.
///
/// # Example
///
/// ```rust
/// use blindjack_ai::create_ai;
/// use blindjack_engine::profile::DifficultyProfile;
///
/// let ai = create_ai("dealer", &DifficultyProfile::normal()).unwrap();
/// assert_eq!(ai.name(), "DealerAI");
/// assert!(create_ai("oracle", &DifficultyProfile::normal()).is_err());
/// ```
pub fn create_ai(kind: &str, profile: &DifficultyProfile) -> Result<Box<dyn AIOpponent>, AiError> {
    match kind {
        "wizard" => Ok(Box::new(wizard::WizardAI::new(profile.clone()))),
        "dealer" => Ok(Box::new(dealer::DealerAI::new())),
        other => Err(AiError::UnknownKind(other.to_string())),
    }
}

/// An opponent plus its own seeded RNG, ready to sit at an engine or table.
pub struct AiSeat {
    ai: Box<dyn AIOpponent>,
    rng: ChaCha20Rng,
}

impl AiSeat {
    pub fn new(ai: Box<dyn AIOpponent>, seed: u64) -> Self {
        Self {
            ai,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn name(&self) -> &str {
        self.ai.name()
    }

    pub fn decide(&mut self, view: &SeatView) -> WizardDecision {
        self.ai.get_decision(view, &mut self.rng)
    }

    pub fn choose_eyes(&mut self, own_total: u32) -> Eyes {
        self.ai.choose_eyes(own_total, &mut self.rng)
    }
}

impl WizardBrain for AiSeat {
    fn choose(&mut self, view: &SeatView) -> WizardDecision {
        self.decide(view)
    }
}

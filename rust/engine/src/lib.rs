//! # blindjack-engine: Reach-21 Game Engine Core
//!
//! Rules engine for a two-party "reach 21" card game between a player and a
//! scripted wizard. Provides the round/match state machine, a difficulty-aware
//! weighted draw, and JSONL round records, all driven by seeded RNG so a match
//! can be replayed exactly.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card values 1..=11 and deck construction helpers
//! - [`deck`] - Seeded deck with draw, peek and reconciliation
//! - [`draw`] - Good/bad card pools and the weighted draw
//! - [`profile`] - Difficulty profiles and decision tuning
//! - [`player`] - Parties, actions, eyes and per-party round state
//! - [`game`] - Phases, mini-cycle tracking and match tally
//! - [`rules`] - Round and match winner resolution
//! - [`engine`] - The step-by-step match state machine
//! - [`table`] - Async driver talking to the outside over channels
//! - [`logger`] - RoundRecord serialization
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use blindjack_engine::rules::{resolve_winner, Outcome};
//!
//! // Closer to 21 wins, a bust loses to anything that did not bust
//! assert_eq!(resolve_winner(18, 20), Outcome::WizardWins);
//! assert_eq!(resolve_winner(19, 22), Outcome::PlayerWins);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The same seed gives the same shuffle:
//!
//! ```rust
//! use blindjack_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42, 4).unwrap();
//! let mut b = Deck::new_with_seed(42, 4).unwrap();
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.cards(), b.cards());
//! ```

pub mod cards;
pub mod deck;
pub mod draw;
pub mod engine;
pub mod errors;
pub mod game;
pub mod logger;
pub mod player;
pub mod profile;
pub mod rules;
pub mod table;

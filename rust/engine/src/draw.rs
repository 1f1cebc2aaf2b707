//! Card selection.
//!
//! Two ways of handing a party its next card:
//!
//! - [`DrawMode::Uniform`] takes the top of the shuffled deck.
//! - [`DrawMode::Weighted`] flips a coin weighted by the difficulty profile to
//!   decide whether the drawer should get a good or a bad card, picks
//!   uniformly inside the matching pool, and removes that value from the deck.
//!
//! Pools are built from the physical cards left in the deck, so a value with
//! three copies remaining is three times as likely as one with a single copy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{CardValue, TARGET_TOTAL};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::player::{Eyes, Party};
use crate::profile::DifficultyProfile;

/// Highest total at which even a 1 or a 2 still counts as useful.
const LOW_TOTAL: u32 = 11;
/// Cards below this are "barely helps" cards on a higher total.
const MIN_USEFUL_CARD: u8 = 3;
/// Relaxed bad pool: anything pushing the total past this.
const RELAXED_BAD_ABOVE: u32 = 18;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Uniform,
    Weighted,
}

/// Which pool the weighted draw ended up picking from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Good,
    Bad,
    /// Both pools were empty; any remaining card.
    Any,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Top,
    Pool { kind: PoolKind, wanted_good: bool },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawnCard {
    pub value: CardValue,
    pub source: DrawSource,
    /// The chosen value could not be found in the physical deck.
    pub desynced: bool,
}

/// Category revealed to feedback collaborators without the exact value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardQuality {
    Favorable,
    Unfavorable,
}

/// Finer-grained verdict on a candidate card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardAssessment {
    /// Would push the total over 21
    Bust,
    /// Helps towards 21 without busting
    Good,
    /// Legal, but barely moves a total that is already past 11
    Poor,
}

impl CardAssessment {
    pub fn quality(self) -> CardQuality {
        match self {
            CardAssessment::Good => CardQuality::Favorable,
            CardAssessment::Bust | CardAssessment::Poor => CardQuality::Unfavorable,
        }
    }
}

pub fn is_good_card(card: CardValue, total: u32) -> bool {
    total + card.points() <= TARGET_TOTAL && (card.get() >= MIN_USEFUL_CARD || total <= LOW_TOTAL)
}

pub fn is_bad_card(card: CardValue, total: u32) -> bool {
    total + card.points() > TARGET_TOTAL || (total <= LOW_TOTAL && card.get() < MIN_USEFUL_CARD)
}

pub fn assess_card(card: CardValue, total: u32) -> CardAssessment {
    if total + card.points() > TARGET_TOTAL {
        CardAssessment::Bust
    } else if is_good_card(card, total) {
        CardAssessment::Good
    } else {
        CardAssessment::Poor
    }
}

/// Cards that keep `total` at or under 21 and help decently. Relaxes to
/// "does not bust" when nothing qualifies.
pub fn good_pool(cards: &[CardValue], total: u32) -> Vec<CardValue> {
    let pool: Vec<CardValue> = cards
        .iter()
        .copied()
        .filter(|&c| is_good_card(c, total))
        .collect();
    if !pool.is_empty() {
        return pool;
    }
    cards
        .iter()
        .copied()
        .filter(|&c| total + c.points() <= TARGET_TOTAL)
        .collect()
}

/// Cards that bust `total` or are useless on a low total. Relaxes to
/// "pushes the total above 18" when nothing qualifies.
pub fn bad_pool(cards: &[CardValue], total: u32) -> Vec<CardValue> {
    let pool: Vec<CardValue> = cards
        .iter()
        .copied()
        .filter(|&c| is_bad_card(c, total))
        .collect();
    if !pool.is_empty() {
        return pool;
    }
    cards
        .iter()
        .copied()
        .filter(|&c| total + c.points() > RELAXED_BAD_ABOVE)
        .collect()
}

/// A weighted choice that has not been taken out of the deck yet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WeightedPick {
    pub value: CardValue,
    pub kind: PoolKind,
    pub wanted_good: bool,
}

/// Chooses the value a weighted draw for `target` would hand out, leaving
/// `deck` untouched.
pub fn pick_weighted<R: Rng + ?Sized>(
    deck: &Deck,
    target: Party,
    eyes: Eyes,
    current_total: u32,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Result<WeightedPick, GameError> {
    if deck.is_empty() {
        return Err(GameError::EmptyDeck);
    }

    let prob_good = profile.good_card_probability(target, eyes);
    let wanted_good = rng.random::<f64>() < prob_good;

    let good = good_pool(deck.cards(), current_total);
    let bad = bad_pool(deck.cards(), current_total);

    let (pool, kind) = match (wanted_good, good.is_empty(), bad.is_empty()) {
        (_, true, true) => (deck.cards().to_vec(), PoolKind::Any),
        (true, false, _) => (good, PoolKind::Good),
        (false, _, false) => (bad, PoolKind::Bad),
        (_, false, _) => (good, PoolKind::Good),
        _ => (bad, PoolKind::Bad),
    };

    let value = pool[rng.random_range(0..pool.len())];
    tracing::debug!(
        party = %target,
        value = value.get(),
        total = current_total,
        wanted_good,
        pool = ?kind,
        "weighted pick"
    );
    Ok(WeightedPick {
        value,
        kind,
        wanted_good,
    })
}

/// Removes a picked value from `deck` and turns it into a drawn card.
pub fn take_pick(deck: &mut Deck, pick: WeightedPick) -> DrawnCard {
    let desynced = !reconcile(deck, pick.value);
    DrawnCard {
        value: pick.value,
        source: DrawSource::Pool {
            kind: pick.kind,
            wanted_good: pick.wanted_good,
        },
        desynced,
    }
}

/// Weighted selection for `target`, removing the chosen card from `deck`.
pub fn select_card<R: Rng + ?Sized>(
    deck: &mut Deck,
    target: Party,
    eyes: Eyes,
    current_total: u32,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Result<DrawnCard, GameError> {
    let pick = pick_weighted(deck, target, eyes, current_total, profile, rng)?;
    Ok(take_pick(deck, pick))
}

/// Removes the logically chosen value from the physical deck. A miss is a
/// desync between pool and deck: logged, never fatal.
fn reconcile(deck: &mut Deck, value: CardValue) -> bool {
    if deck.remove_first_occurrence(value) {
        return true;
    }
    let err = GameError::CardNotFoundInDeck { value: value.get() };
    tracing::warn!(value = value.get(), remaining = deck.remaining(), "{}", err);
    false
}

/// Draws for `target` according to `mode`.
pub fn draw_card<R: Rng + ?Sized>(
    mode: DrawMode,
    deck: &mut Deck,
    target: Party,
    eyes: Eyes,
    current_total: u32,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Result<DrawnCard, GameError> {
    match mode {
        DrawMode::Uniform => deck.draw().map(|value| DrawnCard {
            value,
            source: DrawSource::Top,
            desynced: false,
        }),
        DrawMode::Weighted => select_card(deck, target, eyes, current_total, profile, rng),
    }
}

/// Category of the top card relative to `current_total`, without drawing it.
pub fn preview_quality(deck: &Deck, current_total: u32) -> Result<CardQuality, GameError> {
    deck.peek()
        .map(|card| assess_card(card, current_total).quality())
}

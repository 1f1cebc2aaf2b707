//! Guessing the player's total from how many cards they hold.

use std::ops::Range;

use blindjack_engine::profile::DecisionTuning;
use rand::{Rng, RngCore};

/// Raw estimate range for a rival holding `card_count` cards. More cards
/// means a higher and narrower range. The upper bound is exclusive.
pub fn estimate_range(card_count: usize) -> Range<u32> {
    match card_count {
        0 | 1 => 3..10,
        2 => 8..15,
        3 => 12..18,
        _ => 15..21,
    }
}

/// Noisy guess of the rival's total: a draw from [`estimate_range`], a jitter
/// of -1, 0 or +1, then a clamp to the tuning's estimate bounds.
pub fn estimate_rival_total(
    card_count: usize,
    tuning: &DecisionTuning,
    rng: &mut dyn RngCore,
) -> u32 {
    let base = rng.random_range(estimate_range(card_count));
    let jitter: i64 = rng.random_range(-1..=1);
    let jittered = (i64::from(base) + jitter).max(0) as u32;
    jittered.clamp(tuning.estimate_floor, tuning.estimate_ceiling)
}

//! Deal command: build and shuffle one deck, then show it.
//!
//! Output is three lines: the seed, the deck from the top down, and how
//! many copies of each value it holds.

use std::io::Write;

use blindjack_engine::cards::{DEFAULT_COPIES_PER_VALUE, all_values};
use blindjack_engine::deck::Deck;

use crate::error::CliError;

pub fn handle_deal_command(
    seed: Option<u64>,
    copies: Option<u8>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut deck = Deck::new_with_seed(seed, copies.unwrap_or(DEFAULT_COPIES_PER_VALUE))?;
    deck.shuffle();

    let order: Vec<String> = deck.cards().iter().rev().map(|c| c.to_string()).collect();
    let counts: Vec<String> = all_values()
        .map(|v| format!("{}x{}", v, deck.count_of(v)))
        .collect();

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Deck ({} cards, top first): {}", deck.remaining(), order.join(" "))?;
    writeln!(out, "Counts: {}", counts.join(" "))?;
    Ok(())
}

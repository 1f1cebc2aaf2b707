//! Plain-text rendering of cards, decisions and table events.
//!
//! Every function is pure; commands decide where the text goes.
//!
//! ```rust
//! use blindjack_cli::formatters::format_cards;
//! use blindjack_engine::cards::CardValue;
//!
//! let hand = [CardValue::new(10).unwrap(), CardValue::new(7).unwrap()];
//! assert_eq!(format_cards(&hand), "[10 7]");
//! ```

use blindjack_engine::cards::CardValue;
use blindjack_engine::draw::CardQuality;
use blindjack_engine::engine::{DecisionRecord, DeckAnomaly, MatchSummary, RoundSummary};
use blindjack_engine::game::RoundEnd;
use blindjack_engine::player::{Action, Eyes};
use blindjack_engine::rules::Outcome;
use blindjack_engine::table::TableEvent;

pub fn format_cards(cards: &[CardValue]) -> String {
    let inner: Vec<String> = cards.iter().map(|c| c.to_string()).collect();
    format!("[{}]", inner.join(" "))
}

pub fn format_action(action: Action) -> &'static str {
    match action {
        Action::Hit => "hit",
        Action::Stand => "stand",
    }
}

pub fn format_eyes(eyes: Eyes) -> &'static str {
    match eyes {
        Eyes::Open => "open",
        Eyes::Closed => "closed",
    }
}

pub fn format_outcome(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::PlayerWins => "player wins",
        Outcome::WizardWins => "wizard wins",
        Outcome::Tie => "tie",
    }
}

pub fn format_quality(quality: Option<CardQuality>) -> &'static str {
    match quality {
        Some(CardQuality::Favorable) => "Preview: the next card looks favorable",
        Some(CardQuality::Unfavorable) => "Preview: the next card looks unfavorable",
        None => "Preview: nothing to see (eyes open or deck empty)",
    }
}

pub fn format_decision(rec: &DecisionRecord) -> String {
    let seen = if rec.estimated { "guessed" } else { "saw" };
    let mut line = format!(
        "Wizard {} {} against its {} and chose to {}",
        seen,
        rec.rival_value,
        rec.own_total,
        format_action(rec.action)
    );
    if rec.mistake {
        line.push_str(" (a slip)");
    }
    line
}

pub fn format_anomaly(anomaly: DeckAnomaly) -> String {
    match anomaly {
        DeckAnomaly::Desync { value } => {
            format!("Deck desync: {} was picked but not found, drew from the top", value)
        }
        DeckAnomaly::Rebuilt => "Deck ran out and was reshuffled".to_string(),
        DeckAnomaly::Exhausted => "Deck ran out, the round ends here".to_string(),
    }
}

fn format_end(end: RoundEnd) -> &'static str {
    match end {
        RoundEnd::Bust(_) => "bust",
        RoundEnd::BothStood => "both stood",
        RoundEnd::DeckExhausted => "deck exhausted",
        RoundEnd::Aborted => "aborted",
    }
}

pub fn format_round(summary: &RoundSummary) -> String {
    format!(
        "Round {} over ({}): player {} = {}, wizard {} = {} -> {}, {}",
        summary.round,
        format_end(summary.end),
        format_cards(&summary.player_cards),
        summary.player_total,
        format_cards(&summary.wizard_cards),
        summary.wizard_total,
        format_outcome(summary.outcome),
        summary.reason.describe()
    )
}

pub fn format_match(summary: &MatchSummary) -> String {
    format!(
        "Match over after {} round(s): player {}, wizard {}, ties {} -> {}",
        summary.rounds_played,
        summary.tally.player,
        summary.tally.wizard,
        summary.tally.ties,
        format_outcome(summary.winner)
    )
}

/// One display line per table event.
pub fn format_event(event: &TableEvent) -> String {
    match event {
        TableEvent::RoundStarted { round, of } => format!("--- Round {}/{} ---", round, of),
        TableEvent::CardDealt {
            party,
            value,
            total,
        } => format!("{} draws {} (total {})", party, value, total),
        TableEvent::ActionTaken {
            party,
            action,
            total,
        } => format!("{}: {} at {}", party, format_action(*action), total),
        TableEvent::WizardDecided(rec) => format_decision(rec),
        TableEvent::CardPreviewed(quality) => format_quality(*quality).to_string(),
        TableEvent::DeckAnomaly(anomaly) => format!("WARNING: {}", format_anomaly(*anomaly)),
        TableEvent::RoundFinished(summary) => format_round(summary),
        TableEvent::MatchFinished(summary) => format_match(summary),
    }
}

use blindjack_engine::cards::{CardValue, total_of};
use blindjack_engine::game::RoundEnd;
use blindjack_engine::logger::{RoundRecord, Totals};
use blindjack_engine::rules::resolve_with_reason;

/// A consistent record for the given hands.
pub fn round(match_id: &str, round: u32, player: &[u8], wizard: &[u8]) -> RoundRecord {
    let cards = |values: &[u8]| -> Vec<CardValue> {
        values.iter().map(|&v| CardValue::new(v).unwrap()).collect()
    };
    let player_cards = cards(player);
    let wizard_cards = cards(wizard);
    let totals = Totals {
        player: total_of(&player_cards),
        wizard: total_of(&wizard_cards),
    };
    let (winner, reason) = resolve_with_reason(totals.player, totals.wizard);
    RoundRecord {
        match_id: match_id.to_string(),
        round,
        seed: Some(7),
        player_cards,
        wizard_cards,
        totals,
        winner,
        reason,
        end: RoundEnd::BothStood,
        actions: vec![],
        ts: None,
        meta: None,
    }
}

pub fn to_jsonl(records: &[RoundRecord]) -> String {
    let mut s = String::new();
    for rec in records {
        s.push_str(&serde_json::to_string(rec).unwrap());
        s.push('\n');
    }
    s
}

use blindjack_engine::cards::total_of;
use blindjack_engine::logger::RoundRecord;
use serde_json::Value;

pub fn assert_jsonl_format(content: &str) {
    assert!(
        content.is_empty() || content.ends_with('\n'),
        "JSONL must end with LF"
    );
    for (i, line) in content.lines().enumerate() {
        assert!(!line.ends_with('\r'), "CR found at line {}", i + 1);
        serde_json::from_str::<Value>(line)
            .unwrap_or_else(|e| panic!("invalid JSON at line {}: {}\n{}", i + 1, e, line));
    }
}

pub fn assert_required_fields(content: &str, fields: &[&str]) {
    let first = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .expect("no lines");
    let v: Value = serde_json::from_str(first).expect("first line must be JSON");
    let obj = v.as_object().expect("record must be object");
    for f in fields {
        assert!(obj.contains_key(*f), "missing field `{}` in {}", f, first);
    }
}

pub fn assert_valid_match_id(match_id: &str) {
    let ok = match_id.len() == 15
        && match_id.chars().take(8).all(|c| c.is_ascii_digit())
        && &match_id[8..9] == "-"
        && match_id.chars().skip(9).all(|c| c.is_ascii_digit());
    assert!(ok, "expected YYYYMMDD-NNNNNN, got {}", match_id);
}

/// Parses every line and checks that stored totals equal the card sums.
pub fn parse_consistent_records(content: &str) -> Vec<RoundRecord> {
    content
        .lines()
        .map(|line| {
            let rec: RoundRecord = serde_json::from_str(line).expect("round record");
            assert_eq!(total_of(&rec.player_cards), rec.totals.player, "{}", line);
            assert_eq!(total_of(&rec.wizard_cards), rec.totals.wizard, "{}", line);
            rec
        })
        .collect()
}

use std::fs;

use crate::helpers::assertions::{
    assert_jsonl_format, assert_required_fields, assert_valid_match_id, parse_consistent_records,
};
use crate::helpers::cli_runner::CliRunner;
use crate::helpers::records;
use serde_json::Value;
use serial_test::serial;

fn stats(path: &str) -> (i32, Value, String) {
    let res = CliRunner::new().run(&["stats", "--input", path]);
    let json = serde_json::from_str(&res.stdout).unwrap_or(Value::Null);
    (res.exit_code, json, res.stderr)
}

#[test]
#[serial]
fn sim_writes_consistent_round_log() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("logs/sim.jsonl");
    let out_str = out.to_str().unwrap();

    let res = CliRunner::new().run(&["sim", "--matches", "4", "--seed", "3", "--output", out_str]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Simulated 4 match(es), 12 round(s)"), "{}", res.stdout);
    assert!(res.stdout.contains("Wrote 12 round record(s)"));

    let content = fs::read_to_string(&out).unwrap();
    assert_jsonl_format(&content);
    assert_required_fields(
        &content,
        &["match_id", "round", "seed", "player_cards", "wizard_cards", "totals", "winner", "reason", "actions", "ts"],
    );
    let recs = parse_consistent_records(&content);
    assert_eq!(recs.len(), 12);
    for rec in &recs {
        assert_valid_match_id(&rec.match_id);
        assert!((1..=3).contains(&rec.round));
    }
    let first_match = &recs[0].match_id;
    assert_eq!(recs.iter().filter(|r| &r.match_id == first_match).count(), 3);
}

#[test]
#[serial]
fn sim_then_stats_agree() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sim.jsonl");
    let out_str = out.to_str().unwrap();
    let res = CliRunner::new().run(&["sim", "--matches", "5", "--seed", "42", "--output", out_str]);
    assert_eq!(res.exit_code, 0);

    let (code, v, _) = stats(out_str);
    assert_eq!(code, 0);
    assert_eq!(v["rounds"], 15);
    assert_eq!(v["matches"], 5);
    assert_eq!(v["corrupted"], 0);
    let decided = v["wins"]["player"].as_u64().unwrap()
        + v["wins"]["wizard"].as_u64().unwrap()
        + v["ties"].as_u64().unwrap();
    assert_eq!(decided, 15);
}

#[test]
#[serial]
fn stats_reads_compressed_logs_in_directories() {
    let dir = tempfile::tempdir().unwrap();
    let body = records::to_jsonl(&[
        records::round("20260101-000001", 1, &[10, 9], &[10, 7]),
        records::round("20260101-000001", 2, &[10, 5, 9], &[8, 8]),
    ]);
    let compressed = zstd::stream::encode_all(body.as_bytes(), 0).unwrap();
    fs::write(dir.path().join("a.jsonl.zst"), compressed).unwrap();

    let nested = dir.path().join("more");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("b.jsonl"),
        records::to_jsonl(&[records::round("20260101-000002", 1, &[9, 9], &[9, 9])]),
    )
    .unwrap();
    fs::write(nested.join("notes.txt"), "ignored").unwrap();

    let (code, v, err) = stats(dir.path().to_str().unwrap());
    assert_eq!(code, 0, "{}", err);
    assert_eq!(v["rounds"], 3);
    assert_eq!(v["matches"], 2);
    assert_eq!(v["wins"]["player"], 1);
    assert_eq!(v["busts"]["player"], 1);
    assert_eq!(v["ties"], 1);
}

#[test]
#[serial]
fn stats_flags_tampered_totals() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = records::round("20260101-000001", 1, &[10, 9], &[10, 7]);
    rec.totals.player = 21;
    let path = dir.path().join("bad.jsonl");
    fs::write(&path, records::to_jsonl(&[rec])).unwrap();

    let (code, _, err) = stats(path.to_str().unwrap());
    assert_eq!(code, 2);
    assert!(err.contains("20260101-000001 round 1"), "{}", err);
}

#[test]
#[serial]
fn stats_tolerates_truncated_last_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = records::to_jsonl(&[records::round("20260101-000001", 1, &[10, 9], &[10, 7])]);
    body.push_str("{\"match_id\":\"2026");
    let path = dir.path().join("cut.jsonl");
    fs::write(&path, body).unwrap();

    let (code, v, err) = stats(path.to_str().unwrap());
    assert_eq!(code, 0);
    assert_eq!(v["rounds"], 1);
    assert!(err.contains("WARNING: Discarded 1 incomplete final line(s)"), "{}", err);
    assert!(!err.contains("Error:"), "{}", err);
}

#[test]
#[serial]
fn stats_on_garbage_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.jsonl");
    fs::write(&path, "not json\n").unwrap();
    let (code, _, err) = stats(path.to_str().unwrap());
    assert_eq!(code, 2);
    assert!(err.contains("Invalid record"));
}

#[test]
#[serial]
fn stats_on_missing_file_fails() {
    let (code, _, err) = stats("/nonexistent/blindjack/rounds.jsonl");
    assert_eq!(code, 2);
    assert!(err.contains("Failed to read"));
}

#[test]
#[serial]
fn sim_break_after_exits_130() {
    let res = CliRunner::new().run_with_env(
        &["sim", "--matches", "10", "--seed", "1"],
        &[("BLINDJACK_SIM_BREAK_AFTER", "2")],
    );
    assert_eq!(res.exit_code, 130);
    assert!(res.stdout.contains("Interrupted after 2 match(es)"));
    assert!(!res.stderr.contains("Error:"));
}

#[test]
#[serial]
fn sim_rejects_zero_matches() {
    let res = CliRunner::new().run(&["sim", "--matches", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("matches must be >= 1"));
}

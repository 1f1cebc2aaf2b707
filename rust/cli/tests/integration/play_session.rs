use blindjack_engine::cards::CardValue;
use blindjack_engine::draw::{CardQuality, assess_card};

use crate::helpers::cli_runner::CliRunner;
use serial_test::serial;

fn play(input: &str, extra: &[&str]) -> crate::helpers::cli_runner::CliResult {
    let mut args = vec!["play", "--vs", "human", "--seed", "8"];
    args.extend_from_slice(extra);
    CliRunner::new().run_with_input(&args, input)
}

#[test]
#[serial]
fn standing_every_turn_finishes_the_match() {
    let res = play(&"o\ns\n".repeat(100), &["--rounds", "2"]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("play: vs=human rounds=2 seed=8"));
    assert!(res.stdout.contains("Eyes [o]pen or [c]losed?"));
    assert!(res.stdout.contains("Match over after 2 round(s)"), "{}", res.stdout);
}

#[test]
#[serial]
fn quitting_abandons_the_match() {
    let res = play("q\n", &["--rounds", "3"]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Match abandoned after 0 completed round(s)"), "{}", res.stdout);
    assert!(!res.stdout.contains("Match over"));
}

#[test]
#[serial]
fn end_of_input_abandons_the_match() {
    let res = play("", &["--rounds", "3"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("Match abandoned"));
}

#[test]
#[serial]
fn bad_answers_are_asked_again() {
    let mut input = String::from("maybe\n");
    input.push_str(&"o\ns\n".repeat(100));
    let res = play(&input, &["--rounds", "1"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stderr.contains("Unrecognized eyes 'maybe'"), "{}", res.stderr);
    assert!(res.stdout.contains("Match over after 1 round(s)"));
}

#[test]
#[serial]
fn preview_with_closed_eyes() {
    let res = play("c\np\nq\n", &["--rounds", "1"]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Preview: the next card looks"), "{}", res.stdout);
    assert!(res.stdout.contains("[p]review"));
    assert!(res.stdout.contains("Match abandoned"));
}

#[test]
#[serial]
fn same_seed_same_session() {
    let input = "o\ns\n".repeat(100);
    let a = play(&input, &["--rounds", "2"]);
    let b = play(&input, &["--rounds", "2"]);
    assert_eq!(a.stdout, b.stdout);
}

/// `player draws V (total T)` after `from`, as (V, T).
fn player_draw_after(stdout: &str, from: usize) -> (u8, u32) {
    let rest = &stdout[from..];
    let start = rest.find("player draws ").expect("a player draw") + "player draws ".len();
    let line = &rest[start..];
    let (value, tail) = line.split_once(" (total ").expect("draw format");
    let total = tail.split_once(')').expect("draw format").0;
    (value.parse().unwrap(), total.parse().unwrap())
}

#[test]
#[serial]
fn weighted_preview_matches_the_card_dealt() {
    let cli = CliRunner::new();
    for seed in 1..=20 {
        let seed = seed.to_string();
        let res = cli.run_with_env(
            &["play", "--vs", "human", "--rounds", "1", "--seed", &seed],
            &[
                ("BLINDJACK_PLAYER_DRAW", "weighted"),
                ("BLINDJACK_TEST_INPUT", "c\np\np\nh\nq\n"),
            ],
        );
        assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);

        let previews: Vec<&str> = res
            .stdout
            .matches("Preview: the next card looks favorable")
            .chain(res.stdout.matches("Preview: the next card looks unfavorable"))
            .collect();
        assert_eq!(previews.len(), 2, "{}", res.stdout);
        assert_eq!(previews[0], previews[1], "repeated previews disagree");

        let at = res.stdout.rfind("Preview: the next card looks").unwrap();
        let (value, total) = player_draw_after(&res.stdout, at);
        let card = CardValue::new(value).unwrap();
        let favorable = assess_card(card, total - u32::from(value)).quality()
            == CardQuality::Favorable;
        assert_eq!(
            previews[0].ends_with(" favorable"),
            favorable,
            "seed {}: {}",
            seed,
            res.stdout
        );
    }
}

#[test]
#[serial]
fn weighted_player_draw_shows_in_cfg() {
    let res = CliRunner::new().run_with_env(&["cfg"], &[("BLINDJACK_PLAYER_DRAW", "weighted")]);
    assert_eq!(res.exit_code, 0);
    let v: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(v["player_draw"]["value"], "weighted");
    assert_eq!(v["player_draw"]["source"], "env");
}

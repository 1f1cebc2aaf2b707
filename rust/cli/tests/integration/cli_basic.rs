use crate::helpers::cli_runner::CliRunner;
use serial_test::serial;

#[test]
#[serial]
fn help_and_version_exit_zero() {
    let cli = CliRunner::new();

    let help = cli.run(&["--help"]);
    assert_eq!(help.exit_code, 0);
    for cmd in ["play", "sim", "stats", "cfg", "deal"] {
        assert!(help.stdout.contains(cmd), "missing {} in help", cmd);
    }

    let version = cli.run(&["--version"]);
    assert_eq!(version.exit_code, 0);
    assert!(version.stdout.starts_with("blindjack"));
}

#[test]
#[serial]
fn missing_command_is_a_usage_error() {
    let res = CliRunner::new().run(&[]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stdout.is_empty());
    assert!(res.stderr.contains("Usage: blindjack <command> [options]"));
}

#[test]
#[serial]
fn bad_option_value_is_rejected() {
    let res = CliRunner::new().run(&["play", "--vs", "dragon"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Commands:"));
}

#[test]
#[serial]
fn deal_is_reproducible_per_seed() {
    let cli = CliRunner::new();
    let a = cli.run(&["deal", "--seed", "99"]);
    let b = cli.run(&["deal", "--seed", "99"]);
    let c = cli.run(&["deal", "--seed", "100"]);
    assert_eq!(a.exit_code, 0);
    assert_eq!(a.stdout, b.stdout);
    assert_ne!(a.stdout, c.stdout);
    assert!(a.stdout.contains("Seed: 99"));
    assert!(a.stdout.contains("Deck (44 cards, top first)"));
    assert!(a.stdout.contains("11x4"));
}

#[test]
#[serial]
fn deal_with_zero_copies_fails() {
    let res = CliRunner::new().run(&["deal", "--seed", "1", "--copies", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.starts_with("Error: "), "{}", res.stderr);
}

#[test]
#[serial]
fn watched_match_reports_every_round() {
    let res = CliRunner::new().run(&["play", "--vs", "ai", "--rounds", "3", "--seed", "5"]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.starts_with("play: vs=ai rounds=3 seed=5 difficulty=normal"));
    for r in 1..=3 {
        assert!(
            res.stdout.contains(&format!("--- Round {}/3 ---", r)),
            "{}",
            res.stdout
        );
    }
    assert!(res.stdout.contains("Match over after 3 round(s)"));
}

#[test]
#[serial]
fn watched_match_is_deterministic() {
    let cli = CliRunner::new();
    let args = ["play", "--vs", "ai", "--rounds", "4", "--seed", "77", "--difficulty", "hard"];
    let first = cli.run(&args);
    let second = cli.run(&args);
    assert_eq!(first.exit_code, 0);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
#[serial]
fn unknown_difficulty_is_a_config_error() {
    let res = CliRunner::new().run(&["play", "--vs", "ai", "--difficulty", "legendary"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("legendary"), "{}", res.stderr);
}

use std::io::Write;

use crate::helpers::cli_runner::CliRunner;
use serde_json::Value;
use serial_test::serial;
use tempfile::NamedTempFile;

fn cfg_json(env: &[(&str, &str)]) -> Value {
    let res = CliRunner::new().run_with_env(&["cfg"], env);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    serde_json::from_str(&res.stdout).expect("cfg prints JSON")
}

fn config_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn defaults_when_nothing_is_set() {
    let v = cfg_json(&[]);
    assert_eq!(v["rounds"]["value"], 3);
    assert_eq!(v["rounds"]["source"], "default");
    assert_eq!(v["copies_per_value"]["value"], 4);
    assert_eq!(v["seed"]["value"], Value::Null);
    assert_eq!(v["difficulty"]["value"], "normal");
    assert_eq!(v["profile"]["value"]["name"], "normal");
    assert_eq!(v["profile"]["source"], "default");
}

#[test]
#[serial]
fn file_overrides_defaults_and_env_overrides_file() {
    let file = config_file("rounds = 7\nseed = 11\ndifficulty = \"easy\"\n");
    let path = file.path().to_str().unwrap();

    let from_file = cfg_json(&[("BLINDJACK_CONFIG", path)]);
    assert_eq!(from_file["rounds"]["value"], 7);
    assert_eq!(from_file["rounds"]["source"], "file");
    assert_eq!(from_file["seed"]["value"], 11);
    assert_eq!(from_file["difficulty"]["source"], "file");
    assert_eq!(from_file["profile"]["source"], "file");
    assert_eq!(from_file["copies_per_value"]["source"], "default");

    let from_env = cfg_json(&[
        ("BLINDJACK_CONFIG", path),
        ("BLINDJACK_ROUNDS", "9"),
        ("BLINDJACK_DIFFICULTY", "hard"),
    ]);
    assert_eq!(from_env["rounds"]["value"], 9);
    assert_eq!(from_env["rounds"]["source"], "env");
    assert_eq!(from_env["seed"]["source"], "file");
    assert_eq!(from_env["difficulty"]["value"], "hard");
    assert_eq!(from_env["profile"]["value"]["name"], "hard");
    assert_eq!(from_env["profile"]["source"], "env");
}

#[test]
#[serial]
fn profile_table_tweaks_the_preset() {
    let file = config_file("difficulty = \"hard\"\n\n[profile]\nboldness = 0.05\n");
    let v = cfg_json(&[("BLINDJACK_CONFIG", file.path().to_str().unwrap())]);
    assert_eq!(v["profile"]["value"]["name"], "hard");
    assert_eq!(v["profile"]["value"]["boldness"], 0.05);
    assert_eq!(v["profile"]["source"], "file");
}

#[test]
#[serial]
fn unknown_profile_key_is_rejected() {
    let file = config_file("[profile]\nbravery = 1.0\n");
    let res = CliRunner::new().run_with_env(
        &["cfg"],
        &[("BLINDJACK_CONFIG", file.path().to_str().unwrap())],
    );
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("bravery"), "{}", res.stderr);
}

#[test]
#[serial]
fn malformed_env_value_fails() {
    let res = CliRunner::new().run_with_env(&["cfg"], &[("BLINDJACK_SEED", "abc")]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("BLINDJACK_SEED"), "{}", res.stderr);
}

#[test]
#[serial]
fn env_seed_drives_play() {
    let cli = CliRunner::new();
    let by_env = cli.run_with_env(&["play", "--vs", "ai"], &[("BLINDJACK_SEED", "21")]);
    let by_flag = cli.run(&["play", "--vs", "ai", "--seed", "21"]);
    assert_eq!(by_env.exit_code, 0);
    assert_eq!(by_env.stdout, by_flag.stdout);
}

use std::time::{Duration, Instant};

/// Variables that change CLI behaviour; cleared before every run so the
/// surrounding environment cannot leak into a test.
const CLI_ENV: &[&str] = &[
    "BLINDJACK_CONFIG",
    "BLINDJACK_SEED",
    "BLINDJACK_ROUNDS",
    "BLINDJACK_COPIES",
    "BLINDJACK_DIFFICULTY",
    "BLINDJACK_PLAYER_DRAW",
    "BLINDJACK_TEST_INPUT",
    "BLINDJACK_SIM_BREAK_AFTER",
];

#[derive(Debug, Default)]
pub struct CliRunner;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn apply(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for key in CLI_ENV {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
        for (key, value) in pairs {
            if !CLI_ENV.contains(key) {
                restores.push((key.to_string(), std::env::var(key).ok()));
            }
            unsafe {
                std::env::set_var(key, value);
            }
        }
        EnvGuard { restores }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            unsafe {
                match previous {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

impl CliRunner {
    pub fn new() -> Self {
        CliRunner
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_with_env(args, &[])
    }

    /// Runs with `input` standing in for stdin.
    #[allow(dead_code)]
    pub fn run_with_input(&self, args: &[&str], input: &str) -> CliResult {
        self.run_with_env(args, &[("BLINDJACK_TEST_INPUT", input)])
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        let _guard = EnvGuard::apply(env);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let start = Instant::now();
        let argv: Vec<String> = std::iter::once("blindjack".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let code = blindjack_cli::run(argv, &mut out, &mut err);
        CliResult {
            exit_code: code,
            stdout: String::from_utf8_lossy(&out).to_string(),
            stderr: String::from_utf8_lossy(&err).to_string(),
            duration: start.elapsed(),
        }
    }
}

//! # Blindjack CLI Library
//!
//! Command-line front end for the blindjack engine: play against the
//! wizard, run scripted simulations, and summarise recorded rounds.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments, dispatches to a subcommand and returns the
//! process exit code. Output streams are injected so that tests can
//! capture them.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["blindjack", "play", "--vs", "ai", "--rounds", "5"];
//! let code = blindjack_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: a match against the wizard, interactive or watched
//! - `sim`: scripted matches written out as JSONL round records
//! - `stats`: summary of round records
//! - `cfg`: resolved configuration and where each value came from
//! - `deal`: one shuffled deck, for inspection

use clap::Parser;
use std::io::{BufRead, Cursor, Write};

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod ui;
pub mod validation;

use cli::{BlindjackCli, Commands};
use commands::{
    handle_cfg_command, handle_deal_command, handle_play_command, handle_sim_command,
    handle_stats_command,
};

pub use cli::Vs;
pub use error::CliError;

/// When set, its contents replace stdin for `play --vs human`.
pub const TEST_INPUT_ENV: &str = "BLINDJACK_TEST_INPUT";

const COMMANDS: &[&str] = &["play", "sim", "stats", "cfg", "deal"];

/// Parses `args` and runs the selected command.
///
/// Returns `0` on success, `2` on any error and `130` when a command was
/// interrupted. Help and version go to `out` with code `0`.
///
/// ```
/// use std::io;
/// let args = vec!["blindjack", "deal", "--seed", "42"];
/// let code = blindjack_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match BlindjackCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(&e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play {
            vs,
            rounds,
            seed,
            difficulty,
        } => {
            let mut input: Box<dyn BufRead> = match std::env::var(TEST_INPUT_ENV) {
                Ok(text) => Box::new(Cursor::new(text.into_bytes())),
                Err(_) => Box::new(std::io::stdin().lock()),
            };
            handle_play_command(vs, rounds, seed, difficulty, out, err, input.as_mut())
        }
        Commands::Sim {
            matches,
            output,
            seed,
            difficulty,
        } => handle_sim_command(matches, output, seed, difficulty, out, err),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Deal { seed, copies } => handle_deal_command(seed, copies, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e @ CliError::Interrupted(_)) => {
            tracing::info!(reason = %e, "command interrupted");
            e.exit_code()
        }
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            e.exit_code()
        }
    }
}

fn report_parse_error(e: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            let _ = write_usage(e, err);
            exit_code::ERROR
        }
    }
}

fn write_usage(e: &clap::Error, err: &mut dyn Write) -> std::io::Result<()> {
    writeln!(err, "{}", e)?;
    writeln!(err)?;
    writeln!(err, "Blindjack CLI")?;
    writeln!(err, "Usage: blindjack <command> [options]\n")?;
    writeln!(err, "Commands:")?;
    for c in COMMANDS {
        writeln!(err, "  {}", c)?;
    }
    writeln!(err, "\nFor full help, run: blindjack --help")
}

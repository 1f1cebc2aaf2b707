//! Simulation command: scripted matches recorded round by round.
//!
//! Each match seats the wizard against the fixed-threshold dealer and is
//! played through the synchronous engine API. Match `i` uses seed
//! `base + i`, so a run can be reproduced from its base seed alone.
//!
//! # Environment Variables
//!
//! - `BLINDJACK_SIM_BREAK_AFTER`: stop after N matches and exit with the
//!   interrupted status

use std::io::Write;
use std::path::PathBuf;

use blindjack_engine::engine::{Engine, MatchConfig};
use blindjack_engine::game::MatchTally;
use blindjack_engine::logger::{MatchLogger, RoundRecord};
use blindjack_engine::table::TableEvent;

use super::{dealer_seat, play_seated_match, resolve_match_config, wizard_seat};
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use crate::validation::validate_positive;

pub const BREAK_AFTER_ENV: &str = "BLINDJACK_SIM_BREAK_AFTER";

/// Handle the sim command.
///
/// # Errors
///
/// `CliError::InvalidInput` for zero matches, `CliError::Config` for bad
/// configuration, `CliError::Io` when the output file cannot be written and
/// `CliError::Interrupted` when stopped by `BLINDJACK_SIM_BREAK_AFTER`.
pub fn handle_sim_command(
    matches: u64,
    output: Option<String>,
    seed: Option<u64>,
    difficulty: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(msg) = validate_positive("matches", matches) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }
    let template = match resolve_match_config(None, seed, difficulty.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(e);
        }
    };
    let base_seed = template.seed.unwrap_or_default();

    let mut logger = match output.as_ref().map(PathBuf::from) {
        Some(path) => {
            if let Err(e) = ensure_parent_dir(&path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            match MatchLogger::create(&path) {
                Ok(l) => Some(l),
                Err(e) => {
                    ui::write_error(err, &format!("Failed to open output file: {}", e))?;
                    return Err(CliError::Io(e));
                }
            }
        }
        None => None,
    };

    let break_after = std::env::var(BREAK_AFTER_ENV)
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    writeln!(
        out,
        "sim: matches={} rounds={} seed={} difficulty={}",
        matches, template.rounds, base_seed, template.profile.name
    )?;

    let mut rounds = MatchTally::default();
    let mut match_wins = MatchTally::default();
    let mut written = 0u64;

    for i in 0..matches {
        if break_after.is_some_and(|n| i >= n) {
            writeln!(out, "Interrupted after {} match(es)", i)?;
            return Err(CliError::Interrupted(format!(
                "stopped after {} of {} matches",
                i, matches
            )));
        }

        let match_seed = base_seed.wrapping_add(i);
        let config = MatchConfig {
            seed: Some(match_seed),
            ..template.clone()
        };
        let mut engine = Engine::new(config)?;
        let mut wizard = wizard_seat(&template.profile, match_seed)?;
        let mut dealer = dealer_seat(&template.profile, match_seed)?;
        let match_id = logger.as_mut().map(MatchLogger::next_id);
        let profile_name = template.profile.name.as_str();

        let summary = play_seated_match(&mut engine, &mut wizard, &mut dealer, |event| {
            if let (TableEvent::RoundFinished(s), Some(log), Some(id)) =
                (event, logger.as_mut(), match_id.as_deref())
            {
                log.write(&RoundRecord::from_summary(id, Some(match_seed), s, profile_name))?;
                written += 1;
            }
            Ok(())
        })?;

        rounds.player += summary.tally.player;
        rounds.wizard += summary.tally.wizard;
        rounds.ties += summary.tally.ties;
        match_wins.record(summary.winner);
        tracing::debug!(match_index = i, seed = match_seed, winner = %summary.winner, "match simulated");
    }

    writeln!(
        out,
        "Simulated {} match(es), {} round(s)",
        matches,
        rounds.rounds()
    )?;
    writeln!(
        out,
        "Rounds: player {}, wizard {}, ties {}",
        rounds.player, rounds.wizard, rounds.ties
    )?;
    writeln!(
        out,
        "Matches: player {}, wizard {}, drawn {}",
        match_wins.player, match_wins.wizard, match_wins.ties
    )?;
    if let Some(path) = &output {
        writeln!(out, "Wrote {} round record(s) to {}", written, path)?;
    }
    Ok(())
}

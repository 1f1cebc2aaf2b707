//! Aggregates round records from JSONL logs.
//!
//! The input is either one file or a directory that is searched
//! recursively for `.jsonl` and `.jsonl.zst` files. Each record is also
//! checked for internal consistency: stored totals must equal the sum of
//! the stored cards, and the stored winner must be what the totals imply.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use blindjack_engine::cards::total_of;
use blindjack_engine::logger::RoundRecord;
use blindjack_engine::rules::{Outcome, Reason, resolve_winner};

use crate::error::CliError;
use crate::io_utils::{collect_round_logs, read_text_auto};
use crate::ui;

#[derive(Debug, Default)]
struct StatsState {
    rounds: u64,
    match_ids: HashSet<String>,
    player_wins: u64,
    wizard_wins: u64,
    ties: u64,
    player_busts: u64,
    wizard_busts: u64,
    corrupted: u64,
    /// Unparseable last line without a trailing newline (interrupted write)
    incomplete: u64,
    consistent: bool,
}

/// Handle the stats command.
///
/// Prints a JSON summary to `out`. Returns an error (exit code 2) when the
/// input cannot be read, when a single file holds no usable record, or when
/// any record fails the consistency checks.
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState {
        consistent: true,
        ..StatsState::default()
    };

    if path.is_dir() {
        for file in collect_round_logs(path) {
            match read_text_auto(&file) {
                Ok(content) => consume(&content, &mut state, err)?,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "unreadable round log");
                    state.corrupted += 1;
                }
            }
        }
    } else {
        match read_text_auto(path) {
            Ok(content) => consume(&content, &mut state, err)?,
            Err(e) => {
                let msg = format!("Failed to read {}: {}", input, e);
                ui::write_error(err, &msg)?;
                return Err(CliError::Config(msg));
            }
        }
    }

    if state.corrupted > 0 {
        ui::display_warning(err, &format!("Skipped {} corrupted record(s)", state.corrupted))?;
    }
    if state.incomplete > 0 {
        ui::display_warning(
            err,
            &format!("Discarded {} incomplete final line(s)", state.incomplete),
        )?;
    }
    if !path.is_dir() && state.rounds == 0 && (state.corrupted > 0 || state.incomplete > 0) {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "rounds": state.rounds,
        "matches": state.match_ids.len(),
        "wins": { "player": state.player_wins, "wizard": state.wizard_wins },
        "ties": state.ties,
        "busts": { "player": state.player_busts, "wizard": state.wizard_busts },
        "corrupted": state.corrupted,
    });
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json)?;

    if state.consistent {
        Ok(())
    } else {
        Err(CliError::InvalidInput(
            "Round records failed consistency checks".to_string(),
        ))
    }
}

fn consume(content: &str, state: &mut StatsState, err: &mut dyn Write) -> Result<(), CliError> {
    let has_trailing_nl = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    for (i, line) in lines.iter().enumerate() {
        let rec: RoundRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(_) => {
                if i == lines.len() - 1 && !has_trailing_nl {
                    state.incomplete += 1;
                } else {
                    state.corrupted += 1;
                }
                continue;
            }
        };

        if let Some(problem) = inconsistency(&rec) {
            state.consistent = false;
            ui::write_error(
                err,
                &format!("{} at {} round {}", problem, rec.match_id, rec.round),
            )?;
            continue;
        }

        state.rounds += 1;
        state.match_ids.insert(rec.match_id.clone());
        match rec.winner {
            Outcome::PlayerWins => state.player_wins += 1,
            Outcome::WizardWins => state.wizard_wins += 1,
            Outcome::Tie => state.ties += 1,
        }
        match rec.reason {
            Reason::PlayerBust => state.player_busts += 1,
            Reason::WizardBust => state.wizard_busts += 1,
            Reason::BothBust => {
                state.player_busts += 1;
                state.wizard_busts += 1;
            }
            _ => {}
        }
    }
    Ok(())
}

fn inconsistency(rec: &RoundRecord) -> Option<&'static str> {
    if total_of(&rec.player_cards) != rec.totals.player
        || total_of(&rec.wizard_cards) != rec.totals.wizard
    {
        return Some("Total does not match cards");
    }
    if resolve_winner(rec.totals.player, rec.totals.wizard) != rec.winner {
        return Some("Winner does not match totals");
    }
    None
}

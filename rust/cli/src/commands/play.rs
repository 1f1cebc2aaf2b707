//! # Play Command
//!
//! A match against the wizard, either interactive or watched.
//!
//! - **Human**: the match runs on the async [`Table`]. This module is the
//!   presentation side: it prints every table event and answers prompts
//!   from the input stream (`o`/`c` for eyes, then `h`/`s`/`p`/`q`).
//! - **AI**: the fixed-threshold dealer takes the player's chair and the
//!   whole match is printed as it happens.
//!
//! Quitting, or reaching the end of input, abandons the current round
//! without scoring it. That still counts as a normal exit.

use std::io::{BufRead, Write};

use blindjack_ai::AiSeat;
use blindjack_engine::engine::{Engine, MatchSummary};
use blindjack_engine::errors::GameError;
use blindjack_engine::player::Eyes;
use blindjack_engine::table::{PlayerPrompt, PlayerReply, Table, TableEvent};
use tokio::sync::mpsc;

use super::{dealer_seat, play_seated_match, resolve_match_config, wizard_seat};
use crate::cli::Vs;
use crate::error::CliError;
use crate::formatters::format_event;
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_eyes, parse_turn_reply};

const EVENT_BUFFER: usize = 64;

/// Handle the play command.
///
/// `rounds`, `seed` and `difficulty` override the loaded configuration.
///
/// # Errors
///
/// `CliError::InvalidInput` for zero rounds, `CliError::Config` for an
/// unknown difficulty or an invalid configuration, and `CliError::Io` when
/// writing fails.
pub fn handle_play_command(
    vs: Vs,
    rounds: Option<u32>,
    seed: Option<u64>,
    difficulty: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let config = match resolve_match_config(rounds, seed, difficulty.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(e);
        }
    };
    let profile = config.profile.clone();
    let engine = Engine::new(config)?;
    let seed = engine.seed();

    writeln!(
        out,
        "play: vs={} rounds={} seed={} difficulty={}",
        vs.as_str(),
        engine.config().rounds,
        seed,
        profile.name
    )?;

    let mut wizard = wizard_seat(&profile, seed)?;
    match vs {
        Vs::Ai => {
            let mut engine = engine;
            let mut dealer = dealer_seat(&profile, seed)?;
            play_seated_match(&mut engine, &mut wizard, &mut dealer, |event| {
                writeln!(out, "{}", format_event(event))?;
                Ok(())
            })?;
            Ok(())
        }
        Vs::Human => {
            writeln!(
                out,
                "Get as close to 21 as you can. Close your eyes to hide your hand from the wizard."
            )?;
            play_human(engine, wizard, out, err, stdin)
        }
    }
}

fn play_human(
    engine: Engine,
    wizard: AiSeat,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let (event_tx, events) = mpsc::channel(EVENT_BUFFER);
    let (prompt_tx, prompts) = mpsc::channel(1);
    let mut table = Table::new(engine, wizard, event_tx, prompt_tx);

    let table_task = async move {
        let result = table.run_match().await;
        (result, table.into_engine())
    };
    let frontend = run_frontend(events, prompts, out, err, stdin);
    let ((result, engine), frontend) =
        runtime.block_on(async move { tokio::join!(table_task, frontend) });

    frontend?;
    finish(result, &engine, out)
}

fn finish(
    result: Result<MatchSummary, GameError>,
    engine: &Engine,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match result {
        Ok(_) => Ok(()),
        Err(GameError::TurnCancelled) => {
            let tally = engine.tally();
            writeln!(
                out,
                "Match abandoned after {} completed round(s): player {}, wizard {}, ties {}",
                engine.rounds_completed(),
                tally.player,
                tally.wizard,
                tally.ties
            )?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Presentation loop. Events already queued are always printed before the
/// next prompt is answered. Returns once the table has hung up.
async fn run_frontend(
    mut events: mpsc::Receiver<TableEvent>,
    mut prompts: mpsc::Receiver<PlayerPrompt>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => {
                writeln!(out, "{}", format_event(&event))?;
            }
            Some(prompt) = prompts.recv() => {
                answer_prompt(prompt, out, err, stdin)?;
            }
            else => break,
        }
    }
    Ok(())
}

fn answer_prompt(
    prompt: PlayerPrompt,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    match prompt {
        PlayerPrompt::ChooseEyes {
            round,
            total,
            reply,
        } => {
            let text = format!(
                "Round {}, your total is {}. Eyes [o]pen or [c]losed? ",
                round, total
            );
            // a dropped reply cancels the turn
            if let Some(eyes) = ask(&text, parse_eyes, out, err, stdin)? {
                let _ = reply.send(eyes);
            }
        }
        PlayerPrompt::ChooseAction {
            total, eyes, reply, ..
        } => {
            let text = match eyes {
                Eyes::Closed => format!(
                    "Total {} (eyes closed). [h]it, [s]tand, [p]review or [q]uit? ",
                    total
                ),
                Eyes::Open => format!("Total {}. [h]it, [s]tand or [q]uit? ", total),
            };
            let choice = ask(&text, parse_turn_reply, out, err, stdin)?;
            let _ = reply.send(choice.unwrap_or(PlayerReply::Quit));
        }
    }
    Ok(())
}

/// Prompts until `parse` accepts a line. `None` on quit or end of input.
fn ask<T>(
    text: &str,
    parse: fn(&str) -> ParseResult<T>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Option<T>, CliError> {
    loop {
        ui::prompt(out, text)?;
        let Some(line) = read_stdin_line(stdin) else {
            writeln!(out)?;
            return Ok(None);
        };
        match parse(&line) {
            ParseResult::Parsed(value) => return Ok(Some(value)),
            ParseResult::Quit => return Ok(None),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

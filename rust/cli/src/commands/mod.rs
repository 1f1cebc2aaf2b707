//! Command handlers for the `blindjack` CLI.
//!
//! Each subcommand lives in its own module and exposes
//! `handle_<name>_command(...) -> Result<(), CliError>`, writing to the
//! output streams it is given. The helpers here are shared by `play` and
//! `sim`, which both seat scripted opponents.

pub mod cfg;
pub mod deal;
pub mod play;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;

use blindjack_ai::{AiSeat, create_ai};
use blindjack_engine::engine::{Engine, MatchConfig, MatchSummary, TurnOutcome};
use blindjack_engine::game::Phase;
use blindjack_engine::player::Party;
use blindjack_engine::profile::DifficultyProfile;
use blindjack_engine::table::TableEvent;

use crate::config;
use crate::error::CliError;
use crate::validation::validate_positive;

/// Seat RNG streams are derived from the match seed with these.
const WIZARD_SEED_SALT: u64 = 0x57A2_D000_0000_0001;
const DEALER_SEED_SALT: u64 = 0xDEA1_E200_0000_0002;

/// Loaded configuration with command-line flags on top. The seed is always
/// filled in so that it can be reported and reused.
pub(crate) fn resolve_match_config(
    rounds: Option<u32>,
    seed: Option<u64>,
    difficulty: Option<&str>,
) -> Result<MatchConfig, CliError> {
    if let Some(r) = rounds {
        validate_positive("rounds", u64::from(r)).map_err(CliError::InvalidInput)?;
    }
    let cfg = config::load()?;
    let name = difficulty.unwrap_or(&cfg.difficulty);
    let config = MatchConfig {
        rounds: rounds.unwrap_or(cfg.rounds),
        copies_per_value: cfg.copies_per_value,
        seed: Some(seed.or(cfg.seed).unwrap_or_else(rand::random)),
        profile: cfg.profile_for(name)?,
        player_draw: cfg.player_draw,
        ..MatchConfig::default()
    };
    config.validate()?;
    Ok(config)
}

pub(crate) fn wizard_seat(profile: &DifficultyProfile, match_seed: u64) -> Result<AiSeat, CliError> {
    Ok(AiSeat::new(
        create_ai("wizard", profile)?,
        match_seed ^ WIZARD_SEED_SALT,
    ))
}

pub(crate) fn dealer_seat(profile: &DifficultyProfile, match_seed: u64) -> Result<AiSeat, CliError> {
    Ok(AiSeat::new(
        create_ai("dealer", profile)?,
        match_seed ^ DEALER_SEED_SALT,
    ))
}

/// Plays a whole match synchronously with `dealer` in the player's chair,
/// reporting progress as the same events the async table would send.
pub(crate) fn play_seated_match<F>(
    engine: &mut Engine,
    wizard: &mut AiSeat,
    dealer: &mut AiSeat,
    mut on_event: F,
) -> Result<MatchSummary, CliError>
where
    F: FnMut(&TableEvent) -> Result<(), CliError>,
{
    while engine.phase() != Phase::MatchOver {
        let round = engine.start_round()?;
        on_event(&TableEvent::RoundStarted {
            round,
            of: engine.config().rounds,
        })?;
        for party in [Party::Player, Party::Wizard] {
            let state = engine.party(party);
            if let Some(&value) = state.cards().first() {
                on_event(&TableEvent::CardDealt {
                    party,
                    value,
                    total: state.total(),
                })?;
            }
        }

        while let Phase::TurnInProgress(party) = engine.phase() {
            let outcome = match party {
                Party::Player => {
                    let total = engine.party(Party::Player).total();
                    engine.set_player_eyes(dealer.choose_eyes(total))?;
                    let view = engine.player_view()?;
                    let action = dealer.decide(&view).action;
                    engine.apply_action(Party::Player, action)?
                }
                Party::Wizard => {
                    let (outcome, record) = engine.wizard_turn(wizard)?;
                    on_event(&TableEvent::WizardDecided(record))?;
                    outcome
                }
            };
            for event in turn_events(&outcome) {
                on_event(&event)?;
            }
        }

        let summary = engine.finish_round()?;
        on_event(&TableEvent::RoundFinished(summary))?;
    }
    let summary = engine.match_summary();
    on_event(&TableEvent::MatchFinished(summary))?;
    Ok(summary)
}

fn turn_events(outcome: &TurnOutcome) -> Vec<TableEvent> {
    let mut events = vec![TableEvent::ActionTaken {
        party: outcome.party,
        action: outcome.action,
        total: outcome.total,
    }];
    if let Some(value) = outcome.card {
        events.push(TableEvent::CardDealt {
            party: outcome.party,
            value,
            total: outcome.total,
        });
    }
    if let Some(anomaly) = outcome.anomaly {
        events.push(TableEvent::DeckAnomaly(anomaly));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated(seed: u64, rounds: u32) -> (Engine, AiSeat, AiSeat) {
        let profile = DifficultyProfile::normal();
        let engine = Engine::new(MatchConfig {
            rounds,
            seed: Some(seed),
            profile: profile.clone(),
            ..MatchConfig::default()
        })
        .unwrap();
        (
            engine,
            wizard_seat(&profile, seed).unwrap(),
            dealer_seat(&profile, seed).unwrap(),
        )
    }

    #[test]
    fn seated_match_reports_every_round() {
        let (mut engine, mut wizard, mut dealer) = seated(5, 4);
        let mut events = Vec::new();
        let summary = play_seated_match(&mut engine, &mut wizard, &mut dealer, |e| {
            events.push(e.clone());
            Ok(())
        })
        .unwrap();

        assert_eq!(summary.rounds_played, 4);
        let started = events
            .iter()
            .filter(|e| matches!(e, TableEvent::RoundStarted { .. }))
            .count();
        let finished = events
            .iter()
            .filter(|e| matches!(e, TableEvent::RoundFinished(_)))
            .count();
        assert_eq!((started, finished), (4, 4));
        assert!(matches!(events.last(), Some(TableEvent::MatchFinished(_))));
    }

    #[test]
    fn callback_error_stops_the_match() {
        let (mut engine, mut wizard, mut dealer) = seated(6, 3);
        let result = play_seated_match(&mut engine, &mut wizard, &mut dealer, |e| match e {
            TableEvent::RoundFinished(_) => Err(CliError::Interrupted("stop".into())),
            _ => Ok(()),
        });
        assert!(matches!(result, Err(CliError::Interrupted(_))));
        assert_eq!(engine.rounds_completed(), 1);
    }

    #[test]
    fn same_seed_same_events() {
        let run = |seed| {
            let (mut engine, mut wizard, mut dealer) = seated(seed, 3);
            let mut events = Vec::new();
            play_seated_match(&mut engine, &mut wizard, &mut dealer, |e| {
                events.push(e.clone());
                Ok(())
            })
            .unwrap();
            events
        };
        assert_eq!(run(77), run(77));
    }
}

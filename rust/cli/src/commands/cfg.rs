//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, one
//! `{ "value": ..., "source": ... }` object per setting. The `profile` entry
//! is the full difficulty profile after any `[profile]` overrides.

use std::io::Write;

use crate::config;
use crate::error::CliError;
use crate::ui;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let profile = config.profile()?;
    let display = serde_json::json!({
        "rounds": {
            "value": config.rounds,
            "source": sources.rounds,
        },
        "copies_per_value": {
            "value": config.copies_per_value,
            "source": sources.copies_per_value,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "difficulty": {
            "value": config.difficulty,
            "source": sources.difficulty,
        },
        "player_draw": {
            "value": config.player_draw,
            "source": sources.player_draw,
        },
        "profile": {
            "value": profile,
            "source": sources.profile,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

//! Layered CLI configuration.
//!
//! Values start at their defaults, are overridden by the TOML file named in
//! `BLINDJACK_CONFIG`, then by the `BLINDJACK_*` environment variables.
//! Every field remembers which layer set it.
//!
//! ```toml
//! rounds = 5
//! difficulty = "hard"
//! player_draw = "weighted"
//!
//! [profile]
//! boldness = 0.4
//!
//! [profile.tuning]
//! hit_below = 16
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

use blindjack_engine::cards::DEFAULT_COPIES_PER_VALUE;
use blindjack_engine::draw::DrawMode;
use blindjack_engine::engine::{DEFAULT_ROUNDS, MatchConfig};
use blindjack_engine::profile::{DifficultyProfile, PRESET_NAMES};

use crate::error::CliError;

pub const CONFIG_ENV: &str = "BLINDJACK_CONFIG";
pub const SEED_ENV: &str = "BLINDJACK_SEED";
pub const ROUNDS_ENV: &str = "BLINDJACK_ROUNDS";
pub const COPIES_ENV: &str = "BLINDJACK_COPIES";
pub const DIFFICULTY_ENV: &str = "BLINDJACK_DIFFICULTY";
pub const PLAYER_DRAW_ENV: &str = "BLINDJACK_PLAYER_DRAW";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rounds: u32,
    pub copies_per_value: u8,
    pub seed: Option<u64>,
    pub difficulty: String,
    /// `weighted` lets the profile's player odds pick the player's cards
    pub player_draw: DrawMode,
    /// `[profile]` table from the file, applied on top of whichever preset
    /// ends up selected
    pub profile_overrides: Option<toml::Table>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            copies_per_value: DEFAULT_COPIES_PER_VALUE,
            seed: None,
            difficulty: "normal".into(),
            player_draw: DrawMode::Uniform,
            profile_overrides: None,
        }
    }
}

impl Config {
    pub fn profile(&self) -> Result<DifficultyProfile, ConfigError> {
        self.profile_for(&self.difficulty)
    }

    /// Preset `name` with the file's `[profile]` overrides applied.
    pub fn profile_for(&self, name: &str) -> Result<DifficultyProfile, ConfigError> {
        let preset = DifficultyProfile::preset(name).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Unknown difficulty '{}' (expected one of: {})",
                name,
                PRESET_NAMES.join(", ")
            ))
        })?;
        match &self.profile_overrides {
            Some(table) => apply_overrides(preset, table),
            None => Ok(preset),
        }
    }

    /// Engine settings for one match. Fails when the result would not pass
    /// [`MatchConfig::validate`].
    pub fn match_config(&self) -> Result<MatchConfig, ConfigError> {
        let config = MatchConfig {
            rounds: self.rounds,
            copies_per_value: self.copies_per_value,
            seed: self.seed,
            profile: self.profile()?,
            player_draw: self.player_draw,
            ..MatchConfig::default()
        };
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub rounds: ValueSource,
    pub copies_per_value: ValueSource,
    pub seed: ValueSource,
    pub difficulty: ValueSource,
    pub player_draw: ValueSource,
    pub profile: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            rounds: ValueSource::Default,
            copies_per_value: ValueSource::Default,
            seed: ValueSource::Default,
            difficulty: ValueSource::Default,
            player_draw: ValueSource::Default,
            profile: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.rounds {
            cfg.rounds = v;
            sources.rounds = ValueSource::File;
        }
        if let Some(v) = f.copies_per_value {
            cfg.copies_per_value = v;
            sources.copies_per_value = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.difficulty {
            cfg.difficulty = v;
            sources.difficulty = ValueSource::File;
        }
        if let Some(v) = f.player_draw {
            cfg.player_draw = v;
            sources.player_draw = ValueSource::File;
        }
        if let Some(table) = f.profile {
            cfg.profile_overrides = Some(table);
            sources.profile = ValueSource::File;
        }
    }

    if let Some(seed) = env_value(SEED_ENV) {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", SEED_ENV, seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(rounds) = env_value(ROUNDS_ENV) {
        cfg.rounds = rounds
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", ROUNDS_ENV, rounds)))?;
        sources.rounds = ValueSource::Env;
    }
    if let Some(copies) = env_value(COPIES_ENV) {
        cfg.copies_per_value = copies
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", COPIES_ENV, copies)))?;
        sources.copies_per_value = ValueSource::Env;
    }
    if let Some(name) = env_value(DIFFICULTY_ENV) {
        cfg.difficulty = name;
        sources.difficulty = ValueSource::Env;
    }
    if let Some(mode) = env_value(PLAYER_DRAW_ENV) {
        cfg.player_draw = parse_draw_mode(&mode).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Invalid {}: {} (expected uniform or weighted)",
                PLAYER_DRAW_ENV, mode
            ))
        })?;
        sources.player_draw = ValueSource::Env;
    }
    if sources.profile == ValueSource::Default {
        sources.profile = sources.difficulty;
    }

    cfg.match_config()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_draw_mode(s: &str) -> Option<DrawMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "uniform" => Some(DrawMode::Uniform),
        "weighted" => Some(DrawMode::Weighted),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    rounds: Option<u32>,
    #[serde(default)]
    copies_per_value: Option<u8>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    player_draw: Option<DrawMode>,
    #[serde(default)]
    profile: Option<toml::Table>,
}

fn apply_overrides(
    profile: DifficultyProfile,
    overrides: &toml::Table,
) -> Result<DifficultyProfile, ConfigError> {
    let invalid = |e: String| ConfigError::Invalid(format!("Invalid [profile] table: {}", e));
    let mut base = serde_json::to_value(&profile).map_err(|e| invalid(e.to_string()))?;
    let patch = serde_json::to_value(overrides).map_err(|e| invalid(e.to_string()))?;
    merge_known(&mut base, patch, "profile").map_err(invalid)?;
    serde_json::from_value(base).map_err(|e| invalid(e.to_string()))
}

/// Overlays `patch` onto `base`, refusing keys `base` does not have.
fn merge_known(base: &mut Value, patch: Value, path: &str) -> Result<(), String> {
    match (base, patch) {
        (Value::Object(target), Value::Object(fields)) => {
            for (key, value) in fields {
                let nested = format!("{}.{}", path, key);
                let slot = target
                    .get_mut(&key)
                    .ok_or_else(|| format!("unknown field {}", nested))?;
                merge_known(slot, value, &nested)?;
            }
            Ok(())
        }
        (Value::Object(_), _) => Err(format!("{} must be a table", path)),
        (slot, value) => {
            *slot = value;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write as _;

    fn clear_env() {
        unsafe {
            for key in [
                CONFIG_ENV,
                SEED_ENV,
                ROUNDS_ENV,
                COPIES_ENV,
                DIFFICULTY_ENV,
                PLAYER_DRAW_ENV,
            ] {
                std::env::remove_var(key);
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    #[serial]
    fn defaults_without_file_or_env() {
        clear_env();
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.sources, ConfigSources::default());
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        clear_env();
        let file = write_config("rounds = 5\nseed = 11\ndifficulty = \"easy\"\n");
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
            std::env::set_var(SEED_ENV, "99");
        }
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config.rounds, 5);
        assert_eq!(resolved.sources.rounds, ValueSource::File);
        assert_eq!(resolved.config.seed, Some(99));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.difficulty, "easy");
        assert_eq!(resolved.sources.profile, ValueSource::File);
        clear_env();
    }

    #[test]
    #[serial]
    fn profile_table_overrides_single_numbers() {
        clear_env();
        let file = write_config(
            "difficulty = \"hard\"\n[profile]\nboldness = 0.9\n[profile.tuning]\nhit_below = 15\n",
        );
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
        }
        let cfg = load().unwrap();
        let profile = cfg.profile().unwrap();
        assert_eq!(profile.name, "hard");
        assert!((profile.boldness - 0.9).abs() < 1e-9);
        assert_eq!(profile.tuning.hit_below, 15);
        assert_eq!(
            profile.mistake_chance_closed_eyes,
            DifficultyProfile::hard().mistake_chance_closed_eyes
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_profile_field_is_rejected() {
        clear_env();
        let file = write_config("[profile]\nbravery = 0.5\n");
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
        }
        let err = load().unwrap_err();
        assert!(err.to_string().contains("profile.bravery"), "{}", err);
        clear_env();
    }

    #[test]
    #[serial]
    fn out_of_range_probability_is_invalid() {
        clear_env();
        let file = write_config("[profile]\nmistake_chance_closed_eyes = 1.5\n");
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
        }
        assert!(matches!(load(), Err(ConfigError::Invalid(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn bad_env_values_are_reported() {
        clear_env();
        unsafe {
            std::env::set_var(ROUNDS_ENV, "many");
        }
        let err = load().unwrap_err();
        assert!(err.to_string().contains(ROUNDS_ENV));

        clear_env();
        unsafe {
            std::env::set_var(ROUNDS_ENV, "0");
        }
        assert!(matches!(load(), Err(ConfigError::Invalid(_))));

        clear_env();
        unsafe {
            std::env::set_var(DIFFICULTY_ENV, "nightmare");
        }
        assert!(load().unwrap_err().to_string().contains("nightmare"));
        clear_env();
    }

    #[test]
    #[serial]
    fn player_draw_from_file_then_env() {
        clear_env();
        let file = write_config("player_draw = \"weighted\"\n");
        unsafe {
            std::env::set_var(CONFIG_ENV, file.path());
        }
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config.player_draw, DrawMode::Weighted);
        assert_eq!(resolved.sources.player_draw, ValueSource::File);
        assert_eq!(
            resolved.config.match_config().unwrap().player_draw,
            DrawMode::Weighted
        );

        unsafe {
            std::env::set_var(PLAYER_DRAW_ENV, "Uniform");
        }
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config.player_draw, DrawMode::Uniform);
        assert_eq!(resolved.sources.player_draw, ValueSource::Env);

        unsafe {
            std::env::set_var(PLAYER_DRAW_ENV, "rigged");
        }
        let err = load().unwrap_err();
        assert!(err.to_string().contains(PLAYER_DRAW_ENV), "{}", err);
        clear_env();
    }

    #[test]
    fn profile_for_uses_named_preset() {
        let cfg = Config::default();
        assert_eq!(cfg.profile_for("easy").unwrap(), DifficultyProfile::easy());
        assert!(cfg.profile_for("legendary").is_err());
    }
}

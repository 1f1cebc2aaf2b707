//! Command-line definitions parsed by clap.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "blindjack",
    version,
    about = "Blindjack: race to 21 against a wizard who may be peeking"
)]
pub struct BlindjackCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a match against the wizard
    Play {
        #[arg(long, value_enum, default_value_t = Vs::Human)]
        vs: Vs,
        /// Rounds in the match (overrides configuration)
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Difficulty preset: easy, normal or hard
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Play scripted matches and record every round
    Sim {
        #[arg(long)]
        matches: u64,
        /// JSONL file receiving one record per round
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Summarise round records (file or directory, .jsonl or .jsonl.zst)
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// Build and shuffle a deck, then print it
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        copies: Option<u8>,
    },
}

/// Who sits in the player's chair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Vs {
    Human,
    Ai,
}

impl Vs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vs::Human => "human",
            Vs::Ai => "ai",
        }
    }
}

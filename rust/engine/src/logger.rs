use serde::{Deserialize, Serialize};

use crate::cards::CardValue;
use crate::engine::RoundSummary;
use crate::game::RoundEnd;
use crate::player::{Action, Eyes, Party};
use crate::rules::{Outcome, Reason};

/// One action taken during a round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub party: Party,
    pub action: Action,
    /// Player's eyes at the time of the action
    pub eyes: Eyes,
    /// Card received on a hit, if the deck had one
    #[serde(default)]
    pub card: Option<CardValue>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub player: u32,
    pub wizard: u32,
}

/// A resolved round as stored in JSONL round logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Match identifier (format: YYYYMMDD-NNNNNN)
    pub match_id: String,
    /// 1-based round index within the match
    pub round: u32,
    /// Seed the match was played with
    pub seed: Option<u64>,
    pub player_cards: Vec<CardValue>,
    pub wizard_cards: Vec<CardValue>,
    pub totals: Totals,
    pub winner: Outcome,
    pub reason: Reason,
    #[serde(default = "default_end")]
    pub end: RoundEnd,
    pub actions: Vec<ActionRecord>,
    /// RFC3339 timestamp, filled in by the logger when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

fn default_end() -> RoundEnd {
    RoundEnd::BothStood
}

impl RoundRecord {
    pub fn from_summary(
        match_id: &str,
        seed: Option<u64>,
        summary: &RoundSummary,
        profile_name: &str,
    ) -> Self {
        Self {
            match_id: match_id.to_string(),
            round: summary.round,
            seed,
            player_cards: summary.player_cards.clone(),
            wizard_cards: summary.wizard_cards.clone(),
            totals: Totals {
                player: summary.player_total,
                wizard: summary.wizard_total,
            },
            winner: summary.outcome,
            reason: summary.reason,
            end: summary.end,
            actions: summary.actions.clone(),
            ts: None,
            meta: Some(serde_json::json!({ "profile": profile_name })),
        }
    }
}

pub fn format_match_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes [`RoundRecord`]s as LF-terminated JSON lines and hands out match ids.
pub struct MatchLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl MatchLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that writes nothing and numbers ids under a fixed date.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_match_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

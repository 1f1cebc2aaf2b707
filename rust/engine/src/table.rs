//! Async driver for one match.
//!
//! A [`Table`] owns the [`Engine`] and is the only task that touches it.
//! Presentation receives [`TableEvent`]s; the player's choices arrive as
//! replies to [`PlayerPrompt`]s, each carrying a `oneshot` sender. The wizard
//! decides synchronously through its [`WizardBrain`].
//!
//! Dropping the prompt receiver, dropping a reply sender, or answering
//! [`PlayerReply::Quit`] cancels the turn: the round is aborted before any
//! card is applied and [`Table::run_match`] returns
//! [`GameError::TurnCancelled`].

use tokio::sync::{mpsc, oneshot};

use crate::cards::CardValue;
use crate::draw::CardQuality;
use crate::engine::{
    DecisionRecord, DeckAnomaly, Engine, MatchSummary, RoundSummary, TurnOutcome, WizardBrain,
};
use crate::errors::GameError;
use crate::game::Phase;
use crate::player::{Action, Eyes, Party};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    RoundStarted { round: u32, of: u32 },
    CardDealt { party: Party, value: CardValue, total: u32 },
    ActionTaken { party: Party, action: Action, total: u32 },
    WizardDecided(DecisionRecord),
    /// Answer to [`PlayerReply::Preview`]; `None` when no preview is offered
    CardPreviewed(Option<CardQuality>),
    DeckAnomaly(DeckAnomaly),
    RoundFinished(RoundSummary),
    MatchFinished(MatchSummary),
}

#[derive(Debug)]
pub enum PlayerPrompt {
    /// Sent once at the start of each player turn
    ChooseEyes {
        round: u32,
        total: u32,
        reply: oneshot::Sender<Eyes>,
    },
    /// Sent until the player commits an action or quits
    ChooseAction {
        round: u32,
        total: u32,
        eyes: Eyes,
        reply: oneshot::Sender<PlayerReply>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerReply {
    /// Ask for the next card's category, then choose again
    Preview,
    Act(Action),
    Quit,
}

pub struct Table<W: WizardBrain> {
    engine: Engine,
    wizard: W,
    events: mpsc::Sender<TableEvent>,
    prompts: mpsc::Sender<PlayerPrompt>,
}

impl<W: WizardBrain> Table<W> {
    pub fn new(
        engine: Engine,
        wizard: W,
        events: mpsc::Sender<TableEvent>,
        prompts: mpsc::Sender<PlayerPrompt>,
    ) -> Self {
        Self {
            engine,
            wizard,
            events,
            prompts,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    async fn emit(&self, event: TableEvent) {
        if self.events.send(event).await.is_err() {
            tracing::trace!("presentation receiver dropped");
        }
    }

    /// Plays rounds until the match is over.
    pub async fn run_match(&mut self) -> Result<MatchSummary, GameError> {
        while self.engine.phase() != Phase::MatchOver {
            self.play_round().await?;
        }
        let summary = self.engine.match_summary();
        self.emit(TableEvent::MatchFinished(summary)).await;
        Ok(summary)
    }

    pub async fn play_round(&mut self) -> Result<RoundSummary, GameError> {
        let round = self.engine.start_round()?;
        self.emit(TableEvent::RoundStarted {
            round,
            of: self.engine.config().rounds,
        })
        .await;

        for party in [Party::Player, Party::Wizard] {
            let state = self.engine.party(party);
            if let Some(&value) = state.cards().first() {
                let total = state.total();
                self.emit(TableEvent::CardDealt {
                    party,
                    value,
                    total,
                })
                .await;
            }
        }

        while let Phase::TurnInProgress(party) = self.engine.phase() {
            let outcome = match party {
                Party::Player => match self.player_turn().await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        self.engine.abort_round()?;
                        return Err(e);
                    }
                },
                Party::Wizard => {
                    let (outcome, record) = self.engine.wizard_turn(&mut self.wizard)?;
                    self.emit(TableEvent::WizardDecided(record)).await;
                    outcome
                }
            };
            self.report(&outcome).await;
        }

        let summary = self.engine.finish_round()?;
        self.emit(TableEvent::RoundFinished(summary.clone())).await;
        Ok(summary)
    }

    async fn player_turn(&mut self) -> Result<TurnOutcome, GameError> {
        let round = self.engine.current_round().ok_or(GameError::NoRoundInProgress)?;
        let total = self.engine.party(Party::Player).total();

        let (tx, rx) = oneshot::channel();
        self.prompts
            .send(PlayerPrompt::ChooseEyes {
                round,
                total,
                reply: tx,
            })
            .await
            .map_err(|_| GameError::TurnCancelled)?;
        let eyes = rx.await.map_err(|_| GameError::TurnCancelled)?;
        self.engine.set_player_eyes(eyes)?;

        loop {
            let (tx, rx) = oneshot::channel();
            self.prompts
                .send(PlayerPrompt::ChooseAction {
                    round,
                    total,
                    eyes,
                    reply: tx,
                })
                .await
                .map_err(|_| GameError::TurnCancelled)?;

            match rx.await.map_err(|_| GameError::TurnCancelled)? {
                PlayerReply::Preview => {
                    let quality = self.engine.preview_next_card()?;
                    self.emit(TableEvent::CardPreviewed(quality)).await;
                }
                PlayerReply::Act(action) => {
                    return self.engine.apply_action(Party::Player, action);
                }
                PlayerReply::Quit => {
                    tracing::debug!(round, "player quit");
                    return Err(GameError::TurnCancelled);
                }
            }
        }
    }

    async fn report(&self, outcome: &TurnOutcome) {
        self.emit(TableEvent::ActionTaken {
            party: outcome.party,
            action: outcome.action,
            total: outcome.total,
        })
        .await;
        if let Some(value) = outcome.card {
            self.emit(TableEvent::CardDealt {
                party: outcome.party,
                value,
                total: outcome.total,
            })
            .await;
        }
        if let Some(anomaly) = outcome.anomaly {
            self.emit(TableEvent::DeckAnomaly(anomaly)).await;
        }
    }
}

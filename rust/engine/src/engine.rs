use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{CardValue, DEFAULT_COPIES_PER_VALUE};
use crate::deck::Deck;
use crate::draw::{
    assess_card, draw_card, pick_weighted, preview_quality, take_pick, CardQuality, DrawMode,
    DrawnCard, WeightedPick,
};
use crate::errors::GameError;
use crate::game::{MatchTally, Phase, RoundEnd, RoundState};
use crate::logger::ActionRecord;
use crate::player::{Action, Eyes, Party, PartyState};
use crate::profile::DifficultyProfile;
use crate::rules::{resolve_with_reason, Outcome, Reason};

/// Default number of rounds in a match.
pub const DEFAULT_ROUNDS: u32 = 3;

/// Mixed into the match seed so the draw stream differs from the shuffle stream.
const DRAW_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// What a hit does when the deck has run dry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDeckPolicy {
    /// End the round and resolve it with the current totals
    #[default]
    EndRound,
    /// Rebuild and reshuffle the deck, then retry the draw once
    Rebuild,
}

/// Match-level settings, fixed once the engine is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub rounds: u32,
    pub copies_per_value: u8,
    pub seed: Option<u64>,
    pub profile: DifficultyProfile,
    pub player_draw: DrawMode,
    pub wizard_draw: DrawMode,
    pub empty_deck: EmptyDeckPolicy,
    pub starting_party: Party,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            copies_per_value: DEFAULT_COPIES_PER_VALUE,
            seed: None,
            profile: DifficultyProfile::default(),
            player_draw: DrawMode::Uniform,
            wizard_draw: DrawMode::Weighted,
            empty_deck: EmptyDeckPolicy::EndRound,
            starting_party: Party::Player,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rounds == 0 {
            return Err(GameError::InvalidConfiguration(
                "rounds must be >= 1".into(),
            ));
        }
        if self.copies_per_value == 0 {
            return Err(GameError::InvalidConfiguration(
                "copies_per_value must be >= 1".into(),
            ));
        }
        self.profile.validate()
    }
}

/// What a seat gets to see before deciding.
///
/// For the wizard, `rival_total` is only filled in while the player's eyes
/// are open; with closed eyes it has to work from `rival_card_count`. The
/// player always sees the wizard's total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatView {
    pub round: u32,
    pub own_total: u32,
    pub own_cards: Vec<CardValue>,
    pub rival_total: Option<u32>,
    pub rival_card_count: usize,
    pub rival_eyes: Eyes,
}

/// A wizard decision plus the reasoning the decision log keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardDecision {
    pub action: Action,
    /// Rival total seen (eyes open) or estimated (eyes closed)
    pub rival_value: u32,
    pub estimated: bool,
    /// The policy flipped its own choice
    pub mistake: bool,
}

impl WizardDecision {
    /// Decision made on a visible rival total without any flip.
    pub fn seen(action: Action, rival_value: u32) -> Self {
        Self {
            action,
            rival_value,
            estimated: false,
            mistake: false,
        }
    }
}

/// Decision seam between the engine and whatever plays the wizard.
pub trait WizardBrain {
    fn choose(&mut self, view: &SeatView) -> WizardDecision;
}

impl<F> WizardBrain for F
where
    F: FnMut(&SeatView) -> WizardDecision,
{
    fn choose(&mut self, view: &SeatView) -> WizardDecision {
        self(view)
    }
}

/// Entry of the per-match wizard decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub round: u32,
    pub own_total: u32,
    pub rival_value: u32,
    pub estimated: bool,
    pub action: Action,
    pub mistake: bool,
}

/// Deck trouble surfaced alongside an otherwise normal turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckAnomaly {
    /// The weighted pick was not physically present in the deck
    Desync { value: CardValue },
    /// The deck ran out and was rebuilt before drawing
    Rebuilt,
    /// The deck ran out and the round was ended
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub party: Party,
    pub action: Action,
    /// Card received on a hit
    pub card: Option<CardValue>,
    /// The party's total after the action
    pub total: u32,
    pub anomaly: Option<DeckAnomaly>,
    /// Set once the action ended the round
    pub round_end: Option<RoundEnd>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub player_cards: Vec<CardValue>,
    pub wizard_cards: Vec<CardValue>,
    pub player_total: u32,
    pub wizard_total: u32,
    pub outcome: Outcome,
    pub reason: Reason,
    pub end: RoundEnd,
    pub actions: Vec<ActionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub rounds_played: u32,
    pub tally: MatchTally,
    pub winner: Outcome,
}

/// Round and match state machine for one table.
///
/// The engine is the only writer of the deck and both party states. Callers
/// drive it one step at a time:
///
/// ```
/// use blindjack_engine::engine::{Engine, MatchConfig};
/// use blindjack_engine::game::Phase;
/// use blindjack_engine::player::{Action, Party};
///
/// let config = MatchConfig { rounds: 1, seed: Some(7), ..MatchConfig::default() };
/// let mut engine = Engine::new(config).unwrap();
/// engine.start_round().unwrap();
/// engine.apply_action(Party::Player, Action::Stand).unwrap();
/// engine.apply_action(Party::Wizard, Action::Stand).unwrap();
/// assert_eq!(engine.phase(), Phase::RoundOver);
///
/// let summary = engine.finish_round().unwrap();
/// assert_eq!(summary.round, 1);
/// assert_eq!(engine.phase(), Phase::MatchOver);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: MatchConfig,
    seed: u64,
    deck: Deck,
    /// Randomness for weighted draws
    rng: ChaCha20Rng,
    /// Weighted pick fixed by a preview, delivered by the player's next hit
    pending_pick: Option<WeightedPick>,
    parties: [PartyState; 2],
    round: Option<RoundState>,
    rounds_completed: u32,
    tally: MatchTally,
    match_over: bool,
    actions: Vec<ActionRecord>,
    decisions: Vec<DecisionRecord>,
    anomalies: u32,
}

impl Engine {
    /// Validates `config` and sets up an engine waiting for its first round.
    pub fn new(config: MatchConfig) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let deck = Deck::new_with_seed(seed, config.copies_per_value)?;
        Ok(Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ DRAW_STREAM_SALT),
            seed,
            deck,
            pending_pick: None,
            config,
            parties: [PartyState::new(), PartyState::new()],
            round: None,
            rounds_completed: 0,
            tally: MatchTally::default(),
            match_over: false,
            actions: Vec::new(),
            decisions: Vec::new(),
            anomalies: 0,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seed actually in use, including a randomly chosen one.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn party(&self, party: Party) -> &PartyState {
        &self.parties[party.index()]
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn tally(&self) -> MatchTally {
        self.tally
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// 1-based index of the round on the table, if any.
    pub fn current_round(&self) -> Option<u32> {
        self.round.as_ref().map(RoundState::round_index)
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.decisions
    }

    /// Actions taken so far in the current round.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// Number of pool/deck desyncs and deck exhaustions seen this match.
    pub fn anomalies(&self) -> u32 {
        self.anomalies
    }

    pub fn phase(&self) -> Phase {
        if self.match_over {
            return Phase::MatchOver;
        }
        match &self.round {
            None => Phase::RoundSetup,
            Some(r) if r.is_over() => Phase::RoundOver,
            Some(r) => Phase::TurnInProgress(r.turn()),
        }
    }

    pub fn current_turn(&self) -> Option<Party> {
        match self.phase() {
            Phase::TurnInProgress(party) => Some(party),
            _ => None,
        }
    }

    /// Clears both parties, rebuilds and shuffles the deck, and deals one card
    /// to each party. Returns the new round's index.
    pub fn start_round(&mut self) -> Result<u32, GameError> {
        if self.match_over {
            return Err(GameError::MatchOver);
        }
        if let Some(r) = &self.round {
            return Err(GameError::RoundInProgress(r.round_index()));
        }

        for p in &mut self.parties {
            p.clear();
        }
        self.pending_pick = None;
        self.actions.clear();
        self.deck.rebuild();

        for party in [Party::Player, Party::Wizard] {
            let card = self.deck.draw()?;
            self.parties[party.index()].receive_card(card);
        }

        let index = self.rounds_completed + 1;
        self.round = Some(RoundState::new(index, self.config.starting_party));
        tracing::info!(
            round = index,
            of = self.config.rounds,
            player = self.party(Party::Player).total(),
            wizard = self.party(Party::Wizard).total(),
            "round started"
        );
        Ok(index)
    }

    fn active_round(&self) -> Result<&RoundState, GameError> {
        if self.match_over {
            return Err(GameError::MatchOver);
        }
        let round = self.round.as_ref().ok_or(GameError::NoRoundInProgress)?;
        if round.is_over() {
            return Err(GameError::RoundAlreadyOver);
        }
        Ok(round)
    }

    fn expect_turn(&self, party: Party) -> Result<&RoundState, GameError> {
        let round = self.active_round()?;
        if round.turn() != party {
            return Err(GameError::NotPartysTurn {
                expected: round.turn(),
                actual: party,
            });
        }
        Ok(round)
    }

    /// Sets the player's eyes for the current turn.
    pub fn set_player_eyes(&mut self, eyes: Eyes) -> Result<(), GameError> {
        self.expect_turn(Party::Player)?;
        self.parties[Party::Player.index()].set_eyes(eyes);
        self.pending_pick = None;
        tracing::debug!(?eyes, "player eyes set");
        Ok(())
    }

    /// Category of the card the player's next hit will deliver, without
    /// drawing it.
    ///
    /// Only offered while the player's eyes are closed; returns `None` with
    /// open eyes or an empty deck. Under [`DrawMode::Uniform`] that card is
    /// the top of the deck. Under [`DrawMode::Weighted`] the pick is made
    /// here and kept for the hit, so repeated previews agree with each other
    /// and with the card dealt. The deck itself is never touched.
    pub fn preview_next_card(&mut self) -> Result<Option<CardQuality>, GameError> {
        self.expect_turn(Party::Player)?;
        let player = &self.parties[Party::Player.index()];
        let (total, eyes) = (player.total(), player.eyes());
        if eyes.is_open() {
            return Ok(None);
        }
        let quality = match self.config.player_draw {
            DrawMode::Uniform => preview_quality(&self.deck, total),
            DrawMode::Weighted => match self.pending_pick {
                Some(pick) => Ok(assess_card(pick.value, total).quality()),
                None => pick_weighted(
                    &self.deck,
                    Party::Player,
                    eyes,
                    total,
                    &self.config.profile,
                    &mut self.rng,
                )
                .map(|pick| {
                    self.pending_pick = Some(pick);
                    assess_card(pick.value, total).quality()
                }),
            },
        };
        match quality {
            Ok(quality) => Ok(Some(quality)),
            Err(GameError::EmptyDeck) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn wizard_view(&self) -> Result<SeatView, GameError> {
        let round = self.active_round()?;
        let wizard = self.party(Party::Wizard);
        let player = self.party(Party::Player);
        Ok(SeatView {
            round: round.round_index(),
            own_total: wizard.total(),
            own_cards: wizard.cards().to_vec(),
            rival_total: player.eyes().is_open().then(|| player.total()),
            rival_card_count: player.card_count(),
            rival_eyes: player.eyes(),
        })
    }

    pub fn player_view(&self) -> Result<SeatView, GameError> {
        let round = self.active_round()?;
        let wizard = self.party(Party::Wizard);
        let player = self.party(Party::Player);
        Ok(SeatView {
            round: round.round_index(),
            own_total: player.total(),
            own_cards: player.cards().to_vec(),
            rival_total: Some(wizard.total()),
            rival_card_count: wizard.card_count(),
            rival_eyes: Eyes::Open,
        })
    }

    /// Asks `brain` for the wizard's action, logs the decision and applies it.
    pub fn wizard_turn<B: WizardBrain + ?Sized>(
        &mut self,
        brain: &mut B,
    ) -> Result<(TurnOutcome, DecisionRecord), GameError> {
        self.expect_turn(Party::Wizard)?;
        let view = self.wizard_view()?;
        let decision = brain.choose(&view);
        let record = DecisionRecord {
            round: view.round,
            own_total: view.own_total,
            rival_value: decision.rival_value,
            estimated: decision.estimated,
            action: decision.action,
            mistake: decision.mistake,
        };
        tracing::debug!(
            round = record.round,
            total = record.own_total,
            rival = record.rival_value,
            estimated = record.estimated,
            mistake = record.mistake,
            action = ?record.action,
            "wizard decided"
        );
        let outcome = self.apply_action(Party::Wizard, decision.action)?;
        self.decisions.push(record);
        Ok((outcome, record))
    }

    /// Applies `party`'s action. A hit either lands a whole card or, when the
    /// deck is exhausted, changes nothing and ends the round.
    pub fn apply_action(&mut self, party: Party, action: Action) -> Result<TurnOutcome, GameError> {
        self.expect_turn(party)?;
        let eyes = self.party(Party::Player).eyes();
        let pending = self.pending_pick.take();

        let mut anomaly = None;
        let mut card = None;
        let mut round_end = None;

        match action {
            Action::Hit => match self.draw_for(party, eyes, pending)? {
                (Some(drawn), rebuilt) => {
                    if drawn.desynced {
                        self.anomalies += 1;
                        anomaly = Some(DeckAnomaly::Desync { value: drawn.value });
                    } else if rebuilt {
                        anomaly = Some(DeckAnomaly::Rebuilt);
                    }
                    card = Some(drawn.value);
                    let state = &mut self.parties[party.index()];
                    state.receive_card(drawn.value);
                    state.set_last_action(action.into());
                    if state.is_bust() {
                        round_end = Some(RoundEnd::Bust(party));
                    }
                }
                (None, _) => {
                    self.anomalies += 1;
                    anomaly = Some(DeckAnomaly::Exhausted);
                    round_end = Some(RoundEnd::DeckExhausted);
                }
            },
            Action::Stand => {
                self.parties[party.index()].set_last_action(action.into());
            }
        }

        let round = self.round.as_mut().ok_or(GameError::NoRoundInProgress)?;
        let round_end = match round_end {
            Some(end) => {
                round.finish(end);
                Some(end)
            }
            None => round.record_action(party, action),
        };

        self.actions.push(ActionRecord {
            party,
            action,
            eyes,
            card,
        });

        let total = self.parties[party.index()].total();
        tracing::debug!(
            round = round.round_index(),
            %party,
            ?action,
            card = ?card.map(CardValue::get),
            total,
            ?round_end,
            "action applied"
        );

        Ok(TurnOutcome {
            party,
            action,
            card,
            total,
            anomaly,
            round_end,
        })
    }

    /// Draws for `party` under the configured mode and empty-deck policy.
    /// Returns the card (if any) and whether the deck was rebuilt first.
    /// A pick fixed by a preview is delivered as is.
    fn draw_for(
        &mut self,
        party: Party,
        eyes: Eyes,
        pending: Option<WeightedPick>,
    ) -> Result<(Option<DrawnCard>, bool), GameError> {
        if let (Party::Player, Some(pick)) = (party, pending) {
            return Ok((Some(take_pick(&mut self.deck, pick)), false));
        }
        let mode = match party {
            Party::Player => self.config.player_draw,
            Party::Wizard => self.config.wizard_draw,
        };
        match self.draw_once(mode, party, eyes) {
            Ok(drawn) => Ok((Some(drawn), false)),
            Err(GameError::EmptyDeck) => match self.config.empty_deck {
                EmptyDeckPolicy::EndRound => {
                    tracing::warn!(%party, "deck exhausted, ending round");
                    Ok((None, false))
                }
                EmptyDeckPolicy::Rebuild => {
                    tracing::warn!(%party, "deck exhausted, rebuilding");
                    self.deck.rebuild();
                    match self.draw_once(mode, party, eyes) {
                        Ok(drawn) => Ok((Some(drawn), true)),
                        Err(GameError::EmptyDeck) => Ok((None, true)),
                        Err(e) => Err(e),
                    }
                }
            },
            Err(e) => Err(e),
        }
    }

    fn draw_once(&mut self, mode: DrawMode, party: Party, eyes: Eyes) -> Result<DrawnCard, GameError> {
        let total = self.parties[party.index()].total();
        draw_card(
            mode,
            &mut self.deck,
            party,
            eyes,
            total,
            &self.config.profile,
            &mut self.rng,
        )
    }

    /// Ends a round mid-turn. Cards already dealt stay where they are; the
    /// round is not scored and the next [`Engine::start_round`] replays its index.
    pub fn abort_round(&mut self) -> Result<(), GameError> {
        let round = self.round.take().ok_or(GameError::NoRoundInProgress)?;
        self.pending_pick = None;
        tracing::info!(round = round.round_index(), "round aborted");
        Ok(())
    }

    /// Resolves a finished round and advances the match.
    pub fn finish_round(&mut self) -> Result<RoundSummary, GameError> {
        let round = match &self.round {
            None => return Err(GameError::NoRoundInProgress),
            Some(r) if !r.is_over() => return Err(GameError::RoundInProgress(r.round_index())),
            Some(r) => r.clone(),
        };
        self.round = None;
        let actions = std::mem::take(&mut self.actions);

        let player = self.party(Party::Player);
        let wizard = self.party(Party::Wizard);
        let (outcome, reason) = resolve_with_reason(player.total(), wizard.total());
        let summary = RoundSummary {
            round: round.round_index(),
            player_cards: player.cards().to_vec(),
            wizard_cards: wizard.cards().to_vec(),
            player_total: player.total(),
            wizard_total: wizard.total(),
            outcome,
            reason,
            end: round.end().unwrap_or(RoundEnd::BothStood),
            actions,
        };

        self.tally.record(outcome);
        self.rounds_completed += 1;
        tracing::info!(
            round = summary.round,
            player = summary.player_total,
            wizard = summary.wizard_total,
            %outcome,
            reason = reason.describe(),
            "round finished"
        );

        if self.rounds_completed >= self.config.rounds {
            self.match_over = true;
            tracing::info!(
                player = self.tally.player,
                wizard = self.tally.wizard,
                ties = self.tally.ties,
                winner = %self.tally.leader(),
                "match finished"
            );
        }
        Ok(summary)
    }

    /// Standings so far; final once [`Phase::MatchOver`] is reached.
    pub fn match_summary(&self) -> MatchSummary {
        MatchSummary {
            rounds_played: self.rounds_completed,
            tally: self.tally,
            winner: self.tally.leader(),
        }
    }

    /// Clears match-level state so the same engine can host a new match.
    pub fn reset_match(&mut self) {
        for p in &mut self.parties {
            p.clear();
        }
        self.round = None;
        self.pending_pick = None;
        self.rounds_completed = 0;
        self.tally = MatchTally::default();
        self.match_over = false;
        self.actions.clear();
        self.decisions.clear();
        self.anomalies = 0;
    }
}

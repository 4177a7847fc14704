//! The game session state machine.
//!
//! The engine is synchronous and single-writer: the presentation layer
//! raises one intent at a time, and the two network calls happen outside
//! it. When a riddle or a verdict is needed the engine hands back a
//! request token carrying the current [`SessionId`]; the caller performs
//! the call and feeds the completion back in. A completion whose token
//! names a session that has since been restarted is dropped unapplied.

use crate::cache::SessionSeen;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::riddle::Riddle;
use crate::round::{Mode, Player, RoundState};
use crate::score::{PlayerScores, ResultSummary, resolve_answer};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument, warn};

/// Opaque identifier scoping one playthrough.
///
/// Regenerated on restart, which is what lets the engine recognize and
/// drop completions issued under an abandoned session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

impl SessionId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let n = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("session-{}-{}", millis, n))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No game running; waiting for a start intent.
    NotStarted,
    /// Rounds in progress.
    Playing,
    /// All rounds acknowledged; final scores frozen.
    GameOver,
}

/// Token for an outstanding riddle acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FetchRequest {
    /// Session the acquisition was issued under.
    session: SessionId,
}

/// Token for an outstanding judging call.
///
/// Captures everything the judge needs at submission time, so the round
/// can neither move nor mutate underneath the call.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct JudgeRequest {
    /// Session the guess was submitted under.
    session: SessionId,
    /// Riddle text the guess answers.
    riddle: String,
    /// The accepted answer.
    answer: String,
    /// The trimmed guess.
    guess: String,
    /// Who submitted the guess.
    answering: Player,
}

/// Whether a completion was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The completion belonged to the current session and took effect.
    Applied,
    /// The completion belonged to an abandoned session and was dropped.
    Stale,
}

/// The game session engine.
///
/// Owns exactly one session at a time. All mutation goes through intent
/// methods; `&mut self` enforces the one-writer contract.
#[derive(Debug)]
pub struct GameEngine {
    phase: Phase,
    mode: Mode,
    scores: PlayerScores,
    rounds_completed: u32,
    current_round: Option<RoundState>,
    next_turn_hint: Player,
    last_result: Option<ResultSummary>,
    last_error: Option<GameError>,
    session: SessionId,
    session_seen: SessionSeen,
    total_rounds: u32,
    riddle_points: u32,
    clue_cost: u32,
}

impl GameEngine {
    /// Creates an engine in the `NotStarted` phase.
    #[instrument(skip(config))]
    pub fn new(config: &GameConfig) -> Self {
        info!(
            total_rounds = config.total_rounds(),
            riddle_points = config.riddle_points(),
            clue_cost = config.clue_cost(),
            "Creating game engine"
        );
        Self {
            phase: Phase::NotStarted,
            mode: Mode::Solo,
            scores: PlayerScores::new(),
            rounds_completed: 0,
            current_round: None,
            next_turn_hint: Player::One,
            last_result: None,
            last_error: None,
            session: SessionId::generate(),
            session_seen: SessionSeen::new(),
            total_rounds: *config.total_rounds(),
            riddle_points: *config.riddle_points(),
            clue_cost: *config.clue_cost(),
        }
    }

    /// Starts a game in the given mode.
    ///
    /// Valid from `NotStarted` only. Returns the acquisition request for
    /// round one.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub fn start_game(&mut self, mode: Mode) -> Result<FetchRequest, GameError> {
        if self.phase != Phase::NotStarted {
            return Err(GameError::InvalidStateTransition(format!(
                "cannot start a game from {:?}",
                self.phase
            )));
        }
        info!(?mode, "Starting game");
        self.phase = Phase::Playing;
        self.mode = mode;
        self.scores.reset();
        self.rounds_completed = 0;
        self.next_turn_hint = Player::One;
        self.last_result = None;
        self.last_error = None;
        Ok(self.fetch_request())
    }

    /// Requests another acquisition after a failed one.
    ///
    /// Valid while `Playing` with no round in play.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub fn retry_acquisition(&mut self) -> Result<FetchRequest, GameError> {
        if self.phase != Phase::Playing || self.current_round.is_some() {
            return Err(GameError::InvalidStateTransition(
                "no failed acquisition to retry".to_string(),
            ));
        }
        debug!("Retrying acquisition");
        Ok(self.fetch_request())
    }

    /// Applies an acquisition completion.
    ///
    /// A stale request is dropped without touching state. A successful
    /// outcome opens a fresh round; a failure is stored for display and
    /// the session stays `Playing` with no round, recoverable through
    /// [`Self::retry_acquisition`] or [`Self::restart`].
    #[instrument(skip(self, request, outcome), fields(session_id = %self.session))]
    pub fn install_riddle(
        &mut self,
        request: &FetchRequest,
        outcome: Result<Riddle, GameError>,
    ) -> Applied {
        if *request.session() != self.session {
            warn!(stale_session = %request.session(), "Dropping stale acquisition result");
            return Applied::Stale;
        }
        match outcome {
            Ok(riddle) => {
                info!(round = self.rounds_completed + 1, "Riddle installed");
                self.current_round = Some(RoundState::new(riddle, self.riddle_points));
                self.last_error = None;
            }
            Err(error) => {
                warn!(%error, "Acquisition failed");
                self.current_round = None;
                self.last_error = Some(error);
            }
        }
        Applied::Applied
    }

    /// Reveals a clue, deducting its cost.
    ///
    /// Tolerant of idle clicks: returns `false` without changing anything
    /// when the index is bad, the clue is already revealed, or the round
    /// is not open for reveals.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub fn reveal_clue(&mut self, index: usize) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let cost = self.clue_cost;
        match self.current_round.as_mut() {
            Some(round) => {
                let revealed = round.reveal_clue(index, cost);
                if revealed {
                    debug!(index, remaining = round.remaining_value(), "Clue revealed");
                }
                revealed
            }
            None => false,
        }
    }

    /// Locks the right to answer the current round to `player`.
    ///
    /// Duo mode only; the first claim wins and later claims by either
    /// player are rejected until the round resolves.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub fn claim_turn(&mut self, player: Player) -> Result<(), GameError> {
        if self.mode != Mode::Duo {
            return Err(GameError::InvalidStateTransition(
                "claims do not apply in solo mode".to_string(),
            ));
        }
        let round = self.open_round_mut()?;
        if let Some(holder) = round.claiming_player() {
            return Err(GameError::InvalidStateTransition(format!(
                "player {} already holds the claim",
                holder
            )));
        }
        round.lock_claim(player);
        info!(%player, "Claim locked");
        Ok(())
    }

    /// Accepts a guess and returns the judging request for it.
    ///
    /// In duo mode a claim must be held; in solo mode player 1 answers
    /// implicitly. Whitespace-only guesses are rejected.
    #[instrument(skip(self, guess), fields(session_id = %self.session))]
    pub fn submit_guess(&mut self, guess: &str) -> Result<JudgeRequest, GameError> {
        let guess = guess.trim();
        if guess.is_empty() {
            return Err(GameError::InvalidStateTransition(
                "cannot submit an empty guess".to_string(),
            ));
        }
        let mode = self.mode;
        let session = self.session.clone();
        let round = self.open_round_mut()?;
        let answering = match mode {
            Mode::Solo => Player::One,
            Mode::Duo => round.claiming_player().ok_or_else(|| {
                GameError::InvalidStateTransition(
                    "a guess in duo mode requires a claim".to_string(),
                )
            })?,
        };
        let request = JudgeRequest {
            session,
            riddle: round.riddle().text().to_string(),
            answer: round.riddle().answer().to_string(),
            guess: guess.to_string(),
            answering,
        };
        round.begin_guess();
        info!(%answering, "Guess submitted for judging");
        Ok(request)
    }

    /// Applies a judging completion.
    ///
    /// Stale requests are dropped. A verdict resolves the round exactly
    /// once; applying to an already-answered round is rejected with scores
    /// untouched. A judge failure consumes the round without scoring it
    /// and stores the error for display.
    #[instrument(skip(self, request, verdict), fields(session_id = %self.session))]
    pub fn apply_verdict(
        &mut self,
        request: &JudgeRequest,
        verdict: Result<bool, GameError>,
    ) -> Result<Applied, GameError> {
        if *request.session() != self.session {
            warn!(stale_session = %request.session(), "Dropping stale verdict");
            return Ok(Applied::Stale);
        }
        let round = self.current_round.as_mut().ok_or_else(|| {
            GameError::InvalidStateTransition("no round to apply a verdict to".to_string())
        })?;
        if round.answered() {
            return Err(GameError::InvalidStateTransition(
                "round is already answered".to_string(),
            ));
        }
        if !round.guess_pending() {
            return Err(GameError::InvalidStateTransition(
                "no guess is awaiting a verdict".to_string(),
            ));
        }
        match verdict {
            Ok(correct) => {
                let summary = resolve_answer(
                    &mut self.scores,
                    self.mode,
                    *request.answering(),
                    round.remaining_value(),
                    request.answer(),
                    correct,
                );
                round.mark_answered();
                info!(correct, points = summary.points(), "Verdict applied");
                self.last_result = Some(summary);
                self.last_error = None;
            }
            Err(error) => {
                // The round is consumed; a judge failure never re-scores.
                warn!(%error, "Judge failed; round consumed without scoring");
                round.mark_answered();
                self.last_result = None;
                self.last_error = Some(error);
            }
        }
        Ok(Applied::Applied)
    }

    /// Acknowledges the displayed result and moves the session forward.
    ///
    /// On the final round this freezes the scores and enters `GameOver`;
    /// otherwise it discards the round, flips the turn hint in duo mode,
    /// and returns the acquisition request for the next round.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub fn acknowledge_result(&mut self) -> Result<Option<FetchRequest>, GameError> {
        let answered = self
            .current_round
            .as_ref()
            .is_some_and(RoundState::answered);
        if self.phase != Phase::Playing || !answered {
            return Err(GameError::InvalidStateTransition(
                "no answered round to acknowledge".to_string(),
            ));
        }
        self.rounds_completed += 1;
        self.current_round = None;
        if self.rounds_completed == self.total_rounds {
            info!(rounds = self.rounds_completed, "Game over");
            self.phase = Phase::GameOver;
            return Ok(None);
        }
        if self.mode == Mode::Duo {
            self.next_turn_hint = self.next_turn_hint.opponent();
        }
        debug!(next_round = self.rounds_completed + 1, "Advancing to next round");
        Ok(Some(self.fetch_request()))
    }

    /// Resets to `NotStarted` under a fresh session.
    ///
    /// Valid from any phase. The session-scoped seen set is cleared; the
    /// process-wide registry is unaffected and keeps rejecting riddles
    /// from earlier games.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub fn restart(&mut self) {
        info!("Restarting session");
        self.session = SessionId::generate();
        self.session_seen.clear();
        self.phase = Phase::NotStarted;
        self.scores.reset();
        self.rounds_completed = 0;
        self.current_round = None;
        self.next_turn_hint = Player::One;
        self.last_result = None;
        self.last_error = None;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current mode. Meaningful once a game has started.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current scores.
    pub fn scores(&self) -> &PlayerScores {
        &self.scores
    }

    /// Rounds acknowledged so far.
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Total rounds in a full game.
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// One-based number of the round in play, clamped to the total.
    pub fn current_round_number(&self) -> u32 {
        (self.rounds_completed + 1).min(self.total_rounds)
    }

    /// The round in play, if any.
    pub fn current_round(&self) -> Option<&RoundState> {
        self.current_round.as_ref()
    }

    /// Which player the presentation should highlight before a claim.
    ///
    /// Advisory only; it never affects scoring or claim eligibility.
    pub fn next_turn_hint(&self) -> Player {
        self.next_turn_hint
    }

    /// Summary of the most recently judged guess.
    pub fn last_result(&self) -> Option<&ResultSummary> {
        self.last_result.as_ref()
    }

    /// The most recent acquisition or judging failure, if unresolved.
    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    /// The current session identifier.
    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    /// Riddle fingerprints served during the current session.
    pub fn session_seen(&self) -> &SessionSeen {
        &self.session_seen
    }

    /// Mutable access to the session seen set, for acquisition.
    pub(crate) fn session_seen_mut(&mut self) -> &mut SessionSeen {
        &mut self.session_seen
    }

    /// Builds an acquisition token for the current session.
    fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            session: self.session.clone(),
        }
    }

    /// The current round, checked open for claims and guesses.
    fn open_round_mut(&mut self) -> Result<&mut RoundState, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidStateTransition(format!(
                "no round in play during {:?}",
                self.phase
            )));
        }
        let round = self.current_round.as_mut().ok_or_else(|| {
            GameError::InvalidStateTransition("no riddle has been installed".to_string())
        })?;
        if round.answered() {
            return Err(GameError::InvalidStateTransition(
                "round is already answered".to_string(),
            ));
        }
        if round.guess_pending() {
            return Err(GameError::InvalidStateTransition(
                "a guess is already out for judging".to_string(),
            ));
        }
        Ok(round)
    }
}

//! Async driver running the engine against its collaborators.
//!
//! The engine itself never suspends; the driver performs the riddle
//! acquisition and judging calls between an engine request and its
//! completion, keeping the one-intent-at-a-time contract through
//! `&mut self`.

use crate::acquire::acquire;
use crate::cache::SeenRegistry;
use crate::config::GameConfig;
use crate::engine::{FetchRequest, GameEngine};
use crate::error::GameError;
use crate::round::{Mode, Player};
use crate::source::{AnswerJudge, RiddleSource};
use tracing::{debug, instrument};

/// Owns a [`GameEngine`] and its network collaborators.
pub struct GameDriver {
    engine: GameEngine,
    source: Box<dyn RiddleSource>,
    judge: Box<dyn AnswerJudge>,
    registry: SeenRegistry,
    fetch_attempts: u32,
}

impl GameDriver {
    /// Creates a driver over the given collaborators.
    ///
    /// The registry is injected so callers control its lifetime; sharing
    /// one registry across drivers shares their duplicate filtering.
    #[instrument(skip(config, source, judge, registry))]
    pub fn new(
        config: &GameConfig,
        source: Box<dyn RiddleSource>,
        judge: Box<dyn AnswerJudge>,
        registry: SeenRegistry,
    ) -> Self {
        Self {
            engine: GameEngine::new(config),
            source,
            judge,
            registry,
            fetch_attempts: *config.fetch_attempts(),
        }
    }

    /// Starts a game and acquires the first riddle.
    #[instrument(skip(self))]
    pub async fn start(&mut self, mode: Mode) -> Result<(), GameError> {
        let request = self.engine.start_game(mode)?;
        self.fulfil_fetch(request).await
    }

    /// Submits a guess and applies the judge's verdict.
    ///
    /// Returns the judging error when the judge fails; the engine has
    /// already consumed the round and recorded the error for display.
    #[instrument(skip(self, guess))]
    pub async fn submit_guess(&mut self, guess: &str) -> Result<(), GameError> {
        let request = self.engine.submit_guess(guess)?;
        let verdict = self
            .judge
            .evaluate(request.riddle(), request.answer(), request.guess())
            .await
            .map_err(GameError::from);
        let failed = verdict.as_ref().err().cloned();
        self.engine.apply_verdict(&request, verdict)?;
        match failed {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Acknowledges the current result and acquires the next riddle,
    /// unless the game just ended.
    #[instrument(skip(self))]
    pub async fn acknowledge(&mut self) -> Result<(), GameError> {
        match self.engine.acknowledge_result()? {
            Some(request) => self.fulfil_fetch(request).await,
            None => Ok(()),
        }
    }

    /// Retries a failed acquisition.
    #[instrument(skip(self))]
    pub async fn retry_round(&mut self) -> Result<(), GameError> {
        let request = self.engine.retry_acquisition()?;
        self.fulfil_fetch(request).await
    }

    /// Reveals a clue. Idle-click tolerant, like the engine.
    pub fn reveal_clue(&mut self, index: usize) -> bool {
        self.engine.reveal_clue(index)
    }

    /// Claims the right to answer for `player` (duo mode).
    pub fn claim_turn(&mut self, player: Player) -> Result<(), GameError> {
        self.engine.claim_turn(player)
    }

    /// Resets to a fresh session. The shared registry is unaffected.
    pub fn restart(&mut self) {
        self.engine.restart();
    }

    /// Read access to the engine for rendering.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Runs one acquisition and installs its outcome.
    async fn fulfil_fetch(&mut self, request: FetchRequest) -> Result<(), GameError> {
        debug!(session_id = %request.session(), "Fulfilling acquisition request");
        let outcome = acquire(
            self.source.as_ref(),
            request.session().as_str(),
            self.engine.session_seen_mut(),
            &self.registry,
            self.fetch_attempts,
        )
        .await;
        let failed = outcome.as_ref().err().cloned();
        self.engine.install_riddle(&request, outcome);
        match failed {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

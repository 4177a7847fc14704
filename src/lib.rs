//! Riddle Rally - a solo or two-player riddle-guessing game engine.
//!
//! A remote text-generation service supplies each riddle with its accepted
//! answer and four progressively revealing clues; players guess, clues
//! cost points to reveal, and a judging call decides correctness with
//! tolerance for minor wording differences.
//!
//! # Architecture
//!
//! - **Engine**: the synchronous session state machine (phases, rounds,
//!   scoring, claims); network calls happen outside it through request
//!   tokens that guard against stale completions.
//! - **Acquisition**: a bounded retry loop that filters duplicates through
//!   session-scoped and process-wide seen sets.
//! - **Collaborators**: the [`RiddleSource`] and [`AnswerJudge`] traits,
//!   implemented over OpenAI/Anthropic ([`LlmService`]) or offline
//!   ([`DemoSource`], [`DemoJudge`]).
//! - **Driver**: an async front that runs acquisition and judging between
//!   engine intents.
//!
//! # Example
//!
//! ```no_run
//! use riddle_rally::{DemoJudge, DemoSource, GameConfig, GameDriver, Mode, SeenRegistry};
//!
//! # async fn example() -> Result<(), riddle_rally::GameError> {
//! let config = GameConfig::new();
//! let mut driver = GameDriver::new(
//!     &config,
//!     Box::new(DemoSource::new()),
//!     Box::new(DemoJudge::new()),
//!     SeenRegistry::new(),
//! );
//!
//! driver.start(Mode::Solo).await?;
//! driver.reveal_clue(0);
//! driver.submit_guess("echo").await?;
//! driver.acknowledge().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod acquire;
mod cache;
mod config;
mod demo;
mod driver;
mod engine;
mod error;
mod riddle;
mod round;
mod score;
mod source;

// Crate-level exports - Acquisition
pub use acquire::acquire;

// Crate-level exports - Uniqueness cache
pub use cache::{RiddleKey, SeenRegistry, SessionSeen};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, LlmSettings};

// Crate-level exports - Offline collaborators
pub use demo::{DemoJudge, DemoSource};

// Crate-level exports - Async driver
pub use driver::GameDriver;

// Crate-level exports - Session engine
pub use engine::{Applied, FetchRequest, GameEngine, JudgeRequest, Phase, SessionId};

// Crate-level exports - Error taxonomy
pub use error::GameError;

// Crate-level exports - Riddle types
pub use riddle::{CLUE_COUNT, FetchedRiddle, Riddle};

// Crate-level exports - Round and player types
pub use round::{Mode, Player, RoundState};

// Crate-level exports - Scoring
pub use score::{PlayerScores, ResultSummary, resolve_answer};

// Crate-level exports - Collaborator traits and LLM service
pub use source::{AnswerJudge, LlmConfig, LlmProvider, LlmService, RiddleSource, ServiceError};

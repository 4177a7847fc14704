//! Game and LLM configuration.

use crate::source::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for a game session.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rounds in a full game.
    #[serde(default = "default_total_rounds")]
    total_rounds: u32,

    /// Points a riddle is worth before any clue is revealed.
    #[serde(default = "default_riddle_points")]
    riddle_points: u32,

    /// Points deducted per revealed clue.
    #[serde(default = "default_clue_cost")]
    clue_cost: u32,

    /// Riddle source calls allowed per acquisition.
    #[serde(default = "default_fetch_attempts")]
    fetch_attempts: u32,

    /// LLM provider settings for the riddle source and answer judge.
    #[serde(default)]
    llm: LlmSettings,
}

/// LLM provider settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// Model name (e.g., "gpt-4o-mini", "claude-3-5-haiku-20241022").
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_total_rounds() -> u32 {
    5
}

fn default_riddle_points() -> u32 {
    20
}

fn default_clue_cost() -> u32 {
    5
}

fn default_fetch_attempts() -> u32 {
    3
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: default_total_rounds(),
            riddle_points: default_riddle_points(),
            clue_cost: default_clue_cost(),
            fetch_attempts: default_fetch_attempts(),
            llm: LlmSettings::default(),
        }
    }
}

impl GameConfig {
    /// Creates a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the round count.
    pub fn with_total_rounds(mut self, total_rounds: u32) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    /// Overrides the per-riddle point value.
    pub fn with_riddle_points(mut self, riddle_points: u32) -> Self {
        self.riddle_points = riddle_points;
        self
    }

    /// Overrides the per-clue cost.
    pub fn with_clue_cost(mut self, clue_cost: u32) -> Self {
        self.clue_cost = clue_cost;
        self
    }

    /// Overrides the acquisition attempt bound.
    pub fn with_fetch_attempts(mut self, fetch_attempts: u32) -> Self {
        self.fetch_attempts = fetch_attempts;
        self
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(
            total_rounds = config.total_rounds,
            riddle_points = config.riddle_points,
            clue_cost = config.clue_cost,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks the values against the scoring invariants.
    ///
    /// Rounds, attempts, and clue cost must be non-zero, and the riddle
    /// value must be a whole number of clue-cost steps so that revealing
    /// clues walks the value down to exactly zero.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_rounds == 0 {
            return Err(ConfigError::new("total_rounds must be at least 1".to_string()));
        }
        if self.fetch_attempts == 0 {
            return Err(ConfigError::new("fetch_attempts must be at least 1".to_string()));
        }
        if self.clue_cost == 0 {
            return Err(ConfigError::new("clue_cost must be at least 1".to_string()));
        }
        if self.riddle_points % self.clue_cost != 0 {
            return Err(ConfigError::new(format!(
                "riddle_points ({}) must be a multiple of clue_cost ({})",
                self.riddle_points, self.clue_cost
            )));
        }
        Ok(())
    }

    /// Creates an LLM configuration from these settings.
    ///
    /// Requires `OPENAI_API_KEY` or `ANTHROPIC_API_KEY` in the environment,
    /// depending on the configured provider.
    #[instrument(skip(self), fields(provider = ?self.llm.provider, model = %self.llm.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let api_key = match self.llm.provider {
            LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::new("OPENAI_API_KEY environment variable not set".to_string())
            })?,
            LlmProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ConfigError::new("ANTHROPIC_API_KEY environment variable not set".to_string())
            })?,
        };

        Ok(LlmConfig::new(
            self.llm.provider,
            api_key,
            self.llm.model.clone(),
            self.llm.max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

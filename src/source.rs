//! Riddle source and answer judge collaborators, with LLM-backed implementations
//! for OpenAI and Anthropic.

use crate::error::GameError;
use crate::riddle::FetchedRiddle;
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Supplies candidate riddles for game sessions.
#[async_trait::async_trait]
pub trait RiddleSource: Send + Sync {
    /// Fetches one candidate riddle.
    ///
    /// The payload is unvalidated; acquisition checks its shape and
    /// freshness before a round opens.
    async fn fetch(&self, session_id: &str) -> Result<FetchedRiddle, ServiceError>;
}

/// Judges submitted guesses against the accepted answer.
#[async_trait::async_trait]
pub trait AnswerJudge: Send + Sync {
    /// Decides whether the guess matches the accepted answer.
    ///
    /// Implementations should tolerate minor misspellings, singular/plural
    /// forms, and close synonyms.
    async fn evaluate(
        &self,
        riddle: &str,
        accepted_answer: &str,
        guess: &str,
    ) -> Result<bool, ServiceError>;
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Configuration for the LLM service.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Riddle source and answer judge backed by an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmService {
    config: LlmConfig,
}

impl LlmService {
    /// Creates a new LLM service.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM service");
        Self { config }
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = ?self.config.provider, model = %self.config.model))]
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ServiceError> {
        debug!("Generating completion");
        match self.config.provider {
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message).await,
            LlmProvider::Anthropic => self.generate_anthropic(system_prompt, user_message).await,
        }
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ServiceError> {
        debug!("Creating Anthropic client");

        let client = reqwest::Client::new();

        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        debug!("Sending request to Anthropic");
        let response = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                ServiceError::Unavailable(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Anthropic response");
            ServiceError::Unavailable(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(ServiceError::Unavailable(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        debug!(response_length = response_text.len(), "Parsing Anthropic response");
        let response_json: serde_json::Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, response = %response_text, "Failed to parse Anthropic response");
            ServiceError::Malformed(format!("Failed to parse response: {}", e))
        })?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                ServiceError::Malformed("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using OpenAI.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ServiceError> {
        debug!("Creating OpenAI client");

        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build system message");
                        ServiceError::Unavailable(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        ServiceError::Unavailable(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                ServiceError::Unavailable(format!("Failed to build request: {}", e))
            })?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            ServiceError::Unavailable(format!("OpenAI API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                ServiceError::Malformed("No content in OpenAI response".to_string())
            })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

#[async_trait::async_trait]
impl RiddleSource for LlmService {
    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn fetch(&self, session_id: &str) -> Result<FetchedRiddle, ServiceError> {
        debug!("Requesting riddle generation");
        let reply = self
            .generate(RIDDLE_SYSTEM_PROMPT, RIDDLE_USER_PROMPT)
            .await?;
        let fetched: FetchedRiddle = parse_payload(&reply)?;
        info!(clue_count = fetched.clues().len(), "Riddle payload received");
        Ok(fetched)
    }
}

#[async_trait::async_trait]
impl AnswerJudge for LlmService {
    #[instrument(skip(self, riddle, accepted_answer, guess))]
    async fn evaluate(
        &self,
        riddle: &str,
        accepted_answer: &str,
        guess: &str,
    ) -> Result<bool, ServiceError> {
        debug!("Requesting answer evaluation");
        let reply = self
            .generate(
                JUDGE_SYSTEM_PROMPT,
                &judge_user_prompt(riddle, accepted_answer, guess),
            )
            .await?;
        let verdict: VerdictPayload = parse_payload(&reply)?;
        info!(correct = verdict.is_correct, "Verdict received");
        Ok(verdict.is_correct)
    }
}

const RIDDLE_SYSTEM_PROMPT: &str =
    "You are a riddle master who writes original riddles for a party game.";

const RIDDLE_USER_PROMPT: &str = r#"Generate a unique and engaging riddle suitable for a general audience.
IMPORTANT: Create a completely original riddle that is unlikely to be commonly known.
Also provide the single, most common answer to the riddle.
Finally, create 4 distinct clues that progressively help in solving the riddle, but do not give the answer away too easily.

Return the response as a JSON object with the following exact structure:
{
  "riddle": "The text of the riddle itself.",
  "answer": "The correct answer to the riddle.",
  "clues": [
    "First clue text.",
    "Second clue text.",
    "Third clue text.",
    "Fourth clue text."
  ]
}

Do not include any explanatory text outside of the JSON structure.
The riddle should be challenging but solvable."#;

const JUDGE_SYSTEM_PROMPT: &str = "You are an impartial judge for a riddle game.";

/// Builds the user message for an answer evaluation call.
fn judge_user_prompt(riddle: &str, accepted_answer: &str, guess: &str) -> String {
    format!(
        r#"The riddle was: "{}"
The generally accepted correct answer is: "{}"
The user has submitted the answer: "{}"

Please determine if the user's answer is correct. Consider minor misspellings, singular/plural forms, or very close synonyms as correct if the core meaning matches the accepted answer.
Respond with a JSON object with the following exact structure:
{{
  "isCorrect": true or false
}}
Do not include any explanatory text outside of the JSON structure."#,
        riddle, accepted_answer, guess
    )
}

/// Answer evaluation wire shape.
#[derive(Debug, Clone, Deserialize)]
struct VerdictPayload {
    #[serde(rename = "isCorrect")]
    is_correct: bool,
}

/// Parses a JSON payload from a model reply, tolerating Markdown fences
/// and surrounding prose.
fn parse_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, ServiceError> {
    let candidate = strip_fences(raw);
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // salvage the outermost object or array from surrounding prose
            let salvaged = salvage_span(candidate, '{', '}')
                .or_else(|| salvage_span(candidate, '[', ']'));
            match salvaged {
                Some(span) => serde_json::from_str(span).map_err(|e| {
                    error!(error = %e, raw, "Failed to parse salvaged JSON");
                    ServiceError::Malformed(format!("Failed to parse response JSON: {}", e))
                }),
                None => {
                    error!(error = %first_err, raw, "No JSON found in reply");
                    Err(ServiceError::Malformed(format!(
                        "Failed to parse response JSON: {}",
                        first_err
                    )))
                }
            }
        }
    }
}

/// Removes a ```json ... ``` (or plain ```) fence wrapping the reply.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

/// Returns the span from the first `open` to the last `close`, if any.
fn salvage_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Failure at the collaborator boundary.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ServiceError {
    /// The remote service could not be reached or refused the call.
    #[display("Service unavailable: {}", _0)]
    Unavailable(String),
    /// The response arrived but its shape could not be understood.
    #[display("Unexpected response shape: {}", _0)]
    Malformed(String),
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for GameError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(message) => GameError::SourceUnavailable(message),
            ServiceError::Malformed(message) => GameError::MalformedResponse(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json() {
        let verdict: VerdictPayload = parse_payload(r#"{"isCorrect": true}"#).expect("parses");
        assert!(verdict.is_correct);
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n{\"isCorrect\": false}\n```";
        let verdict: VerdictPayload = parse_payload(reply).expect("parses");
        assert!(!verdict.is_correct);
    }

    #[test]
    fn test_parse_fence_without_language_tag() {
        let reply = "```\n{\"isCorrect\": true}\n```";
        let verdict: VerdictPayload = parse_payload(reply).expect("parses");
        assert!(verdict.is_correct);
    }

    #[test]
    fn test_salvage_json_from_prose() {
        let reply = "Sure! Here is my verdict: {\"isCorrect\": true} Hope that helps.";
        let verdict: VerdictPayload = parse_payload(reply).expect("parses");
        assert!(verdict.is_correct);
    }

    #[test]
    fn test_garbage_reports_malformed() {
        let result: Result<VerdictPayload, ServiceError> = parse_payload("no json here at all");
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_parse_riddle_payload() {
        let reply = r#"```json
{
  "riddle": "I speak without a mouth.",
  "answer": "echo",
  "clues": ["a", "b", "c", "d"]
}
```"#;
        let fetched: FetchedRiddle = parse_payload(reply).expect("parses");
        assert_eq!(fetched.answer(), "echo");
        assert_eq!(fetched.clues().len(), 4);
    }

    #[test]
    fn test_wrong_shape_reports_malformed() {
        let result: Result<VerdictPayload, ServiceError> =
            parse_payload(r#"{"verdict": "yes"}"#);
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }
}

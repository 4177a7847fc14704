//! Built-in riddle source and judge for offline play.

use crate::riddle::FetchedRiddle;
use crate::source::{AnswerJudge, RiddleSource, ServiceError};
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Riddle source cycling through a small bundled set.
///
/// Five classic riddles, served in order and wrapping around. Useful for
/// offline play and deterministic tests; the uniqueness registry will
/// reject the wrap-around repeats.
#[derive(Debug)]
pub struct DemoSource {
    riddles: Vec<FetchedRiddle>,
    cursor: Mutex<usize>,
}

impl DemoSource {
    /// Creates a source over the bundled riddles.
    pub fn new() -> Self {
        Self {
            riddles: bundled_riddles(),
            cursor: Mutex::new(0),
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RiddleSource for DemoSource {
    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn fetch(&self, session_id: &str) -> Result<FetchedRiddle, ServiceError> {
        let mut cursor = self.cursor.lock().unwrap();
        let riddle = self.riddles[*cursor % self.riddles.len()].clone();
        *cursor += 1;
        debug!(served = *cursor, "Serving bundled riddle");
        Ok(riddle)
    }
}

/// Judge comparing normalized answer text.
///
/// Accepts the guess when it matches the accepted answer after trimming,
/// lowercasing, and dropping a leading article. No network involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoJudge;

impl DemoJudge {
    /// Creates the judge.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl AnswerJudge for DemoJudge {
    #[instrument(skip(self, _riddle, accepted_answer, guess))]
    async fn evaluate(
        &self,
        _riddle: &str,
        accepted_answer: &str,
        guess: &str,
    ) -> Result<bool, ServiceError> {
        let correct = normalize(guess) == normalize(accepted_answer);
        debug!(correct, "Judged guess locally");
        Ok(correct)
    }
}

/// Lowercases, trims, and strips a leading "a"/"an"/"the".
fn normalize(answer: &str) -> String {
    let lowered = answer.trim().to_lowercase();
    for article in ["a ", "an ", "the "] {
        if let Some(rest) = lowered.strip_prefix(article) {
            return rest.trim_start().to_string();
        }
    }
    lowered
}

/// The bundled riddle set.
fn bundled_riddles() -> Vec<FetchedRiddle> {
    let entries: [(&str, &str, [&str; 4]); 5] = [
        (
            "I speak without a mouth and hear without ears. I have no body, but come alive with wind. What am I?",
            "echo",
            [
                "I'm a sound phenomenon",
                "I repeat what you say",
                "I need a surface to bounce off",
                "I'm what you hear in empty spaces",
            ],
        ),
        (
            "The more you take, the more you leave behind. What am I?",
            "footsteps",
            [
                "I'm related to walking",
                "I mark where you've been",
                "I disappear over time",
                "I'm made by feet",
            ],
        ),
        (
            "I have cities, but no houses. I have mountains, but no trees. I have water, but no fish. What am I?",
            "map",
            [
                "I show geographical features",
                "I help you navigate",
                "I'm flat and portable",
                "I represent real places",
            ],
        ),
        (
            "I'm tall when I'm young, and short when I'm old. What am I?",
            "candle",
            [
                "I provide light",
                "I'm made of wax",
                "I get shorter as I burn",
                "I have a wick",
            ],
        ),
        (
            "What has keys but no locks, space but no room, and you can enter but not go inside?",
            "keyboard",
            [
                "I'm used for typing",
                "I have letters and numbers",
                "I'm connected to computers",
                "I have keys that aren't for doors",
            ],
        ),
    ];

    entries
        .into_iter()
        .map(|(riddle, answer, clues)| {
            FetchedRiddle::new(
                riddle.to_string(),
                answer.to_string(),
                clues.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

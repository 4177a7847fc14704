//! Riddle domain types and wire-shape validation.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Number of clues attached to every riddle.
pub const CLUE_COUNT: usize = 4;

/// A validated riddle with its accepted answer and clues.
///
/// Immutable once built. The exactly-four-clues rule is part of the type,
/// so a [`Riddle`] in hand never needs re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Riddle {
    /// Riddle text presented to players.
    text: String,
    /// The accepted answer.
    answer: String,
    /// Clues ordered from least to most revealing.
    clues: [String; CLUE_COUNT],
}

impl Riddle {
    /// Creates a riddle from already-validated parts.
    pub fn new(text: String, answer: String, clues: [String; CLUE_COUNT]) -> Self {
        Self {
            text,
            answer,
            clues,
        }
    }

    /// Returns the riddle text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the accepted answer.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns all clues in reveal order.
    pub fn clues(&self) -> &[String; CLUE_COUNT] {
        &self.clues
    }

    /// Returns the clue at the given index, if it exists.
    pub fn clue(&self, index: usize) -> Option<&str> {
        self.clues.get(index).map(String::as_str)
    }
}

/// Unvalidated riddle payload as returned by a riddle source.
///
/// Field names match the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize, Deserialize)]
pub struct FetchedRiddle {
    riddle: String,
    answer: String,
    clues: Vec<String>,
}

impl FetchedRiddle {
    /// Checks the payload shape and converts it into a [`Riddle`].
    ///
    /// # Errors
    ///
    /// Returns a description of the first shape problem found: empty riddle
    /// text, empty answer, or a clue list that is not exactly [`CLUE_COUNT`]
    /// entries long.
    pub fn validate(self) -> Result<Riddle, String> {
        if self.riddle.trim().is_empty() {
            return Err("riddle text is empty".to_string());
        }
        if self.answer.trim().is_empty() {
            return Err("answer is empty".to_string());
        }
        let count = self.clues.len();
        let clues: [String; CLUE_COUNT] = self
            .clues
            .try_into()
            .map_err(|_| format!("expected {} clues, got {}", CLUE_COUNT, count))?;
        Ok(Riddle {
            text: self.riddle,
            answer: self.answer,
            clues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clues() -> Vec<String> {
        vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
            "fourth".to_string(),
        ]
    }

    #[test]
    fn test_valid_payload_converts() {
        let fetched = FetchedRiddle::new("What am I?".to_string(), "echo".to_string(), clues());
        let riddle = fetched.validate().expect("shape is valid");
        assert_eq!(riddle.text(), "What am I?");
        assert_eq!(riddle.answer(), "echo");
        assert_eq!(riddle.clues().len(), CLUE_COUNT);
    }

    #[test]
    fn test_empty_text_rejected() {
        let fetched = FetchedRiddle::new("   ".to_string(), "echo".to_string(), clues());
        assert!(fetched.validate().is_err());
    }

    #[test]
    fn test_empty_answer_rejected() {
        let fetched = FetchedRiddle::new("What am I?".to_string(), String::new(), clues());
        assert!(fetched.validate().is_err());
    }

    #[test]
    fn test_wrong_clue_count_rejected() {
        let mut short = clues();
        short.pop();
        let fetched = FetchedRiddle::new("What am I?".to_string(), "echo".to_string(), short);
        let err = fetched.validate().expect_err("three clues is invalid");
        assert!(err.contains("expected 4 clues"));
    }

    #[test]
    fn test_clue_lookup_bounds() {
        let fetched = FetchedRiddle::new("What am I?".to_string(), "echo".to_string(), clues());
        let riddle = fetched.validate().expect("shape is valid");
        assert_eq!(riddle.clue(0), Some("first"));
        assert_eq!(riddle.clue(CLUE_COUNT), None);
    }
}

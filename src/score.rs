//! Score tracking and answer resolution.

use crate::round::{Mode, Player};
use serde::{Deserialize, Serialize};

/// Points held by each player.
///
/// Player 2 is structurally present in solo mode but never credited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScores {
    player1: u32,
    player2: u32,
}

impl PlayerScores {
    /// Creates a zeroed scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the given player's score.
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player1,
            Player::Two => self.player2,
        }
    }

    /// Adds points to the given player's score.
    pub fn credit(&mut self, player: Player, points: u32) {
        match player {
            Player::One => self.player1 += points,
            Player::Two => self.player2 += points,
        }
    }

    /// Returns the player with the strictly higher score, or `None` on a tie.
    pub fn leader(&self) -> Option<Player> {
        match self.player1.cmp(&self.player2) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Zeroes both scores.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of a judged guess, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Headline for the result.
    title: String,
    /// Full sentence describing what happened.
    message: String,
    /// Points awarded by this resolution.
    points: u32,
    /// Who received the points, if anyone.
    awarded_to: Option<Player>,
    /// Whether the guess was judged correct.
    correct: bool,
}

impl ResultSummary {
    /// Returns the headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the display message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the points awarded.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Returns the player the points went to, if any.
    pub fn awarded_to(&self) -> Option<Player> {
        self.awarded_to
    }

    /// Whether the guess was judged correct.
    pub fn correct(&self) -> bool {
        self.correct
    }
}

/// Applies a verdict to the scoreboard and builds the display summary.
///
/// A correct guess awards the round's remaining value to the answering
/// player. An incorrect duo guess forfeits that value to the opponent.
/// An incorrect solo guess awards nothing.
pub fn resolve_answer(
    scores: &mut PlayerScores,
    mode: Mode,
    answering: Player,
    value: u32,
    accepted_answer: &str,
    correct: bool,
) -> ResultSummary {
    if correct {
        scores.credit(answering, value);
        return ResultSummary {
            title: format!("Player {} Correct!", answering),
            message: format!("Player {} earned {} points!", answering, value),
            points: value,
            awarded_to: Some(answering),
            correct: true,
        };
    }

    match mode {
        Mode::Duo => {
            let opponent = answering.opponent();
            scores.credit(opponent, value);
            ResultSummary {
                title: format!("Player {} Incorrect!", answering),
                message: format!(
                    "The answer was \"{}\". Player {} gets {} points!",
                    accepted_answer, opponent, value
                ),
                points: value,
                awarded_to: Some(opponent),
                correct: false,
            }
        }
        Mode::Solo => ResultSummary {
            title: "Incorrect!".to_string(),
            message: format!(
                "That wasn't the right answer. The correct answer was: \"{}\".",
                accepted_answer
            ),
            points: 0,
            awarded_to: None,
            correct: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_guess_credits_answering_player() {
        let mut scores = PlayerScores::new();
        let summary = resolve_answer(&mut scores, Mode::Duo, Player::Two, 15, "echo", true);

        assert_eq!(scores.get(Player::Two), 15);
        assert_eq!(scores.get(Player::One), 0);
        assert_eq!(summary.points(), 15);
        assert_eq!(summary.awarded_to(), Some(Player::Two));
        assert!(summary.correct());
        assert_eq!(summary.title(), "Player 2 Correct!");
    }

    #[test]
    fn test_duo_miss_forfeits_to_opponent() {
        let mut scores = PlayerScores::new();
        let summary = resolve_answer(&mut scores, Mode::Duo, Player::One, 20, "map", false);

        assert_eq!(scores.get(Player::One), 0);
        assert_eq!(scores.get(Player::Two), 20);
        assert_eq!(summary.awarded_to(), Some(Player::Two));
        assert_eq!(
            summary.message(),
            "The answer was \"map\". Player 2 gets 20 points!"
        );
    }

    #[test]
    fn test_solo_miss_awards_nothing() {
        let mut scores = PlayerScores::new();
        let summary = resolve_answer(&mut scores, Mode::Solo, Player::One, 20, "candle", false);

        assert_eq!(scores.get(Player::One), 0);
        assert_eq!(summary.points(), 0);
        assert_eq!(summary.awarded_to(), None);
        assert_eq!(summary.title(), "Incorrect!");
        assert!(summary.message().contains("\"candle\""));
    }

    #[test]
    fn test_leader_and_tie() {
        let mut scores = PlayerScores::new();
        assert_eq!(scores.leader(), None);

        scores.credit(Player::One, 10);
        assert_eq!(scores.leader(), Some(Player::One));

        scores.credit(Player::Two, 25);
        assert_eq!(scores.leader(), Some(Player::Two));

        scores.credit(Player::One, 15);
        assert_eq!(scores.leader(), None);
    }

    #[test]
    fn test_reset_zeroes_both() {
        let mut scores = PlayerScores::new();
        scores.credit(Player::One, 40);
        scores.credit(Player::Two, 5);
        scores.reset();
        assert_eq!(scores.get(Player::One), 0);
        assert_eq!(scores.get(Player::Two), 0);
    }
}

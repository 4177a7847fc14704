//! Players, session modes, and per-round state.

use crate::riddle::{CLUE_COUNT, Riddle};
use serde::{Deserialize, Serialize};

/// A player in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player 1. The only answering player in solo mode.
    One,
    /// Player 2. Participates in duo mode only.
    Two,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "1"),
            Player::Two => write!(f, "2"),
        }
    }
}

/// Session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// One player answers every riddle.
    Solo,
    /// Two players share the session and race to claim each riddle.
    Duo,
}

/// Mutable state of the round in play.
///
/// A `RoundState` only exists once a riddle has been installed; while
/// acquisition is pending or has failed there is no round at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// The riddle being played.
    riddle: Riddle,
    /// Which clues have been revealed.
    revealed: [bool; CLUE_COUNT],
    /// Points the round is still worth.
    remaining_value: u32,
    /// Duo mode: who claimed the right to answer.
    claiming_player: Option<Player>,
    /// A guess has been sent for judging and no verdict has landed yet.
    guess_pending: bool,
    /// The round has been resolved and awaits acknowledgement.
    answered: bool,
}

impl RoundState {
    /// Opens a round worth `value` points.
    pub(crate) fn new(riddle: Riddle, value: u32) -> Self {
        Self {
            riddle,
            revealed: [false; CLUE_COUNT],
            remaining_value: value,
            claiming_player: None,
            guess_pending: false,
            answered: false,
        }
    }

    /// Returns the riddle being played.
    pub fn riddle(&self) -> &Riddle {
        &self.riddle
    }

    /// Returns the reveal flag for each clue.
    pub fn revealed(&self) -> &[bool; CLUE_COUNT] {
        &self.revealed
    }

    /// Number of clues revealed so far.
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|flag| **flag).count()
    }

    /// Points the round is still worth.
    pub fn remaining_value(&self) -> u32 {
        self.remaining_value
    }

    /// Who holds the claim to answer, if anyone.
    pub fn claiming_player(&self) -> Option<Player> {
        self.claiming_player
    }

    /// Whether a guess is out for judging.
    pub fn guess_pending(&self) -> bool {
        self.guess_pending
    }

    /// Whether the round has been resolved.
    pub fn answered(&self) -> bool {
        self.answered
    }

    /// Reveals a clue and deducts its cost, flooring the value at zero.
    ///
    /// Returns `false` without changing anything unless the index is valid,
    /// the clue is unrevealed, and the round is still open for reveals
    /// (no claim, no guess in flight, not yet answered).
    pub(crate) fn reveal_clue(&mut self, index: usize, cost: u32) -> bool {
        if index >= CLUE_COUNT || !self.accepts_reveal() || self.revealed[index] {
            return false;
        }
        self.revealed[index] = true;
        self.remaining_value = self.remaining_value.saturating_sub(cost);
        true
    }

    /// Locks the claim to the given player (unchecked - use
    /// `GameEngine::claim_turn` for validation).
    pub(crate) fn lock_claim(&mut self, player: Player) {
        self.claiming_player = Some(player);
    }

    /// Marks a guess as sent for judging.
    pub(crate) fn begin_guess(&mut self) {
        self.guess_pending = true;
    }

    /// Marks the round resolved.
    pub(crate) fn mark_answered(&mut self) {
        self.guess_pending = false;
        self.answered = true;
    }

    /// Whether the round is in a state where a clue may be revealed.
    fn accepts_reveal(&self) -> bool {
        !self.answered && !self.guess_pending && self.claiming_player.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(value: u32) -> RoundState {
        let riddle = Riddle::new(
            "The more you take, the more you leave behind.".to_string(),
            "footsteps".to_string(),
            [
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
                "four".to_string(),
            ],
        );
        RoundState::new(riddle, value)
    }

    #[test]
    fn test_reveal_deducts_cost() {
        let mut round = round(20);
        assert!(round.reveal_clue(0, 5));
        assert_eq!(round.remaining_value(), 15);
        assert_eq!(round.revealed_count(), 1);
    }

    #[test]
    fn test_repeat_and_invalid_indices_ignored() {
        let mut round = round(20);
        assert!(round.reveal_clue(1, 5));
        assert!(!round.reveal_clue(1, 5));
        assert!(!round.reveal_clue(CLUE_COUNT, 5));
        assert_eq!(round.remaining_value(), 15);
    }

    #[test]
    fn test_value_floors_at_zero() {
        let mut round = round(10);
        for index in 0..CLUE_COUNT {
            round.reveal_clue(index, 5);
        }
        assert_eq!(round.remaining_value(), 0);
    }

    #[test]
    fn test_claim_blocks_reveals() {
        let mut round = round(20);
        round.lock_claim(Player::Two);
        assert!(!round.reveal_clue(0, 5));
        assert_eq!(round.remaining_value(), 20);
    }

    #[test]
    fn test_pending_guess_blocks_reveals() {
        let mut round = round(20);
        round.begin_guess();
        assert!(!round.reveal_clue(0, 5));
    }

    #[test]
    fn test_answered_round_blocks_reveals() {
        let mut round = round(20);
        round.begin_guess();
        round.mark_answered();
        assert!(!round.guess_pending());
        assert!(round.answered());
        assert!(!round.reveal_clue(0, 5));
    }

    #[test]
    fn test_opponent_round_trips() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
        assert_eq!(Player::One.opponent().opponent(), Player::One);
    }
}

//! Round state and the events it produces.

use serde::{Deserialize, Serialize};

use super::deck::Card;

/// Where the round is in the flip/judge cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No unjudged card face up
    Idle,
    /// One card face up, waiting for its partner
    AwaitingSecondFlip,
    /// Two cards face up, input locked until they are judged
    Evaluating,
    /// Every pair found (terminal)
    Won,
}

/// Outcome of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub attempts: u32,
    pub elapsed_seconds: u32,
}

/// Why a flip did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    OutOfRange,
    AlreadyFlipped,
    AlreadyMatched,
    Evaluating,
    RoundOver,
}

/// Result of a flip request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair turned over
    Revealed,
    /// Second card turned over; the pair will be judged after the reveal delay
    Evaluating,
    /// State unchanged
    Ignored(IgnoreReason),
}

/// Something the front end should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PairMatched { first: usize, second: usize },
    /// Both cards stay visible until `CardsHidden`
    PairMismatched { first: usize, second: usize },
    CardsHidden { first: usize, second: usize },
    Won(GameResult),
}

/// State of one round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub deck: Vec<Card>,
    /// Unjudged face-up positions (never more than 2)
    pub face_up: Vec<usize>,
    /// Pairs turned over, matched or not
    pub attempts: u32,
    pub matched_pairs: usize,
    /// Time of the first flip (ms)
    pub started_at: Option<f64>,
    /// Time the round was won (ms)
    pub finished_at: Option<f64>,
    /// Two cards are face up and waiting to be judged
    pub is_evaluating: bool,
    pub won: bool,
}

impl GameState {
    /// Fresh round over the given cards
    pub fn new(deck: Vec<Card>) -> Self {
        Self {
            deck,
            ..Self::default()
        }
    }

    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    pub fn card(&self, position: usize) -> Option<&Card> {
        self.deck.get(position)
    }

    /// All pairs found (the win may still be pending)
    pub fn all_pairs_matched(&self) -> bool {
        self.matched_pairs == self.pair_count()
    }

    pub fn phase(&self) -> GamePhase {
        if self.won {
            GamePhase::Won
        } else if self.is_evaluating {
            GamePhase::Evaluating
        } else if self.face_up.len() == 1 {
            GamePhase::AwaitingSecondFlip
        } else {
            GamePhase::Idle
        }
    }

    /// Whole seconds since the first flip; frozen once won
    pub fn elapsed_seconds(&self, now_ms: f64) -> u32 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let end = self.finished_at.unwrap_or(now_ms);
        ((end - started).max(0.0) / 1000.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::deck::cards_from_layout;

    #[test]
    fn test_elapsed_is_zero_before_start() {
        let state = GameState::new(cards_from_layout(&["A", "A"]));
        assert_eq!(state.elapsed_seconds(123_456.0), 0);
    }

    #[test]
    fn test_elapsed_rounds_down_and_freezes() {
        let mut state = GameState::new(cards_from_layout(&["A", "A"]));
        state.started_at = Some(1_000.0);
        assert_eq!(state.elapsed_seconds(2_999.0), 1);
        assert_eq!(state.elapsed_seconds(3_000.0), 2);

        state.finished_at = Some(6_500.0);
        assert_eq!(state.elapsed_seconds(60_000.0), 5);
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = GameState::new(cards_from_layout(&["A", "B", "A", "B"]));
        assert_eq!(state.phase(), GamePhase::Idle);
        state.face_up.push(0);
        assert_eq!(state.phase(), GamePhase::AwaitingSecondFlip);
        state.face_up.push(1);
        state.is_evaluating = true;
        assert_eq!(state.phase(), GamePhase::Evaluating);
        state.won = true;
        assert_eq!(state.phase(), GamePhase::Won);
    }
}

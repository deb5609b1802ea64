//! Round controller: flips, timed judging, and win detection.
//!
//! The front end calls [`MemoryGame::flip`] on clicks and
//! [`MemoryGame::advance`] every frame with the current time.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::deck::{build_deck, cards_from_layout, unique_symbols};
use super::schedule::{Scheduler, Task};
use super::state::{FlipOutcome, GameEvent, GamePhase, GameResult, GameState, IgnoreReason};
use crate::config::{GameConfig, Timings};

/// Owns one round at a time plus its pending timed transitions
#[derive(Debug, Clone)]
pub struct MemoryGame {
    state: GameState,
    scheduler: Scheduler,
    timings: Timings,
    symbols: Vec<String>,
    rng: Pcg32,
}

impl MemoryGame {
    /// Deal a shuffled round of the configured symbols
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut game = Self {
            state: GameState::default(),
            scheduler: Scheduler::new(),
            timings: config.timings,
            symbols: unique_symbols(&config.symbols),
            rng: Pcg32::seed_from_u64(seed),
        };
        game.restart();
        game
    }

    /// Round with cards in exactly this order (no shuffle).
    ///
    /// Every symbol should appear exactly twice.
    pub fn from_layout<S: AsRef<str>>(layout: &[S], timings: Timings) -> Self {
        Self {
            state: GameState::new(cards_from_layout(layout)),
            scheduler: Scheduler::new(),
            timings,
            symbols: unique_symbols(layout),
            rng: Pcg32::seed_from_u64(0),
        }
    }

    /// Start over with a new symbol set, dropping any pending transitions
    pub fn new_round<S: AsRef<str>>(&mut self, symbols: &[S]) {
        self.symbols = unique_symbols(symbols);
        self.restart();
    }

    /// Reshuffle the current symbols into a fresh round
    pub fn restart(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            log::debug!("Restart cancelled {} pending transitions", cancelled);
        }
        self.state = GameState::new(build_deck(&self.symbols, &mut self.rng));
    }

    /// Turn a card over
    pub fn flip(&mut self, position: usize, now_ms: f64) -> FlipOutcome {
        let Some(card) = self.state.deck.get(position) else {
            return FlipOutcome::Ignored(IgnoreReason::OutOfRange);
        };
        if self.state.won {
            return FlipOutcome::Ignored(IgnoreReason::RoundOver);
        }
        if self.state.is_evaluating {
            return FlipOutcome::Ignored(IgnoreReason::Evaluating);
        }
        if card.is_matched {
            return FlipOutcome::Ignored(IgnoreReason::AlreadyMatched);
        }
        if card.is_flipped {
            return FlipOutcome::Ignored(IgnoreReason::AlreadyFlipped);
        }

        if self.state.started_at.is_none() {
            self.state.started_at = Some(now_ms);
        }

        self.state.deck[position].is_flipped = true;
        self.state.face_up.push(position);

        if self.state.face_up.len() < 2 {
            return FlipOutcome::Revealed;
        }

        self.state.is_evaluating = true;
        self.state.attempts += 1;
        self.scheduler
            .schedule(now_ms + self.timings.reveal_ms, Task::Resolve);
        FlipOutcome::Evaluating
    }

    /// Run every transition due by `now_ms`.
    ///
    /// Each task runs at its own due time, so follow-up delays are measured
    /// from when the task was due rather than from when this was called.
    pub fn advance(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(scheduled) = self.scheduler.pop_due(now_ms) {
            let at = scheduled.due_ms;
            let event = match scheduled.task {
                Task::Resolve => self.resolve(at),
                Task::HideMismatch { first, second } => self.hide(first, second),
                Task::DeclareWin => self.declare_win(at),
            };
            events.extend(event);
        }
        events
    }

    fn resolve(&mut self, at_ms: f64) -> Option<GameEvent> {
        self.state.is_evaluating = false;
        let face_up = std::mem::take(&mut self.state.face_up);
        let &[first, second] = face_up.as_slice() else {
            log::warn!("Resolve ran with {} face-up cards", face_up.len());
            return None;
        };

        if self.state.deck[first].symbol == self.state.deck[second].symbol {
            self.state.deck[first].is_matched = true;
            self.state.deck[second].is_matched = true;
            self.state.matched_pairs += 1;

            if self.state.all_pairs_matched() {
                self.scheduler
                    .schedule(at_ms + self.timings.win_delay_ms, Task::DeclareWin);
            }
            Some(GameEvent::PairMatched { first, second })
        } else {
            self.scheduler.schedule(
                at_ms + self.timings.mismatch_hide_ms,
                Task::HideMismatch { first, second },
            );
            Some(GameEvent::PairMismatched { first, second })
        }
    }

    fn hide(&mut self, first: usize, second: usize) -> Option<GameEvent> {
        for position in [first, second] {
            if let Some(card) = self.state.deck.get_mut(position) {
                if !card.is_matched {
                    card.is_flipped = false;
                }
            }
        }
        Some(GameEvent::CardsHidden { first, second })
    }

    fn declare_win(&mut self, at_ms: f64) -> Option<GameEvent> {
        if self.state.won {
            return None;
        }
        self.state.won = true;
        self.state.finished_at = Some(at_ms);
        let result = self.result()?;
        log::info!(
            "Round won: {} attempts in {}s",
            result.attempts,
            result.elapsed_seconds
        );
        Some(GameEvent::Won(result))
    }

    /// Final result, once the round is won
    pub fn result(&self) -> Option<GameResult> {
        let finished = self.state.finished_at?;
        Some(GameResult {
            attempts: self.state.attempts,
            elapsed_seconds: self.state.elapsed_seconds(finished),
        })
    }

    pub fn elapsed_seconds(&self, now_ms: f64) -> u32 {
        self.state.elapsed_seconds(now_ms)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn pending_transitions(&self) -> usize {
        self.scheduler.len()
    }
}

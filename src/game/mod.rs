//! Card-pair game logic
//!
//! Pure and deterministic:
//! - Seeded RNG only
//! - Time passed in explicitly (milliseconds)
//! - Delayed transitions are scheduled tasks, cancelled on restart
//! - No rendering or platform dependencies

pub mod controller;
pub mod deck;
pub mod schedule;
pub mod state;

pub use controller::MemoryGame;
pub use deck::{Card, build_deck, cards_from_layout, paired_layout, unique_symbols};
pub use schedule::{Scheduled, Scheduler, Task};
pub use state::{FlipOutcome, GameEvent, GamePhase, GameResult, GameState, IgnoreReason};

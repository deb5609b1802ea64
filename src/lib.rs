//! Memory Match - a card-pair memory game with a leaderboard
//!
//! Core modules:
//! - `game`: Deck, round state, and timed flip/match transitions
//! - `leaderboard`: Score records and ranking
//! - `persistence`: Remote table with local storage fallback
//! - `report`: Submitting finished rounds
//! - `platform`: Browser/native platform abstraction
//! - `config`: Game settings and remote credentials

pub mod config;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod report;

pub use config::{GameConfig, RemoteConfig, Timings};
pub use error::{RemoteError, RemoteUnavailable, StorageError, SubmitError};
pub use game::{GameEvent, GamePhase, GameResult, MemoryGame};
pub use leaderboard::{Leaderboard, ScoreRecord};
pub use persistence::{ScoreBackend, ScoreStore};
pub use report::ScoreReporter;

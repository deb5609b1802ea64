//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock in milliseconds)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStorage};
pub use time::{Clock, ManualClock, SystemClock};

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;

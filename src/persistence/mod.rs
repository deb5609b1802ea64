//! Leaderboard persistence
//!
//! Features:
//! - Remote table preferred when configured at startup
//! - Any failed remote call is redone against local storage (logged only)
//! - Local storage keeps the best 50 entries under one key
//! - Local failures propagate, there is nothing left to fall back to

pub mod local;
pub mod remote;

use std::rc::Rc;

use async_trait::async_trait;

use crate::config::RemoteConfig;
use crate::error::StorageError;
use crate::leaderboard::{NewScore, ScoreRecord};
use crate::platform::{Clock, KeyValueStore};

pub use local::{LocalScores, MAX_LOCAL_SCORES, STORAGE_KEY};
pub use remote::{REMOTE_LIMIT, RemoteTable};

/// Reading and appending leaderboard records
#[async_trait(?Send)]
pub trait ScoreBackend {
    /// Best `limit` records
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError>;

    /// Append a record, returning it as stored
    async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StorageError>;
}

#[async_trait(?Send)]
impl<B: ScoreBackend + ?Sized> ScoreBackend for Rc<B> {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        (**self).fetch_top(limit).await
    }

    async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StorageError> {
        (**self).insert(score).await
    }
}

#[async_trait(?Send)]
impl<'a, B: ScoreBackend + ?Sized> ScoreBackend for &'a B {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        (**self).fetch_top(limit).await
    }

    async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StorageError> {
        (**self).insert(score).await
    }
}

/// Remote-first score store with per-call local fallback
pub struct ScoreStore {
    remote: Option<Box<dyn RemoteTable>>,
    local: LocalScores<Box<dyn KeyValueStore>>,
}

impl ScoreStore {
    /// Local storage only
    pub fn local_only(storage: Box<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self {
            remote: None,
            local: LocalScores::new(storage, clock),
        }
    }

    /// Remote table backed by local storage
    pub fn with_remote(
        remote: Box<dyn RemoteTable>,
        storage: Box<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            remote: Some(remote),
            local: LocalScores::new(storage, clock),
        }
    }

    /// Pick the backend once, from whatever credentials are configured
    pub fn from_config(
        config: &RemoteConfig,
        storage: Box<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        match remote::connect(config) {
            Ok(table) => {
                log::info!("Remote leaderboard configured");
                Self::with_remote(table, storage, clock)
            }
            Err(reason) => {
                log::info!("Remote leaderboard unavailable ({}), using local storage", reason);
                Self::local_only(storage, clock)
            }
        }
    }

    pub fn uses_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local(&self) -> &LocalScores<Box<dyn KeyValueStore>> {
        &self.local
    }
}

#[async_trait(?Send)]
impl ScoreBackend for ScoreStore {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        if let Some(remote) = &self.remote {
            match remote.select_top(limit).await {
                Ok(records) => return Ok(records),
                Err(e) => log::warn!("Remote leaderboard query failed, using local storage: {}", e),
            }
        }
        self.local.top(limit).inspect_err(|e| {
            log::error!("Local leaderboard read failed: {}", e);
        })
    }

    async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StorageError> {
        if let Some(remote) = &self.remote {
            match remote.insert_row(&score).await {
                Ok(record) => return Ok(record),
                Err(e) => log::warn!("Remote score save failed, saving locally: {}", e),
            }
        }
        self.local.insert(score).inspect_err(|e| {
            log::error!("Local score save failed: {}", e);
        })
    }
}

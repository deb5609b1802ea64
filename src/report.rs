//! Submitting a finished round to the leaderboard.

use crate::error::SubmitError;
use crate::game::GameResult;
use crate::leaderboard::{NewScore, ScoreRecord};
use crate::persistence::ScoreBackend;

/// Packages round results and stores them
pub struct ScoreReporter<B> {
    backend: B,
}

impl<B: ScoreBackend> ScoreReporter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Store `result` under `player_name` (trimmed).
    ///
    /// A blank name is rejected before the backend is touched.
    pub async fn submit(
        &self,
        player_name: &str,
        result: &GameResult,
    ) -> Result<ScoreRecord, SubmitError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(SubmitError::EmptyName);
        }

        let score = NewScore {
            player_name: player_name.to_string(),
            attempts: result.attempts,
            time_taken: result.elapsed_seconds,
        };
        let record = self.backend.insert(score).await?;
        log::info!(
            "Score submitted for {}: {}",
            record.player_name,
            record.summary()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::persistence::ScoreStore;
    use crate::persistence::tests::FakeRemote;
    use crate::platform::{ManualClock, MemoryStorage};
    use futures::executor::block_on;
    use std::rc::Rc;

    const RESULT: GameResult = GameResult {
        attempts: 14,
        elapsed_seconds: 47,
    };

    #[test]
    fn test_blank_name_rejected_without_backend_calls() {
        let remote = Rc::new(FakeRemote::default());
        let storage = Rc::new(MemoryStorage::new());
        let store = ScoreStore::with_remote(
            Box::new(remote.clone()),
            Box::new(storage.clone()),
            Rc::new(ManualClock::new(0.0)),
        );
        let reporter = ScoreReporter::new(&store);

        for name in ["", "   ", "\t\n"] {
            assert!(matches!(
                block_on(reporter.submit(name, &RESULT)),
                Err(SubmitError::EmptyName)
            ));
        }
        assert_eq!(remote.calls.get(), 0);
        assert_eq!(storage.access_count(), 0);
    }

    #[test]
    fn test_submit_trims_and_stores() {
        let store = ScoreStore::local_only(
            Box::new(MemoryStorage::new()),
            Rc::new(ManualClock::new(0.0)),
        );
        let reporter = ScoreReporter::new(&store);

        let record = block_on(reporter.submit("  choi  ", &RESULT)).unwrap();
        assert_eq!(record.player_name, "choi");
        assert_eq!(record.attempts, 14);
        assert_eq!(record.time_taken, 47);
        assert_eq!(store.local().top(10).unwrap(), vec![record]);
    }

    #[test]
    fn test_local_failure_surfaces_message() {
        let store = ScoreStore::local_only(
            Box::new(MemoryStorage::with_quota(8)),
            Rc::new(ManualClock::new(0.0)),
        );
        let reporter = ScoreReporter::new(store);

        let err = block_on(reporter.submit("jung", &RESULT)).unwrap_err();
        assert!(matches!(err, SubmitError::Storage(StorageError::Write(_))));
        assert!(err.to_string().contains("quota exceeded"));
    }
}

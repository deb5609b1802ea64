//! Leaderboard kept in a key-value store under a single key.
//!
//! Read-modify-write of one JSON array, re-sorted and capped on every insert.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StorageError;
use crate::leaderboard::{NewScore, RecordId, ScoreRecord, sort_ranked};
use crate::platform::{Clock, KeyValueStore};

/// Storage key holding the serialized leaderboard
pub const STORAGE_KEY: &str = "cardGameLeaderboard";

/// Entries kept in local storage
pub const MAX_LOCAL_SCORES: usize = 50;

/// Local leaderboard over any key-value store
pub struct LocalScores<S> {
    storage: S,
    clock: Rc<dyn Clock>,
}

impl<S: KeyValueStore> LocalScores<S> {
    pub fn new(storage: S, clock: Rc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Every stored record in ranking order
    pub fn load(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        let Some(json) = self.storage.get_item(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        let mut records: Vec<ScoreRecord> =
            serde_json::from_str(&json).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        sort_ranked(&mut records);
        Ok(records)
    }

    /// Best `limit` records
    pub fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        let mut records = self.load()?;
        records.truncate(limit);
        Ok(records)
    }

    /// Append, re-rank, keep the best [`MAX_LOCAL_SCORES`], and persist.
    ///
    /// Returns the new record even if it ranked too low to be kept.
    pub fn insert(&self, score: NewScore) -> Result<ScoreRecord, StorageError> {
        let mut records = self.load()?;

        let created_at = DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms() as i64)
            .unwrap_or_default();
        let record = ScoreRecord {
            id: Some(RecordId::Local(Uuid::new_v4().to_string())),
            player_name: score.player_name,
            attempts: score.attempts,
            time_taken: score.time_taken,
            created_at,
        };
        records.push(record.clone());
        sort_ranked(&mut records);
        records.truncate(MAX_LOCAL_SCORES);

        let json =
            serde_json::to_string(&records).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.storage.set_item(STORAGE_KEY, &json)?;
        log::info!("Local leaderboard saved ({} entries)", records.len());

        Ok(record)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ManualClock, MemoryStorage};

    fn scores() -> LocalScores<MemoryStorage> {
        LocalScores::new(MemoryStorage::new(), Rc::new(ManualClock::new(1_714_566_896_789.0)))
    }

    fn new_score(name: &str, attempts: u32, time_taken: u32) -> NewScore {
        NewScore {
            player_name: name.to_string(),
            attempts,
            time_taken,
        }
    }

    #[test]
    fn test_empty_storage_reads_as_empty() {
        assert!(scores().top(10).unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_id_and_timestamp() {
        let local = scores();
        let record = local.insert(new_score("kim", 12, 40)).unwrap();

        assert!(matches!(record.id, Some(RecordId::Local(ref id)) if !id.is_empty()));
        assert_eq!(record.created_at.timestamp_millis(), 1_714_566_896_789);
        assert_eq!(local.top(10).unwrap(), vec![record]);
    }

    #[test]
    fn test_stored_rows_carry_score_and_attempts() {
        let local = scores();
        local.insert(new_score("han", 13, 45)).unwrap();

        let json = local.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["score"], 13);
        assert_eq!(rows[0]["attempts"], 13);
        assert_eq!(rows[0]["time_taken"], 45);
        assert!(rows[0]["id"].is_string());
    }

    #[test]
    fn test_ids_are_unique() {
        let local = scores();
        let a = local.insert(new_score("a", 1, 1)).unwrap();
        let b = local.insert(new_score("a", 1, 1)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_retention_keeps_best_fifty_of_sixty() {
        let local = scores();
        // Attempts 60 down to 1 so every insert re-sorts
        for i in 0..60u32 {
            local
                .insert(new_score(&format!("p{i}"), 60 - i, 100 + i))
                .unwrap();
        }

        let stored = local.load().unwrap();
        assert_eq!(stored.len(), MAX_LOCAL_SCORES);
        let attempts: Vec<u32> = stored.iter().map(|r| r.attempts).collect();
        assert_eq!(attempts, (1..=50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_top_limits_and_orders() {
        let local = scores();
        local.insert(new_score("c", 20, 10)).unwrap();
        local.insert(new_score("a", 10, 50)).unwrap();
        local.insert(new_score("b", 10, 20)).unwrap();

        let top = local.top(2).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_corrupt_data_is_an_error() {
        let local = scores();
        local.storage().set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(local.top(10), Err(StorageError::Corrupt(_))));
        assert!(matches!(
            local.insert(new_score("a", 1, 1)),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_quota_error_propagates() {
        let local = LocalScores::new(
            MemoryStorage::with_quota(16),
            Rc::new(ManualClock::new(0.0)),
        );
        assert!(matches!(
            local.insert(new_score("a", 1, 1)),
            Err(StorageError::Write(_))
        ));
    }

    #[test]
    fn test_reads_legacy_field_layout_with_attempts_key() {
        let local = scores();
        let stored = r#"[{"id":"1714566896789","player_name":"lee","score":16,
            "time_taken":61,"attempts":16,"created_at":"2024-05-01T12:34:56.789Z"}]"#;
        local.storage().set_item(STORAGE_KEY, stored).unwrap();

        let top = local.top(10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].player_name, "lee");
        assert_eq!(top[0].attempts, 16);
    }
}

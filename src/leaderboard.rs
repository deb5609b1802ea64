//! Leaderboard records and ranking
//!
//! Fewer attempts rank higher; ties go to the faster time.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StorageError;
use crate::persistence::ScoreBackend;

/// Number of entries shown on the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

/// Row identifier: server-assigned integer or locally generated string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Remote(i64),
    Local(String),
}

/// A persisted leaderboard entry (immutable once created)
///
/// Written with the attempt count under both `score` and `attempts`;
/// read back from `score` only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub player_name: String,
    /// Attempt count (the `score` column)
    #[serde(rename = "score")]
    pub attempts: u32,
    /// Elapsed seconds
    pub time_taken: u32,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Serialize for ScoreRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.id.is_some() { 6 } else { 5 };
        let mut row = serializer.serialize_struct("ScoreRecord", len)?;
        if let Some(id) = &self.id {
            row.serialize_field("id", id)?;
        }
        row.serialize_field("player_name", &self.player_name)?;
        row.serialize_field("score", &self.attempts)?;
        row.serialize_field("attempts", &self.attempts)?;
        row.serialize_field("time_taken", &self.time_taken)?;
        row.serialize_field("created_at", &self.created_at)?;
        row.end()
    }
}

impl ScoreRecord {
    /// `"{attempts}회 / {seconds}초"`
    pub fn summary(&self) -> String {
        format!("{}회 / {}초", self.attempts, self.time_taken)
    }
}

/// A score about to be stored; the backend assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewScore {
    pub player_name: String,
    #[serde(rename = "score")]
    pub attempts: u32,
    pub time_taken: u32,
}

impl Serialize for NewScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("NewScore", 4)?;
        row.serialize_field("player_name", &self.player_name)?;
        row.serialize_field("score", &self.attempts)?;
        row.serialize_field("attempts", &self.attempts)?;
        row.serialize_field("time_taken", &self.time_taken)?;
        row.end()
    }
}

/// RFC 3339, or an offset-less `timestamp` column taken as UTC
fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unrecognized timestamp: {raw}"))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Ranking order: ascending attempts, then ascending time
pub fn ranking_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    a.attempts
        .cmp(&b.attempts)
        .then(a.time_taken.cmp(&b.time_taken))
}

/// Stable sort into ranking order
pub fn sort_ranked(records: &mut [ScoreRecord]) {
    records.sort_by(ranking_order);
}

/// Ranked view over a score backend
pub struct Leaderboard<B> {
    backend: B,
}

impl<B: ScoreBackend> Leaderboard<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Up to `n` best records in ranking order; empty when nothing is stored
    pub async fn top_scores(&self, n: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        let mut records = self.backend.fetch_top(n).await?;
        sort_ranked(&mut records);
        records.truncate(n);
        Ok(records)
    }
}

/// Rank (1-indexed) paired with each record
pub fn standings(records: &[ScoreRecord]) -> impl Iterator<Item = (usize, &ScoreRecord)> {
    records.iter().enumerate().map(|(i, r)| (i + 1, r))
}

//! Storage backends for match records.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::Mutex;

use super::errors::{RecordError, RecordResult};
use super::models::MatchRecord;
use crate::UserId;

/// Append-only storage of settled matches
#[async_trait]
pub trait MatchRecordRepository: Send + Sync {
    /// Append one record
    async fn insert(&self, record: &MatchRecord) -> RecordResult<()>;

    /// Records in which `user_id` took part, in insertion order
    async fn records_for_user(&self, user_id: UserId) -> RecordResult<Vec<MatchRecord>>;

    /// Every record, in insertion order
    async fn all_records(&self) -> RecordResult<Vec<MatchRecord>>;
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS match_records (
    id BIGSERIAL PRIMARY KEY,
    participant_a BIGINT NOT NULL,
    participant_b BIGINT NOT NULL,
    stake BIGINT NOT NULL CHECK (stake > 0),
    winner_id BIGINT,
    is_draw BOOLEAN NOT NULL,
    recorded_at TIMESTAMP NOT NULL DEFAULT NOW()
)";

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_match_records_participant_a ON match_records (participant_a)",
    "CREATE INDEX IF NOT EXISTS idx_match_records_participant_b ON match_records (participant_b)",
];

/// PostgreSQL implementation of `MatchRecordRepository`
pub struct PgMatchRecordRepository {
    pool: PgPool,
}

impl PgMatchRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `match_records` table and its indexes if missing.
    pub async fn ensure_schema(&self) -> RecordResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        for statement in CREATE_INDEXES {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> MatchRecord {
        MatchRecord {
            participant_a: row.get("participant_a"),
            participant_b: row.get("participant_b"),
            stake: row.get("stake"),
            winner: row.get("winner_id"),
            is_draw: row.get("is_draw"),
            timestamp: row.get::<chrono::NaiveDateTime, _>("recorded_at").and_utc(),
        }
    }
}

#[async_trait]
impl MatchRecordRepository for PgMatchRecordRepository {
    async fn insert(&self, record: &MatchRecord) -> RecordResult<()> {
        record.validate().map_err(RecordError::InvalidRecord)?;

        sqlx::query(
            "INSERT INTO match_records (participant_a, participant_b, stake, winner_id, is_draw, recorded_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(record.participant_a)
        .bind(record.participant_b)
        .bind(record.stake)
        .bind(record.winner)
        .bind(record.is_draw)
        .bind(record.timestamp.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn records_for_user(&self, user_id: UserId) -> RecordResult<Vec<MatchRecord>> {
        let rows = sqlx::query(
            "SELECT participant_a, participant_b, stake, winner_id, is_draw, recorded_at
             FROM match_records
             WHERE participant_a = $1 OR participant_b = $1
             ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::row_to_record).collect())
    }

    async fn all_records(&self) -> RecordResult<Vec<MatchRecord>> {
        let rows = sqlx::query(
            "SELECT participant_a, participant_b, stake, winner_id, is_draw, recorded_at
             FROM match_records
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::row_to_record).collect())
    }
}

/// Process-local record store, used by tests and the `memory` server backend
#[derive(Default)]
pub struct InMemoryMatchRecordRepository {
    records: Mutex<Vec<MatchRecord>>,
}

impl InMemoryMatchRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl MatchRecordRepository for InMemoryMatchRecordRepository {
    async fn insert(&self, record: &MatchRecord) -> RecordResult<()> {
        record.validate().map_err(RecordError::InvalidRecord)?;
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn records_for_user(&self, user_id: UserId) -> RecordResult<Vec<MatchRecord>> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|r| r.involves(user_id)).cloned().collect())
    }

    async fn all_records(&self) -> RecordResult<Vec<MatchRecord>> {
        Ok(self.records.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_insert_and_query() {
        let repo = InMemoryMatchRecordRepository::new();
        repo.insert(&MatchRecord::win(1, 2, 100, 1)).await.unwrap();
        repo.insert(&MatchRecord::draw(3, 4, 50)).await.unwrap();
        repo.insert(&MatchRecord::win(2, 3, 10, 3)).await.unwrap();

        assert_eq!(repo.len().await, 3);
        assert_eq!(repo.all_records().await.unwrap().len(), 3);

        let for_two = repo.records_for_user(2).await.unwrap();
        assert_eq!(for_two.len(), 2);
        assert_eq!(for_two[0].stake, 100);
        assert_eq!(for_two[1].stake, 10);

        assert!(repo.records_for_user(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_rejects_invalid_record() {
        let repo = InMemoryMatchRecordRepository::new();
        let result = repo.insert(&MatchRecord::win(1, 2, -5, 1)).await;
        assert!(matches!(result, Err(RecordError::InvalidRecord(_))));
        assert!(repo.is_empty().await);
    }
}

//! Match record store: append-only history of settled duels.
//!
//! This module implements:
//! - One immutable [`MatchRecord`] per settled match
//! - Per-user and global aggregate statistics, recomputed from the records
//! - Leaderboard pages over the global ordering
//!
//! Storage sits behind [`MatchRecordRepository`]; PostgreSQL and in-memory
//! implementations are provided. No update or delete operation is exposed.
//!
//! ## Example
//!
//! ```no_run
//! use duel_arena::db::Database;
//! use duel_arena::payout::CommissionRate;
//! use duel_arena::records::{MatchRecord, MatchRecordManager, PgMatchRecordRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let repository = PgMatchRecordRepository::new(db.pool().clone());
//!     repository.ensure_schema().await?;
//!
//!     let records = MatchRecordManager::new(Arc::new(repository), CommissionRate::default());
//!     records.record_match(&MatchRecord::win(1, 2, 100, 1)).await?;
//!
//!     if let Some(stats) = records.query_user_stats(1).await? {
//!         println!("won {} of {}", stats.wins, stats.matches_played);
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod repository;

pub use errors::{RecordError, RecordResult};
pub use manager::MatchRecordManager;
pub use models::{AggregateStats, LeaderboardPage, MatchRecord, RankedStats, aggregate_stats};
pub use repository::{
    InMemoryMatchRecordRepository, MatchRecordRepository, PgMatchRecordRepository,
};

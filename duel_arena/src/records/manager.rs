//! Match record manager: persistence and statistics queries.

use std::sync::Arc;

use super::errors::RecordResult;
use super::models::{AggregateStats, LeaderboardPage, MatchRecord, aggregate_stats};
use super::repository::MatchRecordRepository;
use crate::UserId;
use crate::payout::CommissionRate;

/// Records settled matches and derives statistics from them
#[derive(Clone)]
pub struct MatchRecordManager {
    repository: Arc<dyn MatchRecordRepository>,
    rate: CommissionRate,
}

impl MatchRecordManager {
    /// Create a new manager
    ///
    /// # Arguments
    ///
    /// * `repository` - Storage backend
    /// * `rate` - Commission used to compute net winnings
    pub fn new(repository: Arc<dyn MatchRecordRepository>, rate: CommissionRate) -> Self {
        Self { repository, rate }
    }

    pub fn commission(&self) -> CommissionRate {
        self.rate
    }

    /// Append a settled match
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidRecord` for an inconsistent record and a
    /// storage error when the backend cannot accept it.
    pub async fn record_match(&self, record: &MatchRecord) -> RecordResult<()> {
        self.repository.insert(record).await?;
        log::debug!(
            "Recorded match {} vs {} (stake {}, winner {:?})",
            record.participant_a,
            record.participant_b,
            record.stake,
            record.winner
        );
        Ok(())
    }

    /// Aggregate stats for one user
    ///
    /// # Returns
    ///
    /// * `None` - The user has no recorded matches
    pub async fn query_user_stats(&self, user_id: UserId) -> RecordResult<Option<AggregateStats>> {
        let records = self.repository.records_for_user(user_id).await?;
        if records.is_empty() {
            return Ok(None);
        }

        Ok(aggregate_stats(&records, self.rate)
            .into_iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, stats)| stats))
    }

    /// Stats for every user, by descending net winnings
    pub async fn query_global_stats(&self) -> RecordResult<Vec<(UserId, AggregateStats)>> {
        let records = self.repository.all_records().await?;
        Ok(aggregate_stats(&records, self.rate))
    }

    /// One page of the global ordering
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number, clamped to the available range
    /// * `page_size` - Entries per page
    pub async fn leaderboard_page(&self, page: usize, page_size: usize) -> RecordResult<LeaderboardPage> {
        let ordered = self.query_global_stats().await?;
        Ok(LeaderboardPage::paginate(&ordered, page, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InMemoryMatchRecordRepository;

    fn manager() -> MatchRecordManager {
        MatchRecordManager::new(
            Arc::new(InMemoryMatchRecordRepository::new()),
            CommissionRate::default(),
        )
    }

    #[tokio::test]
    async fn test_user_without_matches_has_no_stats() {
        let records = manager();
        assert_eq!(records.query_user_stats(1).await.unwrap(), None);
        assert!(records.query_global_stats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_stats_after_matches() {
        let records = manager();
        records.record_match(&MatchRecord::win(1, 2, 100, 1)).await.unwrap();
        records.record_match(&MatchRecord::draw(1, 3, 40)).await.unwrap();
        records.record_match(&MatchRecord::win(3, 1, 10, 3)).await.unwrap();

        let stats = records.query_user_stats(1).await.unwrap().unwrap();
        assert_eq!(stats.matches_played, 3);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.total_staked, 150);
        assert_eq!(stats.total_winnings, 190);
    }

    #[tokio::test]
    async fn test_global_stats_order() {
        let records = manager();
        records.record_match(&MatchRecord::win(1, 2, 10, 1)).await.unwrap();
        records.record_match(&MatchRecord::win(3, 4, 100, 4)).await.unwrap();

        let global = records.query_global_stats().await.unwrap();
        let ids: Vec<UserId> = global.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_leaderboard_page() {
        let records = manager();
        for i in 0..12 {
            records
                .record_match(&MatchRecord::win(100 + i, 200 + i, 10 + i, 100 + i))
                .await
                .unwrap();
        }

        let page = records.leaderboard_page(1, 10).await.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.entries.len(), 10);
        assert_eq!(page.entries[0].user_id, 111);
        assert_eq!(page.entries[0].rank, 1);
    }
}

//! Match record data models and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::UserId;
use crate::payout::{CommissionRate, compute_net_payout};

/// Immutable fact about one settled match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub participant_a: UserId,
    pub participant_b: UserId,
    pub stake: i64,
    /// Absent iff the match was a draw.
    pub winner: Option<UserId>,
    pub is_draw: bool,
    pub timestamp: DateTime<Utc>,
}

impl MatchRecord {
    /// Record a match won by `winner`.
    pub fn win(participant_a: UserId, participant_b: UserId, stake: i64, winner: UserId) -> Self {
        Self {
            participant_a,
            participant_b,
            stake,
            winner: Some(winner),
            is_draw: false,
            timestamp: Utc::now(),
        }
    }

    /// Record a drawn match.
    pub fn draw(participant_a: UserId, participant_b: UserId, stake: i64) -> Self {
        Self {
            participant_a,
            participant_b,
            stake,
            winner: None,
            is_draw: true,
            timestamp: Utc::now(),
        }
    }

    pub fn involves(&self, user_id: UserId) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    /// Check the record's internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.participant_a == self.participant_b {
            return Err("participants must differ".to_string());
        }
        if self.stake <= 0 {
            return Err(format!("stake must be positive, got {}", self.stake));
        }
        match (self.winner, self.is_draw) {
            (None, true) => Ok(()),
            (Some(winner), false) if self.involves(winner) => Ok(()),
            (Some(winner), false) => Err(format!("winner {winner} did not play this match")),
            (Some(_), true) => Err("a draw cannot have a winner".to_string()),
            (None, false) => Err("a decided match needs a winner".to_string()),
        }
    }
}

/// Per-user totals derived from the match records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Sum of stakes over every match played
    pub total_staked: i64,
    /// Sum of net payouts received from won matches
    pub total_winnings: i64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub matches_played: u32,
}

impl AggregateStats {
    /// Wins over matches played, 0 when no match was played.
    pub fn win_rate(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.matches_played)
        }
    }

    fn apply(&mut self, user_id: UserId, record: &MatchRecord, rate: CommissionRate) {
        self.total_staked = self.total_staked.saturating_add(record.stake);
        self.matches_played = self.matches_played.saturating_add(1);
        match record.winner {
            _ if record.is_draw => self.draws = self.draws.saturating_add(1),
            Some(winner) if winner == user_id => {
                self.wins = self.wins.saturating_add(1);
                self.total_winnings = self
                    .total_winnings
                    .saturating_add(compute_net_payout(record.stake, rate));
            }
            _ => self.losses = self.losses.saturating_add(1),
        }
    }
}

/// Fold `records` into per-user stats.
///
/// Ordered by descending net winnings; ties keep the order in which users
/// first appear in `records`.
pub fn aggregate_stats(records: &[MatchRecord], rate: CommissionRate) -> Vec<(UserId, AggregateStats)> {
    let mut entries: Vec<(UserId, AggregateStats)> = Vec::new();
    let mut index: HashMap<UserId, usize> = HashMap::new();

    for record in records {
        for user_id in [record.participant_a, record.participant_b] {
            let slot = *index.entry(user_id).or_insert_with(|| {
                entries.push((user_id, AggregateStats::default()));
                entries.len() - 1
            });
            entries[slot].1.apply(user_id, record, rate);
        }
    }

    entries.sort_by(|a, b| b.1.total_winnings.cmp(&a.1.total_winnings));
    entries
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStats {
    /// 1-based position in the global ordering
    pub rank: usize,
    pub user_id: UserId,
    pub stats: AggregateStats,
    pub win_rate: f64,
}

impl RankedStats {
    pub fn new(rank: usize, user_id: UserId, stats: AggregateStats) -> Self {
        Self {
            rank,
            user_id,
            win_rate: stats.win_rate(),
            stats,
        }
    }
}

/// A page of the global leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    /// 1-based page number
    pub page: usize,
    pub total_pages: usize,
    pub entries: Vec<RankedStats>,
}

impl LeaderboardPage {
    /// Slice `ordered` into pages of `per_page`; out-of-range pages are clamped.
    pub fn paginate(ordered: &[(UserId, AggregateStats)], page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = ordered.len().div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);
        let start = (page - 1) * per_page;

        let entries = ordered
            .iter()
            .enumerate()
            .skip(start)
            .take(per_page)
            .map(|(i, (user_id, stats))| RankedStats::new(i + 1, *user_id, stats.clone()))
            .collect();

        Self {
            page,
            total_pages,
            entries,
        }
    }
}

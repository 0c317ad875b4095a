//! Statistics and leaderboard.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use duel_arena::UserId;
use duel_arena::records::{AggregateStats, LeaderboardPage};
use serde::{Deserialize, Serialize};

use super::{AppState, errors::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub user_id: UserId,
    #[serde(flatten)]
    pub stats: AggregateStats,
    pub win_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// 1-based page number
    pub page: Option<usize>,
}

/// Get aggregate statistics of one user.
///
/// Returns `404 Not Found` when the user never completed a match.
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let stats = state
        .records
        .query_user_stats(user_id)
        .await?
        .ok_or(ApiError::NotFound("No completed matches for this user"))?;

    Ok(Json(UserStatsResponse {
        user_id,
        win_rate: stats.win_rate(),
        stats,
    }))
}

/// Get one page of the global ranking by net winnings.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardPage>, ApiError> {
    let page = state
        .records
        .leaderboard_page(query.page.unwrap_or(1), state.leaderboard_page_size)
        .await?;
    Ok(Json(page))
}

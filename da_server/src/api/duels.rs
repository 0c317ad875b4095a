//! Duel lookup.

use axum::{
    Json,
    extract::{Path, State},
};
use duel_arena::duel::{DuelError, DuelSnapshot};
use duel_arena::{DuelAction, DuelResponse, UserId};

use super::{AppState, errors::ApiError};

/// Get the active duel of a user.
///
/// Returns `404 Not Found` when the user is not in a duel.
pub async fn get_duel(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<DuelSnapshot>, ApiError> {
    match state.duels.submit(DuelAction::GetDuel { user_id }).await? {
        DuelResponse::Duel { duel: Some(duel) } => Ok(Json(duel)),
        _ => Err(DuelError::DuelNotFound.into()),
    }
}

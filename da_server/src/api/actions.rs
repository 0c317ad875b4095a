//! Duel action submission.

use axum::{Json, extract::State};
use duel_arena::{DuelAction, DuelResponse};
use std::time::{Duration, Instant};

use super::{AppState, errors::ApiError};
use crate::logging::log_action;

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn action_name(action: &DuelAction) -> &'static str {
    match action {
        DuelAction::Challenge { .. } => "challenge",
        DuelAction::Join { .. } => "join",
        DuelAction::JoinAsDealer { .. } => "join_as_dealer",
        DuelAction::StartMatch { .. } => "start_match",
        DuelAction::Move { .. } => "move",
        DuelAction::CancelOrWithdraw { .. } => "cancel_or_withdraw",
        DuelAction::GetDuel { .. } => "get_duel",
        DuelAction::RequestUserStats { .. } => "request_user_stats",
        DuelAction::RequestGlobalStats => "request_global_stats",
    }
}

fn response_name(response: &DuelResponse) -> &'static str {
    match response {
        DuelResponse::Challenged { .. } => "challenged",
        DuelResponse::Joined { .. } => "joined",
        DuelResponse::DealerJoined { .. } => "dealer_joined",
        DuelResponse::Started { .. } => "started",
        DuelResponse::Moved { .. } => "moved",
        DuelResponse::Settled { .. } => "settled",
        DuelResponse::Cancelled { .. } => "cancelled",
        DuelResponse::Reopened { .. } => "reopened",
        DuelResponse::Duel { .. } => "duel",
        DuelResponse::UserStats { .. } => "user_stats",
        DuelResponse::GlobalStats { .. } => "global_stats",
    }
}

/// Submit one duel action.
///
/// # Request
///
/// ```json
/// {"type": "move", "user_id": 42, "cell": 4}
/// ```
///
/// # Response
///
/// `200 OK` with the `DuelResponse` tagged by `type`, or an `ErrorResponse`
/// whose status depends on the rejection (`409`, `403`, `404`, `422`, `5xx`).
pub async fn submit_action(
    State(state): State<AppState>,
    Json(action): Json<DuelAction>,
) -> Result<Json<DuelResponse>, ApiError> {
    let name = action_name(&action);
    let user_id = action.actor();
    let started = Instant::now();

    let result = state.duels.submit(action).await;
    let elapsed = whole_millis(started.elapsed());

    match &result {
        Ok(response) => log_action(name, user_id, Ok(response_name(response)), elapsed),
        Err(e) => log_action(name, user_id, Err(e.kind()), elapsed),
    }

    Ok(Json(result?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_millis_saturates() {
        assert_eq!(whole_millis(Duration::from_micros(2_500)), 2);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }
}

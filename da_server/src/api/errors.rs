//! Mapping of duel errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use duel_arena::DuelError;
use duel_arena::records::RecordError;
use serde::{Deserialize, Serialize};

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable kind, e.g. `not_your_turn`
    pub error: String,
    /// Human-readable explanation, safe to show to users
    pub message: String,
}

/// Rejected request
#[derive(Debug)]
pub enum ApiError {
    Duel(DuelError),
    /// Lookup with no result outside the duel lifecycle
    NotFound(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Duel(e) => status_for(e),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<DuelError> for ApiError {
    fn from(err: DuelError) -> Self {
        ApiError::Duel(err)
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        ApiError::Duel(DuelError::Persistence(err))
    }
}

/// HTTP status for a duel error
pub fn status_for(err: &DuelError) -> StatusCode {
    match err {
        DuelError::AlreadyInDuel(_)
        | DuelError::NotYourTurn
        | DuelError::CellOccupied(_)
        | DuelError::GameOver
        | DuelError::DealerAlreadyAssigned
        | DuelError::DuelNotReady(_)
        | DuelError::InvalidPhase { .. } => StatusCode::CONFLICT,
        DuelError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DuelError::DuelNotFound => StatusCode::NOT_FOUND,
        DuelError::CannotJoinOwnDuel | DuelError::InvalidIndex(_) | DuelError::InvalidStake(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DuelError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DuelError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Duel(e) => {
                if let DuelError::Persistence(inner) = &e {
                    tracing::error!("Match history error: {}", inner);
                }
                ErrorResponse {
                    error: e.kind().to_string(),
                    message: e.client_message(),
                }
            }
            ApiError::NotFound(message) => ErrorResponse {
                error: "not_found".to_string(),
                message: message.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

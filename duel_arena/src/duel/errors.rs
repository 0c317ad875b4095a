//! Duel lifecycle error types.

use thiserror::Error;

use super::models::DuelPhase;
use crate::UserId;
use crate::game::GameError;
use crate::records::RecordError;

/// Reasons a duel action is rejected
#[derive(Debug, Error)]
pub enum DuelError {
    /// User already takes part in a non-terminal duel
    #[error("User {0} is already in a duel")]
    AlreadyInDuel(UserId),

    #[error("You cannot join your own challenge")]
    CannotJoinOwnDuel,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Cell {0} is already taken")]
    CellOccupied(usize),

    #[error("Cell index {0} is out of range")]
    InvalidIndex(usize),

    #[error("The match is already over")]
    GameOver,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("A dealer is already assigned to this duel")]
    DealerAlreadyAssigned,

    #[error("Duel not found")]
    DuelNotFound,

    /// Missing opponent or dealer
    #[error("Duel not ready: {0}")]
    DuelNotReady(String),

    #[error("Action not allowed while the duel is {phase}")]
    InvalidPhase { phase: DuelPhase },

    #[error("Stake must be positive, got {0}")]
    InvalidStake(i64),

    #[error("Persistence error: {0}")]
    Persistence(#[from] RecordError),

    /// The duel actor is gone
    #[error("Duel service unavailable")]
    ServiceUnavailable,
}

impl From<GameError> for DuelError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotYourTurn => DuelError::NotYourTurn,
            GameError::CellOccupied(cell) => DuelError::CellOccupied(cell),
            GameError::InvalidIndex(cell) => DuelError::InvalidIndex(cell),
            GameError::GameOver => DuelError::GameOver,
            GameError::InvalidParticipants => {
                DuelError::Unauthorized("participants must be two distinct users".to_string())
            }
        }
    }
}

impl DuelError {
    /// Stable machine-readable identifier
    pub fn kind(&self) -> &'static str {
        match self {
            DuelError::AlreadyInDuel(_) => "already_in_duel",
            DuelError::CannotJoinOwnDuel => "cannot_join_own_duel",
            DuelError::NotYourTurn => "not_your_turn",
            DuelError::CellOccupied(_) => "cell_occupied",
            DuelError::InvalidIndex(_) => "invalid_index",
            DuelError::GameOver => "game_over",
            DuelError::Unauthorized(_) => "unauthorized",
            DuelError::DealerAlreadyAssigned => "dealer_already_assigned",
            DuelError::DuelNotFound => "duel_not_found",
            DuelError::DuelNotReady(_) => "duel_not_ready",
            DuelError::InvalidPhase { .. } => "invalid_phase",
            DuelError::InvalidStake(_) => "invalid_stake",
            DuelError::Persistence(_) => "persistence_error",
            DuelError::ServiceUnavailable => "service_unavailable",
        }
    }

    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            DuelError::Persistence(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for duel operations
pub type DuelResult<T> = Result<T, DuelError>;

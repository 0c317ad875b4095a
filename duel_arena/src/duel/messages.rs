//! Duel action events, responses and actor messages.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::errors::DuelResult;
use super::models::DuelSnapshot;
use crate::game::MoveOutcome;
use crate::payout::Payout;
use crate::records::{AggregateStats, RankedStats};
use crate::{DuelId, UserId};

/// One user-initiated interaction.
///
/// Challenges are addressed by their challenger's id, which is unique among
/// active duels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuelAction {
    Challenge { user_id: UserId, stake: i64 },
    Join { user_id: UserId, challenger: UserId },
    JoinAsDealer { user_id: UserId, challenger: UserId },
    StartMatch { user_id: UserId, challenger: UserId },
    Move { user_id: UserId, cell: usize },
    /// Challenger cancels, opponent withdraws
    CancelOrWithdraw { user_id: UserId },
    GetDuel { user_id: UserId },
    RequestUserStats { user_id: UserId },
    RequestGlobalStats,
}

impl DuelAction {
    /// User who triggered the action, if any.
    pub fn actor(&self) -> Option<UserId> {
        match self {
            DuelAction::Challenge { user_id, .. }
            | DuelAction::Join { user_id, .. }
            | DuelAction::JoinAsDealer { user_id, .. }
            | DuelAction::StartMatch { user_id, .. }
            | DuelAction::Move { user_id, .. }
            | DuelAction::CancelOrWithdraw { user_id }
            | DuelAction::GetDuel { user_id }
            | DuelAction::RequestUserStats { user_id } => Some(*user_id),
            DuelAction::RequestGlobalStats => None,
        }
    }
}

/// Final state of a duel that reached a win or a draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub duel: DuelSnapshot,
    pub outcome: MoveOutcome,
    pub winner: Option<UserId>,
    /// Present only for a win
    pub payout: Option<Payout>,
    /// False when the match record could not be stored
    pub record_persisted: bool,
}

/// Successful result of a `DuelAction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuelResponse {
    Challenged { duel: DuelSnapshot },
    Joined { duel: DuelSnapshot },
    DealerJoined { duel: DuelSnapshot },
    Started { duel: DuelSnapshot },
    Moved { duel: DuelSnapshot, outcome: MoveOutcome },
    Settled { settlement: Settlement },
    Cancelled { duel: DuelSnapshot },
    /// Opponent withdrew; the challenge is open again under a new id
    Reopened {
        withdrawn: UserId,
        previous: DuelId,
        duel: DuelSnapshot,
    },
    Duel { duel: Option<DuelSnapshot> },
    UserStats {
        user_id: UserId,
        stats: Option<AggregateStats>,
    },
    GlobalStats { entries: Vec<RankedStats> },
}

/// Messages accepted by the duel actor
#[derive(Debug)]
pub enum DuelMessage {
    Action {
        action: DuelAction,
        response: oneshot::Sender<DuelResult<DuelResponse>>,
    },

    /// Stop the actor
    Close,
}

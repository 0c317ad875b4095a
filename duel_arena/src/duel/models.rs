//! Duel data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{Board, GameState, Mark};
use crate::{DuelId, UserId};

/// Where a duel stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelPhase {
    AwaitingOpponent,
    /// Opponent joined; ready once a dealer is assigned
    AwaitingDealer,
    InProgress,
    Settled,
    Cancelled,
}

impl DuelPhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, DuelPhase::Settled | DuelPhase::Cancelled)
    }
}

impl fmt::Display for DuelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            DuelPhase::AwaitingOpponent => "awaiting opponent",
            DuelPhase::AwaitingDealer => "awaiting dealer",
            DuelPhase::InProgress => "in progress",
            DuelPhase::Settled => "settled",
            DuelPhase::Cancelled => "cancelled",
        };
        write!(f, "{repr}")
    }
}

/// A wager between a challenger and (eventually) an opponent.
///
/// The challenger plays [`Mark::X`], the opponent [`Mark::O`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duel {
    pub id: DuelId,
    pub challenger: UserId,
    pub opponent: Option<UserId>,
    /// Amount each participant risks
    pub stake: i64,
    pub dealer: Option<UserId>,
    pub phase: DuelPhase,
    /// Present only while `phase` is `InProgress`
    pub game: Option<GameState>,
    pub created_at: DateTime<Utc>,
}

impl Duel {
    /// Open a challenge awaiting an opponent.
    pub fn open(id: DuelId, challenger: UserId, stake: i64) -> Self {
        Self {
            id,
            challenger,
            opponent: None,
            stake,
            dealer: None,
            phase: DuelPhase::AwaitingOpponent,
            game: None,
            created_at: Utc::now(),
        }
    }

    /// Challenger followed by the opponent, if any.
    pub fn participants(&self) -> Vec<UserId> {
        std::iter::once(self.challenger).chain(self.opponent).collect()
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.challenger == user_id || self.opponent == Some(user_id)
    }

    /// Opponent and dealer are both present and play has not started.
    pub fn is_ready(&self) -> bool {
        self.phase == DuelPhase::AwaitingDealer && self.opponent.is_some() && self.dealer.is_some()
    }

    pub fn snapshot(&self) -> DuelSnapshot {
        DuelSnapshot {
            id: self.id,
            challenger: self.challenger,
            opponent: self.opponent,
            dealer: self.dealer,
            stake: self.stake,
            phase: self.phase,
            ready: self.is_ready(),
            board: self.game.as_ref().map(|g| g.board().clone()),
            active_participant: self
                .game
                .as_ref()
                .filter(|g| !g.is_finished())
                .map(GameState::active_participant),
            marks: self.game.as_ref().map(|g| MarkAssignment {
                x: g.participant_with(Mark::X),
                o: g.participant_with(Mark::O),
            }),
        }
    }
}

/// Which participant plays which mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAssignment {
    pub x: UserId,
    pub o: UserId,
}

/// Render-ready view of a duel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub id: DuelId,
    pub challenger: UserId,
    pub opponent: Option<UserId>,
    pub dealer: Option<UserId>,
    pub stake: i64,
    pub phase: DuelPhase,
    pub ready: bool,
    pub board: Option<Board>,
    pub active_participant: Option<UserId>,
    pub marks: Option<MarkAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_duel() {
        let duel = Duel::open(1, 10, 100);
        assert_eq!(duel.phase, DuelPhase::AwaitingOpponent);
        assert_eq!(duel.participants(), vec![10]);
        assert!(duel.is_participant(10));
        assert!(!duel.is_ready());
    }

    #[test]
    fn test_ready_requires_opponent_and_dealer() {
        let mut duel = Duel::open(1, 10, 100);
        duel.opponent = Some(20);
        duel.phase = DuelPhase::AwaitingDealer;
        assert!(!duel.is_ready());

        duel.dealer = Some(30);
        assert!(duel.is_ready());
        assert!(!duel.is_participant(30));
        assert_eq!(duel.participants(), vec![10, 20]);
    }

    #[test]
    fn test_snapshot_with_game() {
        let mut duel = Duel::open(1, 10, 100);
        duel.opponent = Some(20);
        duel.dealer = Some(30);
        duel.phase = DuelPhase::InProgress;
        duel.game = Some(GameState::new(10, 20, 20).unwrap());

        let snapshot = duel.snapshot();
        assert!(!snapshot.ready);
        assert_eq!(snapshot.active_participant, Some(20));
        assert_eq!(snapshot.marks, Some(MarkAssignment { x: 10, o: 20 }));
        assert!(snapshot.board.is_some());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(DuelPhase::Settled.is_terminal());
        assert!(DuelPhase::Cancelled.is_terminal());
        assert!(!DuelPhase::InProgress.is_terminal());
        assert_eq!(DuelPhase::AwaitingDealer.to_string(), "awaiting dealer");
    }
}

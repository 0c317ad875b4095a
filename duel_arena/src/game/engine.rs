//! Move application and outcome detection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::BOARD_CELLS;
use super::entities::{Board, Mark};
use crate::UserId;

/// Errors raised by a rejected move.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("not your turn")]
    NotYourTurn,
    #[error("cell {0} is already taken")]
    CellOccupied(usize),
    #[error("cell {0} is off the board (expected 0-8)")]
    InvalidIndex(usize),
    #[error("the game is already over")]
    GameOver,
    #[error("a match needs two distinct participants")]
    InvalidParticipants,
}

pub type GameResult<T> = Result<T, GameError>;

/// Result of one accepted move.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "winner")]
pub enum MoveOutcome {
    /// Game goes on; the other participant moves next.
    Continue,
    /// The mover completed a line.
    Win(UserId),
    /// Board is full with no line.
    Draw,
}

impl MoveOutcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Board and turn order for one match.
///
/// `participants[0]` always plays [`Mark::X`] and `participants[1]` plays
/// [`Mark::O`]; the assignment never changes once the match starts.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameState {
    board: Board,
    participants: [UserId; 2],
    active: UserId,
    outcome: Option<MoveOutcome>,
}

impl GameState {
    /// Start a match with an explicit first mover.
    pub fn new(x: UserId, o: UserId, first_mover: UserId) -> GameResult<Self> {
        if x == o || (first_mover != x && first_mover != o) {
            return Err(GameError::InvalidParticipants);
        }
        Ok(Self {
            board: Board::new(),
            participants: [x, o],
            active: first_mover,
            outcome: None,
        })
    }

    /// Start a match, picking the first mover uniformly at random from `rng`.
    pub fn start<R: Rng + ?Sized>(x: UserId, o: UserId, rng: &mut R) -> GameResult<Self> {
        let first_mover = if rng.random_bool(0.5) { x } else { o };
        Self::new(x, o, first_mover)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn participants(&self) -> [UserId; 2] {
        self.participants
    }

    #[must_use]
    pub fn active_participant(&self) -> UserId {
        self.active
    }

    #[must_use]
    pub fn mark_of(&self, participant: UserId) -> Option<Mark> {
        match self.participants {
            [x, _] if x == participant => Some(Mark::X),
            [_, o] if o == participant => Some(Mark::O),
            _ => None,
        }
    }

    #[must_use]
    pub fn participant_with(&self, mark: Mark) -> UserId {
        match mark {
            Mark::X => self.participants[0],
            Mark::O => self.participants[1],
        }
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub fn outcome(&self) -> Option<MoveOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn moves_made(&self) -> usize {
        self.board.filled()
    }

    fn opponent_of(&self, participant: UserId) -> UserId {
        if participant == self.participants[0] {
            self.participants[1]
        } else {
            self.participants[0]
        }
    }
}

/// Apply `participant`'s move on `cell` to `state`.
///
/// On success the cell carries the mover's mark. The mover's mark is checked
/// against every winning line, then the board is checked for a draw; if
/// neither holds, the turn passes to the other participant.
///
/// # Errors
///
/// * `GameError::GameOver` - The match already reached a terminal outcome
/// * `GameError::NotYourTurn` - `participant` is not the active participant
/// * `GameError::InvalidIndex` - `cell` is outside 0-8
/// * `GameError::CellOccupied` - `cell` already holds a mark
pub fn apply_move(state: &mut GameState, participant: UserId, cell: usize) -> GameResult<MoveOutcome> {
    if state.outcome.is_some() {
        return Err(GameError::GameOver);
    }
    if participant != state.active {
        return Err(GameError::NotYourTurn);
    }
    if cell >= BOARD_CELLS {
        return Err(GameError::InvalidIndex(cell));
    }
    if !state.board.get(cell).is_some_and(|c| c.is_empty()) {
        return Err(GameError::CellOccupied(cell));
    }

    // Active participant is always one of the two, so the mark exists.
    let mark = state.mark_of(participant).ok_or(GameError::InvalidParticipants)?;
    state.board.set(cell, mark);

    let outcome = if state.board.has_line(mark) {
        MoveOutcome::Win(participant)
    } else if state.board.is_full() {
        MoveOutcome::Draw
    } else {
        state.active = state.opponent_of(participant);
        MoveOutcome::Continue
    };

    if outcome.is_terminal() {
        state.outcome = Some(outcome);
    }

    Ok(outcome)
}

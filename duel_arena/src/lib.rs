//! # Duel Arena
//!
//! Wagered two-player tic-tac-toe duels, refereed by a dealer and settled
//! with a house commission.
//!
//! A duel starts as a public challenge, gains an opponent, is started by an
//! authorized dealer, and ends in a win or a draw. Every settled match is
//! appended to a record store from which per-user and global statistics are
//! derived.
//!
//! ## Core Modules
//!
//! - [`game`]: Board, marks, move application, win/draw detection
//! - [`payout`]: Pot and commission arithmetic
//! - [`records`]: Append-only match history and aggregate statistics
//! - [`duel`]: Registry, lifecycle state machine and its actor
//! - [`db`]: PostgreSQL connection pooling
//!
//! ## Example
//!
//! ```
//! use duel_arena::game::{GameState, MoveOutcome, apply_move};
//!
//! let mut game = GameState::new(1, 2, 1).unwrap();
//! assert_eq!(apply_move(&mut game, 1, 4), Ok(MoveOutcome::Continue));
//! assert_eq!(game.active_participant(), 2);
//! ```

/// Chat-platform user identifier.
pub type UserId = i64;

/// In-process duel identifier.
pub type DuelId = i64;

/// Database connection pooling.
pub mod db;

/// Duel lifecycle, registry and actor.
pub mod duel;
pub use duel::{
    DuelAction, DuelActor, DuelConfig, DuelError, DuelHandle, DuelManager, DuelResponse,
    DuelResult,
};

/// Tic-tac-toe engine.
pub mod game;

/// Commission and payout calculation.
pub mod payout;
pub use payout::{CommissionRate, Payout, compute_net_payout};

/// Match history and statistics.
pub mod records;
pub use records::{AggregateStats, MatchRecord, MatchRecordManager};

//! Tic-tac-toe engine for duel matches.
//!
//! This module provides the board logic that a duel plays on:
//! - Board cells, marks and the eight winning lines
//! - Turn-taking between the two participants of a match
//! - Win and draw detection after every move
//!
//! The engine has no knowledge of users beyond the two participant ids it is
//! handed, and none of stakes or payouts. [`engine::apply_move`] mutates the
//! passed-in [`GameState`] and keeps no state of its own between calls.

pub mod constants;
pub mod engine;
pub mod entities;

pub use constants::{BOARD_CELLS, WIN_LINES};
pub use engine::{GameError, GameResult, GameState, MoveOutcome, apply_move};
pub use entities::{Board, Cell, Mark};

//! Duel lifecycle: matchmaking, dealer assignment, play and settlement.
//!
//! This module implements:
//! - DuelRegistry: index of in-flight duels, one per user
//! - DuelManager: state machine consuming typed [`DuelAction`] events
//! - DuelActor: Tokio task owning the manager, fed through a [`DuelHandle`]
//!
//! ## Lifecycle
//!
//! `AwaitingOpponent → AwaitingDealer → (dealer joins) → InProgress → Settled`,
//! with `Cancelled` reachable before play starts. An opponent withdrawing
//! before play reopens the challenge as a fresh duel.
//!
//! ## Example
//!
//! ```no_run
//! use duel_arena::duel::{DuelAction, DuelActor, DuelManager, StaticDealerRoster};
//! use duel_arena::payout::CommissionRate;
//! use duel_arena::records::{InMemoryMatchRecordRepository, MatchRecordManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let records = MatchRecordManager::new(
//!         Arc::new(InMemoryMatchRecordRepository::new()),
//!         CommissionRate::default(),
//!     );
//!     let manager = DuelManager::new(records, Arc::new(StaticDealerRoster::new([3])));
//!     let (actor, handle) = DuelActor::new(manager, 100);
//!     tokio::spawn(actor.run());
//!
//!     let response = handle.submit(DuelAction::Challenge { user_id: 1, stake: 100 }).await;
//!     println!("{response:?}");
//! }
//! ```

pub mod actor;
pub mod config;
pub mod dealer;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod models;
pub mod registry;

pub use actor::{DuelActor, DuelHandle};
pub use config::DuelConfig;
pub use dealer::{DealerAuthorizer, StaticDealerRoster};
pub use errors::{DuelError, DuelResult};
pub use manager::DuelManager;
pub use messages::{DuelAction, DuelMessage, DuelResponse, Settlement};
pub use models::{Duel, DuelPhase, DuelSnapshot, MarkAssignment};
pub use registry::{DuelRegistry, PairKey};

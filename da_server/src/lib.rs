//! HTTP front end for the duel service.
//!
//! Turns inbound requests into typed [`duel_arena::DuelAction`] events,
//! forwards them to the duel actor, and renders the results as JSON.

pub mod api;
pub mod config;
pub mod logging;

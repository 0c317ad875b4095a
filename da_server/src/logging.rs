//! Structured logging configuration.
//!
//! Records emitted through the `log` facade by `duel_arena` are bridged into
//! the same `tracing` subscriber.

use duel_arena::UserId;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var
/// (default `info,sqlx=warn`).
///
/// # Example
///
/// ```no_run
/// use da_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the handling of one duel action
///
/// # Arguments
///
/// * `action` - Action type, e.g. `join`
/// * `user_id` - Acting user, if any
/// * `outcome` - Response type on success, error kind otherwise
/// * `duration_ms` - Time spent waiting for the duel actor
pub fn log_action(action: &str, user_id: Option<UserId>, outcome: Result<&str, &str>, duration_ms: u64) {
    match outcome {
        Ok(response) => tracing::info!(
            action = action,
            user_id = user_id,
            response = response,
            duration_ms = duration_ms,
            "Duel action handled"
        ),
        Err(kind) => tracing::warn!(
            action = action,
            user_id = user_id,
            error = kind,
            duration_ms = duration_ms,
            "Duel action rejected"
        ),
    }
}

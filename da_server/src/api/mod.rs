//! HTTP API for the duel service.
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                       - Service health
//! POST /api/v1/actions               - Submit a duel action
//! GET  /api/v1/duels/{user_id}       - Active duel of a user
//! GET  /api/v1/stats/{user_id}       - Aggregate stats of a user
//! GET  /api/v1/leaderboard?page=N    - Global ranking by net winnings
//! ```
//!
//! Actions are JSON objects tagged by `type`:
//!
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/actions \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "challenge", "user_id": 1, "stake": 100}'
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development.

pub mod actions;
pub mod duels;
pub mod errors;
pub mod stats;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use duel_arena::{DuelHandle, MatchRecordManager, db::Database};
use serde_json::json;
use tower_http::cors::CorsLayer;

pub use errors::{ApiError, ErrorResponse};

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; both members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the duel actor
    pub duels: DuelHandle,
    /// Read side of the match history
    pub records: MatchRecordManager,
    /// Users per leaderboard page
    pub leaderboard_page_size: usize,
    /// Storage backend name reported by `/health`
    pub storage: String,
    /// Pool checked by `/health`; `None` for the memory backend
    pub database: Option<Database>,
}

/// Create the API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use da_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:6969").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/actions", post(actions::submit_action))
        .route("/duels/{user_id}", get(duels::get_duel))
        .route("/stats/{user_id}", get(stats::get_user_stats))
        .route("/leaderboard", get(stats::get_leaderboard));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring.
///
/// Returns `200 OK` while the duel actor is running and, for the postgres
/// backend, the database answers; `503` otherwise.
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"1.0.0","duel_service":true,"storage":"memory","storage_healthy":true,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let duel_service = !state.duels.is_closed();
    let storage_healthy = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                false
            }
        },
        None => true,
    };
    let healthy = duel_service && storage_healthy;

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "duel_service": duel_service,
        "storage": state.storage,
        "storage_healthy": storage_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

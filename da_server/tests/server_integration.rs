//! Integration tests for the HTTP API, backed by in-memory match records.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use da_server::api::{AppState, create_router};
use duel_arena::db::{Database, DatabaseConfig};
use duel_arena::duel::{DuelActor, DuelManager, StaticDealerRoster};
use duel_arena::payout::CommissionRate;
use duel_arena::records::{InMemoryMatchRecordRepository, MatchRecordManager};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

const CHALLENGER: i64 = 11;
const OPPONENT: i64 = 22;
const DEALER: i64 = 33;

/// Helper to create a test server with a running duel actor
fn create_test_server() -> Router {
    create_test_server_with_database(None)
}

fn create_test_server_with_database(database: Option<Database>) -> Router {
    let storage = if database.is_some() { "postgres" } else { "memory" };
    let records = MatchRecordManager::new(
        Arc::new(InMemoryMatchRecordRepository::new()),
        CommissionRate::default(),
    );
    let manager = DuelManager::new(records.clone(), Arc::new(StaticDealerRoster::new([DEALER])));
    let (actor, duels) = DuelActor::new(manager, 16);
    tokio::spawn(actor.run());

    create_router(AppState {
        duels,
        records,
        leaderboard_page_size: 10,
        storage: storage.to_string(),
        database,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

async fn post_action(app: &Router, action: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/actions")
        .header("content-type", "application/json")
        .body(Body::from(action.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Challenge, join, assign dealer and start; returns the first mover
async fn start_duel(app: &Router, stake: i64) -> i64 {
    let (status, body) = post_action(
        app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": stake}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "challenged");

    let (status, body) = post_action(
        app,
        json!({"type": "join", "user_id": OPPONENT, "challenger": CHALLENGER}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duel"]["phase"], "AwaitingDealer");

    let (status, body) = post_action(
        app,
        json!({"type": "join_as_dealer", "user_id": DEALER, "challenger": CHALLENGER}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duel"]["ready"], true);

    let (status, body) = post_action(
        app,
        json!({"type": "start_match", "user_id": DEALER, "challenger": CHALLENGER}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "started");
    body["duel"]["active_participant"].as_i64().unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server();
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["storage_healthy"], true);
}

#[tokio::test]
async fn test_health_check_reports_unreachable_database() {
    let config = DatabaseConfig {
        database_url: "postgres://postgres@127.0.0.1:1/duel_db".to_string(),
        min_connections: 0,
        connection_timeout_secs: 1,
        ..DatabaseConfig::development()
    };
    let database = Database::connect_lazy(&config).unwrap();
    let app = create_test_server_with_database(Some(database));
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["duel_service"], true);
    assert_eq!(body["storage"], "postgres");
    assert_eq!(body["storage_healthy"], false);
}

// ============================================================================
// Duel Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_full_duel_over_http() {
    let app = create_test_server();
    let first = start_duel(&app, 100).await;

    let moves: Vec<(i64, usize)> = if first == CHALLENGER {
        vec![(CHALLENGER, 0), (OPPONENT, 3), (CHALLENGER, 1), (OPPONENT, 4), (CHALLENGER, 2)]
    } else {
        vec![
            (OPPONENT, 3),
            (CHALLENGER, 0),
            (OPPONENT, 4),
            (CHALLENGER, 1),
            (OPPONENT, 8),
            (CHALLENGER, 2),
        ]
    };

    let mut last = Value::Null;
    for (user_id, cell) in moves {
        let (status, body) = post_action(
            &app,
            json!({"type": "move", "user_id": user_id, "cell": cell}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }

    assert_eq!(last["type"], "settled");
    assert_eq!(last["settlement"]["winner"], CHALLENGER);
    assert_eq!(last["settlement"]["payout"]["net"], 190);
    assert_eq!(last["settlement"]["record_persisted"], true);

    let (status, _) = get(&app, &format!("/api/v1/duels/{CHALLENGER}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, &format!("/api/v1/stats/{CHALLENGER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wins"], 1);
    assert_eq!(body["total_winnings"], 190);
    assert_eq!(body["win_rate"], 1.0);

    let (status, body) = get(&app, "/api/v1/leaderboard?page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["entries"][0]["user_id"], CHALLENGER);
    assert_eq!(body["entries"][0]["rank"], 1);
    assert_eq!(body["entries"][0]["win_rate"], 1.0);
    assert_eq!(body["entries"][1]["win_rate"], 0.0);
}

#[tokio::test]
async fn test_get_active_duel() {
    let app = create_test_server();
    post_action(
        &app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": 25}),
    )
    .await;

    let (status, body) = get(&app, &format!("/api/v1/duels/{CHALLENGER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stake"], 25);
    assert_eq!(body["phase"], "AwaitingOpponent");
}

// ============================================================================
// Error Mapping Tests
// ============================================================================

#[tokio::test]
async fn test_second_challenge_conflicts() {
    let app = create_test_server();
    post_action(
        &app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": 10}),
    )
    .await;

    let (status, body) = post_action(
        &app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_in_duel");
}

#[tokio::test]
async fn test_invalid_stake_is_unprocessable() {
    let app = create_test_server();
    let (status, body) = post_action(
        &app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": -5}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_stake");
}

#[tokio::test]
async fn test_non_dealer_is_forbidden() {
    let app = create_test_server();
    post_action(
        &app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": 10}),
    )
    .await;
    post_action(
        &app,
        json!({"type": "join", "user_id": OPPONENT, "challenger": CHALLENGER}),
    )
    .await;

    let (status, body) = post_action(
        &app,
        json!({"type": "join_as_dealer", "user_id": 99, "challenger": CHALLENGER}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_join_unknown_challenge_not_found() {
    let app = create_test_server();
    let (status, body) = post_action(
        &app,
        json!({"type": "join", "user_id": OPPONENT, "challenger": 12345}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "duel_not_found");
}

#[tokio::test]
async fn test_stats_for_unknown_user_not_found() {
    let app = create_test_server();
    let (status, body) = get(&app, "/api/v1/stats/777").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_withdraw_reopens_over_http() {
    let app = create_test_server();
    post_action(
        &app,
        json!({"type": "challenge", "user_id": CHALLENGER, "stake": 60}),
    )
    .await;
    post_action(
        &app,
        json!({"type": "join", "user_id": OPPONENT, "challenger": CHALLENGER}),
    )
    .await;

    let (status, body) = post_action(
        &app,
        json!({"type": "cancel_or_withdraw", "user_id": OPPONENT}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "reopened");
    assert_eq!(body["duel"]["stake"], 60);
    assert_eq!(body["duel"]["phase"], "AwaitingOpponent");

    let (status, _) = get(&app, &format!("/api/v1/duels/{OPPONENT}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_leaderboard() {
    let app = create_test_server();
    let (status, body) = get(&app, "/api/v1/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["entries"], json!([]));
}

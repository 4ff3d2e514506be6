mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn register_returns_message_and_user_id() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/register", json!({ "username": "alice", "password": "pw" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(body["user_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn duplicate_username_is_rejected_with_400() {
    let app = TestApp::new();
    app.register("alice", "pw").await;

    let (status, body) = app
        .post("/register", json!({ "username": "alice", "password": "other" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert!(body["error"].as_str().unwrap().contains("alice"));
}

#[tokio::test]
async fn login_returns_matching_user_id() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw-a").await;
    let bob = app.register("bob", "pw-b").await;

    let (status, body) = app
        .post("/login", json!({ "username": "bob", "password": "pw-b" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], bob);

    let (_, body) = app
        .post("/login", json!({ "username": "alice", "password": "pw-a" }))
        .await;
    assert_eq!(body["user_id"], alice);
}

#[tokio::test]
async fn login_mismatch_is_invalid_credentials() {
    let app = TestApp::new();
    app.register("alice", "pw").await;

    for (username, password) in [("alice", "wrong"), ("nobody", "pw"), ("ALICE", "pw")] {
        let (status, body) = app
            .post("/login", json!({ "username": username, "password": password }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{username}/{password}");
        assert_eq!(body["code"], "invalid_credentials");
    }
}

#[tokio::test]
async fn legacy_plaintext_row_can_log_in() {
    let app = TestApp::new();
    let user_id = {
        let conn = app.pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (username, password) VALUES ('legacy', 'plain')",
            [],
        )
        .unwrap();
        conn.last_insert_rowid()
    };

    let (status, body) = app
        .post("/login", json!({ "username": "legacy", "password": "plain" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id);

    let (status, _) = app
        .post("/login", json!({ "username": "legacy", "password": "plain" }))
        .await;
    assert_eq!(status, StatusCode::OK, "re-hashed password still verifies");
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let app = TestApp::new();

    let (status, _) = app.post("/register", json!({ "username": "alice" })).await;

    assert!(status.is_client_error());
}

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn create(app: &TestApp, user_id: i64, address: &str) -> Value {
    let (status, body) = app
        .post(
            "/addresses",
            json!({ "address": address, "memo": "note", "user_id": user_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body
}

#[tokio::test]
async fn create_returns_record_with_owner_username() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;

    let record = create(&app, alice, "12 Jongno-gu").await;

    assert!(record["id"].as_i64().unwrap() > 0);
    assert_eq!(record["address"], "12 Jongno-gu");
    assert_eq!(record["memo"], "note");
    assert_eq!(record["username"], "alice");
    assert_eq!(record["user_id"], alice);
    assert!(record.get("cause").is_none());

    let created_at = record["created_at"].as_str().unwrap();
    chrono::NaiveDateTime::parse_from_str(created_at, "%Y-%m-%d %H:%M:%S")
        .expect("created_at uses the fixed text format");
}

#[tokio::test]
async fn create_for_unknown_user_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/addresses", json!({ "address": "x", "memo": "y", "user_id": 999 }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (_, list) = app.get("/addresses").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn memo_may_be_omitted() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;

    let (status, body) = app
        .post("/addresses", json!({ "address": "x", "user_id": alice }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["memo"].is_null());
}

#[tokio::test]
async fn list_is_newest_first_on_both_routes() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    for address in ["A", "B", "C"] {
        create(&app, alice, address).await;
    }

    for route in ["/addresses", "/default-addresses"] {
        let (status, body) = app.get(route).await;
        assert_eq!(status, StatusCode::OK);
        let order: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["address"].as_str().unwrap())
            .collect();
        assert_eq!(order, vec!["C", "B", "A"], "route {route}");
    }
}

#[tokio::test]
async fn update_changes_only_editable_fields() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    let bob = app.register("bob", "pw").await;
    let original = create(&app, alice, "old").await;
    let id = original["id"].as_i64().unwrap();

    let (status, updated) = app
        .put(
            &format!("/addresses/{id}"),
            json!({ "address": "new", "memo": "changed", "user_id": bob }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["address"], "new");
    assert_eq!(updated["memo"], "changed");
    assert_eq!(updated["user_id"], alice, "owner is never reassigned");
    assert_eq!(updated["username"], "alice");
    assert_eq!(updated["created_at"], original["created_at"]);
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .put("/addresses/42", json!({ "address": "x", "memo": "y" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn delete_removes_record_and_second_delete_is_not_found() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    let keep = create(&app, alice, "keep").await;
    let gone = create(&app, alice, "gone").await;
    let gone_id = gone["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/addresses/{gone_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, list) = app.get("/addresses").await;
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep["id"].as_i64().unwrap()]);

    let (status, _) = app.delete(&format!("/addresses/{gone_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn general_ids_do_not_resolve_as_user_addresses() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    let record = create(&app, alice, "general").await;
    let id = record["id"].as_i64().unwrap();

    let (status, _) = app.delete(&format!("/user-addresses/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.get("/addresses").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn user_list_is_scoped_to_owner_in_insertion_order() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    let bob = app.register("bob", "pw").await;

    for address in ["first", "second"] {
        let (status, body) = app
            .post(
                &format!("/users/{alice}/addresses"),
                json!({ "address": address, "memo": "home" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], alice);
        assert_eq!(body["username"], "alice");
    }
    app.post(
        &format!("/users/{bob}/addresses"),
        json!({ "address": "bob's" }),
    )
    .await;

    let (status, list) = app.get(&format!("/users/{alice}/addresses")).await;
    assert_eq!(status, StatusCode::OK);
    let order: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["address"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["first", "second"]);
}

#[tokio::test]
async fn user_addresses_stay_out_of_general_list() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    app.post(
        &format!("/users/{alice}/addresses"),
        json!({ "address": "private" }),
    )
    .await;

    let (_, general) = app.get("/addresses").await;
    assert_eq!(general, json!([]));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/users/77/addresses").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = app
        .post("/users/77/addresses", json!({ "address": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_user_address() {
    let app = TestApp::new();
    let alice = app.register("alice", "pw").await;
    let (_, created) = app
        .post(
            &format!("/users/{alice}/addresses"),
            json!({ "address": "x" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/user-addresses/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, list) = app.get(&format!("/users/{alice}/addresses")).await;
    assert_eq!(list, json!([]));

    let (status, _) = app.delete(&format!("/user-addresses/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

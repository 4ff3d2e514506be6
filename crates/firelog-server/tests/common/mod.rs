#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use firelog_db::{create_pool, reconcile_schema, DbPool, DbRuntimeSettings};
use firelog_server::{app, config::Config, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a freshly reconciled database in a temporary directory.
///
/// The directory lives as long as the harness; every pooled connection sees
/// the same file.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("firelog.db");
        let pool = create_pool(db_path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            reconcile_schema(&conn).unwrap();
        }

        let router = app(AppState::new(pool.clone(), &config));
        Self {
            router,
            pool,
            _dir: dir,
        }
    }

    /// Sends one request and returns the status with the decoded JSON body
    /// (`Value::Null` for an empty body).
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Registers `username` and returns the new user id.
    pub async fn register(&self, username: &str, password: &str) -> i64 {
        let (status, body) = self
            .post(
                "/register",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["user_id"].as_i64().unwrap()
    }
}

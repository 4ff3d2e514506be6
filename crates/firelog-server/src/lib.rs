//! firelog HTTP server library logic.

pub mod api;
pub mod api_addresses;
pub mod api_reference;
pub mod config;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use firelog_db::DbPool;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. Handlers check out one connection per request.
    pub pool: DbPool,
    /// Upper bound on the time spent handling a single request.
    pub request_timeout: Duration,
    /// Origins allowed by the CORS layer. `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Builds the state from a ready pool and the loaded configuration.
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            request_timeout: Duration::from_millis(config.server.request_timeout_ms),
            cors_origins: config.cors.allowed_origins.clone(),
        }
    }
}

/// Maximum request body size (64 KiB).
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/register", post(api::register_handler))
        .route("/login", post(api::login_handler))
        .route(
            "/addresses",
            get(api_addresses::list_addresses_handler).post(api_addresses::create_address_handler),
        )
        .route(
            "/default-addresses",
            get(api_addresses::list_addresses_handler),
        )
        .route(
            "/addresses/{id}",
            put(api_addresses::update_address_handler)
                .delete(api_addresses::delete_address_handler),
        )
        .route(
            "/fire-addresses",
            get(api_addresses::list_fire_addresses_handler)
                .post(api_addresses::create_fire_address_handler),
        )
        .route(
            "/fire-addresses/{id}",
            put(api_addresses::update_fire_address_handler)
                .delete(api_addresses::delete_fire_address_handler),
        )
        .route(
            "/users/{userId}/addresses",
            get(api_addresses::list_user_addresses_handler)
                .post(api_addresses::create_user_address_handler),
        )
        .route(
            "/user-addresses/{id}",
            delete(api_addresses::delete_user_address_handler),
        )
        .route("/facilities", get(api_reference::list_facilities_handler))
        .route(
            "/fire-stations",
            get(api_reference::list_fire_stations_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            middleware::request_timeout_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(Arc::new(state)))
}

/// Builds the CORS policy for the configured origins.
///
/// A `*` entry allows any origin without credentials; otherwise only the
/// listed origins are echoed back, with credentials allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

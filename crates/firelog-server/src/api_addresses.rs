//! Handlers for general, fire-incident, and user-added addresses.
//!
//! All three families go through the same store operations; each handler
//! only fixes the [`AddressKind`] and where the owner id comes from.

use crate::api::{with_conn, ApiError, MessageResponse};
use crate::AppState;
use axum::extract::{Extension, Json, Path};
use firelog_store::{create_address, delete_address, list_addresses, update_address};
use firelog_types::{AddressFields, AddressKind, AddressRecord, UserId};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating a general or fire address.
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    /// Only stored for fire addresses.
    #[serde(default)]
    pub cause: Option<String>,
    pub user_id: UserId,
}

/// Request body for updating a general or fire address.
///
/// Clients send the owner id back on update; it is accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct AddressUpdateRequest {
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Request body for adding an address to a user's own list.
#[derive(Debug, Deserialize)]
pub struct UserAddressRequest {
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
}

fn fields_for(kind: AddressKind, address: String, memo: Option<String>, cause: Option<String>) -> AddressFields {
    AddressFields {
        address,
        memo,
        cause: if kind.has_cause() { cause } else { None },
    }
}

async fn list_kind(
    state: Arc<AppState>,
    kind: AddressKind,
    owner: Option<UserId>,
) -> Result<Json<Vec<AddressRecord>>, ApiError> {
    let records = with_conn(state, move |conn| list_addresses(conn, kind, owner)).await?;
    Ok(Json(records))
}

async fn create_kind(
    state: Arc<AppState>,
    kind: AddressKind,
    owner: UserId,
    fields: AddressFields,
) -> Result<Json<AddressRecord>, ApiError> {
    let record = with_conn(state, move |conn| create_address(conn, kind, owner, &fields)).await?;
    tracing::info!(
        kind = kind.label(),
        id = record.id,
        user_id = owner,
        "address created"
    );
    Ok(Json(record))
}

async fn update_kind(
    state: Arc<AppState>,
    kind: AddressKind,
    id: i64,
    payload: AddressUpdateRequest,
) -> Result<Json<AddressRecord>, ApiError> {
    if let Some(sent) = payload.user_id {
        tracing::debug!(kind = kind.label(), id, user_id = sent, "ignoring user_id on update");
    }
    let fields = fields_for(kind, payload.address, payload.memo, payload.cause);
    let record = with_conn(state, move |conn| update_address(conn, kind, id, &fields)).await?;
    tracing::info!(kind = kind.label(), id, "address updated");
    Ok(Json(record))
}

async fn delete_kind(
    state: Arc<AppState>,
    kind: AddressKind,
    id: i64,
) -> Result<Json<MessageResponse>, ApiError> {
    with_conn(state, move |conn| delete_address(conn, kind, id)).await?;
    tracing::info!(kind = kind.label(), id, "address deleted");
    Ok(Json(MessageResponse {
        message: "deleted".to_string(),
    }))
}

/// Handler for `GET /addresses` and `GET /default-addresses`.
pub async fn list_addresses_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<AddressRecord>>, ApiError> {
    list_kind(state, AddressKind::General, None).await
}

/// Handler for `POST /addresses`.
pub async fn create_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<AddressRecord>, ApiError> {
    let kind = AddressKind::General;
    let fields = fields_for(kind, payload.address, payload.memo, payload.cause);
    create_kind(state, kind, payload.user_id, fields).await
}

/// Handler for `PUT /addresses/{id}`.
pub async fn update_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<AddressUpdateRequest>,
) -> Result<Json<AddressRecord>, ApiError> {
    update_kind(state, AddressKind::General, id, payload).await
}

/// Handler for `DELETE /addresses/{id}`.
pub async fn delete_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_kind(state, AddressKind::General, id).await
}

/// Handler for `GET /fire-addresses`.
pub async fn list_fire_addresses_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<AddressRecord>>, ApiError> {
    list_kind(state, AddressKind::Fire, None).await
}

/// Handler for `POST /fire-addresses`.
pub async fn create_fire_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<AddressRecord>, ApiError> {
    let kind = AddressKind::Fire;
    let fields = fields_for(kind, payload.address, payload.memo, payload.cause);
    create_kind(state, kind, payload.user_id, fields).await
}

/// Handler for `PUT /fire-addresses/{id}`.
pub async fn update_fire_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<AddressUpdateRequest>,
) -> Result<Json<AddressRecord>, ApiError> {
    update_kind(state, AddressKind::Fire, id, payload).await
}

/// Handler for `DELETE /fire-addresses/{id}`.
pub async fn delete_fire_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_kind(state, AddressKind::Fire, id).await
}

/// Handler for `GET /users/{userId}/addresses`.
pub async fn list_user_addresses_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<AddressRecord>>, ApiError> {
    list_kind(state, AddressKind::UserAdded, Some(user_id)).await
}

/// Handler for `POST /users/{userId}/addresses`.
pub async fn create_user_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UserAddressRequest>,
) -> Result<Json<AddressRecord>, ApiError> {
    let kind = AddressKind::UserAdded;
    let fields = fields_for(kind, payload.address, payload.memo, None);
    create_kind(state, kind, user_id, fields).await
}

/// Handler for `DELETE /user-addresses/{id}`.
pub async fn delete_user_address_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_kind(state, AddressKind::UserAdded, id).await
}

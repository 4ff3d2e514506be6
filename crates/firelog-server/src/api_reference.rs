//! Read-only listings of the facility and fire-station reference tables.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::extract::{Extension, Json};
use firelog_store::list_reference;
use firelog_types::{ReferenceKind, ReferenceRecord};
use std::sync::Arc;

async fn list_kind(
    state: Arc<AppState>,
    kind: ReferenceKind,
) -> Result<Json<Vec<ReferenceRecord>>, ApiError> {
    let records = with_conn(state, move |conn| list_reference(conn, kind)).await?;
    Ok(Json(records))
}

/// Handler for `GET /facilities`.
pub async fn list_facilities_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<ReferenceRecord>>, ApiError> {
    list_kind(state, ReferenceKind::Facilities).await
}

/// Handler for `GET /fire-stations`.
pub async fn list_fire_stations_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<ReferenceRecord>>, ApiError> {
    list_kind(state, ReferenceKind::FireStations).await
}

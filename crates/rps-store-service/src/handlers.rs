//! HTTP API handlers.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rps_store::{ClientId, RecordStore, SearchQuery, StoreError, CLIENT_ID_HEADER};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::state::AppState;

// ============ Request types ============

#[derive(Deserialize)]
pub struct WriteRequest {
    pub record_type: String,
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub plain: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct ShareRequest {
    pub record_type: String,
    pub grantee: ClientId,
}

// ============ Helpers ============

fn client_id_from_header(headers: &HeaderMap) -> Option<ClientId> {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ClientId::from)
        .filter(|id| !id.is_empty())
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({"error": message.into()})),
    )
        .into_response()
}

fn missing_client_id() -> Response {
    error(
        StatusCode::UNAUTHORIZED,
        format!("Missing {} header", CLIENT_ID_HEADER),
    )
}

fn store_error(err: StoreError) -> Response {
    let status = match err {
        StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        StoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        StoreError::NetworkError(_) | StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error(status, err.to_string())
}

// ============ Record handlers ============

pub async fn search_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(query): Json<SearchQuery>,
) -> Response {
    let Some(client_id) = client_id_from_header(&headers) else {
        return missing_client_id();
    };

    match state.as_client(client_id).search(&query).await {
        Ok(records) => Json(serde_json::json!({"records": records})).into_response(),
        Err(err) => store_error(err),
    }
}

pub async fn write_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<WriteRequest>,
) -> Response {
    let Some(client_id) = client_id_from_header(&headers) else {
        return missing_client_id();
    };

    match state
        .as_client(client_id.clone())
        .write(&req.record_type, req.data, req.plain)
        .await
    {
        Ok(record) => {
            tracing::info!(
                record_id = %record.id(),
                record_type = %req.record_type,
                writer = %client_id,
                "record written"
            );
            Json(record).into_response()
        }
        Err(err) => store_error(err),
    }
}

pub async fn share_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ShareRequest>,
) -> Response {
    let Some(client_id) = client_id_from_header(&headers) else {
        return missing_client_id();
    };

    match state
        .as_client(client_id.clone())
        .share(&req.record_type, &req.grantee)
        .await
    {
        Ok(()) => {
            tracing::info!(
                record_type = %req.record_type,
                writer = %client_id,
                grantee = %req.grantee,
                "records shared"
            );
            Json(serde_json::json!({"status": "shared"})).into_response()
        }
        Err(err) => store_error(err),
    }
}

pub async fn health() -> impl IntoResponse {
    "ok"
}

//! HTTP surface of the document store server.
//!
//! Endpoints:
//! - `GET /health` — liveness check
//! - `GET /collections/{collection}/documents` — full listing
//! - `GET /collections/{collection}/documents/{key}` — one document
//! - `PUT /collections/{collection}/documents/{key}` — upsert
//! - `DELETE /collections/{collection}/documents/{key}` — delete

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::storage::{FileStorage, StorageError};
use crate::store::{Document, Fields};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    storage: Arc<FileStorage>,
}

/// Error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Maps storage failures onto HTTP responses.
enum ApiError {
    InvalidName(String),
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidName(name) => ApiError::InvalidName(name),
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidName(name) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "invalid_name",
                    message: format!("'{}' is not a valid collection or document name", name),
                }),
            )
                .into_response(),
            ApiError::Storage(e) => {
                tracing::error!("storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "storage_error",
                        message: e.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Lists every document in a collection.
async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = state.storage.list_all(&collection)?;
    Ok(Json(docs))
}

/// Fetches a single document, 404 if absent.
async fn get_document(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    match state.storage.load(&collection, &key)? {
        Some(fields) => Ok(Json(fields).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "not_found",
                message: format!("document '{}' not found", key),
            }),
        )
            .into_response()),
    }
}

/// Creates or replaces a document.
async fn put_document(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
    Json(fields): Json<Fields>,
) -> Result<StatusCode, ApiError> {
    state.storage.save(&collection, &key, &fields)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a document. Idempotent.
async fn delete_document(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let existed = state.storage.delete(&collection, &key)?;
    if !existed {
        tracing::debug!(%collection, %key, "delete of absent document");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Builds the router over the given storage.
pub fn router(storage: FileStorage) -> Router {
    let state = AppState {
        storage: Arc::new(storage),
    };

    Router::new()
        .route("/health", get(health))
        .route("/collections/{collection}/documents", get(list_documents))
        .route(
            "/collections/{collection}/documents/{key}",
            get(get_document).put(put_document).delete(delete_document),
        )
        .with_state(state)
}

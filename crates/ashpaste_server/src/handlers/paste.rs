//! Paste HTTP handlers.

use crate::{error::HttpError, models::paste::*, AppState};
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const RAW_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Create a new paste.
///
/// # Arguments
/// - `state`: Application state.
/// - `payload`: Paste creation payload.
///
/// # Returns
/// The new paste id as JSON.
///
/// # Errors
/// Returns an error if the body does not decode, or if validation or
/// persistence fails.
pub async fn create_paste(
    State(state): State<AppState>,
    payload: Result<Json<CreatePasteRequest>, JsonRejection>,
) -> Result<Json<CreatePasteResponse>, HttpError> {
    let Json(req) = payload?;
    let created = state.service.create(req).await?;
    Ok(Json(created))
}

/// Create a paste from a raw request body.
///
/// # Arguments
/// - `state`: Application state.
/// - `query`: Language, burn flag and expiry from the query string.
/// - `body`: Submitted bytes; must be UTF-8.
///
/// # Returns
/// The new paste id as JSON.
///
/// # Errors
/// Returns an error if the query string does not decode, or if validation or
/// persistence fails.
pub async fn create_raw_paste(
    State(state): State<AppState>,
    query: Result<Query<RawCreateQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<CreatePasteResponse>, HttpError> {
    let Query(query) = query?;
    let created = state
        .service
        .create_raw(
            body.to_vec(),
            &query.language,
            query.burn,
            query.expiry_minutes,
        )
        .await?;
    Ok(Json(created))
}

/// Get a paste by id.
///
/// # Returns
/// The paste as JSON when it is live (or being served once).
///
/// # Errors
/// `400` for malformed ids, `404` for unknown ids, `410` for expired or
/// burned pastes.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Paste>, HttpError> {
    Ok(Json(state.service.get(&id).await?))
}

/// Get a paste's content as plain text.
///
/// Same lifecycle rules as [`get_paste`].
pub async fn get_raw_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let content = state.service.get_raw(&id).await?;
    Ok(([(header::CONTENT_TYPE, RAW_CONTENT_TYPE)], content).into_response())
}

/// Delete a paste by id.
///
/// # Arguments
/// - `state`: Application state.
/// - `id`: Paste identifier.
///
/// # Returns
/// Success marker JSON.
///
/// # Errors
/// Returns an error if the id is malformed or no paste has it.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, HttpError> {
    state.service.delete(&id).await?;
    Ok(Json(json!({ "success": true })))
}

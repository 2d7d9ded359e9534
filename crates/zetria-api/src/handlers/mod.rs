//! HTTP handlers, one module per resource.

pub mod auth;
pub mod flashcards;
pub mod graph;
pub mod health;
pub mod links;
pub mod notes;
pub mod pages;
pub mod tasks;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, MSG_NO_DATA};

/// Decode a JSON body.
///
/// A missing or malformed body, an empty object and a body whose fields have
/// the wrong types are all rejected with "Dados não fornecidos".
pub(crate) fn json_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let no_data = || ApiError::BadRequest(MSG_NO_DATA.to_string());
    let Json(value) = payload.map_err(|_| no_data())?;
    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(no_data()),
    }
    serde_json::from_value(value).map_err(|_| no_data())
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resource id from the path. Ids that are not UUIDs cannot exist, so they
/// yield the resource's not-found message.
pub(crate) fn path_id(
    path: Result<Path<Uuid>, PathRejection>,
    not_found: &str,
) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// `{"message": ..., "success": true}`
pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text, "success": true }))
}

//! Note-to-note links.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use zetria_core::LinkRepository;

use crate::{
    auth::CurrentUser,
    error::{ApiError, OrNotFound},
    AppState,
};

use super::{json_body, notes::MSG_NOTE_NOT_FOUND, path_id};

pub const MSG_LINK_IDS_REQUIRED: &str = "IDs de origem e destino são obrigatórios";
pub const MSG_SELF_LINK: &str = "Uma nota não pode ser vinculada a ela mesma";
pub const MSG_LINK_CREATED: &str = "Link criado com sucesso";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkInput {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
}

impl LinkInput {
    /// Both ids present and distinct. Ids that are not UUIDs cannot name a
    /// note, so they are reported as not found.
    pub fn validate(self) -> Result<(Uuid, Uuid), ApiError> {
        let (Some(source), Some(target)) = (self.source_id, self.target_id) else {
            return Err(ApiError::BadRequest(MSG_LINK_IDS_REQUIRED.to_string()));
        };
        let parse = |raw: &str| {
            Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound(MSG_NOTE_NOT_FOUND.to_string()))
        };
        let (source, target) = (parse(&source)?, parse(&target)?);
        if source == target {
            return Err(ApiError::BadRequest(MSG_SELF_LINK.to_string()));
        }
        Ok((source, target))
    }
}

/// `POST /api/links`
pub async fn create_link(
    user: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (source_id, target_id) = json_body::<LinkInput>(payload)?.validate()?;
    state
        .db
        .links
        .create(user.user_id, source_id, target_id)
        .await
        .or_not_found(MSG_NOTE_NOT_FOUND)?;

    info!(
        subsystem = "links",
        user_id = %user.user_id,
        source_id = %source_id,
        target_id = %target_id,
        "Manual link created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": MSG_LINK_CREATED, "success": true })),
    ))
}

/// `GET /api/notas/:id/links`
pub async fn note_links(
    user: CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path, MSG_NOTE_NOT_FOUND)?;
    let links = state
        .db
        .links
        .for_note(user.user_id, id)
        .await
        .or_not_found(MSG_NOTE_NOT_FOUND)?;
    Ok(Json(json!({
        "links": links.links,
        "backlinks": links.backlinks,
        "success": true,
    })))
}

//! HTTP handlers for media items. Delegates to `MediaService`.

use crate::{errors::AppError, models::entity::EntitySlim, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for `POST /media`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaReq {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// `POST /media` — create a media item.
pub async fn create_media(
    State(state): State<AppState>,
    Json(payload): Json<CreateMediaReq>,
) -> Result<impl IntoResponse, AppError> {
    let entity = state
        .media
        .create(&payload.name, payload.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// `GET /media/{id}` — fetch a media item, trashed or not.
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntitySlim>, AppError> {
    Ok(Json(state.media.get(id).await?))
}

/// `DELETE /media/{id}` — move a media item to the recycle bin.
pub async fn trash_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntitySlim>, AppError> {
    Ok(Json(state.media.move_to_recycle_bin(id).await?))
}

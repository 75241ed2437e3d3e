//! HTTP handlers for the media recycle bin.
//!
//! Maps [`ResolutionOutcome`] onto status codes:
//! - `success`           -> 200 with the parent reference
//! - `parentUnavailable` -> 404 carrying the parent (or `null`)
//! - `notFound`          -> 404
//! - `noParentRelation`  -> 404
//! - `notTrashed`        -> 400

use crate::{
    errors::AppError,
    models::entity::EntitySlim,
    services::recycle_bin_query_service::ResolutionOutcome,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Minimal reference returned for a resolved parent.
#[derive(Debug, Serialize)]
pub struct ReferenceById {
    pub id: Uuid,
    pub name: String,
}

/// Request body for `POST /recycle-bin/media/{id}/restore`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoreReq {
    pub target_id: Option<Uuid>,
}

/// `GET /recycle-bin/media/{id}/original-parent`
pub async fn original_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let outcome = state.recycle_bin.original_parent(id).await?;

    let response = match outcome {
        ResolutionOutcome::Success(parent) => (
            StatusCode::OK,
            Json(ReferenceById {
                id: parent.id,
                name: parent.name,
            }),
        )
            .into_response(),
        ResolutionOutcome::ParentUnavailable(parent) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "parent unavailable",
                "parent": parent,
            })),
        )
            .into_response(),
        ResolutionOutcome::NotFound => {
            return Err(AppError::not_found(format!("media `{}` not found", id)));
        }
        ResolutionOutcome::NotTrashed => {
            return Err(AppError::bad_request(format!(
                "media `{}` is not in the recycle bin",
                id
            )));
        }
        ResolutionOutcome::NoParentRelation => {
            return Err(AppError::not_found(format!(
                "no original parent recorded for media `{}`",
                id
            )));
        }
    };

    Ok(response)
}

/// `POST /recycle-bin/media/{id}/restore` — restore under `targetId`, or the
/// root when the body or `targetId` is absent.
pub async fn restore_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<RestoreReq>>,
) -> Result<Json<EntitySlim>, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    Ok(Json(state.media.restore(id, payload.target_id).await?))
}

//! Handlers for the `/tracks` resource.
//!
//! Bodies and path ids are taken as `Result<_, Rejection>` so that syntax
//! errors, wrong content types, unknown keys and non-numeric ids all come
//! back as a 400 with the standard `{ "error": ... }` envelope instead of
//! axum's plain-text rejection.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracklist_core::track::TrackInput;
use tracklist_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/tracks
///
/// List every track in storage order.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tracks = state.tracks.list_tracks().await?;
    Ok(Json(tracks))
}

/// POST /api/tracks
///
/// Create a track. Responds 201 with the persisted track.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TrackInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let track = state.tracks.create_track(input).await?;
    Ok((StatusCode::CREATED, Json(track)))
}

/// PUT /api/tracks/{id}
///
/// Partially update a track. An unknown id is reported as 404 before the
/// body is looked at.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<TrackInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    state.tracks.get_track(id).await?;
    let Json(input) = payload?;

    let track = state.tracks.update_track(id, input).await?;
    Ok(Json(track))
}

/// DELETE /api/tracks/{id}
///
/// Remove a track. Responds 204, or 404 if it does not exist.
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    state.tracks.delete_track(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

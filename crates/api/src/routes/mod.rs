pub mod health;
pub mod track;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tracks                 list, create
/// /tracks/{id}            update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/tracks", track::router())
}

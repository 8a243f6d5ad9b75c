use std::sync::Arc;

use tracklist_core::service::TrackService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Track validation/persistence service.
    pub tracks: TrackService,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

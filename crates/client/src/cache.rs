//! Local mirror of the server's tracks.
//!
//! [`TrackClient`] issues requests through [`TrackApi`] and applies each
//! successful response to an ordered in-memory list. The server stays
//! authoritative; the cache is only ever written from its responses.
//!
//! All operations share one `loading` flag. Overlapping calls are allowed,
//! but the flag then reflects whichever call finished last rather than
//! whether anything is still in flight.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracklist_core::track::{Track, TrackInput};
use tracklist_core::types::DbId;

use crate::api::TrackApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Debug, Default)]
struct CacheState {
    tracks: Vec<Track>,
    loading: bool,
    error: Option<String>,
}

/// Cache-synchronising track client. Clones share the same cache.
#[derive(Clone)]
pub struct TrackClient {
    api: Arc<TrackApi>,
    state: Arc<RwLock<CacheState>>,
}

impl TrackClient {
    pub fn new(api: TrackApi) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(TrackApi::from_config(config))
    }

    pub fn api(&self) -> &TrackApi {
        &self.api
    }

    // ---- cached state ----

    /// Snapshot of the cached tracks in cache order.
    pub fn tracks(&self) -> Vec<Track> {
        self.read().tracks.clone()
    }

    /// Local lookup only; never touches the network.
    pub fn get_track(&self, id: DbId) -> Option<Track> {
        self.read().tracks.iter().find(|t| t.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Message of the last failed operation, cleared when the next one starts.
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    // ---- operations ----

    /// Replace the whole cache with the server's list, in server order.
    pub async fn fetch_tracks(&self) -> Result<Vec<Track>, ClientError> {
        self.begin();
        let result = self.api.list_tracks().await;

        let mut state = self.write();
        state.loading = false;
        match &result {
            Ok(tracks) => {
                tracing::debug!(count = tracks.len(), "Track cache refreshed");
                state.tracks = tracks.clone();
            }
            Err(err) => state.error = Some(format!("Failed to fetch tracks: {err}")),
        }
        result
    }

    /// Same as [`fetch_tracks`](Self::fetch_tracks).
    pub async fn refresh_tracks(&self) -> Result<Vec<Track>, ClientError> {
        self.fetch_tracks().await
    }

    /// Create on the server and append the result to the end of the cache.
    pub async fn create_track(&self, input: &TrackInput) -> Result<Track, ClientError> {
        self.begin();
        let result = self.api.create_track(input).await;

        let mut state = self.write();
        state.loading = false;
        match &result {
            Ok(track) => {
                tracing::debug!(track_id = track.id, "Appended created track to cache");
                state.tracks.push(track.clone());
            }
            Err(err) => state.error = Some(err.to_string()),
        }
        result
    }

    /// Update on the server and replace the cached entry in place.
    ///
    /// If `id` is not cached the response is dropped and the cache stays as
    /// it was; this is not treated as an error.
    pub async fn update_track(&self, id: DbId, input: &TrackInput) -> Result<Track, ClientError> {
        self.begin();
        let result = self.api.update_track(id, input).await;

        let mut state = self.write();
        state.loading = false;
        match &result {
            Ok(track) => match state.tracks.iter_mut().find(|t| t.id == id) {
                Some(slot) => *slot = track.clone(),
                None => tracing::debug!(track_id = id, "Updated track is not cached, skipping"),
            },
            Err(err) => state.error = Some(err.to_string()),
        }
        result
    }

    /// Delete on the server and drop the cached entry.
    pub async fn delete_track(&self, id: DbId) -> Result<(), ClientError> {
        self.begin();
        let result = self.api.delete_track(id).await;

        let mut state = self.write();
        state.loading = false;
        match &result {
            Ok(()) => state.tracks.retain(|t| t.id != id),
            Err(err) => state.error = Some(err.to_string()),
        }
        result
    }

    // ---- private helpers ----

    fn begin(&self) {
        let mut state = self.write();
        state.loading = true;
        state.error = None;
    }

    // Never held across an await.
    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

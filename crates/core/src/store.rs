//! Persistence seam for tracks.
//!
//! [`TrackStore`] is the only source of truth for track state. The service
//! layer talks to it through `Arc<dyn TrackStore>` so the PostgreSQL backend
//! (in `tracklist-db`) and [`MemoryTrackStore`] are interchangeable.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::track::{NewTrack, Track};
use crate::types::DbId;

/// Storage backend for tracks.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// All tracks in storage order.
    async fn list_all(&self) -> Result<Vec<Track>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Track>, CoreError>;

    /// Insert a validated track and return it with its assigned id.
    async fn insert(&self, track: &NewTrack) -> Result<Track, CoreError>;

    /// Replace every mutable column of `track.id`.
    ///
    /// Returns `None` if the row no longer exists.
    async fn save(&self, track: &Track) -> Result<Option<Track>, CoreError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Process-local store for development and tests.
///
/// Ids start at 1 and are never reused; listing follows id order.
#[derive(Default)]
pub struct MemoryTrackStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    last_id: DbId,
    rows: BTreeMap<DbId, Track>,
}

impl MemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackStore for MemoryTrackStore {
    async fn list_all(&self) -> Result<Vec<Track>, CoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Track>, CoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, track: &NewTrack) -> Result<Track, CoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let created = track.clone().with_id(inner.last_id);
        inner.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn save(&self, track: &Track) -> Result<Option<Track>, CoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&track.id).map(|row| {
            *row = track.clone();
            row.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}

//! Validate-then-commit operations over a [`TrackStore`].
//!
//! Each mutation builds the complete candidate entity, validates it, and only
//! then writes it. A rejected mutation never reaches the store. There is no
//! version column: concurrent updates of the same id resolve last-write-wins.

use std::sync::Arc;

use crate::error::CoreError;
use crate::store::TrackStore;
use crate::track::{Track, TrackInput, ENTITY};
use crate::types::DbId;

/// Track validation/persistence service. Cheap to clone.
#[derive(Clone)]
pub struct TrackService {
    store: Arc<dyn TrackStore>,
}

impl TrackService {
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TrackStore> {
        &self.store
    }

    pub async fn list_tracks(&self) -> Result<Vec<Track>, CoreError> {
        self.store.list_all().await
    }

    /// Fetch a track or fail with [`CoreError::NotFound`].
    pub async fn get_track(&self, id: DbId) -> Result<Track, CoreError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    pub async fn create_track(&self, input: TrackInput) -> Result<Track, CoreError> {
        let candidate = input.into_new_track()?;
        let track = self.store.insert(&candidate).await?;
        tracing::info!(track_id = track.id, title = %track.title, "Track created");
        Ok(track)
    }

    /// Apply a partial update to an existing track.
    ///
    /// Omitted fields keep their stored value but still take part in
    /// validation of the merged entity.
    pub async fn update_track(&self, id: DbId, input: TrackInput) -> Result<Track, CoreError> {
        let existing = self.get_track(id).await?;
        let merged = input.merge_into(&existing)?;

        // The row can disappear between the read and the write.
        let track = self
            .store
            .save(&merged)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        tracing::info!(track_id = track.id, "Track updated");
        Ok(track)
    }

    pub async fn delete_track(&self, id: DbId) -> Result<(), CoreError> {
        if !self.store.delete(id).await? {
            return Err(CoreError::NotFound { entity: ENTITY, id });
        }
        tracing::info!(track_id = id, "Track deleted");
        Ok(())
    }
}

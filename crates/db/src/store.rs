//! [`TrackStore`] backed by PostgreSQL.

use async_trait::async_trait;
use tracklist_core::error::CoreError;
use tracklist_core::store::TrackStore;
use tracklist_core::track::{NewTrack, Track};
use tracklist_core::types::DbId;

use crate::repositories::TrackRepo;
use crate::DbPool;

/// Adapts [`TrackRepo`] to the service's persistence seam.
///
/// Each call is a single statement, so a failed write never leaves a
/// partially written row behind.
#[derive(Clone)]
pub struct PgTrackStore {
    pool: DbPool,
}

impl PgTrackStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Track storage error");
    CoreError::Internal(format!("Database error: {err}"))
}

#[async_trait]
impl TrackStore for PgTrackStore {
    async fn list_all(&self) -> Result<Vec<Track>, CoreError> {
        let rows = TrackRepo::list(&self.pool).await.map_err(storage_error)?;
        Ok(rows.into_iter().map(Track::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Track>, CoreError> {
        let row = TrackRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Track::from))
    }

    async fn insert(&self, track: &NewTrack) -> Result<Track, CoreError> {
        let row = TrackRepo::create(&self.pool, track)
            .await
            .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn save(&self, track: &Track) -> Result<Option<Track>, CoreError> {
        let row = TrackRepo::replace(&self.pool, track)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Track::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        TrackRepo::delete(&self.pool, id)
            .await
            .map_err(storage_error)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(storage_error)
    }
}

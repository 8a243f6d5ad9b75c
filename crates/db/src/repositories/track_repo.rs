//! Repository for the `tracks` table.

use sqlx::PgPool;
use tracklist_core::track::{NewTrack, Track};
use tracklist_core::types::DbId;

use crate::models::track::TrackRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, artist, duration, isrc";

/// Provides CRUD operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTrack) -> Result<TrackRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (title, artist, duration, isrc) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackRow>(&query)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(input.duration)
            .bind(&input.isrc)
            .fetch_one(pool)
            .await
    }

    /// Find a track by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrackRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, TrackRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tracks in insertion (id) order.
    pub async fn list(pool: &PgPool) -> Result<Vec<TrackRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks ORDER BY id");
        sqlx::query_as::<_, TrackRow>(&query).fetch_all(pool).await
    }

    /// Overwrite every mutable column of an already-validated track.
    ///
    /// Returns `None` if no row with `track.id` exists.
    pub async fn replace(pool: &PgPool, track: &Track) -> Result<Option<TrackRow>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET \
                title = $2, \
                artist = $3, \
                duration = $4, \
                isrc = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackRow>(&query)
            .bind(track.id)
            .bind(&track.title)
            .bind(&track.artist)
            .bind(track.duration)
            .bind(&track.isrc)
            .fetch_optional(pool)
            .await
    }

    /// Delete a track. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tracks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

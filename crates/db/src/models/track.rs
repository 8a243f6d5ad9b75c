//! Row mapping for the `tracks` table.

use sqlx::FromRow;
use tracklist_core::track::Track;
use tracklist_core::types::DbId;

/// A row from the `tracks` table (timestamps are not selected).
#[derive(Debug, Clone, FromRow)]
pub struct TrackRow {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub duration: i32,
    pub isrc: Option<String>,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Track {
            id: row.id,
            title: row.title,
            artist: row.artist,
            duration: row.duration,
            isrc: row.isrc,
        }
    }
}

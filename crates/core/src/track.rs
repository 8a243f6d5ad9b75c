//! Track entity, input schema and field rules.
//!
//! Inputs arrive as a [`TrackInput`]: every key optional, unknown keys
//! rejected at deserialization. Creation and partial update both go through
//! the same draft so the whole entity is validated after the merge:
//!
//! 1. Overlay the present input keys onto the base (empty for create).
//! 2. Coerce `duration` text to an integer and normalize `""` ISRC to null.
//! 3. Validate every field, collecting all violations.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{FieldViolation, Violations};
use crate::types::DbId;

/// Entity name used in not-found errors.
pub const ENTITY: &str = "Track";

/// Field names in declaration order; violations are reported in this order.
pub const FIELDS: [&str; 4] = ["title", "artist", "duration", "isrc"];

/// A persisted track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    /// Length in whole seconds.
    pub duration: i32,
    pub isrc: Option<String>,
}

/// A validated track that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub duration: i32,
    pub isrc: Option<String>,
}

impl NewTrack {
    pub fn with_id(self, id: DbId) -> Track {
        Track {
            id,
            title: self.title,
            artist: self.artist,
            duration: self.duration,
            isrc: self.isrc,
        }
    }
}

/// A `duration` as sent over the wire: either a JSON integer or numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(i64),
    Text(String),
}

impl DurationValue {
    /// Parse to whole seconds. `None` for non-numeric text or values that do
    /// not fit the column.
    pub fn coerce(&self) -> Option<i32> {
        match self {
            DurationValue::Seconds(n) => i32::try_from(*n).ok(),
            DurationValue::Text(s) => s.trim().parse::<i32>().ok(),
        }
    }
}

impl From<i32> for DurationValue {
    fn from(seconds: i32) -> Self {
        DurationValue::Seconds(i64::from(seconds))
    }
}

impl From<&str> for DurationValue {
    fn from(text: &str) -> Self {
        DurationValue::Text(text.to_string())
    }
}

/// Create or partial-update payload.
///
/// A key that is absent leaves the field alone. `isrc` distinguishes absent
/// (`None`) from an explicit `null` or `""` (`Some(None)` after
/// normalization), both of which clear the code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationValue>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub isrc: Option<Option<String>>,
}

/// Maps a present key (including `null`) to `Some`, leaving `None` for absent.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TrackInput {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn duration(mut self, duration: impl Into<DurationValue>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn isrc(mut self, isrc: Option<&str>) -> Self {
        self.isrc = Some(isrc.map(str::to_string));
        self
    }

    /// Populate a brand new track from this input and validate it.
    pub fn into_new_track(self) -> Result<NewTrack, Violations> {
        let draft = TrackDraft {
            title: self.title.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            duration: DurationSlot::from_input(self.duration.as_ref()),
            isrc: self.isrc.and_then(normalize_isrc),
        };
        draft.finish()
    }

    /// Overlay the present keys onto `existing` and validate the merged whole.
    ///
    /// `existing` is never touched; the merged track is returned by value.
    pub fn merge_into(self, existing: &Track) -> Result<Track, Violations> {
        let duration = match self.duration.as_ref() {
            Some(value) => DurationSlot::from_input(Some(value)),
            None => DurationSlot::Value(existing.duration),
        };
        let isrc = match self.isrc {
            Some(isrc) => normalize_isrc(isrc),
            None => existing.isrc.clone(),
        };
        let draft = TrackDraft {
            title: self.title.unwrap_or_else(|| existing.title.clone()),
            artist: self.artist.unwrap_or_else(|| existing.artist.clone()),
            duration,
            isrc,
        };
        draft.finish().map(|merged| merged.with_id(existing.id))
    }
}

/// Empty ISRC text means "no code".
fn normalize_isrc(isrc: Option<String>) -> Option<String> {
    isrc.filter(|code| !code.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DurationSlot {
    Missing,
    Value(i32),
    Unparsable,
}

impl DurationSlot {
    fn from_input(value: Option<&DurationValue>) -> Self {
        match value {
            None => DurationSlot::Missing,
            Some(value) => value
                .coerce()
                .map_or(DurationSlot::Unparsable, DurationSlot::Value),
        }
    }

    fn seconds(self) -> Result<i32, FieldViolation> {
        let message = match self {
            DurationSlot::Value(seconds) => return Ok(seconds),
            DurationSlot::Missing => "Duration is required",
            DurationSlot::Unparsable => "Duration must be a valid integer",
        };
        Err(FieldViolation {
            field: "duration",
            message: message.into(),
        })
    }
}

/// Text fields go through `validator`; `duration` is checked while it is
/// extracted, so a valid draft always yields its seconds.
#[derive(Debug, Validate)]
struct TrackDraft {
    #[validate(length(min = 1, message = "Title is required"))]
    title: String,
    #[validate(length(min = 1, message = "Artist is required"))]
    artist: String,
    duration: DurationSlot,
    #[validate(length(min = 1, message = "ISRC cannot be blank"))]
    isrc: Option<String>,
}

impl TrackDraft {
    fn finish(self) -> Result<NewTrack, Violations> {
        match (self.validate(), self.duration.seconds()) {
            (Ok(()), Ok(duration)) => Ok(NewTrack {
                title: self.title,
                artist: self.artist,
                duration,
                isrc: self.isrc,
            }),
            (fields, duration) => Err(collect_violations(fields.err().as_ref(), duration.err())),
        }
    }
}

/// Merge validator output and the duration check into field-ordered violations.
fn collect_violations(
    errors: Option<&ValidationErrors>,
    duration: Option<FieldViolation>,
) -> Violations {
    let mut violations: Vec<FieldViolation> = errors
        .into_iter()
        .flat_map(|errors| errors.field_errors())
        .flat_map(|(field, errs)| {
            let field = FIELDS
                .iter()
                .copied()
                .find(|known| *known == AsRef::<str>::as_ref(field))
                .unwrap_or("input");
            errs.iter().map(move |err| FieldViolation {
                field,
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid")),
            })
        })
        .collect();
    violations.extend(duration);
    violations.sort_by_key(|v| FIELDS.iter().position(|f| *f == v.field));
    Violations::new(violations)
}

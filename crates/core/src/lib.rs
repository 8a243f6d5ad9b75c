//! Domain layer for the tracklist service.
//!
//! Holds the [`track::Track`] entity with its input schema and field rules,
//! the [`store::TrackStore`] persistence seam, and the
//! [`service::TrackService`] that validates and commits mutations.

pub mod error;
pub mod service;
pub mod store;
pub mod track;
pub mod types;

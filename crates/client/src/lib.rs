//! Client side of the tracklist service.
//!
//! [`cache::TrackClient`] mirrors the server's tracks in a local ordered
//! cache, [`notifications::NotificationCenter`] holds timed success/error
//! feedback, and [`modal::TrackModal`] drives the create/edit form. A
//! [`session::TrackSession`] owns one of each and wires them together.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod modal;
pub mod notifications;
pub mod session;

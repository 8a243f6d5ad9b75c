//! Create/edit form state machine.
//!
//! ```text
//! Closed ──open_create──▶ Create ──submit──▶ Submitting ──ok──▶ Closed
//!    └────open_edit─────▶ Edit   ──submit──▶ Submitting ──err─▶ Create | Edit
//! ```
//!
//! `Edit` holds its own copy of the track, so typing into the form never
//! touches the client cache; only a successful submit does. `close` is
//! allowed from every state. [`TrackModal::can_close`] is an advisory flag
//! that callers check themselves before closing mid-submit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracklist_core::track::{Track, TrackInput};

use crate::cache::TrackClient;
use crate::error::ClientError;

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalMode {
    #[default]
    Closed,
    Create,
    /// Editing a private snapshot of a cached track.
    Edit(Track),
    /// A request is in flight; holds the mode to return to on failure.
    Submitting(Box<ModalMode>),
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Track),
    Updated(Track),
}

impl SubmitOutcome {
    pub fn track(&self) -> &Track {
        match self {
            SubmitOutcome::Created(track) | SubmitOutcome::Updated(track) => track,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("No form is open")]
    NotOpen,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Default)]
struct ModalState {
    mode: ModalMode,
    form_error: Option<String>,
    form_data: Option<TrackInput>,
    /// Bumped on every transition a caller starts; a finishing submit only
    /// applies its result if nothing else happened meanwhile.
    ticket: u64,
}

impl ModalState {
    fn enter(&mut self, mode: ModalMode) {
        self.mode = mode;
        self.form_error = None;
        self.form_data = None;
        self.ticket += 1;
    }
}

/// Track form modal. Clones share the same state.
#[derive(Clone, Default)]
pub struct TrackModal {
    inner: Arc<Mutex<ModalState>>,
}

impl TrackModal {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- queries ----

    pub fn mode(&self) -> ModalMode {
        self.lock().mode.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().mode != ModalMode::Closed
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.lock().mode, ModalMode::Submitting(_))
    }

    /// Advisory: `false` while a submit is in flight.
    pub fn can_close(&self) -> bool {
        !self.is_submitting()
    }

    /// Snapshot being edited, also while its submit is in flight.
    pub fn editing_track(&self) -> Option<Track> {
        match &self.lock().mode {
            ModalMode::Edit(track) => Some(track.clone()),
            ModalMode::Submitting(prior) => match prior.as_ref() {
                ModalMode::Edit(track) => Some(track.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_track().is_some()
    }

    pub fn modal_title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Track"
        } else {
            "Add New Track"
        }
    }

    pub fn form_error(&self) -> Option<String> {
        self.lock().form_error.clone()
    }

    /// Form data of the last submit, kept after a failure for re-display.
    pub fn form_data(&self) -> Option<TrackInput> {
        self.lock().form_data.clone()
    }

    // ---- transitions ----

    pub fn open_create(&self) {
        self.lock().enter(ModalMode::Create);
    }

    /// Open for editing a copy of `track`. `None` logs a warning and does nothing.
    pub fn open_edit(&self, track: Option<Track>) {
        let Some(track) = track else {
            tracing::warn!("open_edit called without track data");
            return;
        };
        self.lock().enter(ModalMode::Edit(track));
    }

    pub fn close(&self) {
        self.lock().enter(ModalMode::Closed);
    }

    pub fn reset(&self) {
        self.close();
    }

    pub fn set_form_error(&self, message: impl Into<String>) {
        self.lock().form_error = Some(message.into());
    }

    pub fn clear_form_error(&self) {
        self.lock().form_error = None;
    }

    /// Submit `form` through `client`: create in `Create`, update the
    /// snapshot's id in `Edit`.
    ///
    /// On success the modal closes. On failure it returns to the mode it was
    /// in with the error message attached and `form` retained. If the modal
    /// was closed or reopened while the request was in flight, the result is
    /// returned but the modal is left alone.
    pub async fn submit(
        &self,
        client: &TrackClient,
        form: TrackInput,
    ) -> Result<SubmitOutcome, SubmitError> {
        let (prior, ticket) = {
            let mut state = self.lock();
            match state.mode {
                ModalMode::Closed => return Err(SubmitError::NotOpen),
                ModalMode::Submitting(_) => return Err(SubmitError::AlreadySubmitting),
                ModalMode::Create | ModalMode::Edit(_) => {}
            }
            let prior = state.mode.clone();
            state.mode = ModalMode::Submitting(Box::new(prior.clone()));
            state.form_error = None;
            state.form_data = Some(form.clone());
            state.ticket += 1;
            (prior, state.ticket)
        };

        let result = match &prior {
            ModalMode::Edit(track) => client
                .update_track(track.id, &form)
                .await
                .map(SubmitOutcome::Updated),
            _ => client.create_track(&form).await.map(SubmitOutcome::Created),
        };

        let mut state = self.lock();
        if state.ticket == ticket {
            match &result {
                Ok(_) => state.enter(ModalMode::Closed),
                Err(err) => {
                    state.mode = prior;
                    state.form_error = Some(err.to_string());
                }
            }
        }
        result.map_err(SubmitError::from)
    }

    fn lock(&self) -> MutexGuard<'_, ModalState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::api::TrackApi;

    fn track() -> Track {
        Track {
            id: 3,
            title: "Song".into(),
            artist: "Artist".into(),
            duration: 100,
            isrc: None,
        }
    }

    fn offline_client() -> TrackClient {
        TrackClient::new(TrackApi::new("http://127.0.0.1:1/api"))
    }

    #[test]
    fn open_create_clears_previous_error() {
        let modal = TrackModal::new();
        modal.set_form_error("old");
        modal.open_create();

        assert_eq!(modal.mode(), ModalMode::Create);
        assert!(modal.form_error().is_none());
        assert_eq!(modal.modal_title(), "Add New Track");
    }

    #[test]
    fn open_edit_holds_a_copy() {
        let modal = TrackModal::new();
        let mut original = track();
        modal.open_edit(Some(original.clone()));
        original.title = "Changed elsewhere".into();

        assert_eq!(modal.editing_track().unwrap().title, "Song");
        assert!(modal.is_editing());
        assert_eq!(modal.modal_title(), "Edit Track");
    }

    #[test]
    fn open_edit_without_track_is_a_no_op() {
        let modal = TrackModal::new();
        modal.open_create();
        modal.open_edit(None);
        assert_eq!(modal.mode(), ModalMode::Create);
    }

    #[test]
    fn close_resets_everything() {
        let modal = TrackModal::new();
        modal.open_edit(Some(track()));
        modal.set_form_error("bad");
        modal.close();

        assert_eq!(modal.mode(), ModalMode::Closed);
        assert!(modal.form_error().is_none());
        assert!(modal.can_close());
    }

    #[tokio::test]
    async fn submit_while_closed_is_rejected() {
        let modal = TrackModal::new();
        let result = modal.submit(&offline_client(), TrackInput::default()).await;
        assert_matches!(result, Err(SubmitError::NotOpen));
    }

    #[tokio::test]
    async fn failed_submit_returns_to_prior_mode_with_error() {
        let modal = TrackModal::new();
        modal.open_edit(Some(track()));
        let form = TrackInput::default().title("New title");

        let result = modal.submit(&offline_client(), form.clone()).await;

        assert_matches!(result, Err(SubmitError::Client(ClientError::Network(_))));
        assert_eq!(modal.mode(), ModalMode::Edit(track()));
        assert!(modal.form_error().is_some());
        assert_eq!(modal.form_data(), Some(form));
        assert!(!modal.is_submitting());
    }
}

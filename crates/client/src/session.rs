//! Per-session context tying the client pieces together.
//!
//! A [`TrackSession`] is owned by whoever drives the UI. It holds one cache,
//! one notification center and one modal; nothing here is process-global, so
//! two sessions never see each other's state.

use tracklist_core::track::{Track, TrackInput};
use tracklist_core::types::DbId;

use crate::cache::TrackClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::modal::{SubmitError, SubmitOutcome, TrackModal};
use crate::notifications::NotificationCenter;

pub struct TrackSession {
    client: TrackClient,
    notifications: NotificationCenter,
    modal: TrackModal,
}

impl TrackSession {
    pub fn new(client: TrackClient) -> Self {
        Self {
            client,
            notifications: NotificationCenter::new(),
            modal: TrackModal::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(TrackClient::from_config(config))
    }

    pub fn client(&self) -> &TrackClient {
        &self.client
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn modal(&self) -> &TrackModal {
        &self.modal
    }

    /// Fill the cache from the server. Failures are shown as an error notice.
    pub async fn load(&self) -> Result<Vec<Track>, ClientError> {
        let result = self.client.fetch_tracks().await;
        if let Err(err) = &result {
            self.notifications.tracks().load_failed(err);
        }
        result
    }

    pub fn open_create(&self) {
        self.modal.open_create();
    }

    /// Open the edit form for a cached track. Returns `false` if `id` is not cached.
    pub fn open_edit(&self, id: DbId) -> bool {
        let track = self.client.get_track(id);
        let found = track.is_some();
        self.modal.open_edit(track);
        found
    }

    /// Close the form unless a submit is in flight. Returns whether it closed.
    pub fn close(&self) -> bool {
        if !self.modal.can_close() {
            return false;
        }
        self.modal.close();
        true
    }

    /// Submit the open form and report the outcome as a notice.
    pub async fn submit(&self, form: TrackInput) -> Result<SubmitOutcome, SubmitError> {
        let editing = self.modal.is_editing();
        let result = self.modal.submit(&self.client, form).await;

        let notices = self.notifications.tracks();
        match &result {
            Ok(SubmitOutcome::Created(_)) => notices.created(),
            Ok(SubmitOutcome::Updated(_)) => notices.updated(),
            Err(SubmitError::Client(err)) if editing => notices.update_failed(err),
            Err(SubmitError::Client(err)) => notices.create_failed(err),
            Err(err) => tracing::warn!(error = %err, "Submit ignored"),
        }
        result
    }

    /// Delete a track and report the outcome as a notice.
    pub async fn delete(&self, id: DbId) -> Result<(), ClientError> {
        let result = self.client.delete_track(id).await;
        match &result {
            Ok(()) => self.notifications.tracks().deleted(),
            Err(err) => self.notifications.tracks().delete_failed(err),
        }
        result
    }
}

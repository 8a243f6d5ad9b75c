//! End-to-end tests: the reqwest client against the real router, served on
//! an ephemeral local port over the in-memory store.

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tokio::sync::{mpsc, Semaphore};
use tracklist_api::config::ServerConfig;
use tracklist_api::router::build_app_router;
use tracklist_api::state::AppState;
use tracklist_client::api::TrackApi;
use tracklist_client::cache::TrackClient;
use tracklist_client::config::ClientConfig;
use tracklist_client::error::ClientError;
use tracklist_client::modal::{ModalMode, SubmitError, SubmitOutcome, TrackModal};
use tracklist_client::session::TrackSession;
use tracklist_core::service::TrackService;
use tracklist_core::store::MemoryTrackStore;
use tracklist_core::track::{Track, TrackInput};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_app() -> Router {
    let config = ServerConfig::from_lookup(|_| None).unwrap();
    let state = AppState {
        tracks: TrackService::new(Arc::new(MemoryTrackStore::new())),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Serve `app` on an ephemeral port and return its API base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Serve a fresh app and return its API base URL.
async fn spawn_server() -> String {
    serve(test_app()).await
}

/// Holds every request at the door until the test lets it through.
#[derive(Clone)]
struct Gate {
    arrived: mpsc::UnboundedSender<()>,
    permits: Arc<Semaphore>,
}

async fn hold(State(gate): State<Gate>, request: Request, next: Next) -> Response {
    let _ = gate.arrived.send(());
    if let Ok(permit) = gate.permits.acquire().await {
        permit.forget();
    }
    next.run(request).await
}

struct GatedServer {
    base_url: String,
    arrived: mpsc::UnboundedReceiver<()>,
    permits: Arc<Semaphore>,
}

impl GatedServer {
    async fn start() -> Self {
        let (tx, arrived) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(0));
        let gate = Gate {
            arrived: tx,
            permits: permits.clone(),
        };
        let app = test_app().layer(middleware::from_fn_with_state(gate, hold));
        Self {
            base_url: serve(app).await,
            arrived,
            permits,
        }
    }

    /// Wait until one more request is parked at the gate.
    async fn request_arrived(&mut self) {
        self.arrived.recv().await.unwrap();
    }

    /// Let the next parked request through.
    fn release_one(&self) {
        self.permits.add_permits(1);
    }
}

fn song(title: &str) -> TrackInput {
    TrackInput::default()
        .title(title)
        .artist("Artist A")
        .duration(200)
}

// ---------------------------------------------------------------------------
// TrackClient cache coherence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_appends_and_fetch_is_superset() {
    let client = TrackClient::new(TrackApi::new(spawn_server().await));
    client.fetch_tracks().await.unwrap();
    assert!(client.tracks().is_empty());

    let created = client
        .create_track(&song("Song A").isrc(Some("")))
        .await
        .unwrap();
    assert_eq!(created.isrc, None);
    assert_eq!(client.tracks(), vec![created.clone()]);
    assert!(!client.is_loading());

    let fetched = client.fetch_tracks().await.unwrap();
    assert!(fetched.contains(&created));
    assert_eq!(client.tracks(), fetched);
}

#[tokio::test]
async fn update_replaces_cached_entry_in_place() {
    let client = TrackClient::new(TrackApi::new(spawn_server().await));
    let a = client.create_track(&song("A")).await.unwrap();
    let b = client.create_track(&song("B")).await.unwrap();

    let updated = client
        .update_track(a.id, &TrackInput::default().duration("180"))
        .await
        .unwrap();

    assert_eq!(updated.duration, 180);
    assert_eq!(updated.title, "A");
    assert_eq!(client.tracks(), vec![updated, b]);
}

#[tokio::test]
async fn update_of_uncached_track_leaves_cache_stale() {
    let base = spawn_server().await;
    let writer = TrackClient::new(TrackApi::new(base.clone()));
    let reader = TrackClient::new(TrackApi::new(base));

    let created = writer.create_track(&song("Elsewhere")).await.unwrap();

    let updated = reader
        .update_track(created.id, &TrackInput::default().title("Renamed"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert!(reader.tracks().is_empty());
    assert!(reader.get_track(created.id).is_none());
}

#[tokio::test]
async fn server_validation_message_is_surfaced_verbatim() {
    let client = TrackClient::new(TrackApi::new(spawn_server().await));

    let err = client
        .create_track(&TrackInput::default())
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Api { status: 400, .. });
    assert_eq!(
        err.to_string(),
        "Title is required, Artist is required, Duration is required"
    );
    assert_eq!(client.error(), Some(err.to_string()));
    assert!(client.tracks().is_empty());
}

#[tokio::test]
async fn update_of_unknown_id_is_404() {
    let client = TrackClient::new(TrackApi::new(spawn_server().await));

    let err = client
        .update_track(999, &TrackInput::default().title("X"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Track with id 999 not found");
}

#[tokio::test]
async fn delete_removes_local_entry() {
    let client = TrackClient::new(TrackApi::new(spawn_server().await));
    let a = client.create_track(&song("A")).await.unwrap();
    let b = client.create_track(&song("B")).await.unwrap();

    client.delete_track(a.id).await.unwrap();

    assert_eq!(client.tracks(), vec![b]);
    assert!(client.fetch_tracks().await.unwrap().iter().all(|t| t.id != a.id));
}

// ---------------------------------------------------------------------------
// In-flight state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loading_is_set_while_fetch_is_in_flight() {
    let mut server = GatedServer::start().await;
    let client = TrackClient::new(TrackApi::new(server.base_url.clone()));
    assert!(!client.is_loading());

    let fetch = tokio::spawn({
        let client = client.clone();
        async move { client.fetch_tracks().await }
    });
    server.request_arrived().await;
    assert!(client.is_loading());

    server.release_one();
    fetch.await.unwrap().unwrap();
    assert!(!client.is_loading());
}

#[tokio::test]
async fn first_overlapping_call_to_finish_clears_loading() {
    let mut server = GatedServer::start().await;
    let client = TrackClient::new(TrackApi::new(server.base_url.clone()));

    let first = tokio::spawn({
        let client = client.clone();
        async move { client.fetch_tracks().await }
    });
    server.request_arrived().await;
    let second = tokio::spawn({
        let client = client.clone();
        async move { client.create_track(&song("Late")).await }
    });
    server.request_arrived().await;

    server.release_one();
    first.await.unwrap().unwrap();
    // The create is still parked, yet the shared flag already reads idle.
    assert!(!client.is_loading());

    server.release_one();
    let created = second.await.unwrap().unwrap();
    assert_eq!(client.tracks(), vec![created]);
}

#[tokio::test]
async fn modal_is_submitting_and_not_closable_while_in_flight() {
    let mut server = GatedServer::start().await;
    let client = TrackClient::new(TrackApi::new(server.base_url.clone()));
    let modal = TrackModal::new();
    modal.open_create();

    let submit = tokio::spawn({
        let (modal, client) = (modal.clone(), client.clone());
        async move { modal.submit(&client, song("Pending")).await }
    });
    server.request_arrived().await;

    assert_eq!(modal.mode(), ModalMode::Submitting(Box::new(ModalMode::Create)));
    assert!(modal.is_submitting());
    assert!(!modal.can_close());
    assert_matches!(
        modal.submit(&client, song("Again")).await,
        Err(SubmitError::AlreadySubmitting)
    );

    server.release_one();
    assert_matches!(submit.await.unwrap(), Ok(SubmitOutcome::Created(_)));
    assert_eq!(modal.mode(), ModalMode::Closed);
    assert!(modal.can_close());
    assert_eq!(client.tracks().len(), 1);
}

#[tokio::test]
async fn submit_finishing_after_reopen_leaves_modal_alone() {
    let mut server = GatedServer::start().await;
    let client = TrackClient::new(TrackApi::new(server.base_url.clone()));
    let modal = TrackModal::new();
    modal.open_create();

    let submit = tokio::spawn({
        let (modal, client) = (modal.clone(), client.clone());
        async move { modal.submit(&client, song("Orphan")).await }
    });
    server.request_arrived().await;

    let other = Track {
        id: 9,
        title: "Other".into(),
        artist: "Artist B".into(),
        duration: 90,
        isrc: None,
    };
    modal.close();
    modal.open_edit(Some(other.clone()));

    server.release_one();
    let outcome = submit.await.unwrap().unwrap();

    assert_matches!(outcome, SubmitOutcome::Created(ref t) if t.title == "Orphan");
    assert_eq!(modal.mode(), ModalMode::Edit(other));
    assert_eq!(client.tracks(), vec![outcome.track().clone()]);
}

// ---------------------------------------------------------------------------
// TrackSession
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_close_is_refused_mid_submit() {
    let mut server = GatedServer::start().await;
    let config = ClientConfig::new(server.base_url.clone());
    let session = Arc::new(TrackSession::from_config(&config));
    session.open_create();

    let submit = tokio::spawn({
        let session = session.clone();
        async move { session.submit(song("Busy")).await }
    });
    server.request_arrived().await;

    assert!(!session.close());
    assert!(session.modal().is_submitting());

    server.release_one();
    assert_matches!(submit.await.unwrap(), Ok(SubmitOutcome::Created(_)));
    assert_eq!(session.modal().mode(), ModalMode::Closed);
    assert!(session.close());
}

#[tokio::test]
async fn session_create_flow_closes_modal_and_notifies() {
    let session = TrackSession::from_config(&ClientConfig::new(spawn_server().await));
    session.load().await.unwrap();

    session.open_create();
    let outcome = session.submit(song("Fresh")).await.unwrap();

    assert_matches!(outcome, SubmitOutcome::Created(ref t) if t.title == "Fresh");
    assert_eq!(session.modal().mode(), ModalMode::Closed);
    assert_eq!(
        session.notifications().success().as_deref(),
        Some("Track created successfully!")
    );
    assert_eq!(session.client().tracks().len(), 1);
}

#[tokio::test]
async fn session_failed_edit_keeps_form_and_reports_error() {
    let session = TrackSession::from_config(&ClientConfig::new(spawn_server().await));
    let created = session.client().create_track(&song("Keep")).await.unwrap();

    assert!(session.open_edit(created.id));
    let form = TrackInput::default().artist("");
    let err = session.submit(form.clone()).await.unwrap_err();

    assert_matches!(err, SubmitError::Client(ClientError::Api { status: 400, .. }));
    assert_eq!(session.modal().mode(), ModalMode::Edit(created.clone()));
    assert_eq!(
        session.modal().form_error().as_deref(),
        Some("Artist is required")
    );
    assert_eq!(session.modal().form_data(), Some(form));
    assert_eq!(
        session.notifications().error().as_deref(),
        Some("Failed to update track: Artist is required")
    );
    assert_eq!(session.client().get_track(created.id), Some(created));
}

#[tokio::test]
async fn session_open_edit_for_uncached_id_does_nothing() {
    let session = TrackSession::from_config(&ClientConfig::new(spawn_server().await));
    assert!(!session.open_edit(42));
    assert_eq!(session.modal().mode(), ModalMode::Closed);
}

#[tokio::test]
async fn session_delete_notifies() {
    let session = TrackSession::from_config(&ClientConfig::new(spawn_server().await));
    let created = session.client().create_track(&song("Bye")).await.unwrap();

    session.delete(created.id).await.unwrap();
    assert_eq!(
        session.notifications().success().as_deref(),
        Some("Track deleted successfully!")
    );

    assert!(session.delete(created.id).await.is_err());
    assert_eq!(
        session.notifications().error().as_deref(),
        Some("Failed to delete track: Track with id 1 not found")
    );
}

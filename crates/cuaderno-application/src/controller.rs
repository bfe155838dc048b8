//! Top-level application controller.
//!
//! Owns the explicit application state (session, draft, projections) that
//! the original design kept as ambient globals, with the lifecycle
//! `init (on load) -> active (post-authentication) -> torn down`.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

use cuaderno_core::draft::{Draft, DraftFields};
use cuaderno_core::entry::{ActivityRecord, EntryId, InterviewRecord};
use cuaderno_core::error::{CuadernoError, Result};
use cuaderno_core::geolocation::GeolocationProvider;
use cuaderno_core::identity::{AuthState, IdentityProvider};
use cuaderno_core::session::Session;
use cuaderno_core::store::DocumentStore;
use cuaderno_core::view::{EntryCard, filter_entries};

use crate::composer::EntryComposer;
use crate::geolocation::GeolocationService;
use crate::live_store::{ListState, LiveEntryStore};
use crate::notification::NoticeCenter;

/// Placeholder shown while waiting for the first snapshot.
pub const LOADING_ENTRIES_TEXT: &str = "Cargando entradas...";

/// Placeholder shown when the filtered list is empty.
pub const NO_ENTRIES_TEXT: &str = "No hay entradas. ¡Crea una nueva!";

/// Banner shown when anonymous sign-in fails at startup.
pub const AUTH_FAILED_TEXT: &str = "Error de autenticación.";

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    Init,
    Active,
    TornDown,
}

/// Fully-derived state of the entry list pane, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    SignedOut,
    /// Filtered list came back empty; show the "no entries" placeholder.
    Empty,
    Entries(Vec<EntryCard>),
    Error(String),
}

/// Wires identity, store and geolocation into the editing session.
pub struct AppController {
    session: Arc<RwLock<Session>>,
    draft: Arc<RwLock<Draft>>,
    pub notices: NoticeCenter,
    pub composer: EntryComposer,
    pub live: Arc<LiveEntryStore>,
    pub geolocation: GeolocationService,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    phase_tx: Arc<watch::Sender<AppPhase>>,
    auth_listener: Mutex<Option<JoinHandle<()>>>,
}

impl AppController {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        geolocation_provider: Arc<dyn GeolocationProvider>,
    ) -> Self {
        let session = Arc::new(RwLock::new(Session::new()));
        let notices = NoticeCenter::new();
        let composer = EntryComposer::new(
            Arc::clone(&store),
            Arc::clone(&session),
            notices.clone(),
        );
        let (phase_tx, _) = watch::channel(AppPhase::Init);
        Self {
            session,
            draft: Arc::new(RwLock::new(Draft::new())),
            notices,
            composer,
            live: Arc::new(LiveEntryStore::new()),
            geolocation: GeolocationService::new(geolocation_provider),
            identity,
            store,
            phase_tx: Arc::new(phase_tx),
            auth_listener: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> AppPhase {
        *self.phase_tx.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<AppPhase> {
        self.phase_tx.subscribe()
    }

    /// Signs in anonymously and, once a user id is available, opens the
    /// single live subscription for the session.
    ///
    /// The unauthenticated -> authenticated transition happens at most
    /// once per load; a later loss of authentication clears the list and
    /// raises a persistent banner.
    pub async fn init(&self) -> Result<()> {
        let state = match self.identity.authenticate().await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("Anonymous sign-in failed: {}", e);
                self.notices.set_banner(Some(AUTH_FAILED_TEXT.to_string()));
                return Err(e);
            }
        };
        match state {
            AuthState::Authenticated { user_id } => {
                tracing::info!(user_id = %user_id, "Signed in anonymously");
                self.session.write().await.sign_in(user_id.clone());
                self.live
                    .start(Arc::clone(&self.store), &user_id)
                    .await?;
                self.phase_tx.send_replace(AppPhase::Active);
                self.spawn_auth_listener().await;
                Ok(())
            }
            AuthState::Unknown | AuthState::Unauthenticated => {
                tracing::error!("Anonymous sign-in failed");
                self.notices.set_banner(Some(AUTH_FAILED_TEXT.to_string()));
                Err(CuadernoError::Unauthenticated)
            }
        }
    }

    /// Watches for loss of authentication after the initial sign-in.
    async fn spawn_auth_listener(&self) {
        let mut rx = self.identity.watch();
        let session = Arc::clone(&self.session);
        let live = Arc::clone(&self.live);
        let notices = self.notices.clone();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                if state == AuthState::Unauthenticated {
                    tracing::warn!("Authentication lost");
                    session.write().await.sign_out();
                    live.mark_signed_out();
                    notices.set_banner(Some(AUTH_FAILED_TEXT.to_string()));
                }
            }
        });
        *self.auth_listener.lock().await = Some(handle);
    }

    /// Stops background listeners (navigation away).
    pub async fn teardown(&self) {
        self.live.stop().await;
        if let Some(handle) = self.auth_listener.lock().await.take() {
            handle.abort();
        }
        self.phase_tx.send_replace(AppPhase::TornDown);
    }

    pub async fn user_label(&self) -> String {
        self.session.read().await.display_label()
    }

    /// A copy of the draft for display.
    pub async fn draft_snapshot(&self) -> Draft {
        self.draft.read().await.clone()
    }

    /// Applies an edit to the draft form fields.
    pub async fn edit_fields(&self, edit: impl FnOnce(&mut DraftFields)) {
        edit(&mut self.draft.write().await.fields);
    }

    pub async fn append_activity(&self, record: ActivityRecord) -> Result<()> {
        self.draft.write().await.activity_log.append(record)
    }

    pub async fn remove_activity(&self, index: usize) -> Result<()> {
        self.draft
            .write()
            .await
            .activity_log
            .remove_at(index)
            .map(|_| ())
    }

    pub async fn append_interview(&self, record: InterviewRecord) -> Result<()> {
        self.draft.write().await.interview_log.append(record)
    }

    pub async fn remove_interview(&self, index: usize) -> Result<()> {
        self.draft
            .write()
            .await
            .interview_log
            .remove_at(index)
            .map(|_| ())
    }

    /// Captures the device position and writes it into the draft's
    /// geolocation field.
    pub async fn capture_location(&self) -> Result<()> {
        let coords = self.geolocation.capture().await?;
        self.draft.write().await.fields.geolocation = coords.to_field();
        Ok(())
    }

    /// Submits the draft. On success the draft and the geolocation status
    /// are reset together.
    pub async fn submit(&self) -> Result<EntryId> {
        let mut draft = self.draft.write().await;
        let entry_id = self.composer.submit(&mut draft).await?;
        self.geolocation.reset();
        Ok(entry_id)
    }

    /// Derives the entry list pane from the current session, projection
    /// and filter query. Pure with respect to its inputs; calling it twice
    /// produces the same view.
    pub async fn view(&self, query: &str) -> ListView {
        if !self.session.read().await.is_authenticated() {
            return ListView::SignedOut;
        }
        match self.live.snapshot() {
            ListState::Loading => ListView::Loading,
            ListState::Failed(text) => ListView::Error(text),
            ListState::Ready(entries) => {
                let filtered = filter_entries(query, &entries);
                if filtered.is_empty() {
                    ListView::Empty
                } else {
                    ListView::Entries(filtered.into_iter().map(EntryCard::from_entry).collect())
                }
            }
        }
    }
}

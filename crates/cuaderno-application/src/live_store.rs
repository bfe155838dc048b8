//! Client-side projection of the remote entry collection.
//!
//! The store pushes the complete ordered set on every change; this
//! projection replaces its in-memory collection wholesale (never patched
//! incrementally) so renders always see a fully-formed snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use cuaderno_core::entry::Entry;
use cuaderno_core::error::Result;
use cuaderno_core::store::DocumentStore;

/// Error text shown in place of the list when there is no session.
pub const SIGNED_OUT_TEXT: &str = "Necesitas iniciar sesión para ver tus entradas.";

/// State of the projected entry list.
#[derive(Debug, Clone)]
pub enum ListState {
    /// Subscription not yet delivering (initial load).
    Loading,
    /// Latest full snapshot, newest first. Shared immutably so a render
    /// can never observe a half-updated collection.
    Ready(Arc<Vec<Entry>>),
    /// The subscription failed; shown in place of the list. No automatic
    /// retry.
    Failed(String),
}

/// Holds the in-memory mirror of the remote collection and fans out state
/// changes to renderers.
pub struct LiveEntryStore {
    state_tx: Arc<watch::Sender<ListState>>,
    started: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl LiveEntryStore {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(ListState::Loading);
        Self {
            state_tx: Arc::new(state_tx),
            started: AtomicBool::new(false),
            listener: Mutex::new(None),
        }
    }

    /// Opens the subscription for `user_id` and starts mirroring snapshots.
    ///
    /// A session gets exactly one subscription; repeated calls are ignored.
    /// A subscription that cannot be opened surfaces as [`ListState::Failed`]
    /// and is also returned as an error.
    pub async fn start(&self, store: Arc<dyn DocumentStore>, user_id: &str) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::warn!("Live entry store already started; ignoring");
            return Ok(());
        }

        let mut rx = match store.subscribe(user_id).await {
            Ok(rx) => rx,
            Err(e) => {
                tracing::error!("Failed to open entry subscription: {}", e);
                self.state_tx
                    .send_replace(ListState::Failed(format!("Error al cargar las entradas: {}", e)));
                return Err(e);
            }
        };

        // Publish the snapshot the subscription starts with, then mirror
        // every later delivery.
        Self::publish(&self.state_tx, rx.borrow_and_update().clone());

        let state_tx = Arc::clone(&self.state_tx);
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                Self::publish(&state_tx, snapshot);
            }
            tracing::debug!("Entry subscription channel closed");
        });
        *self.listener.lock().await = Some(handle);

        Ok(())
    }

    fn publish(
        state_tx: &watch::Sender<ListState>,
        snapshot: cuaderno_core::store::EntrySnapshot,
    ) {
        match snapshot {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "Entry snapshot replaced");
                state_tx.send_replace(ListState::Ready(Arc::new(entries)));
            }
            Err(e) => {
                tracing::error!("Entry subscription error: {}", e);
                state_tx.send_replace(ListState::Failed(format!(
                    "Error al cargar las entradas: {}",
                    e
                )));
            }
        }
    }

    /// Current list state (atomic snapshot).
    pub fn snapshot(&self) -> ListState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state_tx.subscribe()
    }

    /// Clears the list with an error state after loss of authentication.
    pub fn mark_signed_out(&self) {
        self.state_tx
            .send_replace(ListState::Failed(SIGNED_OUT_TEXT.to_string()));
    }

    /// Stops mirroring (controller teardown).
    pub async fn stop(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
    }
}

impl Default for LiveEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use cuaderno_core::entry::{EntryId, EntryPayload};
    use cuaderno_core::error::CuadernoError;
    use cuaderno_core::store::EntrySnapshot;
    use std::time::Duration;

    struct FakeStore {
        snapshot_tx: watch::Sender<EntrySnapshot>,
        fail_subscribe: bool,
    }

    impl FakeStore {
        fn new() -> Self {
            let (snapshot_tx, _) = watch::channel(Ok(Vec::new()));
            Self {
                snapshot_tx,
                fail_subscribe: false,
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn append(&self, _user_id: &str, _payload: EntryPayload) -> cuaderno_core::error::Result<EntryId> {
            unimplemented!("not used in these tests")
        }

        async fn subscribe(
            &self,
            _user_id: &str,
        ) -> cuaderno_core::error::Result<watch::Receiver<EntrySnapshot>> {
            if self.fail_subscribe {
                return Err(CuadernoError::store("permiso denegado"));
            }
            Ok(self.snapshot_tx.subscribe())
        }
    }

    fn entry(id: &str) -> Entry {
        Entry {
            id: id.to_string(),
            created_at: Utc::now(),
            payload: EntryPayload::default(),
        }
    }

    async fn wait_for<F: Fn(&ListState) -> bool>(live: &LiveEntryStore, pred: F) {
        for _ in 0..100 {
            if pred(&live.snapshot()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached; state = {:?}", live.snapshot());
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_ready_not_error() {
        let store = Arc::new(FakeStore::new());
        let live = LiveEntryStore::new();
        live.start(store, "u-1").await.unwrap();

        match live.snapshot() {
            ListState::Ready(entries) => assert!(entries.is_empty()),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_replaced_wholesale() {
        let store = Arc::new(FakeStore::new());
        let live = LiveEntryStore::new();
        live.start(Arc::clone(&store) as Arc<dyn DocumentStore>, "u-1")
            .await
            .unwrap();

        store
            .snapshot_tx
            .send_replace(Ok(vec![entry("b"), entry("a")]));
        wait_for(&live, |s| {
            matches!(s, ListState::Ready(entries) if entries.len() == 2)
        })
        .await;

        // The next delivery fully replaces the previous collection.
        store.snapshot_tx.send_replace(Ok(vec![entry("c")]));
        wait_for(&live, |s| {
            matches!(s, ListState::Ready(entries) if entries.len() == 1 && entries[0].id == "c")
        })
        .await;
    }

    #[tokio::test]
    async fn test_subscription_error_surfaces_as_failed() {
        let store = Arc::new(FakeStore::new());
        let live = LiveEntryStore::new();
        live.start(Arc::clone(&store) as Arc<dyn DocumentStore>, "u-1")
            .await
            .unwrap();

        store
            .snapshot_tx
            .send_replace(Err(CuadernoError::store("conexión perdida")));
        wait_for(&live, |s| matches!(s, ListState::Failed(_))).await;
    }

    #[tokio::test]
    async fn test_failed_subscribe_returns_error_and_marks_state() {
        let mut store = FakeStore::new();
        store.fail_subscribe = true;
        let live = LiveEntryStore::new();

        let result = live.start(Arc::new(store), "u-1").await;
        assert!(result.is_err());
        assert!(matches!(live.snapshot(), ListState::Failed(_)));
    }

    #[tokio::test]
    async fn test_second_start_is_ignored() {
        let store = Arc::new(FakeStore::new());
        let live = LiveEntryStore::new();
        live.start(Arc::clone(&store) as Arc<dyn DocumentStore>, "u-1")
            .await
            .unwrap();
        // Second call is a no-op, not an error.
        live.start(store, "u-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_signed_out_clears_list() {
        let store = Arc::new(FakeStore::new());
        let live = LiveEntryStore::new();
        live.start(store, "u-1").await.unwrap();

        live.mark_signed_out();
        match live.snapshot() {
            ListState::Failed(text) => assert_eq!(text, SIGNED_OUT_TEXT),
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}

//! Entry submission flow.
//!
//! Composing the payload is pure and lives in the domain layer; this
//! module owns the side-effectful part: the session check, the at-most-one
//! in-flight guard, the store append, and what happens to the draft and
//! the notices afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use cuaderno_core::draft::Draft;
use cuaderno_core::entry::EntryId;
use cuaderno_core::error::{CuadernoError, Result};
use cuaderno_core::session::Session;
use cuaderno_core::store::DocumentStore;

use crate::notification::NoticeCenter;

/// Releases the in-flight flag on every exit path, success or failure.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Submits composed drafts to the document store.
pub struct EntryComposer {
    store: Arc<dyn DocumentStore>,
    session: Arc<RwLock<Session>>,
    notices: NoticeCenter,
    in_flight: Arc<AtomicBool>,
}

impl EntryComposer {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        session: Arc<RwLock<Session>>,
        notices: NoticeCenter,
    ) -> Self {
        Self {
            store,
            session,
            notices,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently in flight. The frontend disables
    /// the save affordance while this is true.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Composes and submits the draft.
    ///
    /// Requires an authenticated session. At most one submission may be in
    /// flight; a concurrent call is rejected with a transient error notice
    /// and without touching the draft.
    /// On success the draft is reset and a transient success notice is
    /// shown; on failure the draft is left intact so no data is lost, and
    /// a transient error notice is shown. The busy flag is released on
    /// every path.
    pub async fn submit(&self, draft: &mut Draft) -> Result<EntryId> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // The save affordance is disabled while busy, so this is a
            // defensive contract rather than an expected path.
            self.notices.error("Ya hay un guardado en curso.");
            return Err(CuadernoError::validation(
                "Ya hay un guardado en curso.",
            ));
        }
        let _guard = InFlightGuard {
            flag: Arc::clone(&self.in_flight),
        };

        let user_id = match self.session.read().await.user_id() {
            Some(user_id) => user_id.to_string(),
            None => {
                self.notices
                    .error("Usuario no autenticado. No se puede guardar.");
                return Err(CuadernoError::Unauthenticated);
            }
        };

        let payload = draft.compose();
        match self.store.append(&user_id, payload).await {
            Ok(entry_id) => {
                tracing::info!(entry_id = %entry_id, "Entry saved");
                draft.reset();
                self.notices.success("¡Observación guardada con éxito!");
                Ok(entry_id)
            }
            Err(e) => {
                tracing::error!("Failed to save entry: {}", e);
                self.notices.error("¡Error al guardar! Inténtalo de nuevo.");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cuaderno_core::entry::{ActivityRecord, EntryPayload};
    use cuaderno_core::store::EntrySnapshot;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::{Notify, watch};

    use crate::notification::NoticeSeverity;

    #[derive(Default)]
    struct MockStore {
        appended: Mutex<Vec<EntryPayload>>,
        fail_append: bool,
        /// When set, `append` waits until notified (to hold a submission
        /// in flight).
        hold: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn append(&self, _user_id: &str, payload: EntryPayload) -> Result<EntryId> {
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            if self.fail_append {
                return Err(CuadernoError::store("escritura rechazada"));
            }
            self.appended.lock().unwrap().push(payload);
            Ok("entry-1".to_string())
        }

        async fn subscribe(&self, _user_id: &str) -> Result<watch::Receiver<EntrySnapshot>> {
            let (tx, rx) = watch::channel(Ok(Vec::new()));
            std::mem::forget(tx);
            Ok(rx)
        }
    }

    fn session(user: Option<&str>) -> Arc<RwLock<Session>> {
        Arc::new(RwLock::new(match user {
            Some(u) => Session::authenticated(u.to_string()),
            None => Session::new(),
        }))
    }

    fn populated_draft() -> Draft {
        let mut draft = Draft::new();
        draft.fields.title = "Visita inicial".to_string();
        draft.fields.tags = "rural, fiesta".to_string();
        draft
            .activity_log
            .append(ActivityRecord {
                time: "09:00".to_string(),
                kind: "Observación".to_string(),
                description: "Llegada al sitio".to_string(),
            })
            .unwrap();
        draft
    }

    #[tokio::test]
    async fn test_successful_submit_resets_draft_and_notifies() {
        let store = Arc::new(MockStore::default());
        let notices = NoticeCenter::new();
        let composer = EntryComposer::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            session(Some("u-1")),
            notices.clone(),
        );

        let mut draft = populated_draft();
        let entry_id = composer.submit(&mut draft).await.unwrap();

        assert_eq!(entry_id, "entry-1");
        assert_eq!(draft, Draft::new());
        assert!(!composer.is_busy());

        let appended = store.appended.lock().unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].tags, vec!["rural", "fiesta"]);

        let notice = notices.current().unwrap();
        assert_eq!(notice.severity, NoticeSeverity::Success);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_draft_intact() {
        let store = Arc::new(MockStore {
            fail_append: true,
            ..Default::default()
        });
        let notices = NoticeCenter::new();
        let composer = EntryComposer::new(store, session(Some("u-1")), notices.clone());

        let mut draft = populated_draft();
        let before = draft.clone();
        let err = composer.submit(&mut draft).await.unwrap_err();

        assert!(err.is_store());
        assert_eq!(draft, before);
        // The busy flag is released even on failure.
        assert!(!composer.is_busy());
        let notice = notices.current().unwrap();
        assert_eq!(notice.severity, NoticeSeverity::Error);
    }

    #[tokio::test]
    async fn test_unauthenticated_submit_is_blocked() {
        let store = Arc::new(MockStore::default());
        let composer = EntryComposer::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            session(None),
            NoticeCenter::new(),
        );

        let mut draft = populated_draft();
        let err = composer.submit(&mut draft).await.unwrap_err();

        assert!(err.is_unauthenticated());
        assert!(store.appended.lock().unwrap().is_empty());
        assert!(!composer.is_busy());
    }

    #[tokio::test]
    async fn test_second_concurrent_submit_is_rejected() {
        let hold = Arc::new(Notify::new());
        let store = Arc::new(MockStore {
            hold: Some(Arc::clone(&hold)),
            ..Default::default()
        });
        let notices = NoticeCenter::new();
        let composer = Arc::new(EntryComposer::new(
            store,
            session(Some("u-1")),
            notices.clone(),
        ));

        let first = {
            let composer = Arc::clone(&composer);
            tokio::spawn(async move {
                let mut draft = populated_draft();
                composer.submit(&mut draft).await
            })
        };

        // Wait until the first submission is holding the flag.
        for _ in 0..100 {
            if composer.is_busy() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(composer.is_busy());

        let mut draft = populated_draft();
        let err = composer.submit(&mut draft).await.unwrap_err();
        assert!(err.is_validation());

        // The rejection is user-visible, not silently discarded.
        let notice = notices.current().expect("rejection raises a notice");
        assert_eq!(notice.severity, NoticeSeverity::Error);
        assert_eq!(notice.text, "Ya hay un guardado en curso.");

        hold.notify_one();
        first.await.unwrap().unwrap();
        assert!(!composer.is_busy());
    }
}

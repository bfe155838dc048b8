//! Transient notices and the persistent status banner.
//!
//! A transient notice (save success/failure) auto-clears after a fixed
//! delay and the prior UI state is restored exactly. The banner is for
//! persistent conditions (no session, broken subscription) and only goes
//! away when the condition does.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use strum::Display;
use tokio::sync::watch;

/// How long a transient notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeSeverity {
    Success,
    Error,
}

/// One transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: NoticeSeverity,
}

/// Fan-out point for transient notices and the persistent banner.
///
/// Clearing is generation-counted: when a newer notice replaces an older
/// one, the older notice's expiry timer must not clear the newer one.
#[derive(Clone)]
pub struct NoticeCenter {
    notice_tx: Arc<watch::Sender<Option<Notice>>>,
    banner_tx: Arc<watch::Sender<Option<String>>>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl NoticeCenter {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    /// Custom expiry, used by tests.
    pub fn with_ttl(ttl: Duration) -> Self {
        let (notice_tx, _) = watch::channel(None);
        let (banner_tx, _) = watch::channel(None);
        Self {
            notice_tx: Arc::new(notice_tx),
            banner_tx: Arc::new(banner_tx),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    /// Shows a transient notice and schedules its expiry.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, notice: Notice) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(severity = %notice.severity, "Showing notice: {}", notice.text);
        self.notice_tx.send_replace(Some(notice));

        let notice_tx = Arc::clone(&self.notice_tx);
        let current = Arc::clone(&self.generation);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            // Only the newest notice's timer may clear the display.
            if current.load(Ordering::SeqCst) == generation {
                notice_tx.send_replace(None);
            }
        });
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(Notice {
            text: text.into(),
            severity: NoticeSeverity::Success,
        });
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(Notice {
            text: text.into(),
            severity: NoticeSeverity::Error,
        });
    }

    /// Sets or clears the persistent banner.
    pub fn set_banner(&self, banner: Option<String>) {
        self.banner_tx.send_replace(banner);
    }

    pub fn current(&self) -> Option<Notice> {
        self.notice_tx.borrow().clone()
    }

    pub fn banner(&self) -> Option<String> {
        self.banner_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.notice_tx.subscribe()
    }

    pub fn subscribe_banner(&self) -> watch::Receiver<Option<String>> {
        self.banner_tx.subscribe()
    }
}

impl Default for NoticeCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_labels() {
        assert_eq!(NoticeSeverity::Success.to_string(), "Success");
        assert_eq!(NoticeSeverity::Error.to_string(), "Error");
    }

    #[tokio::test]
    async fn test_notice_auto_clears_after_ttl() {
        let center = NoticeCenter::with_ttl(Duration::from_millis(40));
        center.success("¡Observación guardada con éxito!");
        assert!(center.current().is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(center.current().is_none());
    }

    #[tokio::test]
    async fn test_newer_notice_survives_older_timer() {
        let center = NoticeCenter::with_ttl(Duration::from_millis(100));
        center.error("primero");
        tokio::time::sleep(Duration::from_millis(30)).await;
        center.success("segundo");

        // The first notice's timer fires around t=100; the second must
        // still be visible until its own expiry around t=130.
        tokio::time::sleep(Duration::from_millis(80)).await;
        let current = center.current().expect("second notice still visible");
        assert_eq!(current.text, "segundo");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(center.current().is_none());
    }

    #[tokio::test]
    async fn test_banner_is_persistent() {
        let center = NoticeCenter::with_ttl(Duration::from_millis(10));
        center.set_banner(Some("Usuario no autenticado.".to_string()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(center.banner().as_deref(), Some("Usuario no autenticado."));

        center.set_banner(None);
        assert!(center.banner().is_none());
    }

    #[tokio::test]
    async fn test_subscribe_observes_changes() {
        let center = NoticeCenter::with_ttl(Duration::from_millis(40));
        let mut rx = center.subscribe();
        center.success("hola");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().text, "hola");
    }
}

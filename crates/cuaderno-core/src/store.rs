//! Document store interface.
//!
//! The store owns persistence, ids and authoritative timestamps. The client
//! consumes it through two operations: appending a new entry to the
//! per-user collection, and a live subscription that yields the full
//! current ordered set on every change.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::entry::{Entry, EntryId, EntryPayload};
use crate::error::{CuadernoError, Result};

/// One delivery of the live subscription: the complete set of entries for
/// the user, ordered by creation time descending (newest first), or the
/// error that broke the subscription.
pub type EntrySnapshot = std::result::Result<Vec<Entry>, CuadernoError>;

/// An abstract per-user document store for field entries.
///
/// Implementations assign the entry id and the server creation timestamp
/// opaquely at append time, and deliver full replacement snapshots (never
/// incremental patches) on the subscription channel.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends a new entry to the user's collection.
    ///
    /// Fails with [`CuadernoError::Store`] on transport or permission
    /// failure; the caller's draft must survive such a failure untouched.
    async fn append(&self, user_id: &str, payload: EntryPayload) -> Result<EntryId>;

    /// Opens the live subscription for the user's collection.
    ///
    /// The returned channel always holds the latest full snapshot; a
    /// receiver that misses intermediate deliveries still observes a
    /// fully-formed, atomic set.
    async fn subscribe(&self, user_id: &str) -> Result<watch::Receiver<EntrySnapshot>>;
}

//! Identity provider interface.
//!
//! Identity is implicit and anonymous: no credentials are collected, and a
//! load transitions unauthenticated -> authenticated at most once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::Result;

/// Authentication state as observed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    /// No authentication attempt has completed yet.
    Unknown,
    /// A stable user identifier is available.
    Authenticated { user_id: String },
    /// Authentication failed or was lost; entry data is inaccessible.
    Unauthenticated,
}

impl AuthState {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated { user_id } => Some(user_id),
            _ => None,
        }
    }
}

/// An abstract provider of the anonymous user identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Performs the (non-interactive) sign-in and returns the resulting
    /// state. Implementations must also publish the state on the watch
    /// channel returned by [`IdentityProvider::watch`].
    async fn authenticate(&self) -> Result<AuthState>;

    /// A channel that yields the current [`AuthState`] and any later state
    /// changes (e.g. loss of authentication).
    fn watch(&self) -> watch::Receiver<AuthState>;
}

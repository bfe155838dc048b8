//! File-persisted anonymous identity.
//!
//! The first sign-in mints a random user id and persists it; later
//! sign-ins on the same machine resolve to the same id, so a user keeps
//! seeing their own entries across sessions.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use cuaderno_core::error::{CuadernoError, Result};
use cuaderno_core::identity::{AuthState, IdentityProvider};

use crate::paths::CuadernoPaths;

/// Identity provider backed by a single id file.
pub struct AnonymousIdentityProvider {
    identity_path: PathBuf,
    state_tx: watch::Sender<AuthState>,
}

impl AnonymousIdentityProvider {
    /// Creates a provider persisting to the default identity file.
    pub fn default_location() -> Result<Self> {
        let identity_path = CuadernoPaths::identity_file()
            .map_err(|e| CuadernoError::config(format!("No se pudo resolver la identidad: {}", e)))?;
        Ok(Self::new(identity_path))
    }

    /// Creates a provider persisting to an explicit path (tests).
    pub fn new(identity_path: PathBuf) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Unknown);
        Self {
            identity_path,
            state_tx,
        }
    }

    async fn load_or_mint_user_id(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.identity_path).await {
            Ok(content) => {
                let user_id = content.trim().to_string();
                if !user_id.is_empty() {
                    return Ok(user_id);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let user_id = Uuid::new_v4().to_string();
        if let Some(parent) = self.identity_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.identity_path, &user_id).await?;
        tracing::info!(user_id = %user_id, "Minted anonymous identity");
        Ok(user_id)
    }
}

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    async fn authenticate(&self) -> Result<AuthState> {
        match self.load_or_mint_user_id().await {
            Ok(user_id) => {
                let state = AuthState::Authenticated { user_id };
                self.state_tx.send_replace(state.clone());
                Ok(state)
            }
            Err(e) => {
                tracing::error!("Anonymous sign-in failed: {}", e);
                self.state_tx.send_replace(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    fn watch(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }
}

//! Session domain model.

use serde::{Deserialize, Serialize};

/// The authenticated session, or the lack of one.
///
/// Transitions unauthenticated -> authenticated exactly once per load; on
/// loss of authentication all entry data becomes inaccessible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for an already-known user id.
    pub fn authenticated(user_id: String) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn sign_in(&mut self, user_id: String) {
        self.user_id = Some(user_id);
    }

    pub fn sign_out(&mut self) {
        self.user_id = None;
    }

    /// Short user-facing identity line, e.g. `Usuario (ID): 3fa4c0d1...`.
    pub fn display_label(&self) -> String {
        match &self.user_id {
            Some(user_id) => {
                let prefix: String = user_id.chars().take(8).collect();
                format!("Usuario (ID): {}...", prefix)
            }
            None => "Usuario no autenticado.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.user_id(), None);
        assert_eq!(session.display_label(), "Usuario no autenticado.");
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut session = Session::new();
        session.sign_in("3fa4c0d1-9b2e-4f5a-8c7d-6e5f4a3b2c1d".to_string());
        assert!(session.is_authenticated());
        assert_eq!(session.display_label(), "Usuario (ID): 3fa4c0d1...");

        session.sign_out();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_display_label_with_short_id() {
        let session = Session::authenticated("abc".to_string());
        assert_eq!(session.display_label(), "Usuario (ID): abc...");
    }
}

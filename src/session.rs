use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::dto::auth_dto::AuthResponse;
use crate::error::Result;
use crate::models::user::User;
use crate::storage::{Storage, TOKEN_KEY, USER_KEY};

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
    user: Option<User>,
}

/// Bearer token and current user, mirrored to storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    /// Restores the persisted session, if any.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let token = match storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };
        let user = storage.get_json::<User>(USER_KEY);

        Self {
            storage,
            inner: Arc::new(RwLock::new(Session { token, user })),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.token.is_some())
    }

    pub fn authenticate(&self, response: &AuthResponse) -> Result<()> {
        self.storage.set_item(TOKEN_KEY, &response.token)?;
        self.storage.set_json(USER_KEY, &response.user)?;
        self.write(|s| {
            s.token = Some(response.token.clone());
            s.user = Some(response.user.clone());
        });
        info!(user_id = response.user.id, "Session started");
        Ok(())
    }

    /// Clears the session. Storage failures are logged; the in-memory
    /// session is cleared regardless.
    pub fn logout(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                warn!(key, error = %e, "Failed to clear stored session value");
            }
        }
        let had_session = self.write(|s| {
            let had = s.token.is_some();
            s.token = None;
            s.user = None;
            had
        });
        if had_session {
            info!("Session cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn response() -> AuthResponse {
        AuthResponse {
            token: "jwt-token".into(),
            user: User {
                id: 4,
                email: "marie@example.com".into(),
                last_name: "Curie".into(),
                first_name: "Marie".into(),
            },
        }
    }

    #[test]
    fn authenticate_persists_and_reloads() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let session = SessionStore::load(storage.clone());
        assert!(!session.is_authenticated());

        session.authenticate(&response()).unwrap();
        assert_eq!(session.token().as_deref(), Some("jwt-token"));

        let restored = SessionStore::load(storage);
        assert_eq!(restored.current_user().map(|u| u.id), Some(4));
        assert!(restored.is_authenticated());
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let session = SessionStore::load(storage.clone());
        session.authenticate(&response()).unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert!(!storage.has_item(TOKEN_KEY));
        assert!(!storage.has_item(USER_KEY));
    }

    #[test]
    fn clones_share_state() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let session = SessionStore::load(storage);
        let other = session.clone();
        session.authenticate(&response()).unwrap();
        assert!(other.is_authenticated());
    }
}

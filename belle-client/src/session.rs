//! Session - persisted token and user
//!
//! The token is read from the store on every request, so a login or logout
//! performed through one [`Session`] handle is seen by every clone.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use shared::SessionUser;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What durable storage holds (`authToken`, `user`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// Durable session storage
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<PersistedSession, SessionStoreError>;
    fn store(&self, session: &PersistedSession) -> Result<(), SessionStoreError>;
    fn clear(&self) -> Result<(), SessionStoreError>;

    fn load_token(&self) -> Result<Option<String>, SessionStoreError> {
        Ok(self.load()?.auth_token.filter(|t| !t.is_empty()))
    }

    fn load_user(&self) -> Result<Option<SessionUser>, SessionStoreError> {
        Ok(self.load()?.user)
    }

    fn save(&self, token: &str, user: &SessionUser) -> Result<(), SessionStoreError> {
        self.store(&PersistedSession {
            auth_token: Some(token.to_string()),
            user: Some(user.clone()),
        })
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<PersistedSession>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<PersistedSession, SessionStoreError> {
        Ok(self
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, session: &PersistedSession) -> Result<(), SessionStoreError> {
        *self.data.lock().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.data.lock().unwrap_or_else(PoisonError::into_inner) = PersistedSession::default();
        Ok(())
    }
}

/// JSON file store, re-read on every load
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<PersistedSession, SessionStoreError> {
        if !self.file_path.exists() {
            return Ok(PersistedSession::default());
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        if content.trim().is_empty() {
            return Ok(PersistedSession::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&self, session: &PersistedSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { username: String },
    LoggedOut,
    /// The backend rejected the token; the user must sign in again
    LoginRequired,
}

const EVENT_CAPACITY: usize = 16;

struct SessionInner {
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
    on_login_page: AtomicBool,
}

/// Shared handle to the current session
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("on_login_page", &self.is_on_login_page())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                store,
                events,
                on_login_page: AtomicBool::new(false),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Current bearer token, read from storage
    pub fn token(&self) -> Option<String> {
        self.inner.store.load_token().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read session token, treating as signed out");
            None
        })
    }

    /// Persisted user record
    pub fn user(&self) -> Option<SessionUser> {
        self.inner.store.load_user().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read session user");
            None
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a fresh login
    pub fn begin(&self, token: &str, user: &SessionUser) -> Result<(), SessionStoreError> {
        self.inner.store.save(token, user)?;
        tracing::info!(username = %user.username, "Session started");
        let _ = self.inner.events.send(SessionEvent::LoggedIn {
            username: user.username.clone(),
        });
        Ok(())
    }

    /// Explicit logout
    pub fn end(&self) -> Result<(), SessionStoreError> {
        self.inner.store.clear()?;
        tracing::info!("Session ended");
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Token rejected by the backend: wipe storage and ask for a new login,
    /// unless the user is already on the login screen.
    pub fn teardown(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::error!(error = %e, "Failed to clear session");
        }
        if self.is_on_login_page() {
            tracing::debug!("Session cleared while on login page");
            return;
        }
        tracing::warn!("Session rejected by server, login required");
        let _ = self.inner.events.send(SessionEvent::LoginRequired);
    }

    pub fn set_on_login_page(&self, on_login_page: bool) {
        self.inner.on_login_page.store(on_login_page, Ordering::SeqCst);
    }

    pub fn is_on_login_page(&self) -> bool {
        self.inner.on_login_page.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    fn user() -> SessionUser {
        SessionUser {
            id_user: "u1".into(),
            nome: "Ana".into(),
            username: "ana".into(),
            roles: Role::Admin,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_token_is_read_from_store_each_time() {
        let store = Arc::new(MemorySessionStore::default());
        let session = Session::new(store.clone());
        assert!(session.token().is_none());

        store
            .store(&PersistedSession {
                auth_token: Some("abc".into()),
                user: None,
            })
            .unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_teardown_notifies_unless_on_login_page() {
        let session = Session::in_memory();
        let mut events = session.subscribe();

        session.begin("t", &user()).unwrap();
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::LoggedIn {
                username: "ana".into()
            }
        );

        session.teardown();
        assert!(session.token().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);

        session.set_on_login_page(true);
        session.begin("t", &user()).unwrap();
        let _ = events.try_recv();
        session.teardown();
        assert!(session.user().is_none());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("auth/session.json"));
        assert_eq!(store.load().unwrap(), PersistedSession::default());

        let session = Session::new(Arc::new(store.clone()));
        session.begin("tok", &user()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["authToken"], "tok");
        assert_eq!(json["user"]["username"], "ana");

        session.end().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }
}

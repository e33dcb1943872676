//! Auth store

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::{LoginCredentials, Role, SessionUser, User};
use tokio::sync::RwLock;

use crate::error::ErrorKind;
use crate::services::AuthApi;
use crate::session::Session;
use crate::types::OpResult;

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_initialized: bool,
}

pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    session: Session,
    state: RwLock<AuthState>,
    started: AtomicBool,
}

/// Minimal user record when the login response omits one
fn user_from_credentials(username: &str) -> SessionUser {
    SessionUser {
        id_user: String::new(),
        nome: username.to_string(),
        username: username.to_string(),
        roles: Role::default(),
        created_at: String::new(),
    }
}

impl AuthStore {
    pub fn new(api: Arc<dyn AuthApi>, session: Session) -> Self {
        Self {
            api,
            session,
            state: RwLock::new(AuthState::default()),
            started: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Restore the persisted session. The token is checked against the
    /// backend; a rejected token ends the session, a network failure keeps it.
    pub async fn initialize(&self) -> Option<bool> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }
        self.state.write().await.is_loading = true;

        let user = match (self.session.token(), self.session.user()) {
            (Some(_), Some(user)) => match self.api.validate_token().await {
                Ok(true) => Some(user),
                Ok(false) => {
                    tracing::info!("Stored token no longer valid");
                    self.discard_session();
                    None
                }
                Err(e) if e.kind == ErrorKind::Network => {
                    tracing::warn!("Token check unreachable, keeping stored session");
                    Some(user)
                }
                Err(e) => {
                    tracing::info!(kind = ?e.kind, "Token check failed: {}", e.message);
                    self.discard_session();
                    None
                }
            },
            (None, None) => None,
            _ => {
                tracing::debug!("Incomplete stored session, clearing");
                self.discard_session();
                None
            }
        };

        let authenticated = user.is_some();
        let mut state = self.state.write().await;
        state.user = user;
        state.is_loading = false;
        state.is_initialized = true;
        Some(authenticated)
    }

    fn discard_session(&self) {
        if let Err(e) = self.session.end() {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
    }

    pub async fn login(&self, credentials: LoginCredentials) -> OpResult {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = match self.api.login(&credentials).await {
            Ok(response) => {
                let user = response
                    .user
                    .unwrap_or_else(|| user_from_credentials(&credentials.username));
                match self.session.begin(&response.token, &user) {
                    Ok(()) => Ok(user),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to persist session");
                        Err("Erro ao salvar sessão".to_string())
                    }
                }
            }
            Err(e) => Err(e.message),
        };

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user);
                OpResult::ok()
            }
            Err(message) => {
                state.error = Some(message.clone());
                OpResult::failed(message)
            }
        }
    }

    pub async fn logout(&self) {
        self.discard_session();
        let mut state = self.state.write().await;
        state.user = None;
        state.error = None;
    }

    pub async fn is_authenticated(&self) -> bool {
        let state = self.state.read().await;
        state.is_initialized && state.user.is_some() && self.session.is_authenticated()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, ServiceResult};
    use crate::session::SessionStore;
    use async_trait::async_trait;
    use shared::LoginResponse;

    struct FakeAuth {
        validate: fn() -> ServiceResult<bool>,
        login_user: Option<User>,
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, credentials: &LoginCredentials) -> ServiceResult<LoginResponse> {
            if credentials.password != "secret" {
                return Err(ServiceError::new(
                    ErrorKind::Unauthorized,
                    "Usuário ou senha incorretos.",
                ));
            }
            Ok(LoginResponse {
                token: "jwt".into(),
                user: self.login_user.clone(),
            })
        }

        async fn validate_token(&self) -> ServiceResult<bool> {
            (self.validate)()
        }
    }

    fn fake(validate: fn() -> ServiceResult<bool>) -> Arc<FakeAuth> {
        Arc::new(FakeAuth {
            validate,
            login_user: None,
        })
    }

    fn signed_in_session() -> Session {
        let session = Session::in_memory();
        session
            .begin("jwt", &user_from_credentials("ana"))
            .unwrap();
        session
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials {
            username: "ana".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_token_and_fallback_user() {
        let session = Session::in_memory();
        let store = AuthStore::new(fake(|| Ok(true)), session.clone());

        assert!(store.login(credentials("secret")).await.success);
        assert_eq!(session.token().as_deref(), Some("jwt"));
        assert_eq!(session.user().unwrap().username, "ana");
        assert_eq!(store.user().await.unwrap().username, "ana");
    }

    #[tokio::test]
    async fn test_failed_login_records_error() {
        let store = AuthStore::new(fake(|| Ok(true)), Session::in_memory());
        let result = store.login(credentials("wrong")).await;
        assert_eq!(result.error.as_deref(), Some("Usuário ou senha incorretos."));
        assert!(!store.is_authenticated().await);

        store.clear_error().await;
        assert!(store.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_initialize_keeps_session_on_network_error() {
        let session = signed_in_session();
        let store = AuthStore::new(
            fake(|| Err(ServiceError::new(ErrorKind::Network, "offline"))),
            session.clone(),
        );
        assert_eq!(store.initialize().await, Some(true));
        assert!(store.is_authenticated().await);
        assert!(session.token().is_some());
        assert_eq!(store.initialize().await, None);
    }

    #[tokio::test]
    async fn test_initialize_discards_rejected_token() {
        let session = signed_in_session();
        let store = AuthStore::new(
            fake(|| {
                Err(ServiceError::new(
                    ErrorKind::Unauthorized,
                    "Token inválido ou expirado",
                ))
            }),
            session.clone(),
        );
        assert_eq!(store.initialize().await, Some(false));
        assert!(!store.is_authenticated().await);
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_store() {
        let store_backend = Arc::new(crate::session::MemorySessionStore::default());
        let session = Session::new(store_backend.clone());
        let store = AuthStore::new(fake(|| Ok(true)), session);
        store.login(credentials("secret")).await;

        store.logout().await;
        assert_eq!(store_backend.load().unwrap(), Default::default());
        assert!(store.user().await.is_none());
    }
}

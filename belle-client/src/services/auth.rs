//! Auth service (`/authentication`)

use std::sync::Arc;

use async_trait::async_trait;
use shared::{LoginCredentials, LoginResponse};

use super::{Operation, Resource, classify};
use crate::error::ServiceResult;
use crate::http::{HttpClient, NetworkHttpClient};

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> ServiceResult<LoginResponse>;

    /// Whether the backend still accepts the current token
    async fn validate_token(&self) -> ServiceResult<bool>;
}

pub struct AuthService<C = NetworkHttpClient> {
    http: Arc<C>,
}

impl<C: HttpClient> AuthService<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}

/// `/authentication/validate` answers `true`, `{"valid": bool}` or an empty 2xx
fn validity(body: &serde_json::Value) -> bool {
    match body {
        serde_json::Value::Bool(valid) => *valid,
        serde_json::Value::Object(map) => map
            .get("valid")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true),
        _ => true,
    }
}

#[async_trait]
impl<C: HttpClient + 'static> AuthApi for AuthService<C> {
    #[tracing::instrument(skip_all, fields(username = %credentials.username))]
    async fn login(&self, credentials: &LoginCredentials) -> ServiceResult<LoginResponse> {
        self.http
            .post("authentication/login", credentials)
            .await
            .map_err(|e| classify(e, Resource::Auth, Operation::Login))
    }

    #[tracing::instrument(skip(self))]
    async fn validate_token(&self) -> ServiceResult<bool> {
        let body: serde_json::Value = self
            .http
            .get("authentication/validate")
            .await
            .map_err(|e| classify(e, Resource::Auth, Operation::Validate))?;
        Ok(validity(&body))
    }
}

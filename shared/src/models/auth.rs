//! Auth API DTOs

use serde::{Deserialize, Serialize};

use super::User;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Login response data
///
/// The backend may omit `user`; the client then persists a minimal record
/// built from the credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// The user record kept in durable storage next to the token
pub type SessionUser = User;

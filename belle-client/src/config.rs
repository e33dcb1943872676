//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};

/// Production backend
pub const DEFAULT_BASE_URL: &str = "https://bellebiju-backend-production-5cda.up.railway.app/api";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const ENV_API_URL: &str = "BELLE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BELLE_TIMEOUT_SECS";
pub const ENV_SESSION_FILE: &str = "BELLE_SESSION_FILE";

/// Client configuration for the Belle Biju backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Where the session (token + user) is persisted. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Create a new configuration pointing at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            session_file: None,
        }
    }

    /// Defaults overridden by `BELLE_API_URL`, `BELLE_TIMEOUT_SECS` and
    /// `BELLE_SESSION_FILE`. Unparseable timeouts fall back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL)
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_string();
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = secs,
                _ => tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }

        if let Ok(path) = std::env::var(ENV_SESSION_FILE)
            && !path.trim().is_empty()
        {
            config.session_file = Some(PathBuf::from(path.trim()));
        }

        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = timeout_secs;
        self
    }

    /// Persist the session to a JSON file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Session store matching this configuration
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        match &self.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::default()),
        }
    }
}

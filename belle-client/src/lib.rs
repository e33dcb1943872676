//! Belle Biju client library
//!
//! HTTP client, domain services and state stores for the Belle Biju sales
//! dashboard backend.
//!
//! # Example
//!
//! ```ignore
//! use belle_client::{BelleClient, ClientConfig};
//!
//! let client = BelleClient::new(ClientConfig::from_env())?;
//! let sales = client.sales_store();
//! sales.initialize().await;
//! println!("{:?}", sales.stats().await);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
pub mod sync;
pub mod types;

pub use client::BelleClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind, ServiceError, ServiceResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{
    FileSessionStore, MemorySessionStore, PersistedSession, Session, SessionEvent, SessionStore,
    SessionStoreError,
};
pub use types::{Entity, FetchOutcome, OpResult};

// Re-export shared types for convenience
pub use shared;

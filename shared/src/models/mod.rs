//! Data models
//!
//! Shared between the API client and its front ends.
//! Wire names follow the backend (camelCase, Portuguese field names);
//! IDs are opaque strings.

pub mod auth;
pub mod chart;
pub mod payment;
pub mod product;
pub mod sale;
pub mod user;

// Re-exports
pub use auth::*;
pub use chart::*;
pub use payment::*;
pub use product::*;
pub use sale::*;
pub use user::*;

use thiserror::Error;

/// Form validation failure, one per offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FormError {
    pub field: &'static str,
    pub message: String,
}

impl FormError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trimmed character count within `[min, max]`
pub(crate) fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    len >= min && len <= max
}

//! Entity descriptors shared by the services and the sync stores

use std::fmt::Debug;

use shared::{Product, ProductForm, Sale, SaleForm, SalesStats, User, UserForm, UserUpdate};

/// A backend collection element
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Create payload
    type Create: Send + Sync + 'static;
    /// Update payload
    type Update: Send + Sync + 'static;
    /// Figures derived from the whole collection
    type Stats: Clone + Debug + Default + PartialEq + Send + Sync + 'static;

    /// Log name
    const NAME: &'static str;

    fn id(&self) -> &str;

    fn compute_stats(items: &[Self]) -> Self::Stats;
}

impl Entity for Sale {
    type Create = SaleForm;
    type Update = SaleForm;
    type Stats = SalesStats;

    const NAME: &'static str = "vendas";

    fn id(&self) -> &str {
        &self.id
    }

    fn compute_stats(items: &[Self]) -> SalesStats {
        SalesStats::from_sales(items)
    }
}

impl Entity for User {
    type Create = UserForm;
    type Update = UserUpdate;
    type Stats = ();

    const NAME: &'static str = "usuarios";

    fn id(&self) -> &str {
        &self.id_user
    }

    fn compute_stats(_items: &[Self]) {}
}

impl Entity for Product {
    type Create = ProductForm;
    type Update = ProductForm;
    type Stats = ();

    const NAME: &'static str = "produtos";

    fn id(&self) -> &str {
        &self.id_produto
    }

    fn compute_stats(_items: &[Self]) {}
}

/// How a `fetch_all` call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Collection replaced with `n` items
    Loaded(usize),
    /// Another fetch was already running; nothing was issued
    AlreadyInFlight,
    /// Cancelled before completion; state untouched
    Cancelled,
    /// Request failed; collection emptied and the message stored
    Failed(String),
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }
}

/// Mutation result handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpResult {
    pub success: bool,
    pub error: Option<String>,
}

impl OpResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

impl<R> From<crate::ServiceResult<R>> for OpResult {
    fn from(result: crate::ServiceResult<R>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::failed(e.message),
        }
    }
}

//! Shared types for the Belle Biju management client
//!
//! Domain models exchanged with the backend API, the canonical payment-method
//! order used by every chart aggregate, period filter resolution and the
//! money helpers used by the sale form.

pub mod models;
pub mod period;
pub mod util;

// Re-exports
pub use models::{
    ChartRequest, ChartSeries, ChartStats, FormError, LoginCredentials, LoginResponse, PaymentMethod,
    PaymentSeries, Product, ProductForm, Role, Sale, SaleFilter, SaleForm, SalesStats,
    SessionUser, User, UserForm, UserSearch, UserUpdate,
};
pub use period::{DateRange, PeriodError, PeriodFilter, PeriodPreset};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

//! Synchronization layer
//!
//! Stores own in-memory copies of backend data and mediate every change
//! through the services. Each store is `Send + Sync` and meant to be shared
//! behind an `Arc`; state locks are never held across a network call.

mod auth;
mod charts;
mod coordinator;
mod entity;
mod products;
mod sales;
mod users;

pub use auth::{AuthState, AuthStore};
pub use charts::{ApplyOutcome, ChartState, ChartStore, INVALID_PERIOD_MESSAGE};
pub use coordinator::{ActiveRequest, Admission, RequestCoordinator, RequestTicket};
pub use entity::{EntityState, EntityStore};
pub use products::ProductsStore;
pub use sales::{SalesStore, filter_sales};
pub use users::UsersStore;

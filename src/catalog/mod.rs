//! Validated, queryable topic catalog.
//!
//! Raw records flow through three stages:
//!
//! ```text
//! RawTopic ──validate──▶ Topic ──build_catalog──▶ Store ──▶ QueryService
//!                │                     │
//!                └──── BuildReport ◀───┘   (rejected records + reasons)
//! ```
//!
//! A `Store` is immutable; `SharedCatalog` swaps whole stores for hot reload.

pub mod error;
pub mod query;
pub mod shared;
pub mod store;
pub mod validator;

pub use error::{CatalogError, Rejection, ValidationError, ValidationReason};
pub use query::{QueryService, SearchField};
pub use shared::{ReloadOutcome, SharedCatalog};
pub use store::{build_catalog, BuildReport, RejectedTopic, Store};
pub use validator::validate;

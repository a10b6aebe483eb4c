//! lectern - Validated catalog of operating-systems and database study topics
//!
//! The catalog holds inert educational content (explanations, illustrative
//! code snippets, key points, resource links and review questions) and
//! exposes it through a small read-only query surface.
//!
//! # Architecture
//!
//! - Raw records are checked by a schema validator that reports every defect
//! - Valid topics enter an immutable store; bad ones land in a build report
//! - Queries borrow the store; hot reloads swap whole stores
//!
//! # Modules
//!
//! - `domain`: Data structures (Topic, RawTopic)
//! - `catalog`: Validation, store, queries and the shared handle
//! - `content`: Loading content files and watching them for changes
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Validate content files
//! lectern check --strict
//!
//! # Browse
//! lectern list --offset 0 --limit 10
//! lectern search "disk"
//! lectern show bankers-algorithm-complete --full
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod domain;

// Re-export main types at crate root for convenience
pub use catalog::{
    build_catalog, BuildReport, CatalogError, QueryService, Rejection, SearchField,
    SharedCatalog, Store, ValidationError, ValidationReason,
};
pub use content::{DirectorySource, StaticSource, TopicSource};
pub use domain::{CodeExample, QaPair, RawTopic, Resource, Topic, TopicId};

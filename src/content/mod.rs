//! Content loading for the catalog.
//!
//! Raw topic records live in YAML/JSON files under a content directory:
//!
//! ```text
//! content/
//! ├── os/
//! │   ├── deadlock.yaml         # bankers-algorithm-complete, ...
//! │   └── scheduling.yaml       # disk-scheduling, ...
//! └── db/
//!     └── distributed.yaml      # sharding, ...
//! ```
//!
//! `TopicSource` abstracts over where records come from so the catalog can be
//! built from files, from memory in tests, or rebuilt by the watcher.

pub mod source;
pub mod watcher;

pub use source::{load_file, parse_content, DirectorySource, SourceError, StaticSource, TopicSource};
pub use watcher::{ContentWatcher, WatchHandle, WatcherConfig};

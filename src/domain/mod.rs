//! Domain types for the topic catalog.
//!
//! This module contains the core data structures:
//! - Topic: Validated educational unit and its parts
//! - RawTopic: Untyped record awaiting validation

pub mod raw;
pub mod topic;

// Re-export commonly used types
pub use raw::{NotARecord, RawTopic};
pub use topic::{CodeExample, QaPair, Resource, Topic, TopicId};

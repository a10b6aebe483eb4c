//! Immutable topic store and the build step that produces it.
//!
//! `build_catalog` is the only way to obtain a `Store`. It validates every
//! raw record, drops the bad ones into a `BuildReport`, and enforces id
//! uniqueness with first-occurrence-wins semantics. Once built, a store never
//! changes; reloading means building a new one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::error::{CatalogError, Rejection};
use super::validator::validate;
use crate::domain::{RawTopic, Topic};

/// Validated topics in insertion order, indexed by id
#[derive(Debug, Clone)]
pub struct Store {
    topics: Vec<Topic>,
    by_id: HashMap<String, usize>,
    fingerprint: String,
    built_at: DateTime<Utc>,
}

impl Store {
    /// Look up a topic by exact id
    pub fn get_by_id(&self, id: &str) -> Result<&Topic, CatalogError> {
        self.by_id
            .get(id)
            .map(|&idx| &self.topics[idx])
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Check whether an id is present
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All topics in input order
    pub fn all(&self) -> &[Topic] {
        &self.topics
    }

    /// Get the number of topics
    pub fn count(&self) -> usize {
        self.topics.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Content hash over the admitted topics (16 hex chars).
    ///
    /// Two stores built from equal topic sequences share a fingerprint.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// When this store was built
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

/// One raw input that did not make it into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedTopic {
    /// Position in the input sequence
    pub index: usize,

    /// The record's id, when it had a usable one
    pub id: Option<String>,

    /// Why it was rejected
    #[serde(flatten)]
    pub rejection: Rejection,
}

impl RejectedTopic {
    /// The id if known, otherwise `#<index>`
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("#{}", self.index),
        }
    }
}

/// Diagnostic summary of a catalog build, meant for operators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub accepted_count: usize,
    pub rejected: Vec<RejectedTopic>,
}

impl BuildReport {
    /// True when every input was admitted
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Total inputs seen by the build
    pub fn total(&self) -> usize {
        self.accepted_count + self.rejected.len()
    }

    /// Rejections caused by id collisions
    pub fn duplicates(&self) -> impl Iterator<Item = &RejectedTopic> {
        self.rejected.iter().filter(|r| r.rejection.is_duplicate_id())
    }
}

/// Build a store from raw topics.
///
/// Never fails as a whole: bad records are excluded and described in the
/// returned report.
pub fn build_catalog<I>(raw_topics: I) -> (Store, BuildReport)
where
    I: IntoIterator<Item = RawTopic>,
{
    let mut topics: Vec<Topic> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    // id -> input index of the admitted occurrence
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut report = BuildReport::default();

    for (index, raw) in raw_topics.into_iter().enumerate() {
        let topic = match validate(&raw) {
            Ok(topic) => topic,
            Err(errors) => {
                let rejected = RejectedTopic {
                    index,
                    id: raw.id_hint().map(|id| id.trim().to_string()),
                    rejection: Rejection::Invalid { errors },
                };
                warn!(
                    "Rejected topic {}: {}",
                    rejected.label(),
                    describe_errors(&rejected.rejection)
                );
                report.rejected.push(rejected);
                continue;
            }
        };

        let id = topic.id.as_str().to_string();
        if let Some(&first_index) = first_seen.get(&id) {
            warn!(
                "Rejected topic {} at input {}: id already used at input {}",
                id, index, first_index
            );
            report.rejected.push(RejectedTopic {
                index,
                id: Some(id.clone()),
                rejection: Rejection::DuplicateId { id, first_index },
            });
            continue;
        }

        first_seen.insert(id.clone(), index);
        by_id.insert(id, topics.len());
        topics.push(topic);
    }

    report.accepted_count = topics.len();
    info!(
        "Built catalog: {} accepted, {} rejected",
        report.accepted_count,
        report.rejected.len()
    );

    let fingerprint = fingerprint_topics(&topics);
    let store = Store {
        topics,
        by_id,
        fingerprint,
        built_at: Utc::now(),
    };
    (store, report)
}

fn describe_errors(rejection: &Rejection) -> String {
    rejection
        .validation_errors()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// SHA256 over the canonical JSON of each topic, first 8 bytes as hex
fn fingerprint_topics(topics: &[Topic]) -> String {
    let mut hasher = Sha256::new();
    for topic in topics {
        // Serializing plain strings and vectors cannot fail
        if let Ok(bytes) = serde_json::to_vec(topic) {
            hasher.update(&bytes);
        }
        hasher.update(b"\n");
    }
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

//! Hot-swappable handle to the current store.
//!
//! Readers take a cheap `Arc<Store>` snapshot and keep using it for as long as
//! they like. A writer builds a complete replacement off to the side and swaps
//! the pointer; nobody ever sees a store that is still being built.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::store::{build_catalog, BuildReport, Store};
use crate::content::TopicSource;

/// Outcome of a `SharedCatalog::reload`
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    pub report: BuildReport,

    /// False when the rebuilt store had the same fingerprint and was dropped
    pub swapped: bool,

    pub fingerprint: String,
}

/// Single-writer, many-reader catalog reference
#[derive(Debug)]
pub struct SharedCatalog {
    current: RwLock<Arc<Store>>,
}

impl SharedCatalog {
    pub fn new(store: Store) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Snapshot of the store visible right now
    pub fn current(&self) -> Arc<Store> {
        Arc::clone(&self.current.read())
    }

    /// Install a new store, returning the previous one
    pub fn replace(&self, store: Store) -> Arc<Store> {
        let next = Arc::new(store);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Load from `source`, build, and swap if the content changed.
    ///
    /// Loading and building happen before the write lock is taken. The
    /// fingerprint compare and the swap share one write guard, but concurrent
    /// reloads still finish in any order: the last one to take the lock wins.
    pub async fn reload(&self, source: &dyn TopicSource) -> anyhow::Result<ReloadOutcome> {
        let raw = source.load().await?;
        let (store, report) = build_catalog(raw);
        let fingerprint = store.fingerprint().to_string();

        let swapped = {
            let mut current = self.current.write();
            let changed = current.fingerprint() != fingerprint;
            if changed {
                *current = Arc::new(store);
            }
            changed
        };
        if swapped {
            info!(
                "Catalog swapped from {}: {} topics (fingerprint {})",
                source.describe(),
                report.accepted_count,
                fingerprint
            );
        } else {
            info!("Catalog unchanged (fingerprint {})", fingerprint);
        }

        Ok(ReloadOutcome {
            report,
            swapped,
            fingerprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticSource;
    use crate::domain::RawTopic;
    use serde_json::json;

    fn raw(id: &str, summary: &str) -> RawTopic {
        RawTopic::try_from(json!({"id": id, "title": id, "summary": summary})).unwrap()
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let (first, _) = build_catalog(vec![raw("a", "one")]);
        let shared = SharedCatalog::new(first);

        let snapshot = shared.current();
        let (second, _) = build_catalog(vec![raw("a", "one"), raw("b", "two")]);
        let previous = shared.replace(second);

        assert_eq!(snapshot.count(), 1);
        assert_eq!(previous.count(), 1);
        assert_eq!(shared.current().count(), 2);
    }

    #[tokio::test]
    async fn test_reload_skips_identical_content() {
        let (initial, _) = build_catalog(vec![raw("a", "one")]);
        let shared = SharedCatalog::new(initial);

        let same = StaticSource::new(vec![raw("a", "one")]);
        let outcome = shared.reload(&same).await.unwrap();
        assert!(!outcome.swapped);

        let changed = StaticSource::new(vec![raw("a", "two")]);
        let outcome = shared.reload(&changed).await.unwrap();
        assert!(outcome.swapped);
        assert_eq!(shared.current().fingerprint(), outcome.fingerprint);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reloads_leave_a_complete_store() {
        let (initial, _) = build_catalog(vec![raw("a", "zero")]);
        let shared = Arc::new(SharedCatalog::new(initial));

        let mut tasks = Vec::new();
        for n in 0..8 {
            let shared = Arc::clone(&shared);
            tasks.push(tokio::spawn(async move {
                let source = StaticSource::new(vec![raw("a", &format!("v{n}")), raw("b", "b")]);
                shared.reload(&source).await.unwrap()
            }));
        }

        let mut fingerprints = Vec::new();
        for task in tasks {
            let outcome = task.await.unwrap();
            assert!(outcome.swapped);
            fingerprints.push(outcome.fingerprint);
        }

        let current = shared.current();
        assert_eq!(current.count(), 2);
        assert!(fingerprints.iter().any(|f| f == current.fingerprint()));
    }
}

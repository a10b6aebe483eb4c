//! Content Integration Tests
//!
//! Loads the bundled content directory and exercises hot reload through the
//! shared catalog.

use std::path::PathBuf;
use std::sync::Arc;

use lectern::catalog::{build_catalog, QueryService, SearchField, SharedCatalog};
use lectern::content::{DirectorySource, TopicSource};
use tempfile::TempDir;

fn bundled_content() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content")
}

#[tokio::test]
async fn test_bundled_content_is_clean() {
    let source = DirectorySource::new(bundled_content());
    let raw = source.load().await.unwrap();
    let (store, report) = build_catalog(raw);

    assert!(report.is_clean(), "rejected: {:?}", report.rejected);
    assert_eq!(store.count(), 8);

    let bankers = store.get_by_id("bankers-algorithm-complete").unwrap();
    assert_eq!(bankers.title, "Banker's Algorithm");
    assert_eq!(bankers.code_examples[0].language, "java");
    assert_eq!(bankers.questions.len(), 2);
}

#[tokio::test]
async fn test_bundled_content_order_follows_paths() {
    let source = DirectorySource::new(bundled_content());
    let (store, _) = build_catalog(source.load().await.unwrap());

    let ids: Vec<&str> = store.all().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "sharding",
            "relational-algebra",
            "bankers-algorithm-complete",
            "process-states",
            "disk-scheduling",
            "thrashing",
            "producer-consumer",
            "readers-writers",
        ]
    );
}

#[tokio::test]
async fn test_search_bundled_content() {
    let source = DirectorySource::new(bundled_content());
    let (store, _) = build_catalog(source.load().await.unwrap());
    let query = QueryService::new(&store);

    let hits: Vec<&str> = query
        .search("disk")
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(hits, vec!["disk-scheduling"]);

    let semaphores = query.by_keyword("semaphore", &[SearchField::Explanation]);
    assert!(semaphores.iter().any(|t| t.id.as_str() == "producer-consumer"));
}

#[tokio::test]
async fn test_reload_swaps_after_edit() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("topics.yaml");
    std::fs::write(&file, "- {id: a, title: A, summary: first}\n").unwrap();

    let source = DirectorySource::new(temp.path());
    let (store, _) = build_catalog(source.load().await.unwrap());
    let shared = Arc::new(SharedCatalog::new(store));
    let before = shared.current();

    std::fs::write(
        &file,
        "- {id: a, title: A, summary: first}\n- {id: b, title: B, summary: second}\n- {id: b, title: B2, summary: dup}\n",
    )
    .unwrap();
    let outcome = shared.reload(&source).await.unwrap();

    assert!(outcome.swapped);
    assert_eq!(outcome.report.accepted_count, 2);
    assert_eq!(outcome.report.duplicates().count(), 1);
    assert_eq!(before.count(), 1);
    assert_eq!(shared.current().count(), 2);
}

#[tokio::test]
async fn test_unreadable_content_keeps_current_store() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("topics.yaml");
    std::fs::write(&file, "- {id: a, title: A, summary: s}\n").unwrap();

    let source = DirectorySource::new(temp.path());
    let (store, _) = build_catalog(source.load().await.unwrap());
    let shared = SharedCatalog::new(store);

    std::fs::write(&file, "- 42\n").unwrap();
    assert!(shared.reload(&source).await.is_err());
    assert_eq!(shared.current().count(), 1);
}

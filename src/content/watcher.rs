//! Content directory watcher.
//!
//! Watches the content directory for changes to topic files and rebuilds the
//! shared catalog when they settle. Each rebuild is reported on a channel so
//! the caller can log or surface the build report.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::source::{DirectorySource, SourceError, CONTENT_EXTENSIONS};
use crate::catalog::{ReloadOutcome, SharedCatalog};

/// Configuration for the watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Content directory to watch (recursive)
    pub content_dir: PathBuf,

    /// Quiet period before a burst of edits triggers a rebuild (milliseconds)
    pub debounce_ms: u64,
}

impl WatcherConfig {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            debounce_ms: 500,
        }
    }

    /// Check that the content directory exists
    pub fn validate(&self) -> Result<(), SourceError> {
        if !self.content_dir.is_dir() {
            return Err(SourceError::DirectoryNotFound(self.content_dir.clone()));
        }
        Ok(())
    }
}

/// Rebuilds a `SharedCatalog` whenever content files change
pub struct ContentWatcher {
    config: WatcherConfig,
    catalog: Arc<SharedCatalog>,
}

impl ContentWatcher {
    pub fn new(config: WatcherConfig, catalog: Arc<SharedCatalog>) -> Self {
        Self { config, catalog }
    }

    /// Start watching; reload outcomes arrive on the returned receiver
    pub fn watch(&self) -> Result<(mpsc::Receiver<ReloadOutcome>, WatchHandle)> {
        self.config.validate()?;

        let (outcome_tx, outcome_rx) = mpsc::channel::<ReloadOutcome>(16);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let config = self.config.clone();
        let catalog = Arc::clone(&self.catalog);

        let handle = tokio::spawn(async move {
            if let Err(e) = run_watcher(config, catalog, outcome_tx, &mut stop_rx).await {
                tracing::error!("Watcher error: {}", e);
            }
        });

        Ok((
            outcome_rx,
            WatchHandle {
                stop_tx,
                task: handle,
            },
        ))
    }
}

/// Handle to control the watcher
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl WatchHandle {
    /// Stop the watcher
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(()).await;
        self.task.await?;
        Ok(())
    }
}

/// Whether a changed path can affect the catalog
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CONTENT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Whether a change event should trigger a rebuild.
///
/// Moving or deleting a whole subdirectory arrives as a single event for the
/// directory itself, so directories and vanished paths count too.
pub fn affects_catalog(path: &Path) -> bool {
    is_content_file(path) || path.is_dir() || !path.exists()
}

async fn run_watcher(
    config: WatcherConfig,
    catalog: Arc<SharedCatalog>,
    outcome_tx: mpsc::Sender<ReloadOutcome>,
    stop_rx: &mut mpsc::Receiver<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), tx)?;
    debouncer
        .watcher()
        .watch(&config.content_dir, RecursiveMode::Recursive)?;

    let source = DirectorySource::new(&config.content_dir);
    tracing::info!("Watching {} for content changes", config.content_dir.display());

    loop {
        if stop_rx.try_recv().is_ok() {
            tracing::info!("Watcher stopping...");
            break;
        }

        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(Ok(events)) => {
                if !events.iter().any(|event| affects_catalog(&event.path)) {
                    continue;
                }

                match catalog.reload(&source).await {
                    Ok(outcome) => {
                        for rejected in &outcome.report.rejected {
                            tracing::warn!("{}: {}", rejected.label(), rejected.rejection);
                        }
                        if outcome_tx.send(outcome).await.is_err() {
                            tracing::debug!("Reload receiver dropped");
                        }
                    }
                    // Keep serving the previous store when the content is unreadable
                    Err(e) => tracing::warn!("Reload failed, keeping current catalog: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("Watcher error: {:?}", e);
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("Watcher channel disconnected");
                break;
            }
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    Ok(())
}

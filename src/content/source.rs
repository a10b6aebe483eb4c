//! Where raw topic records come from.
//!
//! Content files are YAML or JSON. A file holds either a bare list of topic
//! records or an object with a `topics` list. Files are read in sorted path
//! order and records keep their position within the file, so the build order
//! is fully determined by the directory contents.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::domain::raw::json_kind;
use crate::domain::{NotARecord, RawTopic};

/// File extensions recognized as content
pub const CONTENT_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Errors reading content files
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Content directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{path}: expected a list of topics or an object with `topics`, found {found}")]
    Layout { path: PathBuf, found: &'static str },

    #[error("{path}: topic #{index}: {source}")]
    Record {
        path: PathBuf,
        index: usize,
        #[source]
        source: NotARecord,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Trait for anything that can supply raw topics
#[async_trait]
pub trait TopicSource: Send + Sync {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Load every raw record in build order
    async fn load(&self) -> Result<Vec<RawTopic>>;
}

/// Raw topics already in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    topics: Vec<RawTopic>,
}

impl StaticSource {
    pub fn new(topics: Vec<RawTopic>) -> Self {
        Self { topics }
    }
}

#[async_trait]
impl TopicSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} in-memory records", self.topics.len())
    }

    async fn load(&self) -> Result<Vec<RawTopic>> {
        Ok(self.topics.clone())
    }
}

/// Content files under a directory (recursive)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Content files in load order
    pub fn content_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::DirectoryNotFound(self.root.clone()));
        }

        // Brackets and wildcards in the root are literal path characters
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let mut files = Vec::new();
        for ext in CONTENT_EXTENSIONS {
            let pattern = Path::new(&root).join("**").join(format!("*.{ext}"));
            for entry in glob::glob(&pattern.to_string_lossy())? {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Skipping unreadable path: {}", e),
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

#[async_trait]
impl TopicSource for DirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn load(&self) -> Result<Vec<RawTopic>> {
        let mut topics = Vec::new();
        for path in self.content_files()? {
            let mut records = load_file(&path).await?;
            debug!("Loaded {} records from {}", records.len(), path.display());
            topics.append(&mut records);
        }
        Ok(topics)
    }
}

/// Read one content file
pub async fn load_file(path: &Path) -> Result<Vec<RawTopic>, SourceError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_content(path, &content)
}

/// Parse content text, picking the format from the file extension
pub fn parse_content(path: &Path, content: &str) -> Result<Vec<RawTopic>, SourceError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value: Value = if is_json {
        serde_json::from_str(content).map_err(|e| SourceError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(content).map_err(|e| SourceError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("topics") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SourceError::Layout {
                    path: path.to_path_buf(),
                    found: json_kind(&other),
                })
            }
            None => {
                return Err(SourceError::Layout {
                    path: path.to_path_buf(),
                    found: "object without `topics`",
                })
            }
        },
        // A YAML file holding only comments parses as null
        Value::Null => Vec::new(),
        other => {
            return Err(SourceError::Layout {
                path: path.to_path_buf(),
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            RawTopic::try_from(item).map_err(|source| SourceError::Record {
                path: path.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}

//! Validated topic records.
//!
//! These are the normalized shapes admitted to the catalog. Every optional
//! field has already been defaulted by the validator, so consumers never need
//! to handle a missing subtitle or an absent code example list.

use serde::{Deserialize, Serialize};

/// Stable external identifier of a topic (e.g. `bankers-algorithm-complete`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    /// Wrap an id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for TopicId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One self-contained educational unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique, stable identifier
    pub id: TopicId,

    /// Display title (never empty)
    pub title: String,

    /// Secondary heading, empty when the source has none
    #[serde(default)]
    pub subtitle: String,

    /// Short description (never empty)
    pub summary: String,

    /// Long-form body
    #[serde(default)]
    pub explanation: String,

    /// Bullet points in presentation order
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Illustrative snippets in presentation order
    #[serde(default)]
    pub code_examples: Vec<CodeExample>,

    /// External references, unique by url
    #[serde(default)]
    pub resources: Vec<Resource>,

    /// Review questions in presentation order
    #[serde(default)]
    pub questions: Vec<QaPair>,
}

/// A labeled, non-executable code snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    pub title: String,

    /// Free-text language tag ("java", "sql", "c", ...)
    #[serde(default)]
    pub language: String,

    /// Verbatim snippet text
    pub code: String,

    #[serde(default)]
    pub description: String,
}

/// An external reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// A question with its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

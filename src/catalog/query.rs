//! Read-only queries over a built store.
//!
//! The query service borrows a `Store`; it holds no state of its own and is
//! cheap to construct per request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::store::Store;
use crate::domain::Topic;

/// Topic fields that keyword search can look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Title,
    Summary,
    Explanation,
}

impl SearchField {
    /// Fields searched when the caller does not name any
    pub const DEFAULT: [SearchField; 2] = [SearchField::Title, SearchField::Summary];

    fn text(self, topic: &Topic) -> &str {
        match self {
            SearchField::Title => &topic.title,
            SearchField::Summary => &topic.summary,
            SearchField::Explanation => &topic.explanation,
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchField::Title => write!(f, "title"),
            SearchField::Summary => write!(f, "summary"),
            SearchField::Explanation => write!(f, "explanation"),
        }
    }
}

impl FromStr for SearchField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "summary" => Ok(SearchField::Summary),
            "explanation" | "body" => Ok(SearchField::Explanation),
            _ => anyhow::bail!("Unknown search field: {}", s),
        }
    }
}

/// Query surface handed to the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    store: &'a Store,
}

impl<'a> QueryService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Exact id lookup
    pub fn by_id(&self, id: &str) -> Result<&'a Topic, CatalogError> {
        self.store.get_by_id(id)
    }

    /// Search with the default fields (title and summary)
    pub fn search(&self, term: &str) -> Vec<&'a Topic> {
        self.by_keyword(term, &SearchField::DEFAULT)
    }

    /// Case-insensitive substring search over `fields`.
    ///
    /// An empty `fields` slice means the defaults. Topics whose title matches
    /// come first; otherwise store order is kept. A blank term returns every
    /// topic in store order.
    pub fn by_keyword(&self, term: &str, fields: &[SearchField]) -> Vec<&'a Topic> {
        let term = term.trim();
        if term.is_empty() {
            return self.store.all().iter().collect();
        }

        let defaults = SearchField::DEFAULT;
        let fields: &[SearchField] = if fields.is_empty() {
            &defaults
        } else {
            fields
        };
        let needle = term.to_lowercase();

        let mut title_hits = Vec::new();
        let mut other_hits = Vec::new();
        for topic in self.store.all() {
            // Fields are joined with a newline so a match cannot straddle two fields
            let haystack = fields
                .iter()
                .map(|f| f.text(topic))
                .collect::<Vec<_>>()
                .join("\n")
                .to_lowercase();
            if !haystack.contains(&needle) {
                continue;
            }

            let in_title = fields.contains(&SearchField::Title)
                && topic.title.to_lowercase().contains(&needle);
            if in_title {
                title_hits.push(topic);
            } else {
                other_hits.push(topic);
            }
        }

        title_hits.extend(other_hits);
        title_hits
    }

    /// A window of `all()`.
    ///
    /// An offset past the end yields an empty slice and a short tail is not
    /// padded. Negative offsets and non-positive limits are caller bugs.
    pub fn paginate(&self, offset: i64, limit: i64) -> Result<&'a [Topic], CatalogError> {
        if offset < 0 {
            return Err(CatalogError::InvalidArgument {
                name: "offset",
                value: offset,
                constraint: "must be >= 0",
            });
        }
        if limit <= 0 {
            return Err(CatalogError::InvalidArgument {
                name: "limit",
                value: limit,
                constraint: "must be > 0",
            });
        }

        let all = self.store.all();
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        if start >= all.len() {
            return Ok(&[]);
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let end = start.saturating_add(limit).min(all.len());
        Ok(&all[start..end])
    }

    /// Consecutive pages of `limit` topics covering the whole store
    pub fn pages(&self, limit: i64) -> Result<std::slice::Chunks<'a, Topic>, CatalogError> {
        if limit <= 0 {
            return Err(CatalogError::InvalidArgument {
                name: "limit",
                value: limit,
                constraint: "must be > 0",
            });
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.store.all().chunks(limit))
    }
}

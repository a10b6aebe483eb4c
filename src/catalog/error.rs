//! Error taxonomy for the catalog.
//!
//! Content-shape problems (`ValidationError`, `Rejection`) are values that end
//! up in a `BuildReport`; they never abort a build. `CatalogError` covers the
//! query surface: `NotFound` is an expected outcome, `InvalidArgument` flags a
//! bug in the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    /// Required field absent
    Missing,

    /// Present but empty or whitespace-only
    Empty,

    /// Present with the wrong JSON type
    WrongType,

    /// Not a URL with both scheme and host
    InvalidUrl,

    /// Repeats a value that must be unique within the topic
    Duplicate,
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReason::Missing => write!(f, "missing"),
            ValidationReason::Empty => write!(f, "empty"),
            ValidationReason::WrongType => write!(f, "wrong_type"),
            ValidationReason::InvalidUrl => write!(f, "invalid_url"),
            ValidationReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// A single field-level defect in a raw topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Field path, e.g. `summary` or `codeExamples[2].code`
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Why a raw topic was kept out of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    #[error("{} validation error(s)", errors.len())]
    Invalid { errors: Vec<ValidationError> },

    #[error("Duplicate id '{id}' (first seen at input {first_index})")]
    DuplicateId { id: String, first_index: usize },
}

impl Rejection {
    /// Field errors, empty for duplicate ids
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Rejection::Invalid { errors } => errors,
            Rejection::DuplicateId { .. } => &[],
        }
    }

    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Rejection::DuplicateId { .. })
    }
}

/// Errors raised by store and query operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Topic not found: {0}")]
    NotFound(String),

    #[error("Invalid argument {name}={value}: {constraint}")]
    InvalidArgument {
        name: &'static str,
        value: i64,
        constraint: &'static str,
    },
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("codeExamples[1].code", ValidationReason::Empty);
        assert_eq!(err.to_string(), "codeExamples[1].code: empty");
    }

    #[test]
    fn test_rejection_serializes_with_kind_tag() {
        let rejection = Rejection::DuplicateId {
            id: "dup".to_string(),
            first_index: 0,
        };
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(json["kind"], "duplicate_id");
        assert_eq!(json["id"], "dup");

        let invalid = Rejection::Invalid {
            errors: vec![ValidationError::new("summary", ValidationReason::Empty)],
        };
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["kind"], "invalid");
        assert_eq!(json["errors"][0]["field"], "summary");
        assert_eq!(json["errors"][0]["reason"], "empty");
    }
}

//! Schema validation for raw topic records.
//!
//! `validate` never stops at the first defect: every failing field is
//! collected so content authors see the whole list in one pass. Checks run
//! in a fixed order (id, title, summary, code examples, resources, questions,
//! then the optional fields) which is also the order errors are reported in.

use std::collections::HashSet;

use serde_json::{Map, Value};
use url::Url;

use super::error::{ValidationError, ValidationReason};
use crate::domain::{CodeExample, QaPair, RawTopic, Resource, Topic, TopicId};

/// Validate and normalize a raw topic.
///
/// Missing optional fields become empty strings or empty lists.
pub fn validate(raw: &RawTopic) -> Result<Topic, Vec<ValidationError>> {
    let mut checker = Checker::default();
    let fields = raw.fields();

    let id = checker.required_str(fields, "id", "id");
    let title = checker.required_str(fields, "title", "title");
    let summary = checker.required_str(fields, "summary", "summary");
    let code_examples = checker.records(fields, "codeExamples", code_example);
    let resources = checker.resources(fields);
    let questions = checker.records(fields, "questions", qa_pair);
    let subtitle = checker.optional_str(fields, "subtitle", "subtitle");
    let explanation = checker.optional_str(fields, "explanation", "explanation");
    let key_points = checker.key_points(fields);

    if !checker.errors.is_empty() {
        return Err(checker.errors);
    }

    Ok(Topic {
        id: TopicId::new(id.trim()),
        title,
        subtitle,
        summary,
        explanation,
        key_points,
        code_examples,
        resources,
        questions,
    })
}

/// Accumulates field errors while extracting values
#[derive(Default)]
struct Checker {
    errors: Vec<ValidationError>,
}

impl Checker {
    fn fail(&mut self, path: impl Into<String>, reason: ValidationReason) {
        self.errors.push(ValidationError::new(path, reason));
    }

    /// A string that must be present and non-blank
    fn required_str(&mut self, fields: &Map<String, Value>, key: &str, path: &str) -> String {
        match fields.get(key) {
            None | Some(Value::Null) => {
                self.fail(path, ValidationReason::Missing);
                String::new()
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.fail(path, ValidationReason::Empty);
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.fail(path, ValidationReason::WrongType);
                String::new()
            }
        }
    }

    /// A string that defaults to empty when absent
    fn optional_str(&mut self, fields: &Map<String, Value>, key: &str, path: &str) -> String {
        match fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.fail(path, ValidationReason::WrongType);
                String::new()
            }
        }
    }

    /// An optional array field; absent or null means empty
    fn array<'a>(&mut self, fields: &'a Map<String, Value>, key: &str) -> &'a [Value] {
        match fields.get(key) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.fail(key, ValidationReason::WrongType);
                &[]
            }
        }
    }

    /// Validate every object entry of an array field with `parse`
    fn records<T>(
        &mut self,
        fields: &Map<String, Value>,
        key: &str,
        parse: fn(&mut Checker, &Map<String, Value>, &str) -> T,
    ) -> Vec<T> {
        let mut out = Vec::new();
        for (i, item) in self.array(fields, key).iter().enumerate() {
            let path = format!("{key}[{i}]");
            match item {
                Value::Object(entry) => out.push(parse(self, entry, &path)),
                _ => self.fail(path, ValidationReason::WrongType),
            }
        }
        out
    }

    fn resources(&mut self, fields: &Map<String, Value>) -> Vec<Resource> {
        let resources = self.records(fields, "resources", resource);

        // Compare normalized urls so host case and default ports do not hide duplicates
        let mut seen = HashSet::new();
        for (i, res) in resources.iter().enumerate() {
            let Ok(url) = Url::parse(&res.url) else {
                continue;
            };
            if !seen.insert(url.to_string()) {
                self.errors.push(ValidationError::new(
                    format!("resources[{i}].url"),
                    ValidationReason::Duplicate,
                ));
            }
        }
        resources
    }

    fn key_points(&mut self, fields: &Map<String, Value>) -> Vec<String> {
        let mut points = Vec::new();
        for (i, item) in self.array(fields, "keyPoints").iter().enumerate() {
            match item {
                Value::String(s) => points.push(s.clone()),
                _ => self.fail(format!("keyPoints[{i}]"), ValidationReason::WrongType),
            }
        }
        points
    }
}

fn code_example(checker: &mut Checker, entry: &Map<String, Value>, path: &str) -> CodeExample {
    CodeExample {
        title: checker.required_str(entry, "title", &format!("{path}.title")),
        language: checker.optional_str(entry, "language", &format!("{path}.language")),
        code: checker.required_str(entry, "code", &format!("{path}.code")),
        description: checker.optional_str(entry, "description", &format!("{path}.description")),
    }
}

fn resource(checker: &mut Checker, entry: &Map<String, Value>, path: &str) -> Resource {
    let url_path = format!("{path}.url");
    let mut url = checker.required_str(entry, "url", &url_path);
    if !url.is_empty() {
        url = url.trim().to_string();
        if !is_valid_url(&url) {
            checker.fail(url_path, ValidationReason::InvalidUrl);
            url.clear();
        }
    }

    Resource {
        title: checker.required_str(entry, "title", &format!("{path}.title")),
        url,
        description: checker.optional_str(entry, "description", &format!("{path}.description")),
    }
}

fn qa_pair(checker: &mut Checker, entry: &Map<String, Value>, path: &str) -> QaPair {
    QaPair {
        question: checker.required_str(entry, "question", &format!("{path}.question")),
        answer: checker.required_str(entry, "answer", &format!("{path}.answer")),
    }
}

/// Scheme and host must both parse
fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| url.has_host() && url.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawTopic {
        RawTopic::try_from(value).unwrap()
    }

    fn fields_of(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_minimal_topic_is_normalized() {
        let topic = validate(&raw(json!({
            "id": "thrashing",
            "title": "Thrashing",
            "summary": "When paging overwhelms useful work"
        })))
        .unwrap();

        assert_eq!(topic.id.as_str(), "thrashing");
        assert_eq!(topic.subtitle, "");
        assert_eq!(topic.explanation, "");
        assert!(topic.key_points.is_empty());
        assert!(topic.code_examples.is_empty());
        assert!(topic.resources.is_empty());
        assert!(topic.questions.is_empty());
    }

    #[test]
    fn test_full_topic_keeps_order() {
        let topic = validate(&raw(json!({
            "id": "producer-consumer",
            "title": "Producer-Consumer",
            "subtitle": "Bounded buffer",
            "summary": "Coordinating a shared buffer",
            "explanation": "Two semaphores and a mutex...",
            "keyPoints": ["full", "empty", "mutex"],
            "codeExamples": [
                {"title": "Producer", "language": "c", "code": "wait(empty);"},
                {"title": "Consumer", "language": "c", "code": "wait(full);", "description": "mirror"}
            ],
            "resources": [
                {"title": "OSTEP", "url": "https://pages.cs.wisc.edu/~remzi/OSTEP/"}
            ],
            "questions": [
                {"question": "Why a mutex?", "answer": "To protect the buffer indices"}
            ]
        })))
        .unwrap();

        assert_eq!(topic.key_points, vec!["full", "empty", "mutex"]);
        assert_eq!(topic.code_examples[0].title, "Producer");
        assert_eq!(topic.code_examples[1].description, "mirror");
        assert_eq!(topic.code_examples[0].description, "");
        assert_eq!(topic.resources.len(), 1);
        assert_eq!(topic.questions[0].answer, "To protect the buffer indices");
    }

    #[test]
    fn test_errors_are_accumulated_in_check_order() {
        let errors = validate(&raw(json!({
            "title": "",
            "codeExamples": [{"title": "x", "code": ""}],
            "resources": [{"title": "", "url": "not a url"}],
            "questions": [{"question": "q"}]
        })))
        .unwrap_err();

        assert_eq!(
            fields_of(&errors),
            vec![
                "id",
                "title",
                "summary",
                "codeExamples[0].code",
                "resources[0].url",
                "resources[0].title",
                "questions[0].answer",
            ]
        );
        assert_eq!(errors[0].reason, ValidationReason::Missing);
        assert_eq!(errors[1].reason, ValidationReason::Empty);
        assert_eq!(errors[4].reason, ValidationReason::InvalidUrl);
    }

    #[test]
    fn test_empty_summary_reports_single_error() {
        let errors = validate(&raw(json!({
            "id": "disk-scheduling",
            "title": "Disk Scheduling",
            "summary": ""
        })))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::new("summary", ValidationReason::Empty)]
        );
    }

    #[test]
    fn test_wrong_types() {
        let errors = validate(&raw(json!({
            "id": 7,
            "title": "T",
            "summary": "S",
            "subtitle": ["nope"],
            "keyPoints": ["ok", 3],
            "codeExamples": "not a list",
            "questions": [null]
        })))
        .unwrap_err();

        assert_eq!(
            fields_of(&errors),
            vec!["id", "codeExamples", "questions[0]", "subtitle", "keyPoints[1]"]
        );
        assert!(errors.iter().all(|e| e.reason == ValidationReason::WrongType));
    }

    #[test]
    fn test_url_requires_scheme_and_host() {
        assert!(is_valid_url("https://en.wikipedia.org/wiki/Banker%27s_algorithm"));
        assert!(is_valid_url("http://localhost:8080/docs"));
        assert!(!is_valid_url("en.wikipedia.org/wiki/Thrashing"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("file:///tmp/notes.txt"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_duplicate_resource_urls_are_rejected() {
        let errors = validate(&raw(json!({
            "id": "sharding",
            "title": "Sharding",
            "summary": "Horizontal partitioning",
            "resources": [
                {"title": "A", "url": "https://example.com/sharding"},
                {"title": "B", "url": "https://example.com/other"},
                {"title": "C", "url": "https://example.com/sharding"}
            ]
        })))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::new(
                "resources[2].url",
                ValidationReason::Duplicate
            )]
        );
    }

    #[test]
    fn test_duplicate_resource_urls_compare_normalized() {
        let errors = validate(&raw(json!({
            "id": "relational-algebra",
            "title": "Relational Algebra",
            "summary": "Operators over relations",
            "resources": [
                {"title": "A", "url": "https://Example.com/algebra"},
                {"title": "B", "url": "https://example.com:443/algebra"}
            ]
        })))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::new(
                "resources[1].url",
                ValidationReason::Duplicate
            )]
        );
    }

    #[test]
    fn test_whitespace_only_required_fields_are_empty() {
        let errors = validate(&raw(json!({
            "id": "process-states",
            "title": "   ",
            "summary": "\n\t"
        })))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::new("title", ValidationReason::Empty),
                ValidationError::new("summary", ValidationReason::Empty),
            ]
        );
    }

    #[test]
    fn test_id_is_trimmed() {
        let topic = validate(&raw(json!({
            "id": "  readers-writers ",
            "title": "Readers-Writers",
            "summary": "Shared reads, exclusive writes"
        })))
        .unwrap();
        assert_eq!(topic.id.as_str(), "readers-writers");
    }
}

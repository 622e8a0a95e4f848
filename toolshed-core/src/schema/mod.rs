//! Schema store - compiled tool-entry schema plus validation rule constants
//!
//! Loads `tool-entry.json` (a draft-07 JSON Schema) and
//! `validation-rules.json` (plain constants: allowed status codes,
//! forbidden words, scoring weights, thresholds) from the schema directory
//! and keeps a compiled validator for the lifetime of the run.

use anyhow::{Context, Result};
use jsonschema::{JSONSchema, ValidationError};
use jsonschema::error::ValidationErrorKind;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Default schema directory, relative to the repository root
pub const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// A single schema violation: the offending field path and a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Slash-separated path of the offending field ("slug",
    /// "installation/url"); "<entry>" for document-level failures
    pub field: String,
    /// Human-readable description of the failed constraint
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation rule constants (validation-rules.json)
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationRules {
    pub url_validation: UrlValidation,
    pub content_validation: ContentValidation,
    pub scoring_weights: ScoringWeights,
    pub quality_thresholds: QualityThresholds,
    pub automation_rules: AutomationRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlValidation {
    /// HTTP status codes accepted as "reachable"
    pub required_status_codes: Vec<u16>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Additional attempts after the first failure
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentValidation {
    /// Lowercase keywords that trigger a content-policy warning
    pub forbidden_words: Vec<String>,
}

/// Top-level weight of each quality sub-score; the weights sum to 1.0
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoringWeights {
    pub activity: f64,
    pub popularity: f64,
    pub documentation: f64,
    pub license: f64,
    pub community: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QualityThresholds {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AutomationRules {
    /// Entries scoring below this need manual review
    pub review_required_score: u32,
    /// Star count below which a warning is attached
    pub minimum_stars: u64,
}

/// Compiled schema plus rule constants, loaded once per run
pub struct SchemaStore {
    compiled: JSONSchema,
    rules: ValidationRules,
}

impl SchemaStore {
    /// Load and compile schemas from a directory
    pub fn load(schema_dir: &Path) -> Result<Self> {
        let entry_schema = read_json(&schema_dir.join("tool-entry.json"))?;
        let rules_value = read_json(&schema_dir.join("validation-rules.json"))?;

        // The compiled validator holds references into the schema document,
        // which therefore must outlive it. The store is created once per run,
        // so leaking the document is the simplest way to satisfy that.
        let entry_schema: &'static Value = Box::leak(Box::new(entry_schema));
        let compiled = JSONSchema::compile(entry_schema)
            .map_err(|e| anyhow::anyhow!("invalid tool-entry schema: {e}"))?;

        let rules: ValidationRules = serde_json::from_value(rules_value)
            .context("Failed to parse validation-rules.json")?;

        Ok(Self { compiled, rules })
    }

    /// Validate a raw entry document, returning every violation found
    pub fn validate_value(&self, value: &Value) -> Vec<Violation> {
        match self.compiled.validate(value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| violation_from_error(&e)).collect(),
        }
    }

    /// Rule constants loaded from validation-rules.json
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in schema file: {}", path.display()))
}

/// Map a jsonschema error to a Violation.
///
/// Missing required fields are reported under the missing field's own path
/// rather than the parent object, so "slug is required" surfaces as "slug".
fn violation_from_error(error: &ValidationError<'_>) -> Violation {
    let base = error.instance_path.to_string();
    let base = base.trim_start_matches('/').to_string();

    let field = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let property = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            if base.is_empty() {
                property
            } else {
                format!("{base}/{property}")
            }
        }
        _ => {
            if base.is_empty() {
                "<entry>".to_string()
            } else {
                base
            }
        }
    };

    Violation {
        field,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn repo_schema_dir() -> PathBuf {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.pop();
        path.join("schemas")
    }

    fn store() -> SchemaStore {
        SchemaStore::load(&repo_schema_dir()).expect("repo schemas load")
    }

    fn minimal_entry() -> Value {
        json!({
            "name": "Example Tool",
            "slug": "example-tool",
            "repository": "https://github.com/example/tool",
            "description": "A tool that does example things for testing."
        })
    }

    #[test]
    fn valid_entry_has_no_violations() {
        let violations = store().validate_value(&minimal_entry());
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn missing_slug_reports_the_slug_field() {
        let mut entry = minimal_entry();
        entry.as_object_mut().unwrap().remove("slug");

        let violations = store().validate_value(&entry);
        assert!(violations.iter().any(|v| v.field == "slug"), "{violations:?}");
    }

    #[test]
    fn uppercase_slug_fails_the_pattern() {
        let mut entry = minimal_entry();
        entry["slug"] = json!("Example-Tool");
        assert!(!store().validate_value(&entry).is_empty());

        entry["slug"] = json!("example_tool");
        assert!(!store().validate_value(&entry).is_empty());

        entry["slug"] = json!("docker-tool");
        assert!(store().validate_value(&entry).is_empty());
    }

    #[test]
    fn non_github_repository_fails() {
        let mut entry = minimal_entry();
        entry["repository"] = json!("https://gitlab.com/example/tool");
        assert!(!store().validate_value(&entry).is_empty());
    }

    #[test]
    fn both_descriptive_shapes_present_is_rejected() {
        let mut entry = minimal_entry();
        entry["short-description"] = json!("Short blurb");
        assert!(!store().validate_value(&entry).is_empty());
    }

    #[test]
    fn nested_violation_reports_nested_path() {
        let mut entry = minimal_entry();
        entry["installation"] = json!({"type": "script"});

        let violations = store().validate_value(&entry);
        assert!(
            violations.iter().any(|v| v.field.starts_with("installation")),
            "{violations:?}"
        );
    }

    #[test]
    fn rules_constants_are_typed() {
        let store = store();
        let rules = store.rules();
        assert!(rules.url_validation.required_status_codes.contains(&200));
        assert!(!rules.content_validation.forbidden_words.is_empty());
        let w = rules.scoring_weights;
        let total = w.activity + w.popularity + w.documentation + w.license + w.community;
        assert!((total - 1.0).abs() < 1e-9);
    }
}

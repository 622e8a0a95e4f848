//! Entry validation - schema checks, uniqueness, content policy, and the
//! legacy-to-new format autocomplete pass
//!
//! Validation is per-entry isolated: one invalid entry is reported and
//! counted, the rest of the batch still runs. Duplicate slugs or repository
//! URLs are registry-wide errors that block a merge.

use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::error::{DuplicateKind, RegistryError};
use crate::registry::{write_entry, LoadReport, LoadedEntry, ToolEntry};
use crate::schema::{SchemaStore, Violation};

/// Knobs for a validation run
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    /// Fill missing new-format fields on legacy entries
    pub autocomplete: bool,
    /// Report the intended autocomplete patch without writing it
    pub dry_run: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            autocomplete: true,
            dry_run: false,
        }
    }
}

/// Validation result for one entry file
#[derive(Debug)]
pub struct ValidationOutcome {
    pub file: String,
    pub category: String,
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
    /// Fields synthesized by the autocomplete pass
    pub patched_fields: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The outcome's violations as typed registry errors
    pub fn schema_errors(&self) -> Vec<RegistryError> {
        self.violations
            .iter()
            .map(|v| RegistryError::SchemaViolation {
                file: self.file.clone(),
                field: v.field.clone(),
                message: v.message.clone(),
            })
            .collect()
    }
}

/// Per-category valid/invalid counts
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryCount {
    pub valid: usize,
    pub invalid: usize,
}

/// Validation result for a whole registry scan
#[derive(Debug)]
pub struct ValidationSummary {
    pub outcomes: Vec<ValidationOutcome>,
    /// Registry-wide slug / repository collisions
    pub duplicates: Vec<RegistryError>,
    pub by_category: BTreeMap<String, CategoryCount>,
}

impl ValidationSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    /// True when every entry passed and no uniqueness constraint broke
    pub fn all_valid(&self) -> bool {
        self.duplicates.is_empty() && self.outcomes.iter().all(|o| o.is_valid())
    }
}

/// Validates entries against the schema store
pub struct Validator<'a> {
    store: &'a SchemaStore,
}

impl<'a> Validator<'a> {
    pub fn new(store: &'a SchemaStore) -> Self {
        Self { store }
    }

    /// Validate a single loaded entry, applying autocomplete when enabled.
    ///
    /// With autocomplete on and dry-run off, a patched entry is written back
    /// to its file before schema validation runs.
    pub fn validate_entry(
        &self,
        entry: &mut LoadedEntry,
        options: ValidateOptions,
    ) -> anyhow::Result<ValidationOutcome> {
        let mut patched_fields = Vec::new();

        if options.autocomplete {
            patched_fields = autocomplete(&mut entry.raw);
            if !patched_fields.is_empty() {
                // Keep the typed view in sync with the patched document
                entry.parsed = serde_json::from_value(entry.raw.clone()).ok();

                if options.dry_run {
                    info!(
                        "{}: would autocomplete {}",
                        entry.relative_path,
                        patched_fields.join(", ")
                    );
                } else {
                    write_entry(entry)?;
                    debug!(
                        "{}: autocompleted {}",
                        entry.relative_path,
                        patched_fields.join(", ")
                    );
                }
            }
        }

        let violations = self.store.validate_value(&entry.raw);

        let mut warnings = Vec::new();
        if let Some(parsed) = &entry.parsed {
            warnings.extend(
                content_policy_warnings(parsed, &self.store.rules().content_validation.forbidden_words)
                    .iter()
                    .map(|w| w.to_string()),
            );

            let rules = self.store.rules().automation_rules;
            if let Some(verification) = &parsed.verification {
                if verification.score < rules.review_required_score {
                    warnings.push(format!(
                        "score ({}) below review threshold ({})",
                        verification.score, rules.review_required_score
                    ));
                }
            }
            if let Some(metrics) = &parsed.metrics {
                if metrics.stars < rules.minimum_stars {
                    warnings.push(format!("low star count ({})", metrics.stars));
                }
            }
        }

        Ok(ValidationOutcome {
            file: entry.relative_path.clone(),
            category: entry.category(),
            violations,
            warnings,
            patched_fields,
        })
    }

    /// Validate every loaded entry plus registry-wide uniqueness.
    ///
    /// Load failures from the scan are folded in as invalid outcomes so the
    /// summary accounts for every file seen.
    pub fn validate_batch(
        &self,
        report: &mut LoadReport,
        options: ValidateOptions,
    ) -> anyhow::Result<ValidationSummary> {
        let mut outcomes = Vec::with_capacity(report.total_files());

        for entry in &mut report.entries {
            outcomes.push(self.validate_entry(entry, options)?);
        }

        for failure in &report.failures {
            outcomes.push(ValidationOutcome {
                file: failure.path.display().to_string(),
                category: crate::registry::UNCATEGORIZED.to_string(),
                violations: vec![Violation {
                    field: "<file>".to_string(),
                    message: failure.reason.clone(),
                }],
                warnings: Vec::new(),
                patched_fields: Vec::new(),
            });
        }

        let duplicates = find_duplicates(&report.entries);

        let mut by_category: BTreeMap<String, CategoryCount> = BTreeMap::new();
        for outcome in &outcomes {
            let count = by_category.entry(outcome.category.clone()).or_default();
            if outcome.is_valid() {
                count.valid += 1;
            } else {
                count.invalid += 1;
            }
        }

        Ok(ValidationSummary {
            outcomes,
            duplicates,
            by_category,
        })
    }
}

/// Fill missing new-format fields on a legacy-format entry document.
///
/// Only absent fields are synthesized; anything the author set is left
/// untouched, which also makes the pass idempotent. Returns the names of
/// the fields added.
pub fn autocomplete(raw: &mut Value) -> Vec<String> {
    let Some(object) = raw.as_object() else {
        return Vec::new();
    };

    // Legacy shape: long-form description, no compatibility block yet.
    let is_legacy = object.contains_key("description") && !object.contains_key("compatibility");
    if !is_legacy {
        return Vec::new();
    }

    let platforms = object
        .get("platforms")
        .cloned()
        .unwrap_or_else(|| json!(["windows"]));

    let mut patched = Vec::new();
    let object = raw.as_object_mut().expect("checked above");

    object.insert("compatibility".to_string(), json!({ "platforms": platforms }));
    patched.push("compatibility".to_string());

    for (field, default) in [
        ("installation", json!({ "type": "manual" })),
        ("uninstallation", json!({ "type": "manual" })),
        ("configuration", json!({ "type": "none" })),
    ] {
        if !object.contains_key(field) {
            object.insert(field.to_string(), default);
            patched.push(field.to_string());
        }
    }

    patched
}

/// Detect slug and repository collisions across the loaded set
pub fn find_duplicates(entries: &[LoadedEntry]) -> Vec<RegistryError> {
    let mut errors = Vec::new();
    let mut slugs: HashMap<&str, &str> = HashMap::new();
    let mut repositories: HashMap<String, &str> = HashMap::new();

    for entry in entries {
        let Some(parsed) = &entry.parsed else { continue };

        if let Some(first) = slugs.insert(&parsed.slug, &entry.relative_path) {
            errors.push(RegistryError::DuplicateEntry {
                kind: DuplicateKind::Slug,
                value: parsed.slug.clone(),
                first: first.to_string(),
                second: entry.relative_path.clone(),
            });
        }

        // Trailing slashes do not make a different repository
        let repo = parsed.repository.trim_end_matches('/').to_string();
        if let Some(first) = repositories.insert(repo, &entry.relative_path) {
            errors.push(RegistryError::DuplicateEntry {
                kind: DuplicateKind::Repository,
                value: parsed.repository.clone(),
                first: first.to_string(),
                second: entry.relative_path.clone(),
            });
        }
    }

    errors
}

/// Forbidden-keyword scan over name, description, and tags.
///
/// Matches are warnings only; they never invalidate an entry.
pub fn content_policy_warnings(entry: &ToolEntry, forbidden: &[String]) -> Vec<RegistryError> {
    let mut warnings = Vec::new();

    let fields = [
        ("name", entry.name.to_lowercase()),
        ("description", entry.description_text().to_lowercase()),
        ("tags", entry.tags.join(" ").to_lowercase()),
    ];

    for (field, text) in &fields {
        for word in forbidden {
            if text.contains(word.as_str()) {
                warnings.push(RegistryError::ContentPolicyViolation {
                    field: field.to_string(),
                    word: word.clone(),
                });
            }
        }
    }

    warnings
}

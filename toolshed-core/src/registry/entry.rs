//! Tool entry model
//!
//! A tool entry is one JSON file describing a third-party tool. Entries come
//! in two descriptive shapes: the legacy shape (`description` plus top-level
//! `platforms`/`language`) and the new shape (`short-description` plus a
//! `compatibility` block and installation/configuration sub-records).
//! Exactly one shape is present per entry; the validator's autocomplete pass
//! migrates legacy entries forward.

use serde::{Deserialize, Serialize};

/// A single registry entry, parsed leniently (the JSON Schema is the
/// authority on shape; this struct is the typed view used by the scorer
/// and the catalog generator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    /// Display name
    pub name: String,

    /// Unique lowercase-hyphenated identifier
    pub slug: String,

    /// GitHub repository URL, unique registry-wide
    pub repository: String,

    /// Long-form description (legacy shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// One-line description (new shape)
    #[serde(
        rename = "short-description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,

    /// Documentation URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// SPDX license identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Explicit category; when absent the loader derives it from the
    /// entry's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Optional subcategory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Searchable tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Supported platforms (legacy shape; new entries use `compatibility`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Primary implementation language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Platform compatibility block (new shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<Compatibility>,

    /// How the tool is installed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallStep>,

    /// How the tool is removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uninstallation: Option<InstallStep>,

    /// How the tool is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConfigStep>,

    /// Maintainer information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<Maintainer>,

    /// Repository metrics, refreshed by the verifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,

    /// Verification result, owned by the verifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,

    /// Date the entry was added (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,

    /// GitHub handle of the contributor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributed_by: Option<String>,

    /// Entries are never deleted, only marked deprecated
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

/// Platform compatibility block (new descriptive shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compatibility {
    pub platforms: Vec<String>,

    #[serde(
        rename = "minimum-version",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_version: Option<String>,
}

/// An installation or uninstallation step, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InstallStep {
    /// Run a script fetched from a URL
    Script {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },
    /// Install through a package manager
    Package { manager: String, package: String },
    /// Download an artifact
    Download { url: String },
    /// Manual steps described in prose
    Manual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instructions: Option<String>,
    },
}

/// A configuration step, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigStep {
    /// Configuration lives in a file
    File {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// Configuration lives in the Windows registry
    Registry { key: String },
    /// No configuration needed
    None {},
}

/// Maintainer contact block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Maintainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Repository metrics collected by the verifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub stars: u64,

    #[serde(default)]
    pub forks: u64,

    /// Date of the most recent push (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
}

/// Verification result attached to an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub status: VerificationStatus,

    #[serde(default)]
    pub score: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Per-entry verification state machine: pending -> verified | failed;
/// verified | failed -> deprecated; nothing leaves deprecated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Failed,
    Deprecated,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
            VerificationStatus::Deprecated => "deprecated",
        };
        write!(f, "{s}")
    }
}

impl ToolEntry {
    /// Whichever descriptive text the entry carries
    pub fn description_text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.short_description.as_deref())
            .unwrap_or("")
    }

    /// True when the entry uses the legacy descriptive shape
    pub fn is_legacy_format(&self) -> bool {
        self.description.is_some() && self.compatibility.is_none()
    }

    /// Supported platforms, from whichever shape the entry uses
    pub fn platform_list(&self) -> &[String] {
        match &self.compatibility {
            Some(compat) => &compat.platforms,
            None => &self.platforms,
        }
    }

    /// Current verification status (pending when never verified)
    pub fn verification_status(&self) -> VerificationStatus {
        if self.deprecated {
            return VerificationStatus::Deprecated;
        }
        self.verification
            .as_ref()
            .map(|v| v.status)
            .unwrap_or_default()
    }

    /// Current quality score (0 when never scored)
    pub fn quality_score(&self) -> u32 {
        self.verification.as_ref().map(|v| v.score).unwrap_or(0)
    }

    pub fn stars(&self) -> u64 {
        self.metrics.as_ref().map(|m| m.stars).unwrap_or(0)
    }

    pub fn forks(&self) -> u64 {
        self.metrics.as_ref().map(|m| m.forks).unwrap_or(0)
    }

    pub fn last_commit(&self) -> Option<&str> {
        self.metrics.as_ref().and_then(|m| m.last_commit.as_deref())
    }
}

#[cfg(test)]
mod entry_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_legacy_entry() {
        let entry: ToolEntry = serde_json::from_value(json!({
            "name": "Example",
            "slug": "example",
            "repository": "https://github.com/a/b",
            "description": "A legacy-format entry with top-level platforms.",
            "platforms": ["windows", "linux"],
            "language": "Rust"
        }))
        .unwrap();

        assert!(entry.is_legacy_format());
        assert_eq!(entry.platform_list(), ["windows", "linux"]);
        assert_eq!(entry.verification_status(), VerificationStatus::Pending);
    }

    #[test]
    fn parses_new_format_entry_with_tagged_steps() {
        let entry: ToolEntry = serde_json::from_value(json!({
            "name": "Example",
            "slug": "example",
            "repository": "https://github.com/a/b",
            "short-description": "New-format entry",
            "compatibility": {"platforms": ["windows"]},
            "installation": {"type": "package", "manager": "winget", "package": "Example.Example"},
            "uninstallation": {"type": "manual"},
            "configuration": {"type": "file", "path": "config.toml"}
        }))
        .unwrap();

        assert!(!entry.is_legacy_format());
        assert_eq!(
            entry.installation,
            Some(InstallStep::Package {
                manager: "winget".into(),
                package: "Example.Example".into()
            })
        );
        assert_eq!(entry.uninstallation, Some(InstallStep::Manual { instructions: None }));
        assert_eq!(entry.platform_list(), ["windows"]);
    }

    #[test]
    fn deprecated_flag_wins_over_verification_status() {
        let entry: ToolEntry = serde_json::from_value(json!({
            "name": "Example",
            "slug": "example",
            "repository": "https://github.com/a/b",
            "description": "A deprecated entry kept for the historical record.",
            "deprecated": true,
            "verification": {"status": "verified", "score": 80}
        }))
        .unwrap();

        assert_eq!(entry.verification_status(), VerificationStatus::Deprecated);
    }

    #[test]
    fn serializes_without_empty_optional_noise() {
        let entry: ToolEntry = serde_json::from_value(json!({
            "name": "Example",
            "slug": "example",
            "repository": "https://github.com/a/b",
            "description": "Minimal entry round-trips without nulls."
        }))
        .unwrap();

        let value = serde_json::to_value(&entry).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("metrics"));
        assert!(!object.contains_key("deprecated"));
        assert!(!object.contains_key("tags"));
    }
}

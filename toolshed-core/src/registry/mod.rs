//! Registry loading - tool entries from a category-organized directory tree
//!
//! Entries live as JSON files under the tools directory; the directory path
//! relative to that root is the entry's category (`uncategorized` for files
//! at the root). A file that fails to parse is reported and skipped, never
//! fatal to the batch.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

mod entry;

pub use entry::{
    Compatibility, ConfigStep, InstallStep, Maintainer, Metrics, ToolEntry, Verification,
    VerificationStatus,
};

/// Default tools directory, relative to the repository root
pub const DEFAULT_TOOLS_DIR: &str = "tools";

/// Category assigned to entries at the tools-dir root
pub const UNCATEGORIZED: &str = "uncategorized";

/// One tool entry file, loaded from disk
#[derive(Debug, Clone)]
pub struct LoadedEntry {
    /// Absolute (or caller-relative) path to the file
    pub path: PathBuf,
    /// Path relative to the tools directory, slash-separated
    pub relative_path: String,
    /// File name, e.g. `sunshine.json`
    pub file_name: String,
    /// Category derived from the directory tree
    pub category_path: String,
    /// File modification time
    pub modified: DateTime<Utc>,
    /// Raw JSON document, preserved verbatim for write-backs
    pub raw: Value,
    /// Typed view; `None` when the document does not fit the model
    pub parsed: Option<ToolEntry>,
}

impl LoadedEntry {
    /// Effective category: the entry's explicit `category` field (with
    /// `subcategory` appended) when present, the directory path otherwise.
    pub fn category(&self) -> String {
        match &self.parsed {
            Some(entry) => match (&entry.category, &entry.subcategory) {
                (Some(category), Some(sub)) => format!("{category}/{sub}"),
                (Some(category), None) => category.clone(),
                (None, _) => self.category_path.clone(),
            },
            None => self.category_path.clone(),
        }
    }
}

/// A file that could not be loaded
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning a tools directory
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entries: Vec<LoadedEntry>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn total_files(&self) -> usize {
        self.entries.len() + self.failures.len()
    }
}

/// Load every `*.json` entry under the tools directory.
///
/// Entries are returned in path order so downstream aggregation is
/// deterministic run to run.
pub fn load_entries(tools_dir: &Path) -> Result<LoadReport> {
    if !tools_dir.is_dir() {
        anyhow::bail!("Tools directory not found: {}", tools_dir.display());
    }

    let mut report = LoadReport::default();

    for walked in WalkDir::new(tools_dir).sort_by_file_name() {
        let walked = match walked {
            Ok(walked) => walked,
            Err(e) => {
                warn!("Skipping unreadable path under {}: {}", tools_dir.display(), e);
                continue;
            }
        };

        let path = walked.path();
        if !walked.file_type().is_file()
            || path.extension().map(|ext| ext != "json").unwrap_or(true)
        {
            continue;
        }

        match load_entry(tools_dir, path) {
            Ok(entry) => report.entries.push(entry),
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
                report.failures.push(LoadFailure {
                    path: path.to_path_buf(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    report
        .entries
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    debug!(
        "Loaded {} entries ({} failures) from {}",
        report.entries.len(),
        report.failures.len(),
        tools_dir.display()
    );

    Ok(report)
}

/// Load a single entry file.
///
/// `tools_dir` anchors the derived category; a file outside it gets the
/// `uncategorized` category.
pub fn load_entry(tools_dir: &Path, path: &Path) -> Result<LoadedEntry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tool entry: {}", path.display()))?;

    let raw: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let parsed = serde_json::from_value(raw.clone()).ok();

    let relative = path.strip_prefix(tools_dir).unwrap_or(path);
    let relative_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let category_path = match relative.parent() {
        Some(parent) if parent.as_os_str().is_empty() => UNCATEGORIZED.to_string(),
        Some(parent) => parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        None => UNCATEGORIZED.to_string(),
    };

    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    Ok(LoadedEntry {
        path: path.to_path_buf(),
        relative_path,
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        category_path,
        modified,
        raw,
        parsed,
    })
}

/// Write an entry's raw document back to disk as pretty JSON with a
/// trailing newline, matching how contributors author entries.
pub fn write_entry(entry: &LoadedEntry) -> Result<()> {
    let mut content = serde_json::to_string_pretty(&entry.raw)
        .with_context(|| format!("Failed to serialize {}", entry.path.display()))?;
    content.push('\n');

    std::fs::write(&entry.path, content)
        .with_context(|| format!("Failed to write {}", entry.path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_tool(dir: &Path, rel: &str, value: &Value) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn sample(slug: &str) -> Value {
        json!({
            "name": "Sample",
            "slug": slug,
            "repository": format!("https://github.com/sample/{slug}"),
            "description": "A sample tool entry used by the loader tests."
        })
    }

    #[test]
    fn derives_category_from_directory_tree() {
        let tmp = TempDir::new().unwrap();
        write_tool(tmp.path(), "streaming/sunshine.json", &sample("sunshine"));
        write_tool(tmp.path(), "streaming/plugins/overlay.json", &sample("overlay"));
        write_tool(tmp.path(), "loose.json", &sample("loose"));

        let report = load_entries(tmp.path()).unwrap();
        assert_eq!(report.entries.len(), 3);
        assert!(report.failures.is_empty());

        let by_slug = |slug: &str| {
            report
                .entries
                .iter()
                .find(|e| e.parsed.as_ref().map(|p| p.slug.as_str()) == Some(slug))
                .unwrap()
        };

        assert_eq!(by_slug("sunshine").category_path, "streaming");
        assert_eq!(by_slug("overlay").category_path, "streaming/plugins");
        assert_eq!(by_slug("loose").category_path, UNCATEGORIZED);
    }

    #[test]
    fn explicit_category_field_wins() {
        let tmp = TempDir::new().unwrap();
        let mut value = sample("explicit");
        value["category"] = json!("utilities");
        value["subcategory"] = json!("helpers");
        write_tool(tmp.path(), "streaming/explicit.json", &value);

        let report = load_entries(tmp.path()).unwrap();
        assert_eq!(report.entries[0].category(), "utilities/helpers");
    }

    #[test]
    fn broken_json_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        write_tool(tmp.path(), "a/good.json", &sample("good"));
        std::fs::create_dir_all(tmp.path().join("b")).unwrap();
        std::fs::write(tmp.path().join("b/bad.json"), "{not json").unwrap();

        let report = load_entries(tmp.path()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("Invalid JSON"));
    }

    #[test]
    fn entries_come_back_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write_tool(tmp.path(), "z/zeta.json", &sample("zeta"));
        write_tool(tmp.path(), "a/alpha.json", &sample("alpha"));

        let report = load_entries(tmp.path()).unwrap();
        let paths: Vec<_> = report.entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(paths, ["a/alpha.json", "z/zeta.json"]);
    }

    #[test]
    fn missing_tools_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_entries(&tmp.path().join("nope")).is_err());
    }

    #[test]
    fn write_entry_round_trips() {
        let tmp = TempDir::new().unwrap();
        write_tool(tmp.path(), "a/tool.json", &sample("tool"));

        let report = load_entries(tmp.path()).unwrap();
        let mut entry = report.entries.into_iter().next().unwrap();
        entry.raw["verification"] = json!({"status": "verified", "score": 75});
        write_entry(&entry).unwrap();

        let reread = load_entry(tmp.path(), &entry.path).unwrap();
        assert_eq!(reread.raw["verification"]["status"], "verified");
    }
}

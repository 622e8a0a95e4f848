//! Catalog generation - derived JSON artifacts for the published API
//!
//! Aggregates the validated entry set into `catalog.json`,
//! `categories.json`, `search.json`, `stats.json`, and (on request)
//! `manifest.json`. Generation is a pure, total aggregation: every run
//! rebuilds each artifact from scratch, so identical input produces
//! identical output modulo the `generated` timestamps. Artifacts are
//! written atomically so partial output is never observable.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::registry::{LoadedEntry, Maintainer, VerificationStatus};
use crate::schema::QualityThresholds;
use crate::score::{bucket_for, QualityBucket};


/// Schema version stamped into every artifact
pub const CATALOG_VERSION: &str = "1.0.0";

/// Default output directory for generated artifacts
pub const DEFAULT_API_DIR: &str = "api";

/// One artifact written to the api directory
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl GeneratedArtifact {
    pub fn size_kb(&self) -> f64 {
        (self.size_bytes as f64 / 1024.0 * 10.0).round() / 10.0
    }
}

// --- catalog.json -----------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogDoc {
    pub version: String,
    pub generated: String,
    pub total_tools: usize,
    pub tools: Vec<CatalogTool>,
}

/// Per-tool projection in the main catalog
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogTool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub verification: VerificationSummary,
    pub metrics: MetricsSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<Maintainer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributed_by: Option<String>,
    #[serde(rename = "_metadata")]
    pub metadata: FileMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub status: VerificationStatus,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub stars: u64,
    pub forks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_path: String,
    pub category_path: String,
    pub file_name: String,
    pub last_modified: String,
}

// --- categories.json --------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesDoc {
    pub version: String,
    pub generated: String,
    pub total_categories: usize,
    pub categories: BTreeMap<String, CategoryGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Display name of the main category ("streaming" -> "Streaming")
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub full_path: String,
    pub tools: Vec<CategoryTool>,
    pub stats: CategoryStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryTool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub verification_status: VerificationStatus,
    pub score: u32,
    pub stars: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: usize,
    pub verified: usize,
    pub average_score: f64,
    pub total_stars: u64,
    pub languages: Vec<String>,
    pub licenses: Vec<String>,
}

// --- search.json ------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchDoc {
    pub version: String,
    pub generated: String,
    pub indexes: SearchIndexes,
    pub filters: SearchFilters,
}

/// Inverted indexes from facet value to tool ids
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchIndexes {
    pub by_name: BTreeMap<String, Vec<String>>,
    pub by_tag: BTreeMap<String, Vec<String>>,
    pub by_category: BTreeMap<String, Vec<String>>,
    pub by_language: BTreeMap<String, Vec<String>>,
    pub by_license: BTreeMap<String, Vec<String>>,
    pub by_platform: BTreeMap<String, Vec<String>>,
}

/// Sorted facet vocabularies for building filter UIs
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub categories: Vec<String>,
    pub languages: Vec<String>,
    pub licenses: Vec<String>,
    pub platforms: Vec<String>,
    pub tags: Vec<String>,
    pub verification_statuses: Vec<String>,
}

// --- stats.json -------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsDoc {
    pub version: String,
    pub generated: String,
    pub overview: Overview,
    pub categories: BTreeMap<String, CategoryCounts>,
    pub languages: BTreeMap<String, LanguageCounts>,
    pub licenses: BTreeMap<String, usize>,
    pub platforms: BTreeMap<String, usize>,
    pub verification_statuses: BTreeMap<String, usize>,
    pub quality_distribution: QualityDistribution,
    pub activity_analysis: ActivityAnalysis,
    pub top_tools: TopTools,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Overview {
    pub total_tools: usize,
    pub verified_tools: usize,
    pub pending_tools: usize,
    pub failed_tools: usize,
    pub deprecated_tools: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    pub average_score: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub count: usize,
    pub average_score: f64,
    pub total_stars: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LanguageCounts {
    pub count: usize,
    pub average_score: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActivityAnalysis {
    /// Commit activity within the last 30 days
    pub active: usize,
    /// Activity within the last 180 days
    pub moderate: usize,
    /// No known activity in 180+ days
    pub inactive: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TopTools {
    pub by_stars: Vec<ToolSummary>,
    pub by_score: Vec<ToolSummary>,
    pub by_recent_activity: Vec<ToolSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub stars: u64,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
}

// --- manifest.json ----------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestDoc {
    pub version: String,
    pub generated: String,
    pub catalogs: BTreeMap<String, ArtifactMeta>,
    pub api_endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub path: String,
    pub size_bytes: u64,
    pub size_kb: f64,
    pub last_modified: String,
}

/// How many entries each top-tools list carries
const TOP_LIST_LEN: usize = 10;

/// Builds and writes the derived catalog artifacts
pub struct CatalogGenerator {
    thresholds: QualityThresholds,
}

impl CatalogGenerator {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    /// Build the main catalog: every tool, sorted by score then stars
    pub fn build_catalog(&self, entries: &[LoadedEntry], generated: &str) -> CatalogDoc {
        let mut tools: Vec<CatalogTool> = entries
            .iter()
            .filter_map(|entry| {
                let parsed = entry.parsed.as_ref()?;
                Some(CatalogTool {
                    id: parsed.slug.clone(),
                    name: parsed.name.clone(),
                    description: parsed.description_text().to_string(),
                    category: entry.category(),
                    subcategory: parsed.subcategory.clone(),
                    tags: parsed.tags.clone(),
                    repository: parsed.repository.clone(),
                    documentation: parsed.documentation.clone(),
                    license: parsed.license.clone(),
                    platforms: parsed.platform_list().to_vec(),
                    language: parsed.language.clone(),
                    verification: VerificationSummary {
                        status: parsed.verification_status(),
                        score: parsed.quality_score(),
                        date: parsed
                            .verification
                            .as_ref()
                            .and_then(|v| v.date.clone()),
                    },
                    metrics: MetricsSummary {
                        stars: parsed.stars(),
                        forks: parsed.forks(),
                        last_commit: parsed.last_commit().map(str::to_string),
                    },
                    maintainer: parsed.maintainer.clone(),
                    added_date: parsed.added_date.clone(),
                    contributed_by: parsed.contributed_by.clone(),
                    metadata: FileMetadata {
                        file_path: entry.relative_path.clone(),
                        category_path: entry.category_path.clone(),
                        file_name: entry.file_name.clone(),
                        last_modified: entry.modified.to_rfc3339(),
                    },
                })
            })
            .collect();

        tools.sort_by(|a, b| {
            b.verification
                .score
                .cmp(&a.verification.score)
                .then(b.metrics.stars.cmp(&a.metrics.stars))
                .then(a.id.cmp(&b.id))
        });

        CatalogDoc {
            version: CATALOG_VERSION.to_string(),
            generated: generated.to_string(),
            total_tools: tools.len(),
            tools,
        }
    }

    /// Build the category-grouped listing with per-category stats
    pub fn build_categories(&self, entries: &[LoadedEntry], generated: &str) -> CategoriesDoc {
        let mut categories: BTreeMap<String, CategoryGroup> = BTreeMap::new();
        let mut languages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut licenses: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for entry in entries {
            let Some(parsed) = &entry.parsed else { continue };
            let category = entry.category();

            let group = categories.entry(category.clone()).or_insert_with(|| {
                let mut parts = category.splitn(2, '/');
                let main = parts.next().unwrap_or(&category);
                let sub = parts.next();
                CategoryGroup {
                    name: title_case(main),
                    subcategory: sub.map(title_case),
                    full_path: category.clone(),
                    tools: Vec::new(),
                    stats: CategoryStats::default(),
                }
            });

            group.tools.push(CategoryTool {
                id: parsed.slug.clone(),
                name: parsed.name.clone(),
                description: parsed.description_text().to_string(),
                verification_status: parsed.verification_status(),
                score: parsed.quality_score(),
                stars: parsed.stars(),
            });

            group.stats.total += 1;
            if parsed.verification_status() == VerificationStatus::Verified {
                group.stats.verified += 1;
            }
            group.stats.total_stars += parsed.stars();

            if let Some(language) = &parsed.language {
                languages.entry(category.clone()).or_default().insert(language.clone());
            }
            if let Some(license) = &parsed.license {
                licenses.entry(category.clone()).or_default().insert(license.clone());
            }
        }

        for (category, group) in &mut categories {
            if group.stats.total > 0 {
                let total_score: u32 = group.tools.iter().map(|t| t.score).sum();
                group.stats.average_score = round1(f64::from(total_score) / group.stats.total as f64);
            }
            group.stats.languages = languages
                .remove(category)
                .map(|set| set.into_iter().collect())
                .unwrap_or_default();
            group.stats.licenses = licenses
                .remove(category)
                .map(|set| set.into_iter().collect())
                .unwrap_or_default();

            group
                .tools
                .sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        }

        CategoriesDoc {
            version: CATALOG_VERSION.to_string(),
            generated: generated.to_string(),
            total_categories: categories.len(),
            categories,
        }
    }

    /// Build the inverted search indexes and filter vocabularies
    pub fn build_search(&self, entries: &[LoadedEntry], generated: &str) -> SearchDoc {
        let mut indexes = SearchIndexes::default();
        let mut categories = BTreeSet::new();
        let mut languages = BTreeSet::new();
        let mut licenses = BTreeSet::new();
        let mut platforms = BTreeSet::new();
        let mut tags = BTreeSet::new();
        let mut statuses = BTreeSet::new();

        for entry in entries {
            let Some(parsed) = &entry.parsed else { continue };
            let id = parsed.slug.clone();

            let search_text = format!(
                "{} {}",
                parsed.name.to_lowercase(),
                parsed.description_text().to_lowercase()
            );
            for word in search_text.split_whitespace() {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric());
                if word.len() >= 2 {
                    push_unique(indexes.by_name.entry(word.to_string()).or_default(), &id);
                }
            }

            for tag in &parsed.tags {
                push_unique(indexes.by_tag.entry(tag.clone()).or_default(), &id);
                tags.insert(tag.clone());
            }

            let category = entry.category();
            push_unique(indexes.by_category.entry(category.clone()).or_default(), &id);
            categories.insert(category);

            if let Some(language) = &parsed.language {
                push_unique(indexes.by_language.entry(language.clone()).or_default(), &id);
                languages.insert(language.clone());
            }

            if let Some(license) = &parsed.license {
                push_unique(indexes.by_license.entry(license.clone()).or_default(), &id);
                licenses.insert(license.clone());
            }

            for platform in parsed.platform_list() {
                push_unique(indexes.by_platform.entry(platform.clone()).or_default(), &id);
                platforms.insert(platform.clone());
            }

            statuses.insert(parsed.verification_status().to_string());
        }

        SearchDoc {
            version: CATALOG_VERSION.to_string(),
            generated: generated.to_string(),
            indexes,
            filters: SearchFilters {
                categories: categories.into_iter().collect(),
                languages: languages.into_iter().collect(),
                licenses: licenses.into_iter().collect(),
                platforms: platforms.into_iter().collect(),
                tags: tags.into_iter().collect(),
                verification_statuses: statuses.into_iter().collect(),
            },
        }
    }

    /// Build aggregate statistics
    pub fn build_stats(
        &self,
        entries: &[LoadedEntry],
        generated: &str,
        now: DateTime<Utc>,
    ) -> StatsDoc {
        let mut doc = StatsDoc {
            version: CATALOG_VERSION.to_string(),
            generated: generated.to_string(),
            overview: Overview::default(),
            categories: BTreeMap::new(),
            languages: BTreeMap::new(),
            licenses: BTreeMap::new(),
            platforms: BTreeMap::new(),
            verification_statuses: BTreeMap::new(),
            quality_distribution: QualityDistribution::default(),
            activity_analysis: ActivityAnalysis::default(),
            top_tools: TopTools::default(),
        };

        let mut score_total: u64 = 0;
        let mut category_scores: BTreeMap<String, u64> = BTreeMap::new();
        let mut language_scores: BTreeMap<String, u64> = BTreeMap::new();
        let mut summaries: Vec<ToolSummary> = Vec::new();

        for entry in entries {
            let Some(parsed) = &entry.parsed else { continue };

            let status = parsed.verification_status();
            let score = parsed.quality_score();
            let stars = parsed.stars();
            let category = entry.category();

            doc.overview.total_tools += 1;
            doc.overview.total_stars += stars;
            doc.overview.total_forks += parsed.forks();
            score_total += u64::from(score);

            match status {
                VerificationStatus::Verified => doc.overview.verified_tools += 1,
                VerificationStatus::Pending => doc.overview.pending_tools += 1,
                VerificationStatus::Failed => doc.overview.failed_tools += 1,
                VerificationStatus::Deprecated => doc.overview.deprecated_tools += 1,
            }
            *doc.verification_statuses.entry(status.to_string()).or_default() += 1;

            match bucket_for(score, &self.thresholds) {
                QualityBucket::Excellent => doc.quality_distribution.excellent += 1,
                QualityBucket::Good => doc.quality_distribution.good += 1,
                QualityBucket::Fair => doc.quality_distribution.fair += 1,
                QualityBucket::Poor => doc.quality_distribution.poor += 1,
            }

            let cat = doc.categories.entry(category.clone()).or_default();
            cat.count += 1;
            cat.total_stars += stars;
            *category_scores.entry(category.clone()).or_default() += u64::from(score);

            if let Some(language) = &parsed.language {
                doc.languages.entry(language.clone()).or_default().count += 1;
                *language_scores.entry(language.clone()).or_default() += u64::from(score);
            }

            if let Some(license) = &parsed.license {
                *doc.licenses.entry(license.clone()).or_default() += 1;
            }

            for platform in parsed.platform_list() {
                *doc.platforms.entry(platform.clone()).or_default() += 1;
            }

            match commit_age_days(parsed.last_commit(), now) {
                Some(days) if days <= 30 => doc.activity_analysis.active += 1,
                Some(days) if days <= 180 => doc.activity_analysis.moderate += 1,
                _ => doc.activity_analysis.inactive += 1,
            }

            summaries.push(ToolSummary {
                id: parsed.slug.clone(),
                name: parsed.name.clone(),
                category,
                stars,
                score,
                last_commit: parsed.last_commit().map(str::to_string),
            });
        }

        if doc.overview.total_tools > 0 {
            doc.overview.average_score =
                round1(score_total as f64 / doc.overview.total_tools as f64);
        }
        for (category, counts) in &mut doc.categories {
            if counts.count > 0 {
                let total = category_scores.get(category).copied().unwrap_or(0);
                counts.average_score = round1(total as f64 / counts.count as f64);
            }
        }
        for (language, counts) in &mut doc.languages {
            if counts.count > 0 {
                let total = language_scores.get(language).copied().unwrap_or(0);
                counts.average_score = round1(total as f64 / counts.count as f64);
            }
        }

        let mut by_stars = summaries.clone();
        by_stars.sort_by(|a, b| b.stars.cmp(&a.stars).then(a.id.cmp(&b.id)));
        by_stars.truncate(TOP_LIST_LEN);

        let mut by_score = summaries.clone();
        by_score.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        by_score.truncate(TOP_LIST_LEN);

        let mut by_recent: Vec<ToolSummary> = summaries
            .into_iter()
            .filter(|t| {
                t.last_commit
                    .as_deref()
                    .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok())
                    .unwrap_or(false)
            })
            .collect();
        by_recent.sort_by(|a, b| {
            b.last_commit
                .cmp(&a.last_commit)
                .then(a.id.cmp(&b.id))
        });
        by_recent.truncate(TOP_LIST_LEN);

        doc.top_tools = TopTools {
            by_stars,
            by_score,
            by_recent_activity: by_recent,
        };

        doc
    }

    /// Generate and atomically write the four catalog artifacts.
    ///
    /// Entries that failed validation must be filtered out by the caller;
    /// anything passed in is published.
    pub fn generate_all(
        &self,
        entries: &[LoadedEntry],
        api_dir: &Path,
    ) -> Result<Vec<GeneratedArtifact>> {
        std::fs::create_dir_all(api_dir)
            .with_context(|| format!("Failed to create api directory: {}", api_dir.display()))?;

        let generated = Utc::now().to_rfc3339();
        let now = Utc::now();

        let artifacts = vec![
            ("catalog.json", serde_json::to_value(self.build_catalog(entries, &generated))?),
            ("categories.json", serde_json::to_value(self.build_categories(entries, &generated))?),
            ("search.json", serde_json::to_value(self.build_search(entries, &generated))?),
            ("stats.json", serde_json::to_value(self.build_stats(entries, &generated, now))?),
        ];

        let mut written = Vec::new();
        for (name, value) in artifacts {
            let path = api_dir.join(name);
            let size_bytes = write_artifact(&path, &value)?;
            info!("Generated {} ({:.1} KB)", name, size_bytes as f64 / 1024.0);
            written.push(GeneratedArtifact {
                name: name.to_string(),
                path,
                size_bytes,
            });
        }

        Ok(written)
    }

    /// Generate the manifest describing the artifacts already in the api dir
    pub fn generate_manifest(&self, api_dir: &Path) -> Result<GeneratedArtifact> {
        let mut catalogs = BTreeMap::new();

        // Artifact paths are reported relative to the api directory's parent
        let dir_name = api_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_API_DIR);

        for walked in std::fs::read_dir(api_dir)
            .with_context(|| format!("Failed to read api directory: {}", api_dir.display()))?
        {
            let walked = walked?;
            let path = walked.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".json") || name == "manifest.json" {
                continue;
            }

            let meta = walked.metadata()?;
            let modified = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            catalogs.insert(
                name.to_string(),
                ArtifactMeta {
                    path: format!("{dir_name}/{name}"),
                    size_bytes: meta.len(),
                    size_kb: (meta.len() as f64 / 1024.0 * 10.0).round() / 10.0,
                    last_modified: modified.to_rfc3339(),
                },
            );
        }

        let manifest = ManifestDoc {
            version: CATALOG_VERSION.to_string(),
            generated: Utc::now().to_rfc3339(),
            catalogs,
            api_endpoints: BTreeMap::from([
                ("main_catalog".to_string(), "/api/catalog.json".to_string()),
                ("categories".to_string(), "/api/categories.json".to_string()),
                ("search_index".to_string(), "/api/search.json".to_string()),
                ("statistics".to_string(), "/api/stats.json".to_string()),
            ]),
        };

        let path = api_dir.join("manifest.json");
        let size_bytes = write_artifact(&path, &serde_json::to_value(&manifest)?)?;
        debug!("Generated manifest.json ({size_bytes} bytes)");

        Ok(GeneratedArtifact {
            name: "manifest.json".to_string(),
            path,
            size_bytes,
        })
    }
}

/// Write a JSON artifact atomically: temp file in the same directory,
/// then rename over the target.
fn write_artifact(path: &Path, value: &serde_json::Value) -> Result<u64> {
    let dir = path.parent().context("artifact path has no parent")?;

    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    let size_bytes = content.len() as u64;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to persist {}", path.display()))?;

    Ok(size_bytes)
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

/// "video-capture" -> "Video Capture"
fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn commit_age_days(last_commit: Option<&str>, now: DateTime<Utc>) -> Option<i64> {
    let date = NaiveDate::parse_from_str(last_commit?, "%Y-%m-%d").ok()?;
    Some((now.date_naive() - date).num_days())
}

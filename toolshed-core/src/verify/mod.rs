//! Entry verification - URL reachability probes and repository metrics
//!
//! Each entry's repository URL (and documentation URL, when present) is
//! probed over HTTP with a per-request timeout and one bounded retry.
//! Repository metrics come from the GitHub API. Network failures mark the
//! entry's verification as failed; they never abort the batch, and entries
//! are verified independently under a bounded worker pool.

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::registry::{write_entry, LoadedEntry, Metrics, VerificationStatus};
use crate::schema::{QualityThresholds, SchemaStore, ScoringWeights};
use crate::score::{quality_score, QualityBucket};

/// Default size of the verification worker pool
pub const DEFAULT_WORKERS: usize = 5;

static GITHUB_REPO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://github\.com/([^/]+)/([^/]+?)/?$").expect("valid regex"));

/// Owner/name pair parsed from a GitHub repository URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse `https://github.com/{owner}/{name}` (optional trailing slash)
    pub fn parse(url: &str) -> Option<Self> {
        let captures = GITHUB_REPO_RE.captures(url)?;
        Some(Self {
            owner: captures[1].to_string(),
            name: captures[2].trim_end_matches(".git").to_string(),
        })
    }
}

/// Repository fields we read off the GitHub API response
#[derive(Debug, Clone, Default, Deserialize)]
struct GithubRepo {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    pushed_at: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    license: Option<GithubLicense>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GithubLicense {
    #[serde(default)]
    spdx_id: Option<String>,
}

/// Repository facts reported alongside the persisted metrics
#[derive(Debug, Clone, Default)]
pub struct RepoDetails {
    pub watchers: u64,
    pub open_issues: u64,
    pub language: Option<String>,
    /// SPDX identifier reported by the GitHub API
    pub license: Option<String>,
    pub fork: bool,
    pub topics: Vec<String>,
}

/// What a successful URL probe observed
#[derive(Debug, Clone)]
pub struct UrlProbe {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub response_time: Duration,
}

/// Documentation probe result, kept even when the probe failed
#[derive(Debug, Clone)]
pub struct DocProbe {
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub response_time: Duration,
}

/// Result of verifying one entry
#[derive(Debug)]
pub struct VerifyOutcome {
    pub file: String,
    pub slug: String,
    pub status: VerificationStatus,
    pub score: u32,
    pub bucket: QualityBucket,
    pub repository_reachable: bool,
    /// `None` when the entry has no documentation URL
    pub documentation: Option<DocProbe>,
    pub metrics: Option<Metrics>,
    /// Repository facts beyond the persisted metrics; `None` when the
    /// API fetch failed
    pub details: Option<RepoDetails>,
    pub issues: Vec<String>,
    /// Deprecated entries are left untouched
    pub skipped: bool,
}

/// Probes URLs and fetches repository metrics for registry entries
pub struct Verifier {
    client: reqwest::Client,
    allowed_statuses: Vec<u16>,
    max_retries: u32,
    weights: ScoringWeights,
    thresholds: QualityThresholds,
    github_api_base: String,
}

impl Verifier {
    /// Build a verifier from the schema store's rule constants.
    ///
    /// `timeout` overrides the per-request timeout from
    /// validation-rules.json when set.
    pub fn new(store: &SchemaStore, timeout: Option<Duration>) -> Result<Self> {
        let rules = store.rules();
        let timeout =
            timeout.unwrap_or_else(|| Duration::from_secs(rules.url_validation.timeout_seconds));

        let client = reqwest::Client::builder()
            .user_agent(concat!("toolshed/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            allowed_statuses: rules.url_validation.required_status_codes.clone(),
            max_retries: rules.url_validation.max_retries,
            weights: rules.scoring_weights,
            thresholds: rules.quality_thresholds,
            github_api_base: "https://api.github.com".to_string(),
        })
    }

    /// Point GitHub API requests somewhere else (tests use a local server)
    pub fn with_github_api_base(mut self, base: impl Into<String>) -> Self {
        self.github_api_base = base.into();
        self
    }

    /// Probe a URL with HEAD, retrying once on transport errors.
    ///
    /// Returns the status code, content type, and response time; a status
    /// outside the allowed set is a `NetworkFailure`, as is any transport
    /// error or timeout.
    pub async fn probe_url(&self, url: &str) -> std::result::Result<UrlProbe, RegistryError> {
        let mut last_reason = String::new();

        for attempt in 0..=self.max_retries {
            let started = Instant::now();
            match self.client.head(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    let code = status.as_u16();
                    if status.is_success()
                        || status.is_redirection()
                        || self.allowed_statuses.contains(&code)
                    {
                        let content_type = response
                            .headers()
                            .get(reqwest::header::CONTENT_TYPE)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        return Ok(UrlProbe {
                            status_code: code,
                            content_type,
                            response_time: started.elapsed(),
                        });
                    }
                    return Err(RegistryError::NetworkFailure {
                        url: url.to_string(),
                        reason: format!("HTTP {code}"),
                    });
                }
                Err(e) => {
                    last_reason = if e.is_timeout() {
                        "timeout".to_string()
                    } else {
                        format!("{e}")
                    };
                    if attempt < self.max_retries {
                        debug!("Retrying {url} after {last_reason}");
                    }
                }
            }
        }

        Err(RegistryError::NetworkFailure {
            url: url.to_string(),
            reason: last_reason,
        })
    }

    /// Fetch repository metrics from the GitHub API
    async fn fetch_repo_metrics(
        &self,
        repo: &RepoRef,
    ) -> std::result::Result<GithubRepo, RegistryError> {
        let url = format!("{}/repos/{}/{}", self.github_api_base, repo.owner, repo.name);

        let mut last_reason = String::new();
        for attempt in 0..=self.max_retries {
            match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 404 {
                        return Err(RegistryError::NetworkFailure {
                            url,
                            reason: "repository not found (HTTP 404)".to_string(),
                        });
                    }
                    if !status.is_success() {
                        return Err(RegistryError::NetworkFailure {
                            url,
                            reason: format!("GitHub API error: HTTP {}", status.as_u16()),
                        });
                    }
                    return response.json::<GithubRepo>().await.map_err(|e| {
                        RegistryError::NetworkFailure {
                            url: url.clone(),
                            reason: format!("invalid API response: {e}"),
                        }
                    });
                }
                Err(e) => {
                    last_reason = if e.is_timeout() {
                        "timeout".to_string()
                    } else {
                        format!("{e}")
                    };
                    if attempt < self.max_retries {
                        debug!("Retrying {url} after {last_reason}");
                    }
                }
            }
        }

        Err(RegistryError::NetworkFailure {
            url,
            reason: last_reason,
        })
    }

    /// Verify one entry: probe its URLs, refresh metrics, score it, and
    /// (with `update`) write the result back into the entry file.
    ///
    /// Deprecated entries are skipped untouched; nothing transitions out of
    /// the deprecated state.
    pub async fn verify_entry(&self, entry: &mut LoadedEntry, update: bool) -> VerifyOutcome {
        let file = entry.relative_path.clone();

        let Some(parsed) = entry.parsed.clone() else {
            return VerifyOutcome {
                file,
                slug: String::new(),
                status: VerificationStatus::Failed,
                score: 0,
                bucket: QualityBucket::Poor,
                repository_reachable: false,
                documentation: None,
                metrics: None,
                details: None,
                issues: vec!["entry does not fit the tool-entry model".to_string()],
                skipped: false,
            };
        };

        if parsed.verification_status() == VerificationStatus::Deprecated {
            debug!("Skipping deprecated entry {}", file);
            return VerifyOutcome {
                file,
                slug: parsed.slug.clone(),
                status: VerificationStatus::Deprecated,
                score: parsed.quality_score(),
                bucket: crate::score::bucket_for(parsed.quality_score(), &self.thresholds),
                repository_reachable: false,
                documentation: None,
                metrics: parsed.metrics.clone(),
                details: None,
                issues: Vec::new(),
                skipped: true,
            };
        }

        let mut issues = Vec::new();
        let mut metrics = parsed.metrics.clone().unwrap_or_default();
        let mut repository_reachable = false;
        let mut fetched_language = None;
        let mut details = None;

        match RepoRef::parse(&parsed.repository) {
            Some(repo) => match self.fetch_repo_metrics(&repo).await {
                Ok(api) => {
                    repository_reachable = true;
                    metrics = Metrics {
                        stars: api.stargazers_count,
                        forks: api.forks_count,
                        last_commit: api
                            .pushed_at
                            .as_deref()
                            .and_then(|ts| ts.split('T').next())
                            .map(str::to_string),
                    };
                    if api.archived {
                        issues.push("repository is archived".to_string());
                    }
                    if api.disabled {
                        issues.push("repository is disabled".to_string());
                    }
                    if api.private {
                        issues.push("repository is private".to_string());
                    }
                    fetched_language = api.language.clone();
                    details = Some(RepoDetails {
                        watchers: api.watchers_count,
                        open_issues: api.open_issues_count,
                        language: api.language,
                        license: api.license.and_then(|l| l.spdx_id),
                        fork: api.fork,
                        topics: api.topics,
                    });
                }
                Err(e) => issues.push(e.to_string()),
            },
            None => issues.push(format!("not a GitHub repository URL: {}", parsed.repository)),
        }

        let documentation = match parsed.documentation.as_deref() {
            Some(doc_url) => {
                let started = Instant::now();
                match self.probe_url(doc_url).await {
                    Ok(probe) => {
                        debug!("{file}: documentation reachable (HTTP {})", probe.status_code);
                        let is_html = probe
                            .content_type
                            .as_deref()
                            .map(|ct| ct.contains("text/html"))
                            .unwrap_or(false);
                        if !is_html {
                            issues.push("documentation may not be HTML".to_string());
                        }
                        Some(DocProbe {
                            reachable: true,
                            status_code: Some(probe.status_code),
                            content_type: probe.content_type,
                            response_time: probe.response_time,
                        })
                    }
                    Err(e) => {
                        issues.push(format!("documentation: {e}"));
                        Some(DocProbe {
                            reachable: false,
                            status_code: None,
                            content_type: None,
                            response_time: started.elapsed(),
                        })
                    }
                }
            }
            None => None,
        };

        let breakdown = quality_score(&parsed, &metrics, &self.weights, &self.thresholds, Utc::now());

        let status = if repository_reachable {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        };

        if update {
            entry.raw["verification"] = json!({
                "status": status,
                "score": breakdown.total,
                "date": Utc::now().to_rfc3339(),
                "method": "automated",
            });
            if repository_reachable {
                entry.raw["metrics"] = serde_json::to_value(&metrics).unwrap_or_default();
            }
            // Backfill the language when the author left it out
            if parsed.language.is_none() {
                if let Some(language) = &fetched_language {
                    entry.raw["language"] = json!(language);
                }
            }
            entry.parsed = serde_json::from_value(entry.raw.clone()).ok();

            if let Err(e) = write_entry(entry) {
                warn!("Failed to update {}: {:#}", entry.path.display(), e);
                issues.push(format!("update failed: {e:#}"));
            }
        }

        VerifyOutcome {
            file,
            slug: parsed.slug,
            status,
            score: breakdown.total,
            bucket: breakdown.bucket,
            repository_reachable,
            documentation,
            metrics: Some(metrics),
            details,
            issues,
            skipped: false,
        }
    }

    /// Verify a batch of entries under a bounded worker pool.
    ///
    /// Entries are independent; a failed probe marks only its own entry.
    /// Outcomes come back sorted by file path regardless of completion
    /// order.
    pub async fn verify_batch(
        &self,
        entries: Vec<LoadedEntry>,
        workers: usize,
        update: bool,
    ) -> Vec<VerifyOutcome> {
        let workers = workers.max(1);

        let mut outcomes: Vec<VerifyOutcome> = stream::iter(entries)
            .map(|mut entry| async move { self.verify_entry(&mut entry, update).await })
            .buffer_unordered(workers)
            .collect()
            .await;

        outcomes.sort_by(|a, b| a.file.cmp(&b.file));
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_github_repo_urls() {
        assert_eq!(
            RepoRef::parse("https://github.com/LizardByte/Sunshine"),
            Some(RepoRef {
                owner: "LizardByte".to_string(),
                name: "Sunshine".to_string()
            })
        );
        assert_eq!(
            RepoRef::parse("https://github.com/a/b/"),
            Some(RepoRef {
                owner: "a".to_string(),
                name: "b".to_string()
            })
        );
    }

    #[test]
    fn rejects_non_repo_urls() {
        assert_eq!(RepoRef::parse("https://gitlab.com/a/b"), None);
        assert_eq!(RepoRef::parse("https://github.com/only-owner"), None);
        assert_eq!(RepoRef::parse("https://github.com/a/b/issues"), None);
    }
}

//! Quality scoring - a pure, deterministic 0-100 composite
//!
//! The score is a weighted sum of five sub-scores, each normalized to
//! 0-100 before weighting: activity (25%), popularity (30%), documentation
//! (15%), license (10%), and community/completeness (20%). Weights come
//! from validation-rules.json; the fixed 90/70/50 thresholds map the total
//! to a bucket label.

use chrono::{DateTime, NaiveDate, Utc};

use crate::registry::{Metrics, ToolEntry};
use crate::schema::{QualityThresholds, ScoringWeights};

/// Stars-to-points rate for the popularity sub-score
const STARS_POINTS_PER_STAR: f64 = 0.5;
/// Popularity points available from stars alone
const STARS_POINTS_CAP: f64 = 60.0;
/// Forks-to-points rate for the popularity sub-score
const FORKS_POINTS_PER_FORK: f64 = 2.0;
/// Popularity points available from forks alone
const FORKS_POINTS_CAP: f64 = 40.0;

/// Quality bucket derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBucket {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QualityBucket::Excellent => "excellent",
            QualityBucket::Good => "good",
            QualityBucket::Fair => "fair",
            QualityBucket::Poor => "poor",
        };
        write!(f, "{s}")
    }
}

/// The total score plus its normalized sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub bucket: QualityBucket,
    pub activity: u32,
    pub popularity: u32,
    pub documentation: u32,
    pub license: u32,
    pub community: u32,
}

/// Compute the quality score for an entry given its repository metrics.
///
/// `now` is passed in so scoring stays a pure function; callers outside
/// tests pass `Utc::now()`.
pub fn quality_score(
    entry: &ToolEntry,
    metrics: &Metrics,
    weights: &ScoringWeights,
    thresholds: &QualityThresholds,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let activity = activity_subscore(metrics.last_commit.as_deref(), now);
    let popularity = popularity_subscore(metrics.stars, metrics.forks);
    let documentation = documentation_subscore(entry);
    let license = if entry.license.is_some() { 100 } else { 0 };
    let community = community_subscore(entry);

    let weighted = f64::from(activity) * weights.activity
        + f64::from(popularity) * weights.popularity
        + f64::from(documentation) * weights.documentation
        + f64::from(license) * weights.license
        + f64::from(community) * weights.community;

    let total = weighted.round().clamp(0.0, 100.0) as u32;

    ScoreBreakdown {
        total,
        bucket: bucket_for(total, thresholds),
        activity,
        popularity,
        documentation,
        license,
        community,
    }
}

/// Map a total score to its bucket label
pub fn bucket_for(total: u32, thresholds: &QualityThresholds) -> QualityBucket {
    if total >= thresholds.excellent {
        QualityBucket::Excellent
    } else if total >= thresholds.good {
        QualityBucket::Good
    } else if total >= thresholds.fair {
        QualityBucket::Fair
    } else {
        QualityBucket::Poor
    }
}

/// Recency of the last commit: full marks inside a month, tapering to a
/// floor for anything older than a year; unknown or unparseable dates
/// score zero.
fn activity_subscore(last_commit: Option<&str>, now: DateTime<Utc>) -> u32 {
    let Some(date) = last_commit.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    else {
        return 0;
    };

    let days = (now.date_naive() - date).num_days();
    match days {
        ..=30 => 100,
        31..=90 => 75,
        91..=365 => 50,
        _ => 25,
    }
}

/// Stars and forks, each capped so neither can dominate. Monotone
/// non-decreasing in both inputs.
fn popularity_subscore(stars: u64, forks: u64) -> u32 {
    let star_points = (stars as f64 * STARS_POINTS_PER_STAR).min(STARS_POINTS_CAP);
    let fork_points = (forks as f64 * FORKS_POINTS_PER_FORK).min(FORKS_POINTS_CAP);
    (star_points + fork_points).round() as u32
}

fn documentation_subscore(entry: &ToolEntry) -> u32 {
    let mut score = 0;
    if entry.documentation.is_some() {
        score += 70;
    }
    if entry.description_text().len() > 50 {
        score += 30;
    }
    score
}

fn community_subscore(entry: &ToolEntry) -> u32 {
    let mut score = 0;
    if entry
        .maintainer
        .as_ref()
        .map(|m| m.contact.is_some() || m.github.is_some())
        .unwrap_or(false)
    {
        score += 50;
    }
    if !entry.tags.is_empty() {
        score += 50;
    }
    score
}

//! `toolshed verify` - URL probes, metrics refresh, and scoring

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::info;

use toolshed_core::registry::{load_entries, load_entry, VerificationStatus};
use toolshed_core::schema::SchemaStore;
use toolshed_core::verify::{Verifier, VerifyOutcome};

pub struct VerifyArgs {
    pub single: Option<PathBuf>,
    pub workers: usize,
    pub timeout: Option<u64>,
    pub update: bool,
    pub tools_dir: PathBuf,
    pub schema_dir: PathBuf,
}

#[derive(Tabled)]
struct VerifyTableRow {
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Stars")]
    stars: String,
    #[tabled(rename = "Issues")]
    issues: String,
}

pub async fn run(args: VerifyArgs) -> Result<()> {
    let store = SchemaStore::load(&args.schema_dir)
        .with_context(|| format!("Failed to load schemas from {}", args.schema_dir.display()))?;

    let timeout = args.timeout.map(Duration::from_secs);
    let verifier = Verifier::new(&store, timeout)?;

    let entries = match &args.single {
        Some(path) => vec![load_entry(&args.tools_dir, path)?],
        None => load_entries(&args.tools_dir)?.entries,
    };

    info!(
        "Verifying {} entry file(s) with {} worker(s)",
        entries.len(),
        args.workers
    );

    let outcomes = verifier
        .verify_batch(entries, args.workers, args.update)
        .await;

    print_outcomes(&outcomes);

    let failed = outcomes
        .iter()
        .filter(|o| o.status == VerificationStatus::Failed)
        .count();
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_outcomes(outcomes: &[VerifyOutcome]) {
    let rows: Vec<VerifyTableRow> = outcomes
        .iter()
        .map(|outcome| VerifyTableRow {
            entry: outcome.file.clone(),
            status: if outcome.skipped {
                format!("{} (skipped)", outcome.status)
            } else {
                outcome.status.to_string()
            },
            score: format!("{} ({})", outcome.score, outcome.bucket),
            stars: outcome
                .metrics
                .as_ref()
                .map(|m| m.stars.to_string())
                .unwrap_or_else(|| "-".to_string()),
            issues: if outcome.issues.is_empty() {
                "-".to_string()
            } else {
                outcome.issues.join("; ")
            },
        })
        .collect();

    if rows.is_empty() {
        println!("No entries to verify.");
        return;
    }

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{table}");

    let verified = outcomes
        .iter()
        .filter(|o| o.status == VerificationStatus::Verified)
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| o.status == VerificationStatus::Failed)
        .count();
    let skipped = outcomes.iter().filter(|o| o.skipped).count();

    println!("\n=== Verification Summary ===");
    println!("Total:    {}", outcomes.len());
    println!("Verified: {verified}");
    println!("Failed:   {failed}");
    if skipped > 0 {
        println!("Skipped:  {skipped} (deprecated)");
    }
}

//! `toolshed validate` - schema validation with the autocomplete pass

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use toolshed_core::registry::{load_entries, load_entry, LoadReport};
use toolshed_core::schema::SchemaStore;
use toolshed_core::validate::{ValidateOptions, ValidationSummary, Validator};

pub struct ValidateArgs {
    pub single: Option<PathBuf>,
    pub verbose: bool,
    pub dry_run: bool,
    pub no_autocomplete: bool,
    pub tools_dir: PathBuf,
    pub schema_dir: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let store = SchemaStore::load(&args.schema_dir)
        .with_context(|| format!("Failed to load schemas from {}", args.schema_dir.display()))?;
    let validator = Validator::new(&store);

    let options = ValidateOptions {
        autocomplete: !args.no_autocomplete,
        dry_run: args.dry_run,
    };

    let mut report = match &args.single {
        Some(path) => {
            let entry = load_entry(&args.tools_dir, path)?;
            LoadReport {
                entries: vec![entry],
                failures: Vec::new(),
            }
        }
        None => load_entries(&args.tools_dir)?,
    };

    info!(
        "Validating {} entry file(s) from {}",
        report.total_files(),
        args.tools_dir.display()
    );

    let summary = validator.validate_batch(&mut report, options)?;
    print_summary(&summary, args.verbose);

    if summary.all_valid() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn print_summary(summary: &ValidationSummary, verbose: bool) {
    for outcome in &summary.outcomes {
        if outcome.is_valid() && !verbose {
            continue;
        }

        let marker = if outcome.is_valid() { "ok" } else { "FAIL" };
        println!("[{marker}] {}", outcome.file);

        for violation in &outcome.violations {
            println!("    violation: {violation}");
        }
        for warning in &outcome.warnings {
            println!("    warning: {warning}");
        }
        if !outcome.patched_fields.is_empty() {
            println!("    autocompleted: {}", outcome.patched_fields.join(", "));
        }
    }

    for duplicate in &summary.duplicates {
        println!("[FAIL] {duplicate}");
    }

    println!("\n=== Validation Summary ===");
    println!("Total:   {}", summary.total());
    println!("Valid:   {}", summary.valid_count());
    println!("Invalid: {}", summary.invalid_count());
    if !summary.duplicates.is_empty() {
        println!("Duplicates: {}", summary.duplicates.len());
    }

    if verbose {
        println!("\nBy category:");
        for (category, count) in &summary.by_category {
            println!("  {category}: {} valid, {} invalid", count.valid, count.invalid);
        }
    }
}

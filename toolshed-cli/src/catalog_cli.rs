//! `toolshed generate-catalog` - build the published JSON artifacts

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use toolshed_core::catalog::CatalogGenerator;
use toolshed_core::registry::load_entries;
use toolshed_core::schema::SchemaStore;
use toolshed_core::validate::{ValidateOptions, Validator};

pub struct CatalogArgs {
    pub manifest: bool,
    pub tools_dir: PathBuf,
    pub api_dir: PathBuf,
    pub schema_dir: PathBuf,
}

pub fn run(args: CatalogArgs) -> Result<()> {
    let store = SchemaStore::load(&args.schema_dir)
        .with_context(|| format!("Failed to load schemas from {}", args.schema_dir.display()))?;
    let validator = Validator::new(&store);

    let mut report = load_entries(&args.tools_dir)?;

    // Invalid entries are excluded from the published catalogs, never
    // published and never fatal. Generation must not mutate entry files,
    // so the autocomplete pass runs in dry-run mode here.
    let options = ValidateOptions {
        autocomplete: true,
        dry_run: true,
    };
    let summary = validator.validate_batch(&mut report, options)?;
    let excluded: Vec<&str> = summary
        .outcomes
        .iter()
        .filter(|o| !o.is_valid())
        .map(|o| o.file.as_str())
        .collect();
    for file in &excluded {
        warn!("Excluding invalid entry from catalog: {file}");
    }

    let entries: Vec<_> = report
        .entries
        .into_iter()
        .filter(|entry| !excluded.contains(&entry.relative_path.as_str()))
        .collect();

    info!(
        "Generating catalogs for {} entries into {}",
        entries.len(),
        args.api_dir.display()
    );

    let generator = CatalogGenerator::new(store.rules().quality_thresholds);
    let mut artifacts = generator.generate_all(&entries, &args.api_dir)?;

    if args.manifest {
        artifacts.push(generator.generate_manifest(&args.api_dir)?);
    }

    println!("=== Generated Artifacts ===");
    for artifact in &artifacts {
        println!("{}  {:.1} KB", artifact.name, artifact.size_kb());
    }
    println!("\n{} tools published", entries.len());
    if !excluded.is_empty() {
        println!("{} invalid entries excluded", excluded.len());
    }

    if artifacts.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

//! Toolshed - tool registry pipeline CLI
//!
//! Subcommands mirror the pipeline stages: validate entries, verify their
//! external links, and generate the published JSON catalogs.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod catalog_cli;
mod validate_cli;
mod verify_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "toolshed",
    about = "Tool registry pipeline - validate entries, verify repositories, publish catalogs",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "info", global = true)]
    log_level: LogLevel,
}

#[derive(Parser, Debug)]
enum Command {
    /// Validate tool entries against the registry schema
    Validate {
        /// Validate a single entry file instead of the whole tree
        #[clap(long)]
        single: Option<PathBuf>,

        /// Print every entry, not just the problems
        #[clap(long)]
        verbose: bool,

        /// Report autocomplete patches without writing them
        #[clap(long)]
        dry_run: bool,

        /// Skip the legacy-format autocomplete pass
        #[clap(long)]
        no_autocomplete: bool,

        /// Directory containing tool entry files
        #[clap(long, default_value = "tools")]
        tools_dir: PathBuf,

        /// Directory containing the registry schemas
        #[clap(long, default_value = "schemas")]
        schema_dir: PathBuf,
    },

    /// Verify repository and documentation URLs and refresh metrics
    Verify {
        /// Verify a single entry file instead of the whole tree
        #[clap(long)]
        single: Option<PathBuf>,

        /// Concurrent verification workers
        #[clap(long, default_value_t = toolshed_core::verify::DEFAULT_WORKERS)]
        workers: usize,

        /// Per-request timeout in seconds (defaults to the rules file)
        #[clap(long)]
        timeout: Option<u64>,

        /// Write verification results back into the entry files
        #[clap(long)]
        update: bool,

        /// Directory containing tool entry files
        #[clap(long, default_value = "tools")]
        tools_dir: PathBuf,

        /// Directory containing the registry schemas
        #[clap(long, default_value = "schemas")]
        schema_dir: PathBuf,
    },

    /// Generate the published JSON catalog artifacts
    GenerateCatalog {
        /// Also write manifest.json describing the generated artifacts
        #[clap(long)]
        manifest: bool,

        /// Directory containing tool entry files
        #[clap(long, default_value = "tools")]
        tools_dir: PathBuf,

        /// Output directory for the generated artifacts
        #[clap(long, default_value = "api")]
        api_dir: PathBuf,

        /// Directory containing the registry schemas
        #[clap(long, default_value = "schemas")]
        schema_dir: PathBuf,
    },
}

/// Initialize tracing with CLI flags.
///
/// Logs go to stderr so stdout stays machine-readable.
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    match cli.command {
        Command::Validate {
            single,
            verbose,
            dry_run,
            no_autocomplete,
            tools_dir,
            schema_dir,
        } => {
            validate_cli::run(validate_cli::ValidateArgs {
                single,
                verbose,
                dry_run,
                no_autocomplete,
                tools_dir,
                schema_dir,
            })
        }
        Command::Verify {
            single,
            workers,
            timeout,
            update,
            tools_dir,
            schema_dir,
        } => {
            verify_cli::run(verify_cli::VerifyArgs {
                single,
                workers,
                timeout,
                update,
                tools_dir,
                schema_dir,
            })
            .await
        }
        Command::GenerateCatalog {
            manifest,
            tools_dir,
            api_dir,
            schema_dir,
        } => {
            catalog_cli::run(catalog_cli::CatalogArgs {
                manifest,
                tools_dir,
                api_dir,
                schema_dir,
            })
        }
    }
}

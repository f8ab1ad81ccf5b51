//! PassForge CLI - Bridge interface for the registration service
//!
//! Commands: resolve, generate, batch, status, assets
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a registrant is rejected (including an unparseable payload)
//! or an artifact fails

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use passforge_core::{
    BatchRunner, BatchSummary, GenerationError, GeneratorConfig, PassGenerator, PassStatus,
    Registrant, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "passforge-cli")]
#[command(about = "PassForge CLI - Event credential generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which passes, invitations and schedules apply
    Resolve {
        /// JSON payload (Registrant)
        #[arg(short, long)]
        payload: String,
    },

    /// Generate passes for one registrant
    Generate {
        /// JSON payload (Registrant)
        #[arg(short, long)]
        payload: String,
    },

    /// Generate passes for every registrant in a JSON array file
    Batch {
        #[arg(short, long)]
        input: PathBuf,

        /// Override the configured worker count
        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Generate passes and report generation-state flags
    Status {
        /// JSON payload (Registrant)
        #[arg(short, long)]
        payload: String,
    },

    /// List expected asset files and whether they exist
    Assets,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => println!(r#"{{"success": false, "error": "Serialization failed: {}"}}"#, e),
    }
}

fn fail(error: impl std::fmt::Display) -> ExitCode {
    print_json(&serde_json::json!({ "success": false, "error": error.to_string() }));
    ExitCode::FAILURE
}

/// Rejected registrant, unparseable payloads included.
fn reject(error: impl std::fmt::Display) -> ExitCode {
    print_json(&serde_json::json!({ "success": false, "error": error.to_string() }));
    ExitCode::from(2)
}

fn parse_registrant(payload: &str) -> Result<Registrant, String> {
    serde_json::from_str(payload).map_err(|e| format!("Invalid payload: {}", e))
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match GeneratorConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => return fail(e),
        },
        None => GeneratorConfig::default(),
    };

    let generator = match PassGenerator::new(&config) {
        Ok(g) => g,
        Err(e) => return fail(e),
    };

    match cli.command {
        Commands::Resolve { payload } => {
            let registrant = match parse_registrant(&payload) {
                Ok(r) => r,
                Err(e) => return reject(e),
            };
            print_json(&generator.resolve(&registrant));
            ExitCode::SUCCESS
        }

        Commands::Generate { payload } => {
            let registrant = match parse_registrant(&payload) {
                Ok(r) => r,
                Err(e) => return reject(e),
            };
            match generator.generate_for_registrant(&registrant) {
                Ok(report) => {
                    let success = !report.has_failures();
                    print_json(&serde_json::json!({
                        "success": success,
                        "engine_version": ENGINE_VERSION,
                        "report": report,
                    }));
                    if success {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e @ GenerationError::InvalidRegistrant { .. }) => reject(e),
                Err(e) => fail(e),
            }
        }

        Commands::Batch { input, max_workers } => {
            let registrants: Vec<Registrant> = match std::fs::read_to_string(&input)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str(&s).map_err(|e| format!("Invalid input: {}", e)))
            {
                Ok(r) => r,
                Err(e) => return fail(e),
            };

            let mut batch_config = config.batch.clone();
            if let Some(n) = max_workers {
                batch_config.max_workers = n;
            }

            let runtime = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => return fail(e),
            };
            let runner = BatchRunner::new(Arc::new(generator), &batch_config);
            let outcomes = runtime.block_on(runner.run(registrants));
            let summary = BatchSummary::from_outcomes(&outcomes);

            print_json(&serde_json::json!({
                "engine_version": ENGINE_VERSION,
                "summary": summary,
                "outcomes": outcomes,
            }));
            if summary.completed == summary.total && summary.incomplete == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Status { payload } => {
            let registrant = match parse_registrant(&payload) {
                Ok(r) => r,
                Err(e) => return reject(e),
            };
            match generator.generate_for_registrant(&registrant) {
                Ok(report) => {
                    print_json(&PassStatus::from_report(&registrant, &report));
                    ExitCode::SUCCESS
                }
                Err(e) => reject(e),
            }
        }

        Commands::Assets => {
            print_json(&generator.assets().inventory());
            ExitCode::SUCCESS
        }
    }
}

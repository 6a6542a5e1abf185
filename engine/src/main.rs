use clap::{Parser, Subcommand};
use common::jobs::JobStatus;
use common::model::validation::PhotoStatus;
use env_logger::Env;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use warranty_engine::services::archive::bundle_archive;
use warranty_engine::services::data_sources::{row_source_for, write_sample};
use warranty_engine::services::photos::staging::StagedPhotos;
use warranty_engine::{CertificateEngine, EngineConfig, JobManifest, PdfRenderer};

/// Warranty certificate generator
///
/// Turns a sheet of branch installations and a set of site photos into one
/// PDF warranty certificate per branch.
#[derive(Parser, Debug)]
#[command(name = "warranty-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Generate certificates for the batch described by a job manifest
    Run {
        /// Job manifest (JSON); relative paths in it resolve against its directory
        manifest: PathBuf,
        /// Engine config (JSON) with font and image settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the blank data template; `.xlsx` gives a workbook, anything else CSV
    Sample {
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { path } => match write_sample(&path) {
            Ok(()) => {
                info!("Sample data file written to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Could not write sample: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Run { manifest, config } => match run(&manifest, config.as_deref()) {
            Ok(0) => {
                error!("No certificates were generated");
                ExitCode::FAILURE
            }
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Generation aborted: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Runs one batch described by a manifest. Returns the number of certificates
/// produced.
fn run(manifest_path: &Path, config_path: Option<&Path>) -> Result<usize, Box<dyn Error>> {
    let config = EngineConfig::load(config_path)?;
    let manifest = JobManifest::load(manifest_path)?;

    let rows = row_source_for(&manifest.data).load_rows()?;
    info!("Loaded {} row(s) from {}", rows.len(), manifest.data.display());

    // Removed again when `photos` goes out of scope, on every return path.
    let photos = StagedPhotos::stage(&manifest.photos)?;
    let engine = CertificateEngine::new(PdfRenderer::new(&config)?);

    fs::create_dir_all(&manifest.output_dir)?;

    let validation = engine.validate(&rows, photos.pool());
    info!("Photo check: {}", validation.summary());
    for entry in &validation.entries {
        match entry.status {
            PhotoStatus::Ready => {}
            PhotoStatus::Missing => warn!(
                "Branch {} type {}: expected photo {} not found",
                entry.branch,
                entry.variant_label,
                entry.expected_photo()
            ),
            PhotoStatus::DataError => warn!(
                "Row {} (branch {}): {}",
                entry.row_index + 1,
                entry.branch,
                entry.detail.as_deref().unwrap_or("unreadable row")
            ),
        }
    }
    serde_json::to_writer_pretty(
        File::create(manifest.output_dir.join("validation.json"))?,
        &validation,
    )?;

    let report = engine.generate_all_with_progress(
        &rows,
        photos.pool(),
        &manifest.output_dir,
        &manifest.branding,
        |status| match status {
            JobStatus::InProgress(percent) => debug!("Progress: {}%", percent),
            JobStatus::Completed(msg) => info!("{}", msg),
            JobStatus::Failed(msg) => error!("{}", msg),
        },
    );

    serde_json::to_writer_pretty(
        File::create(manifest.output_dir.join("summary.json"))?,
        &report.summary(),
    )?;

    if let Some(name) = manifest.archive.as_deref().filter(|_| !report.is_empty()) {
        bundle_archive(&report.produced_paths(), &manifest.output_dir.join(name))?;
    }

    Ok(report.produced_count())
}

// src/bin/validate_bundles.rs
// Offline check that every use-case directory under the models directory
// holds a complete, internally consistent artifact set. Run after
// deploying new artifacts, before routing traffic at them.
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use scoring_lib::config::DEFAULT_MODELS_DIR;
use scoring_lib::registry::artifacts::Calibrator;
use scoring_lib::registry::bundle::UseCaseBundle;

#[derive(Parser, Debug)]
#[command(
    name = "validate_bundles",
    about = "Validate use-case model bundle directories"
)]
struct Args {
    /// Directory of per-use-case model bundles (falls back to MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Only validate these use-case ids (default: every sub-directory)
    #[arg(long)]
    use_case: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();
    let args = Args::parse();

    let models_dir = args
        .models_dir
        .or_else(|| std::env::var("MODELS_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR));

    let use_cases = if args.use_case.is_empty() {
        discover_use_cases(&models_dir)?
    } else {
        args.use_case.clone()
    };

    if use_cases.is_empty() {
        warn!("No use-case directories found under {}", models_dir.display());
        std::process::exit(1);
    }

    let mut failures = 0usize;
    for use_case in &use_cases {
        let dir = models_dir.join(use_case);
        match UseCaseBundle::load(use_case, &dir).await {
            Ok(bundle) => {
                let method = match bundle.calibrator {
                    Calibrator::Sigmoid { .. } => "sigmoid",
                    Calibrator::Isotonic { .. } => "isotonic",
                };
                info!(
                    "{}: {} features, {} trees, {} calibration",
                    use_case,
                    bundle.feature_order.len(),
                    bundle.classifier.trees.len(),
                    method
                );
                println!("{:<8} OK", use_case);
            }
            Err(e) => {
                failures += 1;
                println!("{:<8} FAILED: {}", use_case, e);
            }
        }
    }

    println!(
        "\nValidated {} bundle(s), {} failure(s)",
        use_cases.len(),
        failures
    );
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn discover_use_cases(models_dir: &std::path::Path) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let entries = std::fs::read_dir(models_dir)
        .with_context(|| format!("Failed to read models dir {}", models_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
    }
    ids.sort();
    Ok(ids)
}

// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use scoring_lib::api::{router, AppState};
use scoring_lib::config::ServiceConfig;
use scoring_lib::features::extractor::FeatureExtractor;
use scoring_lib::features::schema::FeatureSchema;
use scoring_lib::registry::store::BundleStore;

#[derive(Parser, Debug)]
#[command(
    name = "scoring_service",
    about = "Calibrated ML risk decisioning service for case management"
)]
struct Args {
    /// Bind host (overrides SCORING_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides SCORING_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Directory of per-use-case model bundles (overrides MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Feature schema artifact (overrides FEATURE_SCHEMA_PATH)
    #[arg(long)]
    schema_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    info!("Starting case scoring service");
    dotenv::dotenv().ok();

    let args = Args::parse();
    let mut config = ServiceConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(models_dir) = args.models_dir {
        config.models_dir = models_dir;
    }
    if let Some(schema_path) = args.schema_path {
        config.schema_path = schema_path;
    }
    config.log_config();

    // The schema is read once here; bundles load lazily on first request.
    let schema =
        FeatureSchema::load(&config.schema_path).context("Failed to load feature schema")?;
    info!(
        "Loaded feature schema {} with {} features",
        schema.version,
        schema.len()
    );

    let extractor = FeatureExtractor::new(Arc::new(schema));
    let store = Arc::new(BundleStore::new(config.models_dir.clone()));
    let state = AppState::new(store, extractor);

    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Server exited with an error")?;
    Ok(())
}

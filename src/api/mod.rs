// src/api/mod.rs
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::features::extractor::FeatureExtractor;
use crate::registry::store::BundleStore;

/// Shared per-process state handed to every handler. The store and the
/// schema-backed extractor live for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BundleStore>,
    pub extractor: FeatureExtractor,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<BundleStore>, extractor: FeatureExtractor) -> Self {
        Self {
            store,
            extractor,
            started_at: Utc::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/ml/score/case-priority", post(handlers::score_case_priority))
        .route("/ml/score/fraud", post(handlers::score_fraud))
        .route("/ml/score/compliance", post(handlers::score_compliance))
        .route(
            "/ml/score/claim-escalation",
            post(handlers::score_claim_escalation),
        )
        .with_state(state)
}

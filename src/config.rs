// src/config.rs
use log::info;
use std::env;
use std::path::PathBuf;

/// Version reported in every response and on the liveness endpoint.
/// Bundles are trained against this version; bump together with retraining.
pub const MODEL_VERSION: &str = "v1.0";

/// Schema artifact shipped alongside the service. Every bundle's
/// feature_order was fixed against this schema version.
pub const DEFAULT_SCHEMA_PATH: &str = "config/feature_schema_v3.json";

/// Directory holding one sub-directory of artifacts per use case.
pub const DEFAULT_MODELS_DIR: &str = "models";

/// How many ranked attributions each response carries.
pub const ATTRIBUTION_TOP_K: usize = 5;

// UC-1: Case Priority
pub const UC1_HIGH_THRESHOLD: f64 = 0.75;
pub const UC1_MEDIUM_THRESHOLD: f64 = 0.40;

// UC-2: Check-in Escalation
pub const UC2_ESCALATE_THRESHOLD: f64 = 0.60;

// UC-3: Incident Routing
pub const UC3_INCIDENT_THRESHOLD: f64 = 0.70;

// UC-5: Email Auto-Send
pub const UC5_SEND_THRESHOLD: f64 = 0.85;
pub const UC5_CONFIDENCE_THRESHOLD: f64 = 0.75;

// UC-6: Complaint Risk
pub const UC6_HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const UC6_MEDIUM_RISK_THRESHOLD: f64 = 0.40;

// UC-7: Fraud Detection
pub const UC7_QUARANTINE_THRESHOLD: f64 = 0.80;

// UC-8: Phishing Detection
pub const UC8_QUARANTINE_THRESHOLD: f64 = 0.85;

// UC-9: Recovery Timeline. Predicted weeks above 1.3x the per-injury
// benchmark flag delayed recovery; the CI is a fixed +/-20% band.
pub const UC9_DELAY_FACTOR: f64 = 1.3;
pub const UC9_CI_LOWER_FACTOR: f64 = 0.8;
pub const UC9_CI_UPPER_FACTOR: f64 = 1.2;

// UC-10: Inherent Requirements Non-Fit
pub const UC10_NONFIT_THRESHOLD: f64 = 0.70;

// UC-11: Work-Relatedness. The unclear band is inclusive on both ends.
pub const UC11_WORK_THRESHOLD: f64 = 0.75;
pub const UC11_UNCLEAR_LOW: f64 = 0.40;
pub const UC11_UNCLEAR_HIGH: f64 = 0.74;

// UC-12: Obligation Compliance
pub const UC12_HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const UC12_MEDIUM_RISK_THRESHOLD: f64 = 0.40;

// UC-13: Claim Escalation
pub const UC13_HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const UC13_MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// Fixed splits of the calibrated negative-class mass into medium/low
/// sub-bands. Per-use-case design constants; reproduce exactly.
pub const UC1_NEGATIVE_SPLIT: (f64, f64) = (0.6, 0.4);
pub const UC12_NEGATIVE_SPLIT: (f64, f64) = (0.3, 0.7);
pub const UC13_NEGATIVE_SPLIT: (f64, f64) = (0.4, 0.6);

/// Phrases that force a manual-review hold regardless of model output.
/// Matched case-insensitively as substrings; first match wins.
pub const LEGAL_THREAT_KEYWORDS: &[&str] = &[
    "lawyer",
    "attorney",
    "legal action",
    "solicitor",
    "defamation",
    "privacy complaint",
    "discrimination",
    "ombudsman",
    "tribunal",
    "sue",
    "lawsuit",
];

/// Runtime paths and bind address, resolved from the environment with
/// CLI overrides applied by the binaries.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub models_dir: PathBuf,
    pub schema_path: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let host = env::var("SCORING_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SCORING_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);
        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR));
        let schema_path = env::var("FEATURE_SCHEMA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCHEMA_PATH));

        Self {
            host,
            port,
            models_dir,
            schema_path,
        }
    }

    pub fn log_config(&self) {
        info!("Service bind address: {}:{}", self.host, self.port);
        info!("Models directory: {}", self.models_dir.display());
        info!("Feature schema: {}", self.schema_path.display());
        info!("Model version: {}", MODEL_VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        env::remove_var("SCORING_HOST");
        env::remove_var("SCORING_PORT");
        env::remove_var("MODELS_DIR");
        env::remove_var("FEATURE_SCHEMA_PATH");

        let config = ServiceConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.models_dir, PathBuf::from(DEFAULT_MODELS_DIR));
    }

    #[test]
    fn test_negative_splits_conserve_mass() {
        for (medium, low) in [UC1_NEGATIVE_SPLIT, UC12_NEGATIVE_SPLIT, UC13_NEGATIVE_SPLIT] {
            assert!((medium + low - 1.0).abs() < 1e-12);
        }
    }
}

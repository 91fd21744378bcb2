// src/registry/bundle.rs
use log::debug;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::errors::{ScoringError, ScoringResult};
use crate::registry::artifacts::{AttributionExplainer, Calibrator, GradientBoostedEnsemble};

pub const MODEL_FILE: &str = "model.json";
pub const CALIBRATOR_FILE: &str = "calibrator.json";
pub const EXPLAINER_FILE: &str = "explainer.json";
pub const FEATURE_ORDER_FILE: &str = "feature_order.json";

pub const REQUIRED_ARTIFACTS: [&str; 4] =
    [MODEL_FILE, CALIBRATOR_FILE, EXPLAINER_FILE, FEATURE_ORDER_FILE];

/// The complete artifact set for one use case. Immutable once loaded and
/// shared read-only across requests; the registry hands it out as an Arc.
#[derive(Debug, Clone)]
pub struct UseCaseBundle {
    pub use_case: String,
    pub classifier: GradientBoostedEnsemble,
    pub calibrator: Calibrator,
    pub explainer: AttributionExplainer,
    pub feature_order: Vec<String>,
}

impl UseCaseBundle {
    /// Read the four co-located artifacts from a use-case directory.
    /// All four must be present; the error lists every missing one so a
    /// single validation pass reveals the full gap.
    pub async fn load(use_case: &str, dir: &Path) -> ScoringResult<Self> {
        let missing: Vec<String> = REQUIRED_ARTIFACTS
            .iter()
            .filter(|name| !dir.join(name).is_file())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ScoringError::BundleIncomplete {
                use_case: use_case.to_string(),
                missing,
            });
        }

        let classifier: GradientBoostedEnsemble =
            read_artifact(use_case, &dir.join(MODEL_FILE)).await?;
        let calibrator: Calibrator = read_artifact(use_case, &dir.join(CALIBRATOR_FILE)).await?;
        let explainer: AttributionExplainer =
            read_artifact(use_case, &dir.join(EXPLAINER_FILE)).await?;
        let feature_order: Vec<String> =
            read_artifact(use_case, &dir.join(FEATURE_ORDER_FILE)).await?;

        let bundle = Self {
            use_case: use_case.to_string(),
            classifier,
            calibrator,
            explainer,
            feature_order,
        };
        bundle.check_consistency(dir)?;
        debug!(
            "Bundle {} holds {} features and {} trees",
            bundle.use_case,
            bundle.feature_order.len(),
            bundle.classifier.trees.len()
        );
        Ok(bundle)
    }

    /// Cross-artifact consistency: the trained feature order must agree
    /// with the classifier and explainer widths, and the artifacts must be
    /// structurally sound.
    fn check_consistency(&self, dir: &Path) -> ScoringResult<()> {
        let width = self.feature_order.len();
        if self.classifier.n_features != width {
            return Err(self.artifact_error(
                dir.join(MODEL_FILE),
                format!(
                    "classifier trained on {} features but feature order lists {}",
                    self.classifier.n_features, width
                ),
            ));
        }
        if let Err(message) = self.classifier.validate() {
            return Err(self.artifact_error(dir.join(MODEL_FILE), message));
        }
        if let Err(message) = self.calibrator.validate() {
            return Err(self.artifact_error(dir.join(CALIBRATOR_FILE), message));
        }
        if let Err(message) = self.explainer.validate() {
            return Err(self.artifact_error(dir.join(EXPLAINER_FILE), message));
        }
        if self.explainer.weights.len() != width {
            return Err(self.artifact_error(
                dir.join(EXPLAINER_FILE),
                format!(
                    "explainer covers {} features but feature order lists {}",
                    self.explainer.weights.len(),
                    width
                ),
            ));
        }
        Ok(())
    }

    /// The only structural validation performed before inference.
    pub fn check_feature_count(&self, got: usize) -> ScoringResult<()> {
        let expected = self.feature_order.len();
        if got != expected {
            return Err(ScoringError::FeatureCountMismatch {
                use_case: self.use_case.clone(),
                got,
                expected,
            });
        }
        Ok(())
    }

    fn artifact_error(&self, path: std::path::PathBuf, message: String) -> ScoringError {
        ScoringError::ArtifactRead {
            use_case: self.use_case.clone(),
            path,
            message,
        }
    }
}

async fn read_artifact<T: DeserializeOwned>(use_case: &str, path: &Path) -> ScoringResult<T> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| ScoringError::ArtifactRead {
            use_case: use_case.to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    serde_json::from_slice(&raw).map_err(|e| ScoringError::ArtifactRead {
        use_case: use_case.to_string(),
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// src/registry/store.rs
use log::info;
use ndarray::{Array1, Axis};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::errors::{ScoringError, ScoringResult};
use crate::features::labels::label_for;
use crate::models::AttributionItem;
use crate::registry::bundle::UseCaseBundle;

/// Calibrated class probabilities (negative class first) plus the raw
/// per-feature attributions aligned to the bundle's feature order,
/// reported with respect to the positive class.
#[derive(Debug, Clone)]
pub struct CalibratedPrediction {
    pub probabilities: Vec<f64>,
    pub attributions: Vec<f64>,
}

impl CalibratedPrediction {
    pub fn negative(&self) -> f64 {
        self.probabilities[0]
    }

    pub fn positive(&self) -> f64 {
        self.probabilities[1]
    }
}

/// Lazy-loading store of use-case bundles, owned by the composition root
/// and shared by handle. Each bundle is loaded at most once per process;
/// failed loads are not memoized, so the use case stays retryable.
pub struct BundleStore {
    models_dir: PathBuf,
    bundles: RwLock<HashMap<String, Arc<UseCaseBundle>>>,
    // One guard per use case so racing first requests serialize on the
    // load without blocking requests for other use cases.
    load_guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    load_attempts: AtomicUsize,
}

impl BundleStore {
    pub fn new(models_dir: PathBuf) -> Self {
        Self {
            models_dir,
            bundles: RwLock::new(HashMap::new()),
            load_guards: Mutex::new(HashMap::new()),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Get the bundle for a use case, loading it on first access.
    pub async fn get_bundle(&self, use_case: &str) -> ScoringResult<Arc<UseCaseBundle>> {
        if let Some(bundle) = self.bundles.read().await.get(use_case) {
            return Ok(bundle.clone());
        }

        let guard = {
            let mut guards = self.load_guards.lock().await;
            guards
                .entry(use_case.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _held = guard.lock().await;

        // A racing request may have finished the load while we waited.
        if let Some(bundle) = self.bundles.read().await.get(use_case) {
            return Ok(bundle.clone());
        }

        let dir = self.models_dir.join(use_case);
        if !dir.is_dir() {
            return Err(ScoringError::UnknownUseCase(use_case.to_string()));
        }

        self.load_attempts.fetch_add(1, Ordering::SeqCst);
        let bundle = Arc::new(UseCaseBundle::load(use_case, &dir).await?);
        self.bundles
            .write()
            .await
            .insert(use_case.to_string(), bundle.clone());
        info!(
            "Loaded bundle for {} ({} features)",
            use_case,
            bundle.feature_order.len()
        );
        Ok(bundle)
    }

    pub async fn is_loaded(&self, use_case: &str) -> bool {
        self.bundles.read().await.contains_key(use_case)
    }

    /// Ids of the bundles currently resident, sorted for stable output.
    pub async fn loaded(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bundles.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of times an actual artifact load was attempted. Reported by
    /// the ops tooling; also pins down the at-most-once load property.
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    pub async fn validate_features(
        &self,
        use_case: &str,
        vector: &Array1<f64>,
    ) -> ScoringResult<()> {
        let bundle = self.get_bundle(use_case).await?;
        bundle.check_feature_count(vector.len())
    }

    /// Calibrated prediction for one feature vector: validates the width,
    /// reshapes to a one-row batch, maps the ensemble margin through the
    /// calibrator, and collects per-feature attributions for that row.
    pub async fn predict(
        &self,
        use_case: &str,
        vector: &Array1<f64>,
    ) -> ScoringResult<CalibratedPrediction> {
        let bundle = self.get_bundle(use_case).await?;
        bundle.check_feature_count(vector.len())?;

        let batch = vector.view().insert_axis(Axis(0));
        let row = batch.row(0);

        let margin = bundle.classifier.raw_margin(row);
        let positive = bundle.calibrator.positive_probability(margin);
        let attributions = bundle.explainer.attributions(row);

        Ok(CalibratedPrediction {
            probabilities: vec![1.0 - positive, positive],
            attributions: attributions.to_vec(),
        })
    }

    /// Rank raw attributions by descending absolute contribution (stable,
    /// so ties keep the original feature order), label them, and keep the
    /// first `top_k`.
    pub async fn top_attributions(
        &self,
        use_case: &str,
        attributions: &[f64],
        vector: &Array1<f64>,
        top_k: usize,
    ) -> ScoringResult<Vec<AttributionItem>> {
        let bundle = self.get_bundle(use_case).await?;

        let mut indices: Vec<usize> = (0..attributions.len()).collect();
        indices.sort_by(|&a, &b| {
            attributions[b]
                .abs()
                .partial_cmp(&attributions[a].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(indices
            .into_iter()
            .take(top_k)
            .map(|i| {
                let name = bundle
                    .feature_order
                    .get(i)
                    .map(|s| s.as_str())
                    .unwrap_or("");
                AttributionItem {
                    feature: label_for(name).to_string(),
                    value: vector.get(i).copied().unwrap_or(0.0),
                    contribution: attributions[i],
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_bundle(dir: &Path, use_case: &str) {
        let uc_dir = dir.join(use_case);
        std::fs::create_dir_all(&uc_dir).unwrap();
        std::fs::write(
            uc_dir.join("model.json"),
            r#"{
                "n_features": 3,
                "base_margin": 0.0,
                "trees": [{"nodes": [
                    {"feature": 0, "threshold": 2.0, "left": 1, "right": 2},
                    {"leaf_value": -1.1},
                    {"leaf_value": 0.9}
                ]}],
                "class_labels": ["stable", "escalates"]
            }"#,
        )
        .unwrap();
        std::fs::write(
            uc_dir.join("calibrator.json"),
            r#"{"method": "sigmoid", "a": -1.0, "b": 0.0}"#,
        )
        .unwrap();
        std::fs::write(
            uc_dir.join("explainer.json"),
            r#"{"baseline": [0.0, 0.0, 0.0], "weights": [0.5, -0.25, 0.1], "expected_value": 0.4}"#,
        )
        .unwrap();
        std::fs::write(
            uc_dir.join("feature_order.json"),
            r#"["days_open", "sla_breaches", "sentiment_compound"]"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_lazy_load_and_memoization() {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "uc_13");
        let store = BundleStore::new(tmp.path().to_path_buf());

        assert!(!store.is_loaded("uc_13").await);
        let first = store.get_bundle("uc_13").await.unwrap();
        let second = store.get_bundle("uc_13").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.load_attempts(), 1);
        assert_eq!(store.loaded().await, vec!["uc_13".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_loads_at_most_once() {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "uc_1");
        let store = Arc::new(BundleStore::new(tmp.path().to_path_buf()));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.predict("uc_1", &array![5.0, 0.0, 0.0]).await
            }));
        }

        let mut positives = Vec::new();
        for handle in handles {
            let prediction = handle.await.unwrap().unwrap();
            positives.push(prediction.positive());
        }

        assert_eq!(store.load_attempts(), 1);
        // Every racing request sees the same calibrated output.
        assert!(positives.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_unknown_use_case() {
        let tmp = TempDir::new().unwrap();
        let store = BundleStore::new(tmp.path().to_path_buf());
        let err = store.get_bundle("uc_99").await.unwrap_err();
        assert!(matches!(err, ScoringError::UnknownUseCase(_)));
    }

    #[tokio::test]
    async fn test_incomplete_bundle_reports_missing_and_stays_retryable() {
        let tmp = TempDir::new().unwrap();
        let uc_dir = tmp.path().join("uc_7");
        std::fs::create_dir_all(&uc_dir).unwrap();
        std::fs::write(uc_dir.join("model.json"), "{}").unwrap();

        let store = BundleStore::new(tmp.path().to_path_buf());
        match store.get_bundle("uc_7").await.unwrap_err() {
            ScoringError::BundleIncomplete { use_case, missing } => {
                assert_eq!(use_case, "uc_7");
                assert_eq!(
                    missing,
                    vec![
                        "calibrator.json".to_string(),
                        "explainer.json".to_string(),
                        "feature_order.json".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!store.is_loaded("uc_7").await);

        // Artifacts appear later; the next request succeeds.
        write_bundle(tmp.path(), "uc_7");
        assert!(store.get_bundle("uc_7").await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_first_access_fails_consistently_without_artifacts() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("uc_7")).unwrap();
        let store = Arc::new(BundleStore::new(tmp.path().to_path_buf()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.get_bundle("uc_7").await }));
        }
        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert!(matches!(err, ScoringError::BundleIncomplete { .. }));
        }
        assert!(!store.is_loaded("uc_7").await);
    }

    #[tokio::test]
    async fn test_feature_count_mismatch_is_a_hard_error() {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "uc_12");
        let store = BundleStore::new(tmp.path().to_path_buf());

        let err = store
            .predict("uc_12", &array![1.0, 2.0])
            .await
            .unwrap_err();
        match err {
            ScoringError::FeatureCountMismatch { got, expected, .. } => {
                assert_eq!(got, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_predict_is_calibrated_and_attributed() {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "uc_13");
        let store = BundleStore::new(tmp.path().to_path_buf());

        let prediction = store
            .predict("uc_13", &array![5.0, 2.0, 0.0])
            .await
            .unwrap();
        // Margin 0.9 through 1/(1+exp(-0.9)).
        assert!((prediction.positive() - 0.710949).abs() < 1e-5);
        assert!((prediction.positive() + prediction.negative() - 1.0).abs() < 1e-12);
        assert_eq!(prediction.attributions, vec![2.5, -0.5, 0.0]);
    }

    #[tokio::test]
    async fn test_top_attributions_ranking_and_labels() {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "uc_13");
        let store = BundleStore::new(tmp.path().to_path_buf());
        store.get_bundle("uc_13").await.unwrap();

        let attributions = vec![0.1, -0.5, 0.3];
        let vector = array![1.0, 2.0, 3.0];
        let top = store
            .top_attributions("uc_13", &attributions, &vector, 2)
            .await
            .unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, "SLA breaches");
        assert_eq!(top[0].contribution, -0.5);
        assert_eq!(top[1].feature, "Overall sentiment");
        assert_eq!(top[1].contribution, 0.3);
    }

    #[tokio::test]
    async fn test_top_attributions_ties_keep_feature_order() {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "uc_13");
        let store = BundleStore::new(tmp.path().to_path_buf());

        let attributions = vec![0.2, -0.2, 0.2];
        let vector = array![1.0, 1.0, 1.0];
        let top = store
            .top_attributions("uc_13", &attributions, &vector, 3)
            .await
            .unwrap();

        assert_eq!(top[0].feature, "Days case open");
        assert_eq!(top[1].feature, "SLA breaches");
        assert_eq!(top[2].feature, "Overall sentiment");
    }
}

// src/registry/artifacts.rs
// Serde representations of the fitted artifacts a bundle is made of.
// These are produced by the offline training pipeline and treated as
// opaque, versioned units here: the runtime only evaluates them.
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// One node of a regression tree, in a flat array indexed by position.
/// Leaves carry `leaf_value`; internal nodes route on
/// `row[feature] < threshold` to `left`, else `right`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: usize,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default)]
    pub leaf_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf. The walk is bounded by the node
    /// count; structural validity is checked once at bundle load.
    fn margin(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0usize;
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[index];
            if let Some(value) = node.leaf_value {
                return value;
            }
            index = if row[node.feature] < node.threshold {
                node.left
            } else {
                node.right
            };
        }
        0.0
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.leaf_value.is_some() {
                continue;
            }
            if node.feature >= n_features {
                return Err(format!(
                    "node {} routes on feature {} but the bundle has {} features",
                    i, node.feature, n_features
                ));
            }
            if node.left >= self.nodes.len() || node.right >= self.nodes.len() {
                return Err(format!("node {} has out-of-range children", i));
            }
        }
        Ok(())
    }
}

/// Fitted binary gradient-boosted tree ensemble. Raw output is an additive
/// margin (base plus every tree's leaf value) for the positive class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub base_margin: f64,
    pub trees: Vec<DecisionTree>,
    /// Class labels in probability order: negative class first.
    pub class_labels: Vec<String>,
}

impl GradientBoostedEnsemble {
    pub fn raw_margin(&self, row: ArrayView1<f64>) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.margin(row)).sum::<f64>()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.class_labels.len() != 2 {
            return Err(format!(
                "expected a binary ensemble, got {} class labels",
                self.class_labels.len()
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

/// Post-hoc probability calibrator fitted on held-out data at training
/// time. Maps the ensemble's raw margin to a positive-class probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Calibrator {
    /// Platt scaling: p = 1 / (1 + exp(a * margin + b)).
    Sigmoid { a: f64, b: f64 },
    /// Piecewise-linear isotonic fit over margin breakpoints.
    Isotonic {
        thresholds: Vec<f64>,
        values: Vec<f64>,
    },
}

impl Calibrator {
    pub fn positive_probability(&self, margin: f64) -> f64 {
        let p = match self {
            Calibrator::Sigmoid { a, b } => 1.0 / (1.0 + (a * margin + b).exp()),
            Calibrator::Isotonic { thresholds, values } => {
                interpolate_step(thresholds, values, margin)
            }
        };
        p.clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            Calibrator::Sigmoid { .. } => Ok(()),
            Calibrator::Isotonic { thresholds, values } => {
                if thresholds.is_empty() || thresholds.len() != values.len() {
                    return Err(format!(
                        "isotonic calibrator has {} thresholds but {} values",
                        thresholds.len(),
                        values.len()
                    ));
                }
                if thresholds.windows(2).any(|w| w[0] > w[1]) {
                    return Err("isotonic thresholds are not sorted".to_string());
                }
                Ok(())
            }
        }
    }
}

fn interpolate_step(thresholds: &[f64], values: &[f64], x: f64) -> f64 {
    if x <= thresholds[0] {
        return values[0];
    }
    let last = thresholds.len() - 1;
    if x >= thresholds[last] {
        return values[last];
    }
    // x falls strictly inside; find the surrounding pair.
    let upper = thresholds.partition_point(|t| *t < x).min(last);
    let lower = upper - 1;
    let span = thresholds[upper] - thresholds[lower];
    if span <= 0.0 {
        return values[upper];
    }
    let fraction = (x - thresholds[lower]) / span;
    values[lower] + fraction * (values[upper] - values[lower])
}

/// Linear surrogate explainer exported at training time. Contribution of
/// feature i is weights[i] * (x_i - baseline[i]), oriented toward the
/// positive class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionExplainer {
    pub baseline: Vec<f64>,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub expected_value: f64,
}

impl AttributionExplainer {
    pub fn attributions(&self, row: ArrayView1<f64>) -> Array1<f64> {
        Array1::from_iter(
            self.weights
                .iter()
                .zip(self.baseline.iter())
                .zip(row.iter())
                .map(|((w, b), x)| w * (x - b)),
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.weights.len() != self.baseline.len() {
            return Err(format!(
                "explainer has {} weights but {} baseline entries",
                self.weights.len(),
                self.baseline.len()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump_ensemble() -> GradientBoostedEnsemble {
        // Single stump: margin 0.9 when feature 0 >= 2.0, else -1.1.
        GradientBoostedEnsemble {
            n_features: 3,
            base_margin: 0.0,
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode {
                        feature: 0,
                        threshold: 2.0,
                        left: 1,
                        right: 2,
                        leaf_value: None,
                    },
                    TreeNode {
                        leaf_value: Some(-1.1),
                        ..leaf_defaults()
                    },
                    TreeNode {
                        leaf_value: Some(0.9),
                        ..leaf_defaults()
                    },
                ],
            }],
            class_labels: vec!["negative".to_string(), "positive".to_string()],
        }
    }

    fn leaf_defaults() -> TreeNode {
        TreeNode {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            leaf_value: None,
        }
    }

    #[test]
    fn test_ensemble_margin_routes_on_threshold() {
        let ensemble = stump_ensemble();
        assert_eq!(ensemble.raw_margin(array![0.0, 0.0, 0.0].view()), -1.1);
        assert_eq!(ensemble.raw_margin(array![5.0, 0.0, 0.0].view()), 0.9);
    }

    #[test]
    fn test_ensemble_validate_rejects_bad_feature_index() {
        let mut ensemble = stump_ensemble();
        ensemble.trees[0].nodes[0].feature = 7;
        assert!(ensemble.validate().is_err());
    }

    #[test]
    fn test_sigmoid_calibrator_is_monotone_and_bounded() {
        let calibrator = Calibrator::Sigmoid { a: -1.5, b: 0.1 };
        let low = calibrator.positive_probability(-3.0);
        let high = calibrator.positive_probability(3.0);
        assert!(low < high);
        assert!((0.0..=1.0).contains(&low));
        assert!((0.0..=1.0).contains(&high));
    }

    #[test]
    fn test_isotonic_calibrator_interpolates_and_clamps() {
        let calibrator = Calibrator::Isotonic {
            thresholds: vec![-2.0, 0.0, 2.0],
            values: vec![0.1, 0.5, 0.9],
        };
        assert_eq!(calibrator.positive_probability(-10.0), 0.1);
        assert_eq!(calibrator.positive_probability(10.0), 0.9);
        let mid = calibrator.positive_probability(1.0);
        assert!((mid - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_isotonic_validate_rejects_unsorted_thresholds() {
        let calibrator = Calibrator::Isotonic {
            thresholds: vec![1.0, -1.0],
            values: vec![0.2, 0.8],
        };
        assert!(calibrator.validate().is_err());
    }

    #[test]
    fn test_explainer_contributions_are_signed() {
        let explainer = AttributionExplainer {
            baseline: vec![1.0, 0.0, 0.0],
            weights: vec![0.5, -2.0, 0.0],
            expected_value: 0.3,
        };
        let contributions = explainer.attributions(array![3.0, 1.0, 9.0].view());
        assert_eq!(contributions[0], 1.0);
        assert_eq!(contributions[1], -2.0);
        assert_eq!(contributions[2], 0.0);
    }
}

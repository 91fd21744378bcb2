// src/features/schema.rs
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Semantic type of a schema feature. The original training data carried
/// int and float columns separately; both behave as Numeric at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Bool,
    #[serde(alias = "int", alias = "float")]
    Numeric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Explicit default; when absent the type default applies
    /// (false for bool, 0.0 for numeric).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
}

impl FeatureSpec {
    pub fn default_value(&self) -> f64 {
        self.default.unwrap_or(0.0)
    }
}

/// The versioned, ordered feature definition every bundle was trained
/// against. Loaded once at process start; immutable afterwards. The
/// declaration order is the canonical vector order for all use cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: String,
    pub features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature schema at {}", path.display()))?;
        let schema: FeatureSchema = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse feature schema at {}", path.display()))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.features {
            if !seen.insert(spec.name.as_str()) {
                bail!("Duplicate feature name in schema: {}", spec.name);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_json() -> &'static str {
        r#"{
            "version": "v3",
            "features": [
                {"name": "days_open", "type": "int"},
                {"name": "sentiment_compound", "type": "float"},
                {"name": "refused_duties_flag", "type": "bool"},
                {"name": "checkin_completion_rate", "type": "float", "default": 1.0}
            ]
        }"#
    }

    #[test]
    fn test_schema_parses_int_and_float_as_numeric() {
        let schema: FeatureSchema = serde_json::from_str(schema_json()).unwrap();
        assert_eq!(schema.version, "v3");
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.features[0].kind, FeatureKind::Numeric);
        assert_eq!(schema.features[1].kind, FeatureKind::Numeric);
        assert_eq!(schema.features[2].kind, FeatureKind::Bool);
    }

    #[test]
    fn test_schema_explicit_default() {
        let schema: FeatureSchema = serde_json::from_str(schema_json()).unwrap();
        assert_eq!(schema.features[3].default_value(), 1.0);
        assert_eq!(schema.features[0].default_value(), 0.0);
    }

    #[test]
    fn test_schema_rejects_duplicate_names() {
        let schema: FeatureSchema = serde_json::from_str(
            r#"{"version": "v3", "features": [
                {"name": "days_open", "type": "int"},
                {"name": "days_open", "type": "int"}
            ]}"#,
        )
        .unwrap();
        assert!(schema.validate().is_err());
    }
}

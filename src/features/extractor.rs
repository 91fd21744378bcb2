// src/features/extractor.rs
use ndarray::Array1;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::features::schema::FeatureSchema;

/// Deterministic mapper from arbitrary request attribute maps onto the
/// fixed-length, schema-ordered feature vector. Total: unknown keys are
/// ignored, missing keys take the schema default, booleans coerce to
/// 0.0/1.0, non-scalar values are skipped.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    schema: Arc<FeatureSchema>,
}

impl FeatureExtractor {
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn extract(&self, attributes: &Map<String, Value>) -> Array1<f64> {
        let values: Vec<f64> = self
            .schema
            .features
            .iter()
            .map(|spec| {
                attributes
                    .get(&spec.name)
                    .and_then(scalar_as_f64)
                    .unwrap_or_else(|| spec.default_value())
            })
            .collect();
        Array1::from_vec(values)
    }

    /// Convenience wrapper for typed requests: serializes the request to a
    /// JSON map and extracts from it, mirroring the request -> attribute
    /// mapping the endpoints perform.
    pub fn extract_from<T: serde::Serialize>(&self, request: &T) -> Array1<f64> {
        match serde_json::to_value(request) {
            Ok(Value::Object(map)) => self.extract(&map),
            _ => self.extract(&Map::new()),
        }
    }
}

fn scalar_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schema::{FeatureKind, FeatureSpec};
    use serde_json::json;

    fn test_schema() -> Arc<FeatureSchema> {
        Arc::new(FeatureSchema {
            version: "v3".to_string(),
            features: vec![
                FeatureSpec {
                    name: "days_open".to_string(),
                    kind: FeatureKind::Numeric,
                    default: None,
                },
                FeatureSpec {
                    name: "refused_duties_flag".to_string(),
                    kind: FeatureKind::Bool,
                    default: None,
                },
                FeatureSpec {
                    name: "checkin_completion_rate".to_string(),
                    kind: FeatureKind::Numeric,
                    default: Some(1.0),
                },
            ],
        })
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_attributes_yield_schema_defaults() {
        let extractor = FeatureExtractor::new(test_schema());
        let vector = extractor.extract(&Map::new());
        assert_eq!(vector.len(), 3);
        assert_eq!(vector.as_slice().unwrap(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_known_keys_overwrite_defaults_in_schema_order() {
        let extractor = FeatureExtractor::new(test_schema());
        let attrs = as_map(json!({
            "refused_duties_flag": true,
            "days_open": 14
        }));
        let vector = extractor.extract(&attrs);
        assert_eq!(vector.as_slice().unwrap(), &[14.0, 1.0, 1.0]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let extractor = FeatureExtractor::new(test_schema());
        let attrs = as_map(json!({
            "days_open": 3,
            "case_id": "C-99",
            "not_a_feature": 42
        }));
        let vector = extractor.extract(&attrs);
        assert_eq!(vector.len(), 3);
        assert_eq!(vector[0], 3.0);
    }

    #[test]
    fn test_non_scalar_values_fall_back_to_defaults() {
        let extractor = FeatureExtractor::new(test_schema());
        let attrs = as_map(json!({
            "days_open": [1, 2, 3],
            "checkin_completion_rate": null
        }));
        let vector = extractor.extract(&attrs);
        assert_eq!(vector.as_slice().unwrap(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = FeatureExtractor::new(test_schema());
        let attrs = as_map(json!({
            "days_open": 7,
            "refused_duties_flag": false
        }));
        let first = extractor.extract(&attrs);
        let second = extractor.extract(&attrs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_vector_length_always_matches_schema() {
        let extractor = FeatureExtractor::new(test_schema());
        for attrs in [
            Map::new(),
            as_map(json!({"days_open": 1})),
            as_map(json!({"days_open": 1, "refused_duties_flag": true, "checkin_completion_rate": 0.5, "extra": 9})),
        ] {
            assert_eq!(extractor.extract(&attrs).len(), 3);
        }
    }
}

// src/features/mod.rs
pub mod extractor;
pub mod labels;
pub mod schema;

pub use extractor::FeatureExtractor;
pub use labels::label_for;
pub use schema::{FeatureKind, FeatureSchema, FeatureSpec};

// src/errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// The closed set of failures the decision pipeline can produce. All of
/// them surface at the transport boundary as a single uniform
/// "Prediction failed" response; no partial decisions are ever returned.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// The use case has a storage directory but one or more of its four
    /// required artifacts is missing. Not memoized: the use case stays
    /// eligible for a load attempt on a later request.
    #[error("bundle incomplete for {use_case}: missing {missing:?}")]
    BundleIncomplete {
        use_case: String,
        missing: Vec<String>,
    },

    /// Vector length disagrees with the trained feature order. Indicates
    /// schema/artifact version skew; never padded or truncated.
    #[error("feature count mismatch for {use_case}: got {got}, expected {expected}")]
    FeatureCountMismatch {
        use_case: String,
        got: usize,
        expected: usize,
    },

    /// The requested use case id has no storage directory at all.
    #[error("unknown use case: {0}")]
    UnknownUseCase(String),

    /// An artifact file exists but could not be read or decoded.
    #[error("failed to read artifact {path} for {use_case}: {message}")]
    ArtifactRead {
        use_case: String,
        path: PathBuf,
        message: String,
    },
}

pub type ScoringResult<T> = Result<T, ScoringError>;

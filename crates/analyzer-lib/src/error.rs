//! Error taxonomy for the inference pipeline
//!
//! Load-time failures never surface here: the registry absorbs them and
//! leaves the affected artifact absent. Request-time failures are typed so
//! callers can map them to a response instead of a plausible-but-wrong
//! number.

use crate::models::ModelIdentity;
use thiserror::Error;

/// Request-time errors returned by the inference engine
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Neither the ensemble nor the best single classifier is loaded;
    /// no prediction can be served at all
    #[error("no usable model loaded; regenerate the model artifacts and restart")]
    NoUsableModel,

    /// The requested model identity did not load at startup
    #[error("model '{0}' is not loaded")]
    ModelUnavailable(ModelIdentity),

    /// The artifact itself failed during predict/predict-probability;
    /// fatal for this request
    #[error("inference failed: {0}")]
    InferenceFailure(#[from] ArtifactError),
}

impl AnalyzerError {
    /// Stable machine-readable tag for the wire error contract
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzerError::NoUsableModel => "no_usable_model",
            AnalyzerError::ModelUnavailable(_) => "model_unavailable",
            AnalyzerError::InferenceFailure(_) => "inference_failure",
        }
    }
}

/// Errors raised by a loaded artifact (classifier or scaler) when fed a
/// vector it cannot handle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("input has {actual} features, artifact expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("voting ensemble has no member classifiers")]
    EmptyEnsemble,

    #[error("nearest-neighbors artifact has no training points")]
    EmptyNeighbors,

    #[error("decision tree references node {0}, which does not exist")]
    CorruptTree(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(AnalyzerError::NoUsableModel.kind(), "no_usable_model");
        assert_eq!(
            AnalyzerError::ModelUnavailable(ModelIdentity::Ensemble).kind(),
            "model_unavailable"
        );
        assert_eq!(
            AnalyzerError::from(ArtifactError::EmptyEnsemble).kind(),
            "inference_failure"
        );
    }

    #[test]
    fn test_model_unavailable_names_the_identity() {
        let err = AnalyzerError::ModelUnavailable(ModelIdentity::BestSingle);
        assert!(err.to_string().contains("best_single"));
    }
}

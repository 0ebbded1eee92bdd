//! Inference orchestration
//!
//! One prediction is one synchronous pass: engineer the features, align
//! them to the active model's expected columns, scale, classify, and bucket
//! the bankruptcy probability into a risk tier. No retries - an artifact
//! error is fatal for the request, because a visible failure beats a
//! silently wrong probability in a risk tool.

use crate::error::AnalyzerError;
use crate::models::{
    EngineeredFeatures, ModelIdentity, Prediction, RawAssessment, RiskTier,
};
use crate::predictor::features::engineer;
use crate::registry::{ModelMetadata, RegistryState};
use std::sync::Arc;
use tracing::warn;

/// Warning attached to predictions computed without the feature scaler
pub const SCALER_UNAVAILABLE_WARNING: &str = "scaler unavailable, results may be degraded";

/// Stateless prediction pipeline over an immutable registry
pub struct InferenceEngine {
    registry: Arc<RegistryState>,
}

impl InferenceEngine {
    pub fn new(registry: Arc<RegistryState>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RegistryState {
        &self.registry
    }

    /// Run one prediction against the selected model
    pub fn predict(
        &self,
        raw: &RawAssessment,
        identity: ModelIdentity,
    ) -> Result<Prediction, AnalyzerError> {
        let model = match self.registry.model(identity) {
            Some(model) => model,
            None if self.registry.is_usable() => {
                return Err(AnalyzerError::ModelUnavailable(identity))
            }
            None => return Err(AnalyzerError::NoUsableModel),
        };

        let features = engineer(raw);
        let aligned = align_columns(&features, model.metadata.as_ref());

        let (vector, degraded) = match self.registry.scaler() {
            Some(scaler) => (scaler.transform(&aligned)?, false),
            None => {
                warn!(model = %identity, "{}", SCALER_UNAVAILABLE_WARNING);
                (aligned, true)
            }
        };

        let label = model.classifier.predict(&vector)?;
        let [bankruptcy_probability, non_bankruptcy_probability] =
            model.classifier.predict_probability(&vector)?;

        Ok(Prediction {
            label,
            bankruptcy_probability,
            non_bankruptcy_probability,
            risk_tier: RiskTier::from_probability(bankruptcy_probability),
            confidence: bankruptcy_probability.max(non_bankruptcy_probability),
            model: identity,
            model_display_name: self.registry.display_name(identity),
            degraded,
            warning: degraded.then(|| SCALER_UNAVAILABLE_WARNING.to_string()),
            generated_at: chrono::Utc::now().timestamp(),
        })
    }
}

/// Build the model input vector. With a metadata feature list the columns
/// follow it by name, unknown names contributing 0.0; without one, all
/// engineered features go in natural order.
fn align_columns(features: &EngineeredFeatures, metadata: Option<&ModelMetadata>) -> Vec<f64> {
    match metadata {
        Some(meta) if !meta.features.is_empty() => meta
            .features
            .iter()
            .map(|name| features.get(name).unwrap_or(0.0))
            .collect(),
        _ => features.values(),
    }
}

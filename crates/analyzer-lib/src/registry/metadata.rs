//! Model metadata artifacts
//!
//! Each classifier artifact ships with a metadata record naming the model,
//! its held-out performance, and the ordered feature list its input vector
//! must follow.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Held-out performance of a trained model, each metric in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Metadata record persisted alongside a classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct ModelMetadata {
    pub model_name: String,
    pub performance: ModelPerformance,
    /// Expected input columns, in order; defines the subset and ordering
    /// of the engineered features fed to the model
    pub features: Vec<String>,
    /// Constituent model names; present only for ensembles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensemble_models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_models: Option<usize>,
    /// "soft" or "hard"; present only for ensembles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_type: Option<String>,
}

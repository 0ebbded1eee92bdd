//! Feature engineering and model inference

mod engine;
mod features;

pub use engine::{InferenceEngine, SCALER_UNAVAILABLE_WARNING};
pub use features::{engineer, COMPOUND_RISK_THRESHOLD};

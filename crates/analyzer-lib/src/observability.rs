//! Observability infrastructure for the analyzer service
//!
//! Provides:
//! - Prometheus metrics (inference latency, prediction counters, loaded
//!   model info)
//! - Structured JSON logging with tracing

use crate::models::{ModelIdentity, Prediction};
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, GaugeVec,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AnalyzerMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct AnalyzerMetricsInner {
    inference_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    degraded_predictions_total: IntCounter,
    models_loaded: IntGauge,
    model_info: GaugeVec,
}

impl AnalyzerMetricsInner {
    fn new() -> Self {
        Self {
            inference_latency_seconds: register_histogram!(
                "risk_analyzer_inference_latency_seconds",
                "Time spent running one bankruptcy prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),

            predictions_total: register_int_counter!(
                "risk_analyzer_predictions_total",
                "Total number of predictions served"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "risk_analyzer_prediction_errors_total",
                "Total number of failed prediction requests"
            )
            .expect("Failed to register prediction_errors_total"),

            degraded_predictions_total: register_int_counter!(
                "risk_analyzer_degraded_predictions_total",
                "Predictions served without the feature scaler"
            )
            .expect("Failed to register degraded_predictions_total"),

            models_loaded: register_int_gauge!(
                "risk_analyzer_models_loaded",
                "Number of model identities that loaded at startup"
            )
            .expect("Failed to register models_loaded"),

            model_info: register_gauge_vec!(
                "risk_analyzer_model_info",
                "Information about a loaded prediction model",
                &["identity", "name"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Analyzer metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct AnalyzerMetrics {
    _private: (),
}

impl Default for AnalyzerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AnalyzerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AnalyzerMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record an inference latency observation
    pub fn observe_inference_latency(&self, duration_secs: f64) {
        self.inner().inference_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_degraded_predictions(&self) {
        self.inner().degraded_predictions_total.inc();
    }

    pub fn set_models_loaded(&self, count: i64) {
        self.inner().models_loaded.set(count);
    }

    /// Record a loaded model's identity and display name
    pub fn set_model_info(&self, identity: ModelIdentity, name: &str) {
        self.inner()
            .model_info
            .with_label_values(&[identity.as_str(), name])
            .set(1.0);
    }
}

/// Structured logger for analyzer events
///
/// Provides consistent JSON-formatted logging for predictions and other
/// significant events.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "analyzer_started",
            service = %self.service_name,
            version = %version,
            "Risk analyzer started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "analyzer_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Risk analyzer shutting down"
        );
    }

    /// Log the registry load summary
    pub fn log_models_loaded(&self, available: &[ModelIdentity], scaler_present: bool) {
        let names: Vec<&str> = available.iter().map(|m| m.as_str()).collect();
        if available.is_empty() {
            error!(
                event = "models_loaded",
                service = %self.service_name,
                models = ?names,
                scaler_present = scaler_present,
                "No usable model loaded; predictions will be refused"
            );
        } else {
            info!(
                event = "models_loaded",
                service = %self.service_name,
                models = ?names,
                scaler_present = scaler_present,
                "Model artifacts loaded"
            );
        }
    }

    /// Log a served prediction
    pub fn log_prediction(&self, prediction: &Prediction) {
        if prediction.degraded {
            warn!(
                event = "prediction_generated",
                service = %self.service_name,
                model = %prediction.model,
                model_display_name = %prediction.model_display_name,
                bankruptcy_probability = prediction.bankruptcy_probability,
                risk_tier = %prediction.risk_tier,
                degraded = true,
                "Generated degraded bankruptcy prediction"
            );
        } else {
            info!(
                event = "prediction_generated",
                service = %self.service_name,
                model = %prediction.model,
                model_display_name = %prediction.model_display_name,
                bankruptcy_probability = prediction.bankruptcy_probability,
                risk_tier = %prediction.risk_tier,
                degraded = false,
                "Generated bankruptcy prediction"
            );
        }
    }

    /// Log a failed prediction request
    pub fn log_prediction_failed(&self, model: Option<ModelIdentity>, kind: &str, message: &str) {
        error!(
            event = "prediction_failed",
            service = %self.service_name,
            model = ?model.map(|m| m.as_str()),
            kind = %kind,
            message = %message,
            "Prediction request failed"
        );
    }
}

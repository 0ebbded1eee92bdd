//! HTTP API for predictions, model listing, health checks and metrics

use analyzer_lib::{
    error::AnalyzerError,
    health::{ComponentStatus, HealthRegistry},
    models::{ModelIdentity, RawAssessment},
    observability::{AnalyzerMetrics, StructuredLogger},
    predictor::InferenceEngine,
    registry::ModelPerformance,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub health_registry: HealthRegistry,
    pub metrics: AnalyzerMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        engine: Arc<InferenceEngine>,
        health_registry: HealthRegistry,
        metrics: AnalyzerMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            engine,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Prediction request: six ratings plus an optional model selection
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub industrial_risk: f64,
    pub management_risk: f64,
    pub financial_flexibility: f64,
    pub credibility: f64,
    pub competitiveness: f64,
    pub operating_risk: f64,
    #[serde(default)]
    pub model: Option<ModelIdentity>,
}

impl PredictRequest {
    fn assessment(&self) -> RawAssessment {
        RawAssessment {
            industrial_risk: self.industrial_risk,
            management_risk: self.management_risk,
            financial_flexibility: self.financial_flexibility,
            credibility: self.credibility,
            competitiveness: self.competitiveness,
            operating_risk: self.operating_risk,
        }
    }
}

/// Wire error contract: a stable kind tag plus a human-readable message
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ErrorBody {
    fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

fn error_response(err: &AnalyzerError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        AnalyzerError::NoUsableModel | AnalyzerError::ModelUnavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AnalyzerError::InferenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorBody::new(err.kind(), err.to_string())))
}

/// Run one prediction
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> impl IntoResponse {
    let raw = request.assessment();
    let invalid = raw.invalid_fields();
    if !invalid.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::new(
                "invalid_rating",
                format!(
                    "ratings must be one of 0.0, 0.5, 1.0; invalid: {}",
                    invalid.join(", ")
                ),
            )),
        )
            .into_response();
    }

    let identity = match request
        .model
        .or_else(|| state.engine.registry().default_identity())
    {
        Some(identity) => identity,
        None => {
            let err = AnalyzerError::NoUsableModel;
            state.metrics.inc_prediction_errors();
            state
                .logger
                .log_prediction_failed(None, err.kind(), &err.to_string());
            return error_response(&err).into_response();
        }
    };

    let start = Instant::now();
    match state.engine.predict(&raw, identity) {
        Ok(prediction) => {
            state
                .metrics
                .observe_inference_latency(start.elapsed().as_secs_f64());
            state.metrics.inc_predictions();
            if prediction.degraded {
                state.metrics.inc_degraded_predictions();
            }
            state.logger.log_prediction(&prediction);
            (StatusCode::OK, Json(prediction)).into_response()
        }
        Err(err) => {
            state.metrics.inc_prediction_errors();
            state
                .logger
                .log_prediction_failed(Some(identity), err.kind(), &err.to_string());
            error_response(&err).into_response()
        }
    }
}

/// One loaded model in the listing
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub identity: ModelIdentity,
    pub display_name: String,
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<ModelPerformance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ensemble_models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_type: Option<String>,
}

/// Response of the model listing endpoint
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ModelIdentity>,
    pub scaler_loaded: bool,
}

/// List the loaded models and their metadata
async fn models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let registry = state.engine.registry();
    let default = registry.default_identity();

    let models: Vec<ModelInfo> = registry
        .available()
        .into_iter()
        .filter_map(|identity| {
            registry.model(identity).map(|loaded| {
                let metadata = loaded.metadata.as_ref();
                ModelInfo {
                    identity,
                    display_name: registry.display_name(identity),
                    default: default == Some(identity),
                    model_name: metadata.map(|m| m.model_name.clone()),
                    performance: metadata.map(|m| m.performance),
                    feature_count: metadata.map(|m| m.features.len()),
                    ensemble_models: metadata
                        .map(|m| m.ensemble_models.clone())
                        .unwrap_or_default(),
                    voting_type: metadata.and_then(|m| m.voting_type.clone()),
                }
            })
        })
        .collect();

    Json(ModelsResponse {
        models,
        default,
        scaler_loaded: registry.scaler().is_some(),
    })
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/models", get(models))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

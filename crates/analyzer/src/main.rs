//! Risk Analyzer - bankruptcy prediction service
//!
//! Loads the trained model artifacts once at startup, then serves
//! predictions, model listings, health and metrics over HTTP.

use analyzer_lib::{
    health::{components, ComponentHealth, HealthRegistry},
    observability::{AnalyzerMetrics, StructuredLogger},
    predictor::InferenceEngine,
    registry::ModelRegistry,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const ANALYZER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting risk-analyzer");

    // Load configuration
    let config = config::AnalyzerConfig::load()?;
    info!(
        models_dir = %config.models_dir,
        api_port = config.api_port,
        "Analyzer configured"
    );

    // Load model artifacts once; the resulting state is immutable and
    // shared read-only by every request for the process lifetime
    let registry_state = Arc::new(ModelRegistry::new(config.registry_config()).load());

    // Initialize health registry; the registry component reflects what
    // actually loaded
    let health_registry = HealthRegistry::new();
    health_registry.register(components::PREDICTOR).await;
    health_registry.register(components::API).await;
    health_registry
        .update(
            components::REGISTRY,
            ComponentHealth::from_registry_state(&registry_state),
        )
        .await;

    // Initialize metrics
    let metrics = AnalyzerMetrics::new();
    metrics.set_models_loaded(registry_state.available().len() as i64);
    for identity in registry_state.available() {
        metrics.set_model_info(identity, &registry_state.display_name(identity));
    }

    // Initialize structured logger
    let logger = StructuredLogger::new("risk-analyzer");
    logger.log_startup(ANALYZER_VERSION);
    logger.log_models_loaded(
        &registry_state.available(),
        registry_state.scaler().is_some(),
    );

    let engine = Arc::new(InferenceEngine::new(registry_state));

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        engine,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark initialized; with no usable model the unhealthy registry
    // component keeps readiness false
    health_registry.set_ready(true).await;

    // Start the API server
    let _api_server = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}

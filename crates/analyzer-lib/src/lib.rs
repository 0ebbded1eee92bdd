//! Core library for bankruptcy risk analysis
//!
//! This crate provides the core functionality for:
//! - Feature engineering over qualitative risk ratings
//! - One-time loading of trained model artifacts
//! - Bankruptcy probability inference and risk tiering
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod registry;

pub use error::{AnalyzerError, ArtifactError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{AnalyzerMetrics, StructuredLogger};
pub use predictor::InferenceEngine;
pub use registry::{ModelRegistry, RegistryConfig, RegistryState};

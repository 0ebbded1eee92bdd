//! Health check infrastructure for the analyzer service
//!
//! Tracks per-component health and readiness. The registry component is
//! derived from the loaded model state: no usable model is unhealthy (the
//! service refuses predictions), a missing scaler is degraded.

use crate::registry::RegistryState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is operational with reduced quality
    Degraded,
    /// Component has failed
    Unhealthy,
}

/// Information about a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: ComponentStatus::Healthy,
            message: None,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Degraded,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unhealthy,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Health of the registry component as implied by the loaded state
    pub fn from_registry_state(state: &RegistryState) -> Self {
        if !state.is_usable() {
            Self::unhealthy("no usable model loaded")
        } else if state.scaler().is_none() {
            Self::degraded("feature scaler unavailable, predictions degraded")
        } else {
            Self::healthy()
        }
    }
}

/// Overall health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Worst component status wins
    pub fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        let mut has_degraded = false;

        for health in components.values() {
            match health.status {
                ComponentStatus::Unhealthy => return ComponentStatus::Unhealthy,
                ComponentStatus::Degraded => has_degraded = true,
                ComponentStatus::Healthy => {}
            }
        }

        if has_degraded {
            ComponentStatus::Degraded
        } else {
            ComponentStatus::Healthy
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const REGISTRY: &str = "registry";
    pub const PREDICTOR: &str = "predictor";
    pub const API: &str = "api";
}

/// Health registry for tracking component health
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with initial healthy status
    pub async fn register(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    /// Update component health status
    pub async fn update(&self, name: &str, health: ComponentHealth) {
        let mut components = self.components.write().await;
        components.insert(name.to_string(), health);
    }

    pub async fn set_healthy(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::degraded(message)).await;
    }

    pub async fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(message)).await;
    }

    /// Set readiness status
    pub async fn set_ready(&self, ready: bool) {
        let mut r = self.ready.write().await;
        *r = ready;
    }

    /// Get health response
    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        let status = HealthResponse::compute_status(&components);
        HealthResponse { status, components }
    }

    /// Get readiness response. Not ready until initialized, and never ready
    /// while a critical component is unhealthy.
    pub async fn readiness(&self) -> ReadinessResponse {
        let ready = *self.ready.read().await;
        let health = self.health().await;

        if !ready {
            ReadinessResponse {
                ready: false,
                reason: Some("Analyzer not yet initialized".to_string()),
            }
        } else if health.status == ComponentStatus::Unhealthy {
            ReadinessResponse {
                ready: false,
                reason: Some("Critical component unhealthy".to_string()),
            }
        } else {
            ReadinessResponse {
                ready: true,
                reason: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Classifier, LoadedModel, LogisticRegression, MinMaxScaler};

    fn loaded_model() -> LoadedModel {
        LoadedModel {
            classifier: Classifier::Logistic(LogisticRegression {
                weights: vec![1.0],
                intercept: 0.0,
            }),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_registry_starts_empty_and_healthy() {
        let registry = HealthRegistry::new();
        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());
    }

    #[tokio::test]
    async fn test_degraded_component_degrades_overall_status() {
        let registry = HealthRegistry::new();
        registry.register(components::REGISTRY).await;
        registry.register(components::PREDICTOR).await;
        registry
            .set_degraded(components::REGISTRY, "feature scaler unavailable")
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_unhealthy_component_dominates() {
        let registry = HealthRegistry::new();
        registry.register(components::REGISTRY).await;
        registry.register(components::API).await;
        registry
            .set_unhealthy(components::REGISTRY, "no usable model loaded")
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_not_ready_until_initialized() {
        let registry = HealthRegistry::new();
        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert!(readiness.reason.is_some());
    }

    #[tokio::test]
    async fn test_ready_after_set() {
        let registry = HealthRegistry::new();
        registry.set_ready(true).await;
        assert!(registry.readiness().await.ready);
    }

    #[tokio::test]
    async fn test_unhealthy_blocks_readiness() {
        let registry = HealthRegistry::new();
        registry.register(components::REGISTRY).await;
        registry.set_ready(true).await;
        registry
            .set_unhealthy(components::REGISTRY, "no usable model loaded")
            .await;

        assert!(!registry.readiness().await.ready);
    }

    #[test]
    fn test_registry_state_maps_to_component_health() {
        let unusable = RegistryState::new(None, None, None);
        assert_eq!(
            ComponentHealth::from_registry_state(&unusable).status,
            ComponentStatus::Unhealthy
        );

        let no_scaler = RegistryState::new(Some(loaded_model()), None, None);
        assert_eq!(
            ComponentHealth::from_registry_state(&no_scaler).status,
            ComponentStatus::Degraded
        );

        let full = RegistryState::new(
            Some(loaded_model()),
            None,
            Some(MinMaxScaler {
                data_min: vec![0.0],
                data_range: vec![1.0],
            }),
        );
        assert_eq!(
            ComponentHealth::from_registry_state(&full).status,
            ComponentStatus::Healthy
        );
    }
}

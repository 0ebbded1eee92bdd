//! API client for communicating with the risk-analyzer service

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

/// Typed error payload returned by the analyzer API
#[derive(Debug, Clone, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: String,
    pub message: String,
}

/// API client for the risk-analyzer service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::handle(response, false).await
    }

    /// Make a GET request, parsing the body even on a 503 - health
    /// endpoints report their payload alongside an unavailable status
    pub async fn get_allow_unavailable<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::handle(response, true).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::handle(response, false).await
    }

    async fn handle<T: DeserializeOwned>(response: Response, lenient: bool) -> Result<T> {
        let status = response.status();
        if status.is_success() || (lenient && status == reqwest::StatusCode::SERVICE_UNAVAILABLE) {
            let bytes = response.bytes().await.context("Failed to read response")?;
            return serde_json::from_slice(&bytes).context("Failed to parse response");
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => Err(api_error.into()),
            Err(_) => anyhow::bail!("API error ({}): {}", status, body),
        }
    }
}

// API request/response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub industrial_risk: f64,
    pub management_risk: f64,
    pub financial_flexibility: f64,
    pub credibility: f64,
    pub competitiveness: f64,
    pub operating_risk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub bankruptcy_probability: f64,
    pub non_bankruptcy_probability: f64,
    pub risk_tier: String,
    pub confidence: f64,
    pub model: String,
    pub model_display_name: String,
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub generated_at: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub identity: String,
    pub display_name: String,
    pub default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<ModelPerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensemble_models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub scaler_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, ComponentHealth>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction_json() -> String {
        serde_json::json!({
            "label": "bankruptcy",
            "bankruptcy_probability": 0.82,
            "non_bankruptcy_probability": 0.18,
            "risk_tier": "HIGH",
            "confidence": 0.82,
            "model": "ensemble",
            "model_display_name": "Ensemble (7 Models)",
            "degraded": false,
            "generated_at": 1735000000,
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_post_predict_parses_prediction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/predict")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(prediction_json())
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let request = PredictRequest {
            industrial_risk: 1.0,
            management_risk: 1.0,
            financial_flexibility: 0.0,
            credibility: 0.0,
            competitiveness: 0.0,
            operating_risk: 1.0,
            model: Some("ensemble".to_string()),
        };
        let prediction: Prediction = client.post("/api/v1/predict", &request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(prediction.risk_tier, "HIGH");
        assert!((prediction.bankruptcy_probability - 0.82).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_api_error_payload_surfaces_kind() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/predict")
            .with_status(503)
            .with_body(r#"{"kind":"no_usable_model","message":"no usable model loaded"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let request = PredictRequest {
            industrial_risk: 0.5,
            management_risk: 0.5,
            financial_flexibility: 0.5,
            credibility: 0.5,
            competitiveness: 0.5,
            operating_risk: 0.5,
            model: None,
        };
        let err = client
            .post::<Prediction, _>("/api/v1/predict", &request)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no_usable_model"));
    }

    #[tokio::test]
    async fn test_health_parses_on_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/healthz")
            .with_status(503)
            .with_body(
                r#"{"status":"unhealthy","components":{"registry":{"status":"unhealthy","message":"no usable model loaded","last_check_timestamp":0}}}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health: HealthResponse = client.get_allow_unavailable("/healthz").await.unwrap();
        assert_eq!(health.status, "unhealthy");
        assert!(health.components.contains_key("registry"));
    }

    #[tokio::test]
    async fn test_models_listing_with_absent_optional_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/models")
            .with_status(200)
            .with_body(
                r#"{"models":[{"identity":"best_single","display_name":"KNN","default":true}],"default":"best_single","scaler_loaded":false}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let listing: ModelsResponse = client.get("/api/v1/models").await.unwrap();
        assert_eq!(listing.models.len(), 1);
        assert!(listing.models[0].performance.is_none());
        assert!(listing.models[0].ensemble_models.is_empty());
        assert!(!listing.scaler_loaded);
    }
}

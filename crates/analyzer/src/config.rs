//! Analyzer service configuration

use analyzer_lib::registry::{RegistryConfig, DEFAULT_LEGACY_ENSEMBLE_PATH};
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Analyzer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory holding the trained model artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Legacy root-level fallback location of the ensemble artifact
    #[serde(default = "default_legacy_ensemble_path")]
    pub legacy_ensemble_path: String,

    /// API server port for predictions, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_legacy_ensemble_path() -> String {
    DEFAULT_LEGACY_ENSEMBLE_PATH.to_string()
}

fn default_api_port() -> u16 {
    8080
}

impl AnalyzerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ANALYZER"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| AnalyzerConfig {
            models_dir: default_models_dir(),
            legacy_ensemble_path: default_legacy_ensemble_path(),
            api_port: default_api_port(),
        }))
    }

    /// Artifact paths for the model registry
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            models_dir: PathBuf::from(&self.models_dir),
            legacy_ensemble_path: PathBuf::from(&self.legacy_ensemble_path),
        }
    }
}

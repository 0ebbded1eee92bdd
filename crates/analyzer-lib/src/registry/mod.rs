//! Model registry
//!
//! Loads the trained artifacts once at process start and holds them as
//! immutable shared state for the process lifetime. Every load failure is
//! absorbed here: the error is logged with full detail and the slot stays
//! empty, so a broken artifact degrades availability instead of crashing
//! startup. Only the no-model-at-all case makes the registry unusable.

mod artifact;
mod loader;
mod metadata;
mod scaler;

pub use artifact::{
    Classifier, DecisionTree, LogisticRegression, NearestNeighbors, TreeNode, VotingClassifier,
    VotingKind, VotingMember,
};
pub use metadata::{ModelMetadata, ModelPerformance};
pub use scaler::MinMaxScaler;

use crate::models::ModelIdentity;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Canonical artifact file names inside the models directory
pub const ENSEMBLE_MODEL_FILE: &str = "ensemble_model.bin";
pub const ENSEMBLE_METADATA_FILE: &str = "ensemble_metadata.bin";
pub const BEST_MODEL_METADATA_FILE: &str = "model_metadata.bin";
pub const SCALER_FILE: &str = "feature_scaler.bin";

/// File-name prefix of the best-single-model artifact
pub const BEST_MODEL_PREFIX: &str = "best_model_";

/// Legacy root-level location of the ensemble artifact, kept for files
/// produced before the models directory existed
pub const DEFAULT_LEGACY_ENSEMBLE_PATH: &str = "bankruptcy_ensemble_model.bin";

/// Where the registry looks for artifacts
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub models_dir: PathBuf,
    pub legacy_ensemble_path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            legacy_ensemble_path: PathBuf::from(DEFAULT_LEGACY_ENSEMBLE_PATH),
        }
    }
}

/// A classifier together with the metadata record that shipped with it
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub classifier: Classifier,
    pub metadata: Option<ModelMetadata>,
}

/// Immutable result of one registry load. Shared read-only across all
/// prediction requests; never mutated after construction.
#[derive(Debug, Default)]
pub struct RegistryState {
    ensemble: Option<LoadedModel>,
    best_single: Option<LoadedModel>,
    scaler: Option<MinMaxScaler>,
}

impl RegistryState {
    pub fn new(
        ensemble: Option<LoadedModel>,
        best_single: Option<LoadedModel>,
        scaler: Option<MinMaxScaler>,
    ) -> Self {
        Self {
            ensemble,
            best_single,
            scaler,
        }
    }

    pub fn model(&self, identity: ModelIdentity) -> Option<&LoadedModel> {
        match identity {
            ModelIdentity::Ensemble => self.ensemble.as_ref(),
            ModelIdentity::BestSingle => self.best_single.as_ref(),
        }
    }

    pub fn scaler(&self) -> Option<&MinMaxScaler> {
        self.scaler.as_ref()
    }

    /// False iff both model identities are absent; an unusable registry
    /// refuses every prediction
    pub fn is_usable(&self) -> bool {
        self.ensemble.is_some() || self.best_single.is_some()
    }

    /// Identities that actually loaded
    pub fn available(&self) -> Vec<ModelIdentity> {
        let mut identities = Vec::new();
        if self.ensemble.is_some() {
            identities.push(ModelIdentity::Ensemble);
        }
        if self.best_single.is_some() {
            identities.push(ModelIdentity::BestSingle);
        }
        identities
    }

    /// Identity used when a request does not name one: the ensemble when
    /// loaded, otherwise the best single model
    pub fn default_identity(&self) -> Option<ModelIdentity> {
        if self.ensemble.is_some() {
            Some(ModelIdentity::Ensemble)
        } else if self.best_single.is_some() {
            Some(ModelIdentity::BestSingle)
        } else {
            None
        }
    }

    /// Human-readable name for a model identity, derived from its metadata
    pub fn display_name(&self, identity: ModelIdentity) -> String {
        let metadata = self.model(identity).and_then(|m| m.metadata.as_ref());
        match identity {
            ModelIdentity::Ensemble => match metadata {
                Some(meta) => {
                    let members = meta.num_models.unwrap_or(meta.ensemble_models.len());
                    if members > 0 {
                        format!("Ensemble ({} Models)", members)
                    } else {
                        meta.model_name.clone()
                    }
                }
                None => "Ensemble Model".to_string(),
            },
            ModelIdentity::BestSingle => metadata
                .map(|meta| meta.model_name.clone())
                .unwrap_or_else(|| "Best Single Model".to_string()),
        }
    }
}

/// One-shot loader for the registry state
pub struct ModelRegistry {
    config: RegistryConfig,
}

impl ModelRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Load every artifact, absorbing per-artifact failures. Never fails
    /// itself; callers check `RegistryState::is_usable` for the fatal
    /// no-model condition.
    pub fn load(&self) -> RegistryState {
        let ensemble_classifier = self.load_ensemble_classifier();
        let best_classifier = self.load_best_classifier();
        let ensemble_metadata = self.load_metadata(ENSEMBLE_METADATA_FILE, "ensemble metadata");
        let best_metadata = self.load_metadata(BEST_MODEL_METADATA_FILE, "best-model metadata");
        let scaler = self.load_scaler();

        let state = RegistryState::new(
            ensemble_classifier.map(|classifier| LoadedModel {
                classifier,
                metadata: ensemble_metadata,
            }),
            best_classifier.map(|classifier| LoadedModel {
                classifier,
                metadata: best_metadata,
            }),
            scaler,
        );

        if !state.is_usable() {
            error!(
                models_dir = %self.config.models_dir.display(),
                "no usable model loaded; predictions cannot be served until \
                 the model artifacts are regenerated"
            );
        } else {
            let available: Vec<&str> =
                state.available().iter().map(|m| m.as_str()).collect();
            info!(models = ?available, "model registry loaded");
        }
        if state.scaler.is_none() {
            warn!("feature scaler unavailable; predictions will run on unscaled features");
        }

        state
    }

    fn load_ensemble_classifier(&self) -> Option<Classifier> {
        let canonical = self.config.models_dir.join(ENSEMBLE_MODEL_FILE);
        let path = if canonical.exists() {
            canonical
        } else if self.config.legacy_ensemble_path.exists() {
            info!(
                path = %self.config.legacy_ensemble_path.display(),
                "ensemble artifact found at legacy path"
            );
            self.config.legacy_ensemble_path.clone()
        } else {
            warn!(
                path = %canonical.display(),
                "ensemble model artifact not found"
            );
            return None;
        };
        self.load_artifact::<Classifier>(&path, "ensemble classifier")
    }

    fn load_best_classifier(&self) -> Option<Classifier> {
        let path = match loader::find_best_model_file(&self.config.models_dir) {
            Ok(Some(path)) => path,
            Ok(None) => {
                warn!(
                    models_dir = %self.config.models_dir.display(),
                    prefix = BEST_MODEL_PREFIX,
                    "no best-single-model artifact found"
                );
                return None;
            }
            Err(err) => {
                error!(error = ?err, "could not scan models directory");
                return None;
            }
        };
        self.load_artifact::<Classifier>(&path, "best single classifier")
    }

    fn load_metadata(&self, file_name: &str, what: &'static str) -> Option<ModelMetadata> {
        let path = self.config.models_dir.join(file_name);
        if !path.exists() {
            warn!(path = %path.display(), "{} artifact not found", what);
            return None;
        }
        self.load_artifact::<ModelMetadata>(&path, what)
    }

    fn load_scaler(&self) -> Option<MinMaxScaler> {
        let path = self.config.models_dir.join(SCALER_FILE);
        if !path.exists() {
            warn!(path = %path.display(), "feature scaler artifact not found");
            return None;
        }
        self.load_artifact::<MinMaxScaler>(&path, "feature scaler")
    }

    fn load_artifact<T>(&self, path: &Path, what: &'static str) -> Option<T>
    where
        T: bincode::Decode<()> + serde::de::DeserializeOwned,
    {
        let result = loader::read_artifact(path).and_then(|bytes| {
            let value = loader::decode_artifact::<T>(&bytes, path)?;
            info!(
                artifact = what,
                path = %path.display(),
                size = bytes.len(),
                checksum = %loader::checksum(&bytes),
                "loaded artifact"
            );
            Ok(value)
        });
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                error!(
                    artifact = what,
                    path = %path.display(),
                    error = ?err,
                    "failed to load artifact; continuing without it"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_classifier() -> Classifier {
        Classifier::Logistic(LogisticRegression {
            weights: vec![1.0, -1.0],
            intercept: 0.0,
        })
    }

    fn write_bincode<T: bincode::Encode>(path: &Path, value: &T) {
        let bytes = bincode::encode_to_vec(value, bincode::config::standard()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    fn config_for(dir: &TempDir) -> RegistryConfig {
        RegistryConfig {
            models_dir: dir.path().to_path_buf(),
            legacy_ensemble_path: dir.path().join("legacy").join(DEFAULT_LEGACY_ENSEMBLE_PATH),
        }
    }

    fn metadata_fixture(name: &str) -> ModelMetadata {
        ModelMetadata {
            model_name: name.to_string(),
            performance: ModelPerformance {
                accuracy: 0.9,
                precision: 0.9,
                recall: 0.9,
                f1_score: 0.9,
            },
            features: vec!["industrial_risk".to_string(), "compound_risk".to_string()],
            ensemble_models: vec![],
            num_models: None,
            voting_type: None,
        }
    }

    #[test]
    fn test_empty_directory_is_unusable() {
        let dir = TempDir::new().unwrap();
        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(!state.is_usable());
        assert!(state.available().is_empty());
        assert_eq!(state.default_identity(), None);
    }

    #[test]
    fn test_loads_ensemble_from_canonical_path() {
        let dir = TempDir::new().unwrap();
        write_bincode(&dir.path().join(ENSEMBLE_MODEL_FILE), &test_classifier());

        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(state.is_usable());
        assert_eq!(state.default_identity(), Some(ModelIdentity::Ensemble));
        assert!(state.model(ModelIdentity::BestSingle).is_none());
    }

    #[test]
    fn test_loads_ensemble_from_legacy_path() {
        let dir = TempDir::new().unwrap();
        let legacy_dir = dir.path().join("legacy");
        std::fs::create_dir(&legacy_dir).unwrap();
        write_bincode(
            &legacy_dir.join(DEFAULT_LEGACY_ENSEMBLE_PATH),
            &test_classifier(),
        );

        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(state.model(ModelIdentity::Ensemble).is_some());
    }

    #[test]
    fn test_discovers_best_model_by_prefix() {
        let dir = TempDir::new().unwrap();
        write_bincode(&dir.path().join("best_model_knn.bin"), &test_classifier());

        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(state.model(ModelIdentity::BestSingle).is_some());
        assert_eq!(state.default_identity(), Some(ModelIdentity::BestSingle));
    }

    #[test]
    fn test_json_artifact_loads_via_fallback_decoder() {
        let dir = TempDir::new().unwrap();
        let json = serde_json::to_vec(&test_classifier()).unwrap();
        std::fs::write(dir.path().join(ENSEMBLE_MODEL_FILE), json).unwrap();

        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(state.model(ModelIdentity::Ensemble).is_some());
    }

    #[test]
    fn test_corrupt_artifact_leaves_slot_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(ENSEMBLE_MODEL_FILE), b"\xff\xfegarbage").unwrap();
        write_bincode(&dir.path().join("best_model_knn.bin"), &test_classifier());

        // Loading continues past the corrupt ensemble
        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(state.model(ModelIdentity::Ensemble).is_none());
        assert!(state.model(ModelIdentity::BestSingle).is_some());
        assert!(state.is_usable());
    }

    #[test]
    fn test_metadata_attaches_to_its_model() {
        let dir = TempDir::new().unwrap();
        write_bincode(&dir.path().join("best_model_knn.bin"), &test_classifier());
        write_bincode(
            &dir.path().join(BEST_MODEL_METADATA_FILE),
            &metadata_fixture("KNN"),
        );

        let state = ModelRegistry::new(config_for(&dir)).load();
        let model = state.model(ModelIdentity::BestSingle).unwrap();
        assert_eq!(model.metadata.as_ref().unwrap().model_name, "KNN");
        assert_eq!(state.display_name(ModelIdentity::BestSingle), "KNN");
    }

    #[test]
    fn test_scaler_loads_alongside_models() {
        let dir = TempDir::new().unwrap();
        write_bincode(&dir.path().join(ENSEMBLE_MODEL_FILE), &test_classifier());
        write_bincode(
            &dir.path().join(SCALER_FILE),
            &MinMaxScaler {
                data_min: vec![0.0, 0.0],
                data_range: vec![1.0, 1.0],
            },
        );

        let state = ModelRegistry::new(config_for(&dir)).load();
        assert!(state.scaler().is_some());
    }

    #[test]
    fn test_ensemble_display_name_counts_members() {
        let mut meta = metadata_fixture("Soft Voting Ensemble");
        meta.ensemble_models = vec![
            "logistic_regression".to_string(),
            "knn".to_string(),
            "decision_tree".to_string(),
        ];
        meta.num_models = Some(7);
        meta.voting_type = Some("soft".to_string());

        let state = RegistryState::new(
            Some(LoadedModel {
                classifier: test_classifier(),
                metadata: Some(meta),
            }),
            None,
            None,
        );
        assert_eq!(
            state.display_name(ModelIdentity::Ensemble),
            "Ensemble (7 Models)"
        );
    }

    #[test]
    fn test_display_names_without_metadata() {
        let state = RegistryState::new(
            Some(LoadedModel {
                classifier: test_classifier(),
                metadata: None,
            }),
            Some(LoadedModel {
                classifier: test_classifier(),
                metadata: None,
            }),
            None,
        );
        assert_eq!(state.display_name(ModelIdentity::Ensemble), "Ensemble Model");
        assert_eq!(
            state.display_name(ModelIdentity::BestSingle),
            "Best Single Model"
        );
    }

    #[test]
    fn test_ensemble_preferred_as_default() {
        let state = RegistryState::new(
            Some(LoadedModel {
                classifier: test_classifier(),
                metadata: None,
            }),
            Some(LoadedModel {
                classifier: test_classifier(),
                metadata: None,
            }),
            None,
        );
        assert_eq!(state.default_identity(), Some(ModelIdentity::Ensemble));
    }
}

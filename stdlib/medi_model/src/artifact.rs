//! Loading persisted model artifacts

use crate::backend::{Classifier, InvalidModel};
use crate::backends::{LogisticArtifact, LogisticModel, RandomForestArtifact, RandomForestModel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading a model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    Invalid(#[from] InvalidModel),
}

/// A persisted model, tagged by backend kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForestArtifact),
    Logistic(LogisticArtifact),
}

impl ModelArtifact {
    /// Validate the artifact and build its classifier
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ArtifactError> {
        let model: Arc<dyn Classifier> = match self {
            ModelArtifact::RandomForest(a) => {
                Arc::new(RandomForestModel::from_artifact(a)?)
            }
            ModelArtifact::Logistic(a) => {
                Arc::new(LogisticModel::from_artifact(a)?)
            }
        };
        Ok(model)
    }
}

pub fn model_from_json(s: &str) -> Result<Arc<dyn Classifier>, ArtifactError> {
    serde_json::from_str::<ModelArtifact>(s)?.into_classifier()
}

/// Read and validate a model artifact from disk
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Classifier>, ArtifactError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = model_from_json(&text)?;
    match model.metadata() {
        Some(meta) => log::info!(
            "loaded {} model '{}' v{} ({} features) from {}",
            model.backend_name(),
            meta.name,
            meta.version,
            model.n_features(),
            path.display()
        ),
        None => log::info!(
            "loaded {} model ({} features) from {}",
            model.backend_name(),
            model.n_features(),
            path.display()
        ),
    }
    Ok(model)
}

//! Patient readmission prediction service.
//!
//! Raw patient attributes arrive over HTTP, are reconciled onto the
//! trained schema by `medi_features`, and scored by a `medi_model`
//! classifier loaded once per process.

pub mod artifacts;
pub mod config;
pub mod http;
pub mod service;

pub use artifacts::{ArtifactStatus, ArtifactStore, LoadError, ServingArtifacts};
pub use config::{load_config, parse_config, ConfigError, LoadMode, ServiceConfig};
pub use http::{router, AppState};
pub use service::{InferenceService, PredictionResult, ServiceError};

/// Build the service described by `config`; artifacts are not read yet.
pub fn service_from_config(config: &ServiceConfig) -> Result<InferenceService, ConfigError> {
    let fields = config.feature_set()?;
    let store = ArtifactStore::from_paths(
        config.artifacts.model.clone(),
        config.artifacts.schema.clone(),
    );
    Ok(InferenceService::new(fields, store))
}

//! Model capability for Medi serving
//!
//! Provides the [`Classifier`] trait consumed by the inference path,
//! JSON model artifacts with versioned metadata, and the backends that
//! evaluate them (random forest, logistic).

pub mod artifact;
pub mod backend;
pub mod backends;
pub mod metadata;

pub use artifact::{load_model, model_from_json, ArtifactError, ModelArtifact};
pub use backend::{
    ClassLabelError, ClassLabels, Classifier, InvalidModel, ModelError, TreeError, POSITIVE_CLASS,
};
pub use backends::{LogisticModel, RandomForestModel};
pub use metadata::{ModelMetadata, ModelVersion};

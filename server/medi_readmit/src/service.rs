//! The inference path: validate, encode, reconcile, build, predict.

use medi_features::{validate_record, FeatureError, FeatureSet, RawRecord};
use medi_features::{build_vector, encode_categorical, reconcile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::artifacts::{ArtifactStatus, ArtifactStore};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Request body must be a JSON object: {0}")]
    MalformedRequest(String),
    #[error("Missing required feature: {0}")]
    MissingFeature(String),
    #[error("{0}")]
    InvalidFeatureType(String),
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Internal reconciliation error: {0}")]
    ReconciliationInternal(String),
}

impl ServiceError {
    /// Whether the caller can fix the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::MalformedRequest(_)
                | ServiceError::MissingFeature(_)
                | ServiceError::InvalidFeatureType(_)
        )
    }
}

impl From<FeatureError> for ServiceError {
    fn from(e: FeatureError) -> Self {
        match e {
            FeatureError::MissingFeature(field) => ServiceError::MissingFeature(field),
            e @ FeatureError::InvalidFeatureType { .. } => {
                ServiceError::InvalidFeatureType(e.to_string())
            }
            FeatureError::Reconciliation(msg) => ServiceError::ReconciliationInternal(msg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub readmission_prediction: i64,
    pub probability: f64,
}

pub struct InferenceService {
    fields: FeatureSet,
    artifacts: ArtifactStore,
}

impl InferenceService {
    pub fn new(fields: FeatureSet, artifacts: ArtifactStore) -> Self {
        Self { fields, artifacts }
    }

    pub fn fields(&self) -> &FeatureSet {
        &self.fields
    }

    pub fn artifact_status(&self) -> ArtifactStatus {
        self.artifacts.status()
    }

    /// Force the one-time artifact load; used at startup in eager mode.
    pub fn warm_up(&self) -> Result<(), ServiceError> {
        self.artifacts
            .get()
            .map(|_| ())
            .map_err(|e| ServiceError::ModelUnavailable(e.to_string()))
    }

    pub fn predict(&self, body: &Value) -> Result<PredictionResult, ServiceError> {
        match body {
            Value::Object(record) => self.predict_record(record),
            other => Err(ServiceError::MalformedRequest(format!(
                "got {}",
                match other {
                    Value::Array(_) => "an array",
                    Value::Null => "null",
                    _ => "a scalar",
                }
            ))),
        }
    }

    pub fn predict_record(&self, record: &RawRecord) -> Result<PredictionResult, ServiceError> {
        // Client errors are reported without touching the artifacts.
        let validated = validate_record(record, &self.fields)?;

        let artifacts = self
            .artifacts
            .get()
            .map_err(|e| ServiceError::ModelUnavailable(e.to_string()))?;
        let schema = artifacts.schema();

        let encoded = encode_categorical(&validated);
        let reconciled = reconcile(&encoded, validated.numeric(), schema);
        let vector = build_vector(&reconciled, schema)?;

        let model = artifacts.model();
        let label = model
            .predict(vector.as_slice())
            .map_err(|e| ServiceError::ModelUnavailable(e.to_string()))?;
        let probability = model
            .predict_probability(vector.as_slice())
            .map_err(|e| ServiceError::ModelUnavailable(e.to_string()))?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ServiceError::ModelUnavailable(format!(
                "model returned probability {probability} outside [0, 1]"
            )));
        }

        Ok(PredictionResult {
            readmission_prediction: label,
            probability,
        })
    }
}

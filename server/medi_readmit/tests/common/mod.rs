#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use medi_features::{FeatureSet, TrainedSchema};
use medi_model::{Classifier, ModelError};
use medi_readmit::{ArtifactStore, InferenceService, ServingArtifacts};
use parking_lot::Mutex;

pub const COLUMNS: &[&str] = &[
    "Age",
    "Days_Hospitalized",
    "Gender_F",
    "Gender_M",
    "Blood Type_A",
    "Blood Type_B",
];

/// Fixed-output classifier that records every vector it is shown
pub struct StubModel {
    pub label: i64,
    pub probability: f64,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<Vec<f64>>>,
}

impl StubModel {
    pub fn new(label: i64, probability: f64) -> Arc<Self> {
        Arc::new(Self {
            label,
            probability,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubModel {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(features.to_vec());
        Ok(self.label)
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(features.to_vec());
        Ok(self.probability)
    }

    fn n_features(&self) -> usize {
        COLUMNS.len()
    }

    fn backend_name(&self) -> &str {
        "stub"
    }
}

pub fn schema() -> TrainedSchema {
    TrainedSchema::new(COLUMNS.iter().map(|c| c.to_string()).collect()).expect("schema")
}

pub fn service_with(model: Arc<StubModel>) -> InferenceService {
    let artifacts = ServingArtifacts::new(schema(), model).expect("artifacts");
    InferenceService::new(FeatureSet::readmission(), ArtifactStore::preloaded(artifacts))
}

pub fn degraded_service() -> InferenceService {
    let store = ArtifactStore::with_loader(|| {
        let model: Arc<dyn Classifier> = StubModel::new(0, 0.5);
        ServingArtifacts::new(
            TrainedSchema::new(vec!["Age".into()]).expect("schema"),
            model,
        )
    });
    InferenceService::new(FeatureSet::readmission(), store)
}

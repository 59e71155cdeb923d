//! Classifier capability and error types for model inference

use crate::metadata::ModelMetadata;
use thiserror::Error;

/// Label of the positive ("readmitted") class in binary artifacts.
pub const POSITIVE_CLASS: i64 = 1;

/// Errors that can occur while running a classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Inference failed: {0}")]
    InferenceError(String),
}

/// Problems with a declared class list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassLabelError {
    #[error("a classifier needs at least two classes, got {0}")]
    TooFew(usize),
    #[error("duplicate class label {0}")]
    Duplicate(i64),
    #[error("positive class {positive} not among classes {labels:?}")]
    MissingPositive { positive: i64, labels: Vec<i64> },
}

/// Structural defects found while building a classifier from its parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidModel {
    #[error(transparent)]
    Classes(#[from] ClassLabelError),
    #[error("model declares zero input features")]
    NoFeatures,
    #[error("forest has no trees")]
    NoTrees,
    #[error("tree {tree}: {source}")]
    Tree {
        tree: usize,
        #[source]
        source: TreeError,
    },
    #[error("logistic model is binary, got {0} classes")]
    NotBinary(usize),
    #[error("model has non-finite parameters")]
    NonFiniteParameters,
}

/// Defects in a single flattened decision tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("node {node} splits on feature {feature} but the model has {n_features}")]
    FeatureOutOfRange {
        node: usize,
        feature: usize,
        n_features: usize,
    },
    #[error("node {0} has a non-finite threshold")]
    NonFiniteThreshold(usize),
    #[error("node {node} has invalid child index {child}")]
    InvalidChild { node: usize, child: usize },
    #[error("leaf {node} has {found} class weights, expected {expected}")]
    LeafWidth {
        node: usize,
        found: usize,
        expected: usize,
    },
    #[error("leaf {0} has a negative or non-finite weight")]
    BadWeight(usize),
    #[error("leaf {0} has an all-zero distribution")]
    ZeroDistribution(usize),
}

/// Pluggable classifier trait.
///
/// Implementations are immutable once constructed so a single instance can
/// be shared across request threads.
pub trait Classifier: Send + Sync {
    /// Predicted class label for one feature vector
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError>;

    /// Probability of the positive class, in `[0, 1]`
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Number of input features the model was trained on
    fn n_features(&self) -> usize;

    /// Get backend name/identifier
    fn backend_name(&self) -> &str;

    fn metadata(&self) -> Option<&ModelMetadata> {
        None
    }
}

/// Ordered class labels with the positive class index pinned at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    labels: Vec<i64>,
    positive_index: usize,
}

impl ClassLabels {
    /// Validate `labels` and locate `positive` within them.
    pub fn new(labels: Vec<i64>, positive: i64) -> Result<Self, ClassLabelError> {
        if labels.len() < 2 {
            return Err(ClassLabelError::TooFew(labels.len()));
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(ClassLabelError::Duplicate(*label));
            }
        }
        let found = labels.iter().position(|&l| l == positive);
        let Some(positive_index) = found else {
            return Err(ClassLabelError::MissingPositive { positive, labels });
        };
        Ok(Self {
            labels,
            positive_index,
        })
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positive_index(&self) -> usize {
        self.positive_index
    }

    pub fn positive_label(&self) -> i64 {
        self.labels[self.positive_index]
    }

    pub fn label_at(&self, index: usize) -> Option<i64> {
        self.labels.get(index).copied()
    }
}

pub(crate) fn check_width(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::InvalidInput(format!(
            "input length {} != model width {}",
            features.len(),
            expected
        )));
    }
    if let Some(i) = features.iter().position(|x| !x.is_finite()) {
        return Err(ModelError::InvalidInput(format!(
            "feature {i} is not finite"
        )));
    }
    Ok(())
}

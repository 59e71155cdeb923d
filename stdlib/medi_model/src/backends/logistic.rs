//! Logistic model: p = sigmoid(W·x + b)

use crate::backend::{check_width, ClassLabels, Classifier, InvalidModel, ModelError, POSITIVE_CLASS};
use crate::metadata::ModelMetadata;
use serde::{Deserialize, Serialize};

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// On-disk form of a logistic model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

fn default_classes() -> Vec<i64> {
    vec![0, POSITIVE_CLASS]
}

/// Binary logistic classifier; predicts the positive class at p >= 0.5
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
    classes: ClassLabels,
    metadata: Option<ModelMetadata>,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, InvalidModel> {
        Self::from_artifact(LogisticArtifact {
            weights,
            bias,
            classes: default_classes(),
            metadata: None,
        })
    }

    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, InvalidModel> {
        if artifact.classes.len() != 2 {
            return Err(InvalidModel::NotBinary(artifact.classes.len()));
        }
        let classes = ClassLabels::new(artifact.classes, POSITIVE_CLASS)?;
        if artifact.weights.is_empty() {
            return Err(InvalidModel::NoFeatures);
        }
        if !artifact.bias.is_finite() || artifact.weights.iter().any(|w| !w.is_finite()) {
            return Err(InvalidModel::NonFiniteParameters);
        }
        Ok(Self {
            weights: artifact.weights,
            bias: artifact.bias,
            classes,
            metadata: artifact.metadata,
        })
    }

    fn negative_label(&self) -> i64 {
        // binary: the other index
        self.classes.labels()[1 - self.classes.positive_index()]
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let p = self.predict_probability(features)?;
        Ok(if p >= 0.5 {
            self.classes.positive_label()
        } else {
            self.negative_label()
        })
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_width(self.weights.len(), features)?;
        let dot: f64 = features
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias;
        Ok(sigmoid(dot))
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn backend_name(&self) -> &str {
        "logistic"
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn logistic_infer() {
        let model = LogisticModel::new(vec![0.5, 1.5, -1.0], 0.25).unwrap();
        // z = 0.5*2.0 + 1.5*(-1.0) + (-1.0)*0.5 + 0.25 = -0.75
        let p = model.predict_probability(&[2.0, -1.0, 0.5]).unwrap();
        assert_abs_diff_eq!(p, sigmoid(-0.75), epsilon = 1e-12);
        assert_eq!(model.predict(&[2.0, -1.0, 0.5]).unwrap(), 0);
        assert_eq!(model.predict(&[4.0, 0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn zero_logit_is_positive() {
        let model = LogisticModel::new(vec![1.0], 0.0).unwrap();
        assert_abs_diff_eq!(model.predict_probability(&[0.0]).unwrap(), 0.5);
        assert_eq!(model.predict(&[0.0]).unwrap(), 1);
    }

    #[test]
    fn reversed_class_order() {
        let model = LogisticModel::from_artifact(LogisticArtifact {
            weights: vec![-10.0],
            bias: 0.0,
            classes: vec![1, 0],
            metadata: None,
        })
        .unwrap();
        assert_eq!(model.predict(&[1.0]).unwrap(), 0);
        assert_eq!(model.predict(&[-1.0]).unwrap(), 1);
    }

    #[test]
    fn rejects_multiclass_and_empty() {
        let err = LogisticModel::from_artifact(LogisticArtifact {
            weights: vec![1.0],
            bias: 0.0,
            classes: vec![0, 1, 2],
            metadata: None,
        })
        .unwrap_err();
        assert_eq!(err, InvalidModel::NotBinary(3));
        assert_eq!(
            LogisticModel::new(vec![], 0.0).unwrap_err(),
            InvalidModel::NoFeatures
        );
        assert_eq!(
            LogisticModel::new(vec![f64::INFINITY], 0.0).unwrap_err(),
            InvalidModel::NonFiniteParameters
        );
    }
}

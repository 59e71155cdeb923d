//! Random forest classifier evaluated from a flattened-tree JSON artifact.
//!
//! Each tree is a node array rooted at index 0. Split nodes send a sample
//! left when `x[feature] <= threshold`; leaves hold a class distribution
//! aligned with the forest's `classes`. Children always sit after their
//! parent in the array, which keeps every traversal finite.

use crate::backend::{
    check_width, ClassLabels, Classifier, InvalidModel, ModelError, TreeError, POSITIVE_CLASS,
};
use crate::metadata::ModelMetadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// On-disk form of a random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestArtifact {
    pub classes: Vec<i64>,
    pub n_features: usize,
    pub trees: Vec<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn new(nodes: Vec<TreeNode>, n_features: usize, n_classes: usize) -> Result<Self, TreeError> {
        if nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        for (i, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(TreeError::FeatureOutOfRange {
                            node: i,
                            feature: *feature,
                            n_features,
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(TreeError::NonFiniteThreshold(i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= nodes.len() {
                            return Err(TreeError::InvalidChild { node: i, child });
                        }
                    }
                }
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(TreeError::LeafWidth {
                            node: i,
                            found: distribution.len(),
                            expected: n_classes,
                        });
                    }
                    if distribution.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(TreeError::BadWeight(i));
                    }
                    if distribution.iter().sum::<f64>() <= 0.0 {
                        return Err(TreeError::ZeroDistribution(i));
                    }
                }
            }
        }
        Ok(Self { nodes })
    }

    fn leaf(&self, features: &[f64]) -> Result<&[f64], ModelError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { distribution }) => return Ok(distribution),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        ModelError::InferenceError(format!("feature {feature} out of range"))
                    })?;
                    index = if *x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::InferenceError(format!(
                        "tree node {index} does not exist"
                    )))
                }
            }
        }
    }
}

/// Ensemble of decision trees; probabilities are the mean of the
/// normalised leaf distributions.
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    classes: ClassLabels,
    n_features: usize,
    trees: Vec<DecisionTree>,
    metadata: Option<ModelMetadata>,
}

impl RandomForestModel {
    pub fn from_artifact(artifact: RandomForestArtifact) -> Result<Self, InvalidModel> {
        let classes = ClassLabels::new(artifact.classes, POSITIVE_CLASS)?;
        if artifact.n_features == 0 {
            return Err(InvalidModel::NoFeatures);
        }
        if artifact.trees.is_empty() {
            return Err(InvalidModel::NoTrees);
        }
        let trees = artifact
            .trees
            .into_iter()
            .enumerate()
            .map(|(t, nodes)| {
                DecisionTree::new(nodes, artifact.n_features, classes.len())
                    .map_err(|source| InvalidModel::Tree { tree: t, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            classes,
            n_features: artifact.n_features,
            trees,
            metadata: artifact.metadata,
        })
    }

    /// Mean class distribution across all trees
    pub fn predict_distribution(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.n_features, features)?;
        let mut acc = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(features)?;
            let total: f64 = leaf.iter().sum();
            for (a, w) in acc.iter_mut().zip(leaf) {
                *a += w / total;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter_mut().for_each(|a| *a /= n);
        Ok(acc)
    }
}

impl Classifier for RandomForestModel {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let dist = self.predict_distribution(features)?;
        let mut best = 0;
        for (i, p) in dist.iter().enumerate() {
            if *p > dist[best] {
                best = i;
            }
        }
        self.classes
            .label_at(best)
            .ok_or_else(|| ModelError::InferenceError(format!("no class at index {best}")))
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        let dist = self.predict_distribution(features)?;
        Ok(dist[self.classes.positive_index()])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn backend_name(&self) -> &str {
        "random_forest"
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }
}

//! Backend implementations for the supported model artifact kinds

pub mod forest;
pub mod logistic;

pub use forest::{RandomForestArtifact, RandomForestModel, TreeNode};
pub use logistic::{LogisticArtifact, LogisticModel};

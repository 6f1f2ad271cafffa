//! Random forest classifier loaded from a JSON artifact.
//!
//! Trees use the flat parallel-array layout common to tree exporters: node
//! `i` is a leaf when `children_left[i] == -1`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left.

use std::path::Path;

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::UrlClassifier;
use crate::artifacts::{self, ArtifactFormat};
use crate::error::{ensure_width, ArtifactError, MismatchStage, Result};

const LEAF: i64 = -1;

/// A single fitted decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions), one entry per class.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("tree node arrays differ in length".to_string());
        }

        for node in 0..n {
            if self.value[node].len() != n_classes {
                return Err(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    self.value[node].len(),
                    n_classes
                ));
            }

            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if self.value[node].iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {} has invalid class weights", node));
                }
                continue;
            }

            // Children always follow their parent, which rules out cycles.
            let in_range = |child: i64| child > node as i64 && (child as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {} has out-of-range children", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} of {}",
                    node, feature, n_features
                ));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }
        Ok(())
    }

    /// Walks the tree and returns the leaf's class weights.
    fn leaf_weights(&self, sample: ArrayView1<'_, f64>) -> &[f64] {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return &self.value[node];
            }
            // Trees are fit on float32 inputs.
            let x = sample[self.feature[node] as usize] as f32 as f64;
            node = if x <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

/// `random_forest` artifact body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestArtifact {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl ArtifactFormat for ForestArtifact {
    const KIND: &'static str = "random_forest";
}

/// Ensemble of decision trees voting by averaged class probabilities.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    /// Creates a forest, validating every tree against the feature count
    /// and class list.
    pub fn new(
        n_features: usize,
        classes: Vec<i64>,
        trees: Vec<DecisionTree>,
    ) -> std::result::Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::Invalid("forest has no classes".to_string()));
        }
        if trees.is_empty() {
            return Err(ArtifactError::Invalid("forest has no trees".to_string()));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(n_features, classes.len())
                .map_err(|e| ArtifactError::Invalid(format!("tree {}: {}", i, e)))?;
        }

        Ok(Self {
            n_features,
            classes,
            trees,
        })
    }

    /// Loads a `random_forest` artifact.
    pub fn load(
        path: &Path,
        pinned_digest: Option<&str>,
    ) -> std::result::Result<Self, ArtifactError> {
        let artifact: ForestArtifact = artifacts::read_artifact(path, pinned_digest)?;
        let forest = Self::new(artifact.n_features, artifact.classes, artifact.trees)?;
        tracing::debug!(
            path = %path.display(),
            trees = forest.trees.len(),
            n_features = forest.n_features,
            "Loaded random forest"
        );
        Ok(forest)
    }

    /// Averaged class probabilities for one sample.
    pub fn predict_proba(&self, sample: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
        ensure_width(MismatchStage::Classifier, self.n_features, sample.len())?;

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let weights = tree.leaf_weights(sample);
            let total: f64 = weights.iter().sum();
            if total > 0.0 {
                for (p, w) in proba.iter_mut().zip(weights) {
                    *p += w / total;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    fn predict_one(&self, sample: ArrayView1<'_, f64>) -> Result<i64> {
        let proba = self.predict_proba(sample)?;
        // First maximum wins on ties.
        let best = proba
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if *p > proba[best] { i } else { best });
        Ok(self.classes[best])
    }
}

impl UrlClassifier for RandomForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        samples
            .rows()
            .into_iter()
            .map(|row| self.predict_one(row))
            .collect()
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}

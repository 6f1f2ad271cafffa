//! Phishing classification of assembled feature vectors.
//!
//! [`UrlClassifier`] is the seam between the pipeline and a trained model.
//! Two implementations ship with the crate: a JSON-serialized random forest
//! and, with the `ml` feature, an ONNX session.

mod adapter;
mod forest;
mod label;
mod onnx;

use ndarray::ArrayView2;

pub use adapter::classify;
pub use forest::{DecisionTree, RandomForestClassifier};
pub use label::Label;
pub use onnx::{OnnxClassifier, OnnxConfig};

use crate::error::Result;

/// Trait for trained binary URL classifiers.
///
/// Implementations must be safe to share across threads; the bundle holding
/// them is read-only after load.
pub trait UrlClassifier: Send + Sync {
    /// Number of features each sample row must have.
    fn n_features(&self) -> usize;

    /// Predicts one class code per row of `samples`.
    fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Vec<i64>>;

    /// Returns the name of this classifier for logging/debugging.
    fn name(&self) -> &'static str;
}

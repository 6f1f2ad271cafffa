//! ONNX classifier backend.
//!
//! Runs an exported model through ONNX Runtime. The model takes a float32
//! tensor of shape `[rows, n_features]` and returns one int64 class code per
//! row.

use std::path::PathBuf;
#[cfg(feature = "ml")]
use std::sync::Mutex;

use ndarray::ArrayView2;

use super::UrlClassifier;
#[cfg(feature = "ml")]
use crate::artifacts;
use crate::error::{ArtifactError, InferenceError, Result};
#[cfg(feature = "ml")]
use crate::error::{ensure_width, MismatchStage};

/// Configuration for the ONNX classifier.
#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Expected input width.
    pub n_features: usize,
    /// Optional pinned SHA-256 digest of the model file.
    pub digest: Option<String>,
    /// Name of the input tensor.
    pub input_name: String,
    /// Name of the class-code output tensor.
    pub output_name: String,
    /// Threads used within a single inference.
    pub intra_threads: usize,
}

impl OnnxConfig {
    pub fn new(model_path: impl Into<PathBuf>, n_features: usize) -> Self {
        Self {
            model_path: model_path.into(),
            n_features,
            digest: None,
            input_name: "float_input".to_string(),
            output_name: "label".to_string(),
            intra_threads: 1,
        }
    }

    pub fn with_digest(mut self, digest: Option<String>) -> Self {
        self.digest = digest;
        self
    }
}

/// Classifier backed by an ONNX Runtime session.
///
/// Sessions need exclusive access to run, so calls are serialized behind a
/// mutex.
#[cfg(feature = "ml")]
pub struct OnnxClassifier {
    session: Mutex<ort::session::Session>,
    config: OnnxConfig,
}

#[cfg(feature = "ml")]
impl OnnxClassifier {
    /// Loads the model, verifying its digest when one is pinned.
    pub fn new(config: OnnxConfig) -> std::result::Result<Self, ArtifactError> {
        use ort::session::{builder::GraphOptimizationLevel, Session};

        let bytes = artifacts::read_verified(&config.model_path, config.digest.as_deref())?;
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .commit_from_memory(&bytes)?;

        tracing::debug!(
            path = %config.model_path.display(),
            n_features = config.n_features,
            "Loaded ONNX classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            config,
        })
    }

    /// Attempts to load the classifier, returning None on any failure.
    pub fn try_load(config: OnnxConfig) -> Option<Self> {
        Self::new(config).ok()
    }
}

#[cfg(feature = "ml")]
impl UrlClassifier for OnnxClassifier {
    fn n_features(&self) -> usize {
        self.config.n_features
    }

    fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        use ort::value::Tensor;

        let (rows, cols) = samples.dim();
        ensure_width(MismatchStage::Classifier, self.config.n_features, cols)?;

        let data: Vec<f32> = samples.iter().map(|&x| x as f32).collect();
        let input = Tensor::from_array(([rows, cols], data.into_boxed_slice()))
            .map_err(|e| InferenceError::Model(format!("Failed to build input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Model("ONNX session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![self.config.input_name.as_str() => input])
            .map_err(|e| InferenceError::Model(e.to_string()))?;

        let (_, codes) = outputs[self.config.output_name.as_str()]
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::Model(format!("Failed to extract labels: {}", e)))?;
        Ok(codes.to_vec())
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}

/// Stub classifier when the ML feature is not enabled.
#[cfg(not(feature = "ml"))]
pub struct OnnxClassifier {
    config: OnnxConfig,
}

#[cfg(not(feature = "ml"))]
impl OnnxClassifier {
    /// Always fails: ONNX support is compiled out.
    pub fn new(_config: OnnxConfig) -> std::result::Result<Self, ArtifactError> {
        Err(ArtifactError::MlNotEnabled)
    }

    pub fn try_load(_config: OnnxConfig) -> Option<Self> {
        None
    }
}

#[cfg(not(feature = "ml"))]
impl UrlClassifier for OnnxClassifier {
    fn n_features(&self) -> usize {
        self.config.n_features
    }

    fn predict(&self, _samples: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        Err(InferenceError::Model(ArtifactError::MlNotEnabled.to_string()))
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}

//! Error types for artifact loading and inference.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::artifacts::ArtifactKind;

/// Errors that can occur while reading a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Artifact file not found.
    #[error("Artifact file not found: {0}")]
    NotFound(PathBuf),

    /// IO error while reading the artifact.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope names a different artifact kind.
    #[error("Expected a {expected} artifact, found {found:?}")]
    WrongKind {
        expected: &'static str,
        found: String,
    },

    /// The format version is not valid semver.
    #[error("Invalid format version {0:?}: {1}")]
    InvalidVersion(String, #[source] semver::Error),

    /// The format version is outside the supported range.
    #[error("Unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion {
        found: semver::Version,
        supported: semver::VersionReq,
    },

    /// The artifact bytes do not hash to the pinned digest.
    #[error("Digest mismatch for {path}: expected {expected}, got {actual}")]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The artifact parsed but its contents are inconsistent.
    #[error("Invalid artifact: {0}")]
    Invalid(String),

    /// ONNX runtime error.
    #[cfg(feature = "ml")]
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),

    /// ML feature not enabled.
    #[error("ML feature not enabled - rebuild with --features ml")]
    MlNotEnabled,
}

/// The point in the pipeline where a width check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchStage {
    /// Text vectorizer output row.
    Vectorizer,
    /// Scaled numeric block.
    Scaler,
    /// Assembled vector against the classifier's input width.
    Classifier,
}

impl fmt::Display for MismatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MismatchStage::Vectorizer => "vectorizer",
            MismatchStage::Scaler => "scaler",
            MismatchStage::Classifier => "classifier",
        };
        f.write_str(name)
    }
}

/// Errors surfaced to callers of the inference pipeline.
///
/// Malformed or empty URLs are not errors; they degrade to zeroed
/// structural features instead.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// A model artifact could not be loaded.
    #[error("Failed to load {artifact} artifact: {source}")]
    ArtifactLoad {
        artifact: ArtifactKind,
        #[source]
        source: ArtifactError,
    },

    /// A vector width disagrees with what the trained model expects.
    #[error("Dimension mismatch at {stage}: expected {expected}, got {actual}")]
    DimensionMismatch {
        stage: MismatchStage,
        expected: usize,
        actual: usize,
    },

    /// The classifier returned a class code with no label.
    #[error("Unrecognized class code from classifier: {0}")]
    UnrecognizedClass(i64),

    /// A collaborator failed while transforming or predicting.
    #[error("Model error: {0}")]
    Model(String),
}

impl InferenceError {
    /// Wraps an artifact error with the kind of artifact being loaded.
    pub fn artifact(artifact: ArtifactKind) -> impl FnOnce(ArtifactError) -> Self {
        move |source| InferenceError::ArtifactLoad { artifact, source }
    }

    /// Returns a short machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            InferenceError::ArtifactLoad { .. } => "artifact_error",
            InferenceError::DimensionMismatch { .. } => "dimension_mismatch",
            InferenceError::UnrecognizedClass(_) => "unrecognized_class",
            InferenceError::Model(_) => "model_error",
        }
    }
}

/// Checks a produced width against the expected one.
pub(crate) fn ensure_width(stage: MismatchStage, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(InferenceError::DimensionMismatch {
            stage,
            expected,
            actual,
        })
    }
}

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

//! The loaded, read-only model bundle.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::artifacts::{ArtifactKind, ArtifactPaths};
use crate::classifier::{OnnxClassifier, OnnxConfig, RandomForestClassifier, UrlClassifier};
use crate::error::{ensure_width, InferenceError, MismatchStage, Result};
use crate::features::{NUMERIC_BLOCK_WIDTH, SCALAR_BLOCK_WIDTH};
use crate::scaler::{NumericScaler, StandardScaler};
use crate::vectorizer::{TextVectorizer, TfIdfVectorizer};

/// Classifier, vectorizer and scaler trained together.
///
/// Widths are cross-checked on construction; once built the bundle is
/// immutable and can be shared between threads.
pub struct ModelBundle {
    classifier: Box<dyn UrlClassifier>,
    vectorizer: Box<dyn TextVectorizer>,
    scaler: Box<dyn NumericScaler>,
}

impl ModelBundle {
    pub fn new(
        classifier: Box<dyn UrlClassifier>,
        vectorizer: Box<dyn TextVectorizer>,
        scaler: Box<dyn NumericScaler>,
    ) -> Result<Self> {
        ensure_width(MismatchStage::Scaler, NUMERIC_BLOCK_WIDTH, scaler.width())?;
        let width = vectorizer.width() + SCALAR_BLOCK_WIDTH + NUMERIC_BLOCK_WIDTH;
        ensure_width(MismatchStage::Classifier, classifier.n_features(), width)?;

        Ok(Self {
            classifier,
            vectorizer,
            scaler,
        })
    }

    /// Loads all three artifacts.
    ///
    /// A model path ending in `.onnx` selects the ONNX backend (requires the
    /// `ml` feature); anything else is read as a random forest artifact.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::load(
            paths.path(ArtifactKind::Vectorizer),
            paths.digest(ArtifactKind::Vectorizer),
        )
        .map_err(InferenceError::artifact(ArtifactKind::Vectorizer))?;

        let scaler = StandardScaler::load(
            paths.path(ArtifactKind::Scaler),
            paths.digest(ArtifactKind::Scaler),
        )
        .map_err(InferenceError::artifact(ArtifactKind::Scaler))?;

        let model_path = paths.path(ArtifactKind::Classifier);
        let model_digest = paths.digest(ArtifactKind::Classifier);
        let classifier: Box<dyn UrlClassifier> = if is_onnx(model_path) {
            let n_features = vectorizer.width() + SCALAR_BLOCK_WIDTH + NUMERIC_BLOCK_WIDTH;
            let config = OnnxConfig::new(model_path, n_features)
                .with_digest(model_digest.map(str::to_string));
            Box::new(
                OnnxClassifier::new(config)
                    .map_err(InferenceError::artifact(ArtifactKind::Classifier))?,
            )
        } else {
            Box::new(
                RandomForestClassifier::load(model_path, model_digest)
                    .map_err(InferenceError::artifact(ArtifactKind::Classifier))?,
            )
        };

        let bundle = Self::new(classifier, Box::new(vectorizer), Box::new(scaler))?;
        info!(
            classifier = bundle.classifier.name(),
            n_features = bundle.feature_width(),
            "Model bundle loaded"
        );
        Ok(bundle)
    }

    pub fn classifier(&self) -> &dyn UrlClassifier {
        self.classifier.as_ref()
    }

    pub fn vectorizer(&self) -> &dyn TextVectorizer {
        self.vectorizer.as_ref()
    }

    pub fn scaler(&self) -> &dyn NumericScaler {
        self.scaler.as_ref()
    }

    /// Width of the assembled feature vector.
    pub fn feature_width(&self) -> usize {
        self.classifier.n_features()
    }

    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            classifier: self.classifier.name(),
            vectorizer_width: self.vectorizer.width(),
            scaler_width: self.scaler.width(),
            n_features: self.classifier.n_features(),
        }
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("classifier", &self.classifier.name())
            .field("vectorizer_width", &self.vectorizer.width())
            .field("scaler_width", &self.scaler.width())
            .finish()
    }
}

/// Shape of a loaded bundle, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSummary {
    pub classifier: &'static str,
    pub vectorizer_width: usize,
    pub scaler_width: usize,
    pub n_features: usize,
}

fn is_onnx(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("onnx"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayView2;
    use std::collections::HashMap;

    struct Stub(usize);

    impl UrlClassifier for Stub {
        fn n_features(&self) -> usize {
            self.0
        }

        fn predict(&self, _samples: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
            Ok(vec![0])
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn vectorizer(width: usize) -> Box<TfIdfVectorizer> {
        let vocab: HashMap<String, usize> = (0..width).map(|i| (format!("t{i}"), i)).collect();
        Box::new(TfIdfVectorizer::new(vocab, vec![1.0; width]).unwrap())
    }

    fn scaler(width: usize) -> Box<StandardScaler> {
        Box::new(StandardScaler::new(Some(vec![0.0; width]), None).unwrap())
    }

    #[test]
    fn accepts_consistent_widths() {
        let bundle = ModelBundle::new(Box::new(Stub(513)), vectorizer(500), scaler(8)).unwrap();
        assert_eq!(bundle.feature_width(), 513);
        assert_eq!(
            bundle.summary(),
            BundleSummary {
                classifier: "stub",
                vectorizer_width: 500,
                scaler_width: 8,
                n_features: 513,
            }
        );
    }

    #[test]
    fn rejects_classifier_width_mismatch() {
        let err = ModelBundle::new(Box::new(Stub(514)), vectorizer(500), scaler(8)).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch {
                stage: MismatchStage::Classifier,
                expected: 514,
                actual: 513
            }
        ));
    }

    #[test]
    fn rejects_wrong_scaler_width() {
        let err = ModelBundle::new(Box::new(Stub(12)), vectorizer(0), scaler(7)).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch {
                stage: MismatchStage::Scaler,
                ..
            }
        ));
    }

    #[test]
    fn missing_artifacts_name_the_artifact() {
        let paths = ArtifactPaths::from_dir("nonexistent-models");
        match ModelBundle::load(&paths) {
            Err(InferenceError::ArtifactLoad { artifact, .. }) => {
                assert_eq!(artifact, ArtifactKind::Vectorizer)
            }
            other => panic!("expected artifact error, got {:?}", other),
        }
    }

    #[test]
    fn onnx_extension_detection() {
        assert!(is_onnx(Path::new("models/model.onnx")));
        assert!(is_onnx(Path::new("models/MODEL.ONNX")));
        assert!(!is_onnx(Path::new("models/model.json")));
        assert!(!is_onnx(Path::new("models/onnx")));
    }
}

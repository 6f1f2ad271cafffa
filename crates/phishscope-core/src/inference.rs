//! Entry points: parse, extract, assemble, classify.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::artifacts::ArtifactPaths;
use crate::assembler::FeatureAssembler;
use crate::bundle::ModelBundle;
use crate::classifier::{classify, Label};
use crate::error::Result;
use crate::features::UrlFeatures;

/// Loads the artifacts and classifies a single URL.
///
/// Artifacts are read on every call; hold a [`Pipeline`] to classify many
/// URLs against one load.
pub fn infer(url: &str, paths: &ArtifactPaths) -> Result<Label> {
    let bundle = ModelBundle::load(paths)?;
    infer_with(url, &bundle)
}

/// Classifies a single URL against an already loaded bundle.
pub fn infer_with(url: &str, bundle: &ModelBundle) -> Result<Label> {
    let vector = FeatureAssembler::new(bundle).build(url)?;
    classify(bundle, &vector)
}

/// Result of classifying one URL, with the features that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub features: UrlFeatures,
    /// Width of the assembled feature vector.
    pub width: usize,
    /// Time spent in the pipeline, in microseconds.
    pub duration_us: u64,
}

/// Shared handle to a loaded bundle.
///
/// Cloning is cheap; clones share the same read-only bundle.
#[derive(Debug, Clone)]
pub struct Pipeline {
    bundle: Arc<ModelBundle>,
}

impl Pipeline {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
        }
    }

    /// Loads the bundle from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        ModelBundle::load(paths).map(Self::new)
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Classifies `url`, returning the label with its features and timing.
    pub fn predict(&self, url: &str) -> Result<Prediction> {
        let start = Instant::now();

        let (vector, features) = FeatureAssembler::new(&self.bundle).build_explained(url)?;
        let label = classify(&self.bundle, &vector)?;
        let duration_us = start.elapsed().as_micros() as u64;

        debug!(
            url_len = url.len(),
            width = vector.len(),
            label = %label,
            latency_us = duration_us,
            "Classified URL"
        );

        Ok(Prediction {
            label,
            features,
            width: vector.len(),
            duration_us,
        })
    }

    /// Classifies `url`, returning only the label.
    pub fn label(&self, url: &str) -> Result<Label> {
        infer_with(url, &self.bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UrlClassifier;
    use crate::error::InferenceError;
    use crate::scaler::StandardScaler;
    use crate::vectorizer::TfIdfVectorizer;
    use ndarray::ArrayView2;
    use std::collections::HashMap;

    /// Phishing when the is_ip flag is set.
    struct IpRule;

    impl UrlClassifier for IpRule {
        fn n_features(&self) -> usize {
            15
        }

        fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
            Ok(samples
                .rows()
                .into_iter()
                .map(|row| if row[4] > 0.5 { 0 } else { 1 })
                .collect())
        }

        fn name(&self) -> &'static str {
            "ip_rule"
        }
    }

    fn pipeline() -> Pipeline {
        let vocab: HashMap<String, usize> =
            [("login".to_string(), 0), ("com".to_string(), 1)].into_iter().collect();
        let bundle = ModelBundle::new(
            Box::new(IpRule),
            Box::new(TfIdfVectorizer::new(vocab, vec![1.0, 1.0]).unwrap()),
            Box::new(StandardScaler::new(Some(vec![0.0; 8]), Some(vec![1.0; 8])).unwrap()),
        )
        .unwrap();
        Pipeline::new(bundle)
    }

    #[test]
    fn classifies_by_features() {
        let pipeline = pipeline();
        assert_eq!(pipeline.label("http://192.168.0.1/login").unwrap(), Label::Phishing);
        assert_eq!(
            pipeline.label("https://en.wikipedia.org/wiki/Phishing").unwrap(),
            Label::Legitimate
        );
    }

    #[test]
    fn prediction_carries_features() {
        let prediction = pipeline().predict("http://192.168.0.1/login").unwrap();
        assert_eq!(prediction.label, Label::Phishing);
        assert!(prediction.features.is_ip);
        assert_eq!(prediction.width, 15);
    }

    #[test]
    fn clones_share_the_bundle() {
        let a = pipeline();
        let b = a.clone();
        assert!(std::ptr::eq(a.bundle(), b.bundle()));
    }

    #[test]
    fn infer_surfaces_missing_artifacts() {
        let err = infer("http://a.io", &ArtifactPaths::from_dir("nonexistent-models")).unwrap_err();
        assert!(matches!(err, InferenceError::ArtifactLoad { .. }));
    }
}

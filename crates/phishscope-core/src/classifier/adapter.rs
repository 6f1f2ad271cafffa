//! Single-sample classification against a loaded bundle.

use ndarray::{Array1, Axis};

use super::Label;
use crate::assembler::FeatureVector;
use crate::bundle::ModelBundle;
use crate::error::{ensure_width, InferenceError, MismatchStage, Result};

/// Classifies one assembled feature vector with the bundle's classifier.
///
/// The vector is reshaped to a single-row sample. Exactly one class code
/// must come back, and it must map to a [`Label`].
pub fn classify(bundle: &ModelBundle, vector: &FeatureVector) -> Result<Label> {
    let classifier = bundle.classifier();
    ensure_width(MismatchStage::Classifier, classifier.n_features(), vector.len())?;

    let sample = Array1::from_vec(vector.as_slice().to_vec()).insert_axis(Axis(0));
    let codes = classifier.predict(sample.view())?;

    match codes.as_slice() {
        [code] => Label::from_class_code(*code),
        [] => Err(InferenceError::Model(format!(
            "{} returned no prediction",
            classifier.name()
        ))),
        many => Err(InferenceError::Model(format!(
            "{} returned {} predictions for one sample",
            classifier.name(),
            many.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UrlClassifier;
    use crate::scaler::StandardScaler;
    use crate::vectorizer::TfIdfVectorizer;
    use ndarray::ArrayView2;
    use std::collections::HashMap;

    struct Fixed(Vec<i64>);

    impl UrlClassifier for Fixed {
        fn n_features(&self) -> usize {
            14
        }

        fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
            assert_eq!(samples.dim(), (1, 14));
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn bundle(codes: Vec<i64>) -> ModelBundle {
        let vocab: HashMap<String, usize> = [("com".to_string(), 0)].into_iter().collect();
        ModelBundle::new(
            Box::new(Fixed(codes)),
            Box::new(TfIdfVectorizer::new(vocab, vec![1.0]).unwrap()),
            Box::new(StandardScaler::new(Some(vec![0.0; 8]), None).unwrap()),
        )
        .unwrap()
    }

    fn vector(width: usize) -> FeatureVector {
        FeatureVector::from(vec![0.0; width])
    }

    #[test]
    fn maps_single_code_to_label() {
        assert_eq!(classify(&bundle(vec![0]), &vector(14)).unwrap(), Label::Phishing);
        assert_eq!(classify(&bundle(vec![1]), &vector(14)).unwrap(), Label::Legitimate);
    }

    #[test]
    fn unknown_code_is_unrecognized() {
        let err = classify(&bundle(vec![2]), &vector(14)).unwrap_err();
        assert!(matches!(err, InferenceError::UnrecognizedClass(2)));
    }

    #[test]
    fn wrong_width_is_rejected_before_predict() {
        let err = classify(&bundle(vec![0]), &vector(13)).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch {
                stage: MismatchStage::Classifier,
                expected: 14,
                actual: 13
            }
        ));
    }

    #[test]
    fn prediction_count_must_be_one() {
        assert!(matches!(
            classify(&bundle(vec![]), &vector(14)),
            Err(InferenceError::Model(_))
        ));
        assert!(matches!(
            classify(&bundle(vec![0, 1]), &vector(14)),
            Err(InferenceError::Model(_))
        ));
    }
}

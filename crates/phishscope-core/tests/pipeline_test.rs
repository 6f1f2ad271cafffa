//! End-to-end classification against artifacts written to a temp dir.

use std::fs;
use std::path::Path;

use ndarray::ArrayView2;
use phishscope_core::artifacts::sha256_hex;
use phishscope_core::{
    infer, infer_with, ArtifactDigests, ArtifactError, ArtifactKind, ArtifactPaths,
    InferenceError, Label, MismatchStage, ModelBundle, Pipeline, StandardScaler, TfIdfVectorizer,
    UrlClassifier,
};
use serde_json::{json, Value};
use tempfile::TempDir;

const VOCAB_WIDTH: usize = 4;
const IS_IP_INDEX: usize = VOCAB_WIDTH + 2;

fn vectorizer_json() -> Value {
    json!({
        "kind": "tfidf_vectorizer",
        "format_version": "1.0.0",
        "vocabulary": { "paypal": 0, "login": 1, "com": 2, "verify": 3 },
        "idf": [2.0, 1.5, 1.0, 3.0]
    })
}

fn scaler_json(version: &str) -> Value {
    json!({
        "kind": "standard_scaler",
        "format_version": version,
        "mean": [40.0, 2.0, 4.0, 3.0, 8.0, 15.0, 10.0, 5.0],
        "scale": [20.0, 1.0, 2.0, 4.0, 5.0, 6.0, 8.0, 10.0]
    })
}

/// One stump on the is_ip flag: IP hosts are phishing.
fn forest_json(n_features: usize) -> Value {
    json!({
        "kind": "random_forest",
        "format_version": "1.0.0",
        "n_features": n_features,
        "classes": [0, 1],
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [IS_IP_INDEX, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [[3.0, 3.0], [0.0, 3.0], [3.0, 0.0]]
        }]
    })
}

fn write(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn model_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "vectorizer.json", &vectorizer_json());
    write(dir.path(), "scaler.json", &scaler_json("1.0.0"));
    write(dir.path(), "model.json", &forest_json(VOCAB_WIDTH + 13));
    dir
}

fn artifact_source(err: InferenceError) -> (ArtifactKind, ArtifactError) {
    match err {
        InferenceError::ArtifactLoad { artifact, source } => (artifact, source),
        other => panic!("expected artifact error, got {other}"),
    }
}

#[test]
fn ip_host_is_phishing() {
    let dir = model_dir();
    let paths = ArtifactPaths::from_dir(dir.path());
    assert_eq!(
        infer("http://192.168.12.4/paypal/login", &paths).unwrap(),
        Label::Phishing
    );
}

#[test]
fn named_host_is_legitimate() {
    let dir = model_dir();
    let paths = ArtifactPaths::from_dir(dir.path());
    let label = infer("https://en.wikipedia.org/wiki/Phishing", &paths).unwrap();
    assert_eq!(label, Label::Legitimate);
    assert_eq!(label.as_str(), "Legitimate URL");
}

#[test]
fn repeated_inference_is_deterministic() {
    let dir = model_dir();
    let pipeline = Pipeline::load(&ArtifactPaths::from_dir(dir.path())).unwrap();
    let url = "http://paypal-secure-login.com/verify?acc=1";

    let first = pipeline.predict(url).unwrap();
    for _ in 0..10 {
        let again = pipeline.predict(url).unwrap();
        assert_eq!(again.label, first.label);
        assert_eq!(again.features, first.features);
    }
    assert_eq!(first.width, VOCAB_WIDTH + 13);
}

#[test]
fn malformed_and_empty_urls_still_get_a_label() {
    let dir = model_dir();
    let pipeline = Pipeline::load(&ArtifactPaths::from_dir(dir.path())).unwrap();
    for url in ["not a url at all###", "", "line\nbreak", "://"] {
        assert!(pipeline.label(url).is_ok(), "url: {:?}", url);
    }
}

#[test]
fn manifest_overrides_file_names() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tfidf-v3.json", &vectorizer_json());
    write(dir.path(), "scaler-v3.json", &scaler_json("1.1.0"));
    write(dir.path(), "forest-v3.json", &forest_json(VOCAB_WIDTH + 13));
    write(
        dir.path(),
        "manifest.json",
        &json!({
            "model": "forest-v3.json",
            "vectorizer": "tfidf-v3.json",
            "scaler": "scaler-v3.json"
        }),
    );

    let paths = ArtifactPaths::discover(dir.path()).unwrap();
    assert_eq!(infer("http://10.0.0.1/", &paths).unwrap(), Label::Phishing);
}

#[test]
fn classifier_width_mismatch_is_surfaced() {
    let dir = model_dir();
    write(dir.path(), "model.json", &forest_json(VOCAB_WIDTH + 14));

    let err = infer("http://a.io", &ArtifactPaths::from_dir(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        InferenceError::DimensionMismatch {
            stage: MismatchStage::Classifier,
            expected: 18,
            actual: 17
        }
    ));
}

#[test]
fn missing_scaler_is_an_artifact_error() {
    let dir = model_dir();
    fs::remove_file(dir.path().join("scaler.json")).unwrap();

    let err = infer("http://a.io", &ArtifactPaths::from_dir(dir.path())).unwrap_err();
    assert_eq!(err.code(), "artifact_error");
    let (kind, source) = artifact_source(err);
    assert_eq!(kind, ArtifactKind::Scaler);
    assert!(matches!(source, ArtifactError::NotFound(_)));
}

#[test]
fn swapped_artifacts_report_wrong_kind() {
    let dir = model_dir();
    let paths = ArtifactPaths::from_dir(dir.path()).with_vectorizer(dir.path().join("scaler.json"));

    let (kind, source) = artifact_source(infer("http://a.io", &paths).unwrap_err());
    assert_eq!(kind, ArtifactKind::Vectorizer);
    assert!(matches!(
        source,
        ArtifactError::WrongKind {
            expected: "tfidf_vectorizer",
            ..
        }
    ));
}

#[test]
fn newer_major_format_is_rejected() {
    let dir = model_dir();
    write(dir.path(), "scaler.json", &scaler_json("2.0.0"));

    let (kind, source) =
        artifact_source(infer("http://a.io", &ArtifactPaths::from_dir(dir.path())).unwrap_err());
    assert_eq!(kind, ArtifactKind::Scaler);
    assert!(matches!(source, ArtifactError::UnsupportedVersion { .. }));
}

#[test]
fn pinned_digests_are_enforced() {
    let dir = model_dir();
    let digest_of = |name: &str| sha256_hex(&fs::read(dir.path().join(name)).unwrap());

    let pinned = ArtifactDigests {
        model: Some(digest_of("model.json")),
        vectorizer: Some(digest_of("vectorizer.json")),
        scaler: Some(digest_of("scaler.json")),
    };
    let paths = ArtifactPaths::from_dir(dir.path()).with_digests(pinned.clone());
    assert!(infer("http://a.io", &paths).is_ok());

    let tampered = ArtifactDigests {
        model: Some("0".repeat(64)),
        ..pinned
    };
    let paths = ArtifactPaths::from_dir(dir.path()).with_digests(tampered);
    let (kind, source) = artifact_source(infer("http://a.io", &paths).unwrap_err());
    assert_eq!(kind, ArtifactKind::Classifier);
    assert!(matches!(source, ArtifactError::DigestMismatch { .. }));
}

struct OutOfRange;

impl UrlClassifier for OutOfRange {
    fn n_features(&self) -> usize {
        VOCAB_WIDTH + 13
    }

    fn predict(&self, _samples: ArrayView2<'_, f64>) -> phishscope_core::Result<Vec<i64>> {
        Ok(vec![2])
    }

    fn name(&self) -> &'static str {
        "out_of_range"
    }
}

#[test]
fn unknown_class_code_is_not_defaulted() {
    let dir = model_dir();
    let bundle = ModelBundle::new(
        Box::new(OutOfRange),
        Box::new(TfIdfVectorizer::load(&dir.path().join("vectorizer.json"), None).unwrap()),
        Box::new(StandardScaler::load(&dir.path().join("scaler.json"), None).unwrap()),
    )
    .unwrap();

    let err = infer_with("http://a.io", &bundle).unwrap_err();
    assert!(matches!(err, InferenceError::UnrecognizedClass(2)));
    assert_eq!(err.code(), "unrecognized_class");
}

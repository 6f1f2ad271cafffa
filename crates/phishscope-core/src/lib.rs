//! PhishScope Core - URL feature extraction and phishing classification.
//!
//! Turns a raw URL string into a fixed-order numeric feature vector and
//! hands it to a pre-trained binary classifier:
//!
//! ```text
//! URL → url_parts::parse → features → assembler → classifier::classify → Label
//!                                         ▲
//!                      TextVectorizer ────┤
//!                      NumericScaler  ────┘
//! ```
//!
//! The vectorizer, scaler and classifier are trait objects held by a
//! [`ModelBundle`]; concrete implementations load from versioned JSON
//! artifacts (see [`artifacts`]), and an ONNX classifier is available with
//! the `ml` feature.
//!
//! ## Example
//!
//! ```no_run
//! use phishscope_core::{infer, ArtifactPaths};
//!
//! let paths = ArtifactPaths::from_dir("models");
//! let label = infer("http://paypal-secure-login.com/verify?acc=1", &paths).unwrap();
//! println!("Prediction Label: {}", label);
//! ```

pub mod artifacts;
pub mod assembler;
pub mod bundle;
pub mod classifier;
pub mod error;
pub mod features;
pub mod inference;
pub mod scaler;
pub mod url_parts;
pub mod vectorizer;

pub use artifacts::{ArtifactDigests, ArtifactKind, ArtifactPaths};
pub use assembler::{assemble, FeatureAssembler, FeatureVector};
pub use bundle::{BundleSummary, ModelBundle};
pub use classifier::{classify, Label, UrlClassifier};
pub use error::{ArtifactError, InferenceError, MismatchStage, Result};
pub use features::UrlFeatures;
pub use inference::{infer, infer_with, Pipeline, Prediction};
pub use scaler::{NumericScaler, StandardScaler};
pub use url_parts::{parse, UrlParts};
pub use vectorizer::{TextVectorizer, TfIdfVectorizer};
